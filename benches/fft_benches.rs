use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use por_stark::fft::{fft, ifft, EvaluationDomain};
use por_stark::field::FieldElement;

fn bench_fft(c: &mut Criterion) {
    let mut group = c.benchmark_group("fft");
    for log2 in [10u32, 14, 16] {
        let size = 1usize << log2;
        let root = FieldElement::root_of_unity(FieldElement::GENERATOR, size as u64);
        let values: Vec<FieldElement> = (0..size as u64).map(FieldElement::new).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("forward", size), &values, |b, values| {
            b.iter(|| fft(values, root));
        });
        group.bench_with_input(BenchmarkId::new("inverse", size), &values, |b, values| {
            b.iter(|| ifft(values, root));
        });
    }
    group.finish();
}

fn bench_extension(c: &mut Criterion) {
    let mut group = c.benchmark_group("low_degree_extension");
    for steps in [1024usize, 8192] {
        let domain = EvaluationDomain::new(FieldElement::GENERATOR, steps, 8);
        let column: Vec<FieldElement> = (0..steps as u64).map(FieldElement::new).collect();
        group.throughput(Throughput::Elements(domain.precision() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(steps), &column, |b, column| {
            b.iter(|| domain.extend(column));
        });
    }
    group.finish();
}

criterion_group!(fft_group, bench_fft, bench_extension);
criterion_main!(fft_group);
