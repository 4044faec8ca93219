use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use por_stark::field::FieldElement;
use por_stark::merkle::{verify_multi_branch, MerkleTree};
use por_stark::utils::get_pseudorandom_indices;

fn make_values(count: usize) -> Vec<FieldElement> {
    (0..count as u64)
        .map(|i| FieldElement::new(i.wrapping_mul(0x9e37_79b9_7f4a_7c15)))
        .collect()
}

fn bench_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("commit_elements");
    for size in [1024usize, 16_384, 65_536] {
        let values = make_values(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &values, |b, values| {
            b.iter(|| MerkleTree::commit_elements(values).unwrap());
        });
    }
    group.finish();
}

fn bench_multi_branch(c: &mut Criterion) {
    let mut group = c.benchmark_group("multi_branch");
    for size in [16_384usize, 65_536] {
        let tree = MerkleTree::commit_elements(&make_values(size)).unwrap();
        let root = tree.root();
        let indices = get_pseudorandom_indices(root.as_bytes(), size, 320, 8);
        let branch = tree.multi_branch(&indices).unwrap();
        group.bench_with_input(BenchmarkId::new("open", size), &indices, |b, indices| {
            b.iter(|| tree.multi_branch(indices).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("verify", size), &indices, |b, indices| {
            b.iter(|| verify_multi_branch(&root, size, indices, &branch).unwrap());
        });
    }
    group.finish();
}

criterion_group!(merkle, bench_commit, bench_multi_branch);
criterion_main!(merkle);
