//! Optional rayon execution with a runtime switch.
//!
//! Every parallel path in the crate produces exactly the same output as its
//! sequential counterpart; the switch only exists so tests and benchmarks can
//! compare both modes.

#[cfg(feature = "parallel")]
use std::sync::atomic::{AtomicUsize, Ordering};

/// Live guards that asked for sequential execution.
#[cfg(feature = "parallel")]
static SEQUENTIAL_HOLDS: AtomicUsize = AtomicUsize::new(0);

/// Field multiplications a rayon task should carry at minimum.
#[cfg(feature = "parallel")]
const MIN_OPS_PER_TASK: usize = 1 << 12;

/// Tasks created per worker thread at most.
#[cfg(feature = "parallel")]
const TASKS_PER_THREAD: usize = 4;

/// Cost of one keccak call, in field multiplications.
pub const HASH_OPS: usize = 64;

/// Minimum number of items per rayon task when each item costs about
/// `ops_per_item` field multiplications.
#[cfg(feature = "parallel")]
pub fn task_len(items: usize, ops_per_item: usize) -> usize {
    let by_cost = MIN_OPS_PER_TASK.div_ceil(ops_per_item.max(1));
    let by_threads = items / (rayon::current_num_threads() * TASKS_PER_THREAD);
    by_cost.max(by_threads).clamp(1, items.max(1))
}

#[cfg(feature = "parallel")]
pub fn parallelism_enabled() -> bool {
    SEQUENTIAL_HOLDS.load(Ordering::SeqCst) == 0
}

#[cfg(not(feature = "parallel"))]
pub fn parallelism_enabled() -> bool {
    false
}

/// Requests sequential execution (`enabled == false`) until the returned
/// guard is dropped.
///
/// Execution stays sequential while any such guard is alive, so overlapping
/// guards may be dropped in any order.  `set_parallelism(true)` cannot
/// override another caller's request and returns an inert guard.
#[cfg(feature = "parallel")]
pub fn set_parallelism(enabled: bool) -> ParallelismGuard {
    if !enabled {
        SEQUENTIAL_HOLDS.fetch_add(1, Ordering::SeqCst);
    }
    ParallelismGuard { holds: !enabled }
}

#[cfg(not(feature = "parallel"))]
pub fn set_parallelism(_enabled: bool) -> ParallelismGuard {
    ParallelismGuard {}
}

/// Releases a sequential-execution request on drop.
pub struct ParallelismGuard {
    #[cfg(feature = "parallel")]
    holds: bool,
}

#[cfg(feature = "parallel")]
impl Drop for ParallelismGuard {
    fn drop(&mut self) {
        if self.holds {
            SEQUENTIAL_HOLDS.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[cfg(not(feature = "parallel"))]
impl Drop for ParallelismGuard {
    fn drop(&mut self) {}
}

/// Evaluates `f(i)` for `i in 0..len`, in index order.  Each item is a
/// handful of field operations on one evaluation point.
pub fn map_indices<T, F>(len: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    map_weighted(len, 1, f)
}

/// [`map_indices`] for items costing about `ops_per_item` field
/// multiplications each, such as whole columns.
pub fn map_weighted<T, F>(len: usize, ops_per_item: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        if parallelism_enabled() {
            use rayon::prelude::*;
            return (0..len)
                .into_par_iter()
                .with_min_len(task_len(len, ops_per_item))
                .map(f)
                .collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = ops_per_item;
    (0..len).map(f).collect()
}

#[cfg(all(test, feature = "parallel"))]
mod tests {
    use super::*;

    #[test]
    fn cheap_items_are_batched() {
        assert_eq!(task_len(0, 1), 1);
        assert_eq!(task_len(100, 1), 100);
        assert!(task_len(1 << 20, 1) >= MIN_OPS_PER_TASK);
    }

    #[test]
    fn heavy_items_get_their_own_task() {
        assert_eq!(task_len(3, 1 << 16), 1);
        assert_eq!(task_len(256, HASH_OPS), MIN_OPS_PER_TASK / HASH_OPS);
    }
}
