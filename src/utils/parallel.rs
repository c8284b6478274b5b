//! Abstraction layer for parallel execution.
//!
//! With the `parallel` feature enabled, this module re-exports Rayon's iterator traits and
//! runs work inside a dedicated thread pool. Without it, serial fallbacks mimic the same API so
//! the driver is written once and simply runs its workers one after another.

#[cfg(feature = "parallel")]
pub use rayon::prelude::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

#[cfg(not(feature = "parallel"))]
pub use self::fallback::*;

/// Runs `op` inside a pool of exactly `threads` worker threads.
///
/// Every parallel iterator started from within `op` is executed on that pool, so the number of
/// concurrently running workers never exceeds `threads` regardless of the global Rayon setup.
#[cfg(feature = "parallel")]
pub fn install_pool<R, F>(threads: usize, op: F) -> Result<R, String>
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("hbdist-worker-{i}"))
        .build()
        .map_err(|e| e.to_string())?;
    Ok(pool.install(op))
}

/// Serial counterpart of the pooled runner: `op` runs on the calling thread.
#[cfg(not(feature = "parallel"))]
pub fn install_pool<R, F>(_threads: usize, op: F) -> Result<R, String>
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    Ok(op())
}

#[cfg(not(feature = "parallel"))]
mod fallback {
    pub use std::iter::Iterator as ParallelIterator;
    pub use std::iter::Iterator as IndexedParallelIterator;

    /// Shim trait to allow `par_iter()` on types that implement `IntoIterator` for `&T`.
    pub trait IntoParallelRefIterator<'data> {
        type Item;
        type Iter: Iterator<Item = Self::Item>;
        fn par_iter(&'data self) -> Self::Iter;
    }

    impl<'data, I: 'data + ?Sized> IntoParallelRefIterator<'data> for I
    where
        &'data I: IntoIterator,
    {
        type Item = <&'data I as IntoIterator>::Item;
        type Iter = <&'data I as IntoIterator>::IntoIter;
        fn par_iter(&'data self) -> Self::Iter {
            self.into_iter()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pooled_map_preserves_order() {
        let items: Vec<usize> = (0..64).collect();
        let doubled: Vec<usize> =
            install_pool(4, || items.par_iter().map(|x| x * 2).collect()).unwrap();

        assert_eq!(doubled, (0..64).map(|x| x * 2).collect::<Vec<_>>());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn pool_runs_on_requested_thread_count() {
        let threads = install_pool(3, rayon::current_num_threads).unwrap();
        assert_eq!(threads, 3);
    }
}
