//! Helper utilities for FFI layer

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tokio::runtime::{Builder, Runtime};

use crate::error::OpenImError;

/// Unwrap an Arc or clone it if there are multiple references
///
/// Used by the builder objects, which are handed around as `Arc<Self>`.
pub fn unwrap_or_clone_arc<T: Clone>(arc: Arc<T>) -> T {
    Arc::try_unwrap(arc).unwrap_or_else(|arc| (*arc).clone())
}

static RUNTIME: OnceLock<Runtime> = OnceLock::new();
static RUNTIME_INIT: Mutex<()> = parking_lot::const_mutex(());

#[cfg(test)]
static RUNTIME_BUILDS: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

/// Get the process-wide tokio runtime
///
/// 首次调用时创建；构建过程持锁，整个进程只会构建一次。
/// 构建失败不会缓存，下次调用会重试。
pub fn get_runtime() -> Result<&'static Runtime, OpenImError> {
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }
    let _guard = RUNTIME_INIT.lock();
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime);
    }
    #[cfg(test)]
    RUNTIME_BUILDS.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    let runtime = Builder::new_multi_thread()
        .enable_all()
        .thread_name("openim-bridge")
        .build()
        .map_err(OpenImError::runtime)?;
    Ok(RUNTIME.get_or_init(|| runtime))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_or_clone_arc() {
        let arc = Arc::new(42);
        let value = unwrap_or_clone_arc(arc);
        assert_eq!(value, 42);

        let arc = Arc::new(String::from("test"));
        let arc2 = arc.clone();
        let value = unwrap_or_clone_arc(arc);
        assert_eq!(value, "test");
        assert_eq!(*arc2, "test");
    }

    #[test]
    fn test_runtime_is_shared() {
        let first = get_runtime().unwrap() as *const Runtime;
        let second = get_runtime().unwrap() as *const Runtime;
        assert_eq!(first, second);
    }

    #[test]
    fn test_runtime_built_once_under_contention() {
        let barrier = Arc::new(std::sync::Barrier::new(8));
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    get_runtime().unwrap() as *const Runtime as usize
                })
            })
            .collect();
        let seen: Vec<usize> = workers.into_iter().map(|w| w.join().unwrap()).collect();

        assert!(seen.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(RUNTIME_BUILDS.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
