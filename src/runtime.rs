//! Runtime abstraction layer for async operations
//!
//! Geocoding and geolocation futures are handed to an [`AsyncSpawner`] so the
//! selection controller works with Tokio, a plain thread executor, or a test
//! spawner that drives futures by hand.

use crate::prelude::{Future, Pin};

/// Boxed future accepted by spawners
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A trait for spawning async tasks (object-safe version)
pub trait AsyncSpawner: Send + Sync + 'static {
    /// Spawn a future and return a handle to it
    fn spawn_boxed(&self, future: BoxFuture) -> Box<dyn AsyncHandle>;
}

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;

    /// Cancel the task
    fn cancel(&self);
}

/// Default spawner implementations
pub mod spawners {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[cfg(feature = "tokio-runtime")]
    pub mod tokio_impl {
        use super::*;
        use ::tokio::task::JoinHandle;

        /// Tokio-based async spawner
        ///
        /// Uses the ambient runtime when called from inside one, otherwise the
        /// handle captured at construction.
        pub struct TokioSpawner {
            handle: Option<::tokio::runtime::Handle>,
        }

        impl TokioSpawner {
            pub fn new() -> Self {
                Self {
                    handle: ::tokio::runtime::Handle::try_current().ok(),
                }
            }

            pub fn with_handle(handle: ::tokio::runtime::Handle) -> Self {
                Self {
                    handle: Some(handle),
                }
            }
        }

        impl Default for TokioSpawner {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsyncSpawner for TokioSpawner {
            fn spawn_boxed(&self, future: BoxFuture) -> Box<dyn AsyncHandle> {
                match (::tokio::runtime::Handle::try_current(), &self.handle) {
                    (Ok(current), _) => Box::new(TokioHandle(current.spawn(future))),
                    (Err(_), Some(handle)) => Box::new(TokioHandle(handle.spawn(future))),
                    (Err(_), None) => {
                        log::debug!("No tokio runtime in scope, falling back to a worker thread");
                        ThreadSpawner.spawn_boxed(future)
                    }
                }
            }
        }

        struct TokioHandle(JoinHandle<()>);

        impl AsyncHandle for TokioHandle {
            fn is_finished(&self) -> bool {
                self.0.is_finished()
            }

            fn cancel(&self) {
                self.0.abort();
            }
        }
    }

    /// Runs each future to completion on its own OS thread
    pub struct ThreadSpawner;

    impl AsyncSpawner for ThreadSpawner {
        fn spawn_boxed(&self, future: BoxFuture) -> Box<dyn AsyncHandle> {
            let finished = Arc::new(AtomicBool::new(false));
            let finished_clone = finished.clone();
            std::thread::spawn(move || {
                drive(future);
                finished_clone.store(true, Ordering::Release);
            });
            Box::new(ThreadHandle { finished })
        }
    }

    /// Runs `future` to completion on the calling thread
    ///
    /// With tokio enabled the future gets its own current-thread runtime, so
    /// reqwest and tokio timers find a reactor.
    #[cfg(feature = "tokio-runtime")]
    fn drive(future: BoxFuture) {
        match ::tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt.block_on(future),
            Err(e) => {
                log::warn!("Failed to build worker runtime, polling without a reactor: {}", e);
                futures::executor::block_on(future);
            }
        }
    }

    #[cfg(not(feature = "tokio-runtime"))]
    fn drive(future: BoxFuture) {
        futures::executor::block_on(future);
    }

    struct ThreadHandle {
        finished: Arc<AtomicBool>,
    }

    impl AsyncHandle for ThreadHandle {
        fn is_finished(&self) -> bool {
            self.finished.load(Ordering::Acquire)
        }

        fn cancel(&self) {
            // Threads can't be cancelled, the result is discarded by the caller
        }
    }
}

/// Global runtime instance
static RUNTIME: std::sync::OnceLock<Box<dyn AsyncSpawner>> = std::sync::OnceLock::new();

/// Initialize the runtime with a specific spawner
pub fn init_runtime(spawner: Box<dyn AsyncSpawner>) {
    if RUNTIME.set(spawner).is_err() {
        log::warn!("Runtime already initialized, keeping the existing spawner");
    }
}

/// Get the global runtime spawner
pub fn runtime() -> &'static dyn AsyncSpawner {
    RUNTIME
        .get_or_init(|| {
            #[cfg(feature = "tokio-runtime")]
            {
                Box::new(spawners::tokio_impl::TokioSpawner::new())
            }

            #[cfg(not(feature = "tokio-runtime"))]
            {
                Box::new(spawners::ThreadSpawner)
            }
        })
        .as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "tokio-runtime")]
    #[::tokio::test]
    async fn test_tokio_spawner() {
        let handle = runtime().spawn_boxed(Box::pin(async {
            ::tokio::time::sleep(::tokio::time::Duration::from_millis(10)).await;
        }));

        // Should not be finished immediately
        assert!(!handle.is_finished());

        // Wait a bit and check again
        ::tokio::time::sleep(::tokio::time::Duration::from_millis(50)).await;
        assert!(handle.is_finished());
    }

    #[test]
    fn test_thread_spawner_runs_future() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let _handle = spawners::ThreadSpawner.spawn_boxed(Box::pin(async move {
            let _ = tx.send(42);
        }));

        let value = rx
            .recv_timeout(std::time::Duration::from_secs(2))
            .expect("thread spawner never ran the future");
        assert_eq!(value, 42);
    }

    #[cfg(feature = "tokio-runtime")]
    #[test]
    fn test_thread_spawner_provides_a_reactor() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let handle = spawners::ThreadSpawner.spawn_boxed(Box::pin(async move {
            ::tokio::time::sleep(::tokio::time::Duration::from_millis(5)).await;
            let _ = tx.send("slept");
        }));

        let value = rx
            .recv_timeout(std::time::Duration::from_secs(2))
            .expect("timer future never completed on the worker thread");
        assert_eq!(value, "slept");

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
        while !handle.is_finished() && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(handle.is_finished());
    }

    #[cfg(feature = "tokio-runtime")]
    #[::tokio::test]
    async fn test_tokio_cancel_aborts_task() {
        let spawner = spawners::tokio_impl::TokioSpawner::new();
        let handle = spawner.spawn_boxed(Box::pin(futures::future::pending::<()>()));

        handle.cancel();
        ::tokio::time::sleep(::tokio::time::Duration::from_millis(20)).await;
        assert!(handle.is_finished());
    }
}
