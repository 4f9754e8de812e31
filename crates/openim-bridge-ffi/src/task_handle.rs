//! Task handle for managing async operations
//!
//! Returned by subscriptions and by queued invocations so foreign callers
//! can cancel them or check whether they are done.

use tokio::task::JoinHandle;
use tracing::debug;

/// A handle to a running async task
#[derive(uniffi::Object)]
pub struct TaskHandle {
    handle: JoinHandle<()>,
    /// 订阅随句柄释放而取消；调用任务释放句柄后继续运行
    cancel_on_drop: bool,
}

impl TaskHandle {
    /// 订阅类任务：句柄被释放即取消
    pub fn subscription(handle: JoinHandle<()>) -> Self {
        Self {
            handle,
            cancel_on_drop: true,
        }
    }

    /// 调用类任务：宿主丢弃句柄不影响结果回调
    pub fn detached(handle: JoinHandle<()>) -> Self {
        Self {
            handle,
            cancel_on_drop: false,
        }
    }
}

#[uniffi::export]
impl TaskHandle {
    /// Cancel the task
    ///
    /// A cancelled invocation still answers its host callback with an
    /// "operation abandoned" envelope.
    pub fn cancel(&self) {
        debug!("Cancelling task");
        self.handle.abort();
    }

    /// Check if the task has finished
    ///
    /// Returns true if the task has completed (either successfully or by cancellation),
    /// false if it's still running.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        if self.cancel_on_drop && !self.handle.is_finished() {
            debug!("Auto-cancelling subscription on drop");
            self.handle.abort();
        }
    }
}
