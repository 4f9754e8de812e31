//! 一次性完成通知
//!
//! SDK 的回调对象可能在任意线程、以任意次数被触发；[`Completion`] 保证只有
//! 第一次终态回调生效，之后的回调全部丢弃。进度事件转交给可选的观察者，
//! 不会结束调用。

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::dispatch::Method;
use crate::envelope::ResultEnvelope;
use crate::events::ProgressListener;
use crate::sdk::{OperationCallback, SendMessageCallback};

pub struct Completion {
    method: Method,
    sender: Mutex<Option<oneshot::Sender<ResultEnvelope>>>,
    progress: Option<Arc<dyn ProgressListener>>,
}

impl Completion {
    /// 创建回调对象与对应的接收端
    ///
    /// 回调对象被 SDK 释放且从未触发时，接收端得到 `Err(RecvError)`。
    pub fn channel(
        method: Method,
        progress: Option<Arc<dyn ProgressListener>>,
    ) -> (Arc<Self>, oneshot::Receiver<ResultEnvelope>) {
        let (tx, rx) = oneshot::channel();
        let completion = Arc::new(Self {
            method,
            sender: Mutex::new(Some(tx)),
            progress,
        });
        (completion, rx)
    }

    /// 返回 `true` 表示本次触发生效
    pub fn complete(&self, envelope: ResultEnvelope) -> bool {
        let sender = self.sender.lock().take();
        match sender {
            Some(tx) => {
                if tx.send(envelope).is_err() {
                    // 等待方已超时放弃
                    debug!("{}: result arrived after the caller gave up", self.method);
                }
                true
            }
            None => {
                warn!("⚠️ {}: duplicate SDK callback ignored (code={})", self.method, envelope.code);
                false
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        self.sender.lock().is_none()
    }
}

impl OperationCallback for Completion {
    fn on_error(&self, code: i64, message: String) {
        self.complete(ResultEnvelope::failure(code, message));
    }

    fn on_success(&self, data: String) {
        self.complete(ResultEnvelope::success(data));
    }
}

impl SendMessageCallback for Completion {
    fn on_progress(&self, progress: i64) {
        debug!("{}: onProgress: {}", self.method, progress);
        if let Some(listener) = &self.progress {
            listener.on_progress(progress);
        }
    }
}
