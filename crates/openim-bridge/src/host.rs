//! 宿主回调
//!
//! [`Responder`] 包装宿主传入的回调句柄，按值消费，保证恰好触发一次：
//! 正常路径调用 [`Responder::respond`]；如果操作被放弃（任务取消、运行时关闭），
//! drop 时补发一个失败信封，宿主永远不会等不到结果。

use std::sync::Arc;

use tracing::{debug, warn};

use crate::dispatch::Method;
use crate::envelope::{ResultEnvelope, CODE_FAILURE};

/// 宿主侧的结果回调
pub trait HostCallback: Send + Sync {
    fn invoke(&self, result: ResultEnvelope);
}

impl<F> HostCallback for F
where
    F: Fn(ResultEnvelope) + Send + Sync,
{
    fn invoke(&self, result: ResultEnvelope) {
        self(result)
    }
}

pub struct Responder {
    method: Option<Method>,
    callback: Option<Arc<dyn HostCallback>>,
}

impl Responder {
    pub fn new(method: Option<Method>, callback: Arc<dyn HostCallback>) -> Self {
        Self {
            method,
            callback: Some(callback),
        }
    }

    pub fn respond(mut self, result: ResultEnvelope) {
        if let Some(callback) = self.callback.take() {
            debug!(
                "{} -> code={}",
                self.method.map(|m| m.as_str()).unwrap_or("<unknown>"),
                result.code
            );
            callback.invoke(result);
        }
    }
}

impl Drop for Responder {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            let prefix = self.method.map(|m| m.fault_prefix()).unwrap_or("");
            warn!("⚠️ operation abandoned before producing a result: {:?}", self.method);
            callback.invoke(ResultEnvelope::failure(
                CODE_FAILURE,
                format!("{}operation abandoned", prefix),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<ResultEnvelope>>>, Arc<dyn HostCallback>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let callback: Arc<dyn HostCallback> = Arc::new(move |env: ResultEnvelope| sink.lock().push(env));
        (seen, callback)
    }

    #[test]
    fn test_respond_fires_once() {
        let (seen, callback) = recorder();
        Responder::new(Some(Method::Logout), callback).respond(ResultEnvelope::success("done"));
        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], ResultEnvelope::success("done"));
    }

    #[test]
    fn test_drop_without_respond_sends_fallback() {
        let (seen, callback) = recorder();
        drop(Responder::new(Some(Method::Login), callback));
        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].code, CODE_FAILURE);
        assert_eq!(seen[0].message, "登录异常: operation abandoned");
    }
}
