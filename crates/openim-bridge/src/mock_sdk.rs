//! 测试用 SDK
//!
//! 每个异步方法按预设的 [`CallbackBehavior`] 触发回调，并记录调用次数。

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::sdk::{
    ConnectionListener, ImSdk, OperationCallback, SdkFault, SdkResult, SendMessageCallback,
};

#[derive(Debug, Clone)]
pub enum InitBehavior {
    Return(bool),
    Fault(String),
    Panic,
    /// 阻塞指定毫秒后返回成功
    Sleep(u64),
}

#[derive(Debug, Clone)]
pub enum CallbackBehavior {
    Success(String),
    Error(i64, String),
    /// 成功后又触发失败和第二次成功
    Twice(String),
    /// 先推送进度，再成功
    Progress(Vec<i64>, String),
    /// 同步抛出异常，不触发回调
    Fault(String),
    /// 先触发成功，再同步抛出异常
    FireThenFault(String, String),
    Panic,
    /// 直接释放回调
    Drop,
    /// 持有回调永不触发
    Hold,
    /// 在另一个线程上延迟触发成功
    Delayed(u64, String),
}

pub struct MockSdk {
    init: InitBehavior,
    behaviors: Mutex<HashMap<&'static str, CallbackBehavior>>,
    login_status: i64,
    calls: Mutex<HashMap<&'static str, usize>>,
    last_config: Mutex<Option<String>>,
    last_send: Mutex<Option<(String, String, String)>>,
    listener: Mutex<Option<Arc<dyn ConnectionListener>>>,
    held: Mutex<Vec<Box<dyn Any + Send + Sync>>>,
}

impl MockSdk {
    pub fn new() -> Self {
        Self {
            init: InitBehavior::Return(true),
            behaviors: Mutex::new(HashMap::new()),
            login_status: 3,
            calls: Mutex::new(HashMap::new()),
            last_config: Mutex::new(None),
            last_send: Mutex::new(None),
            listener: Mutex::new(None),
            held: Mutex::new(Vec::new()),
        }
    }

    pub fn with_init(mut self, behavior: InitBehavior) -> Self {
        self.init = behavior;
        self
    }

    pub fn with_callback(self, op: &'static str, behavior: CallbackBehavior) -> Self {
        self.behaviors.lock().insert(op, behavior);
        self
    }

    pub fn with_login_status(mut self, status: i64) -> Self {
        self.login_status = status;
        self
    }

    pub fn calls(&self, op: &str) -> usize {
        self.calls.lock().get(op).copied().unwrap_or(0)
    }

    pub fn last_config(&self) -> Option<String> {
        self.last_config.lock().clone()
    }

    /// (message, recv_id, group_id)
    pub fn last_send(&self) -> Option<(String, String, String)> {
        self.last_send.lock().clone()
    }

    pub fn emit_connection(&self, emit: impl FnOnce(&dyn ConnectionListener)) {
        let listener = self.listener.lock().clone();
        if let Some(listener) = listener {
            emit(listener.as_ref());
        }
    }

    fn record(&self, op: &'static str) {
        *self.calls.lock().entry(op).or_insert(0) += 1;
    }

    fn behavior(&self, op: &'static str) -> CallbackBehavior {
        self.behaviors
            .lock()
            .get(op)
            .cloned()
            .unwrap_or_else(|| CallbackBehavior::Success("ok".to_string()))
    }

    fn apply<C>(&self, op: &'static str, callback: Arc<C>, progress: fn(&C, i64)) -> SdkResult<()>
    where
        C: ?Sized + OperationCallback + 'static,
    {
        self.record(op);
        match self.behavior(op) {
            CallbackBehavior::Success(data) => callback.on_success(data),
            CallbackBehavior::Error(code, msg) => callback.on_error(code, msg),
            CallbackBehavior::Twice(data) => {
                callback.on_success(data);
                callback.on_error(-99, "duplicate".to_string());
                callback.on_success("again".to_string());
            }
            CallbackBehavior::Progress(steps, data) => {
                for step in steps {
                    progress(&*callback, step);
                }
                callback.on_success(data);
            }
            CallbackBehavior::Fault(msg) => return Err(SdkFault::new(msg)),
            CallbackBehavior::FireThenFault(data, msg) => {
                callback.on_success(data);
                return Err(SdkFault::new(msg));
            }
            CallbackBehavior::Panic => panic!("sdk exploded in {}", op),
            CallbackBehavior::Drop => drop(callback),
            CallbackBehavior::Hold => self.held.lock().push(Box::new(callback)),
            CallbackBehavior::Delayed(ms, data) => {
                std::thread::spawn(move || {
                    std::thread::sleep(Duration::from_millis(ms));
                    callback.on_success(data);
                });
            }
        }
        Ok(())
    }
}

fn no_progress(_: &(dyn OperationCallback + 'static), _: i64) {}

fn send_progress(callback: &(dyn SendMessageCallback + 'static), progress: i64) {
    callback.on_progress(progress);
}

impl ImSdk for MockSdk {
    fn init_sdk(&self, listener: Arc<dyn ConnectionListener>, config_json: &str) -> SdkResult<bool> {
        self.record("init_sdk");
        *self.last_config.lock() = Some(config_json.to_string());
        *self.listener.lock() = Some(listener);
        match &self.init {
            InitBehavior::Return(ok) => Ok(*ok),
            InitBehavior::Fault(msg) => Err(SdkFault::new(msg.clone())),
            InitBehavior::Panic => panic!("init exploded"),
            InitBehavior::Sleep(ms) => {
                std::thread::sleep(Duration::from_millis(*ms));
                Ok(true)
            }
        }
    }

    fn login(&self, callback: Arc<dyn OperationCallback>, _user_id: &str, _token: &str) -> SdkResult<()> {
        self.apply("login", callback, no_progress)
    }

    fn logout(&self, callback: Arc<dyn OperationCallback>) -> SdkResult<()> {
        self.apply("logout", callback, no_progress)
    }

    fn get_login_status(&self) -> SdkResult<i64> {
        self.record("get_login_status");
        Ok(self.login_status)
    }

    fn create_text_message(&self, text: &str) -> SdkResult<String> {
        self.record("create_text_message");
        Ok(serde_json::json!({"contentType": 101, "textElem": {"content": text}}).to_string())
    }

    fn send_message(
        &self,
        callback: Arc<dyn SendMessageCallback>,
        message: &str,
        recv_id: &str,
        group_id: &str,
        _offline_push_info: Option<&str>,
    ) -> SdkResult<()> {
        *self.last_send.lock() = Some((message.to_string(), recv_id.to_string(), group_id.to_string()));
        self.apply("send_message", callback, send_progress)
    }

    fn get_all_conversation_list(&self, callback: Arc<dyn OperationCallback>) -> SdkResult<()> {
        self.apply("get_all_conversation_list", callback, no_progress)
    }

    fn un_init_sdk(&self) -> SdkResult<()> {
        self.record("un_init_sdk");
        self.listener.lock().take();
        Ok(())
    }
}
