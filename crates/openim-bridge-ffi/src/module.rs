//! Host-facing module object
//!
//! [`OpenImModule`] 是宿主脚本环境看到的唯一对象：每个方法接收参数和一个
//! 结果回调，回调恰好触发一次。除 `get_login_status` 在调用线程上同步完成外，
//! 其余方法立即返回，结果在运行时线程上回调。

use std::sync::Arc;

use openim_bridge::{
    BridgeAdapter, BridgeConfig, BridgeError, HostCallback as EnvelopeSink, ImSession, Method,
    ProgressListener, ResultEnvelope, BRIDGE_VERSION, CODE_FAILURE,
};
use serde_json::{json, Value};
use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::binding::{ForeignSdk, NativeImSdk};
use crate::config::BridgeSettings;
use crate::error::OpenImError;
use crate::events::{ConnectionObserver, ForeignHostCallback, ForeignProgress, HostCallback, ProgressObserver};
use crate::helpers::get_runtime;
use crate::task_handle::TaskHandle;

macro_rules! module_ffi_log {
    ($name:expr) => {
        debug!("openim module->{}()", $name);
    };
}

#[derive(uniffi::Object)]
pub struct OpenImModule {
    adapter: Arc<BridgeAdapter>,
    runtime: Handle,
}

#[uniffi::export]
impl OpenImModule {
    /// Create the module around the host's SDK bindings
    #[uniffi::constructor]
    pub fn new(sdk: Arc<dyn NativeImSdk>, settings: Option<BridgeSettings>) -> Result<Self, OpenImError> {
        module_ffi_log!("new");
        let config = BridgeConfig::try_from(settings.unwrap_or_default())?;
        let runtime = get_runtime()?.handle().clone();
        let session = Arc::new(ImSession::new(Arc::new(ForeignSdk::new(sdk)), config.event_capacity));
        info!("✅ OpenIM module created, bridge v{}", BRIDGE_VERSION);

        Ok(Self {
            adapter: Arc::new(BridgeAdapter::new(session, config, runtime.clone())),
            runtime,
        })
    }

    /// 通用入口：按宿主方法名分发
    ///
    /// `params_json` 为空串时视为无参数。返回的句柄可用于取消排队中的调用；
    /// 同步完成的调用返回 `None`。
    pub fn invoke(
        &self,
        method: String,
        params_json: String,
        callback: Box<dyn HostCallback>,
    ) -> Option<Arc<TaskHandle>> {
        module_ffi_log!(method);
        let sink: Arc<dyn EnvelopeSink> = Arc::new(ForeignHostCallback(callback));
        let params = match parse_params(&params_json) {
            Ok(params) => params,
            Err(e) => {
                let envelope = match method.parse::<Method>() {
                    Ok(known) => e.into_envelope(known),
                    Err(unknown) => ResultEnvelope::failure(CODE_FAILURE, unknown.to_string()),
                };
                sink.invoke(envelope);
                return None;
            }
        };
        self.dispatch(&method, params, None, sink)
    }

    pub fn init_sdk(&self, config_json: String, callback: Box<dyn HostCallback>) -> Option<Arc<TaskHandle>> {
        self.invoke(Method::InitSdk.to_string(), config_json, callback)
    }

    pub fn login(&self, user_id: String, token: String, callback: Box<dyn HostCallback>) -> Option<Arc<TaskHandle>> {
        module_ffi_log!("login");
        let params = json!({ "userID": user_id, "token": token });
        self.dispatch(Method::Login.as_str(), params, None, Self::sink(callback))
    }

    pub fn logout(&self, callback: Box<dyn HostCallback>) -> Option<Arc<TaskHandle>> {
        module_ffi_log!("logout");
        self.dispatch(Method::Logout.as_str(), Value::Null, None, Self::sink(callback))
    }

    /// 同步完成，返回前已回调
    pub fn get_login_status(&self, callback: Box<dyn HostCallback>) {
        module_ffi_log!("get_login_status");
        self.dispatch(Method::GetLoginStatus.as_str(), Value::Null, None, Self::sink(callback));
    }

    /// 发送文本消息，`recv_id` 与 `group_id` 至少提供一个
    pub fn send_text_message(
        &self,
        recv_id: Option<String>,
        group_id: Option<String>,
        text: String,
        callback: Box<dyn HostCallback>,
    ) -> Option<Arc<TaskHandle>> {
        module_ffi_log!("send_text_message");
        self.dispatch(
            Method::SendTextMessage.as_str(),
            send_params(recv_id, group_id, text),
            None,
            Self::sink(callback),
        )
    }

    /// 同上，发送进度转给 `progress`
    pub fn send_text_message_with_progress(
        &self,
        recv_id: Option<String>,
        group_id: Option<String>,
        text: String,
        callback: Box<dyn HostCallback>,
        progress: Box<dyn ProgressObserver>,
    ) -> Option<Arc<TaskHandle>> {
        module_ffi_log!("send_text_message_with_progress");
        let listener: Arc<dyn ProgressListener> = Arc::new(ForeignProgress(progress));
        self.dispatch(
            Method::SendTextMessage.as_str(),
            send_params(recv_id, group_id, text),
            Some(listener),
            Self::sink(callback),
        )
    }

    pub fn get_all_conversation_list(&self, callback: Box<dyn HostCallback>) -> Option<Arc<TaskHandle>> {
        module_ffi_log!("get_all_conversation_list");
        self.dispatch(
            Method::GetAllConversationList.as_str(),
            Value::Null,
            None,
            Self::sink(callback),
        )
    }

    pub fn un_init_sdk(&self, callback: Box<dyn HostCallback>) -> Option<Arc<TaskHandle>> {
        module_ffi_log!("un_init_sdk");
        self.dispatch(Method::UnInitSdk.as_str(), Value::Null, None, Self::sink(callback))
    }

    /// 订阅连接状态事件
    ///
    /// 释放返回的句柄即取消订阅。
    pub fn subscribe_connection(&self, observer: Box<dyn ConnectionObserver>) -> Arc<TaskHandle> {
        module_ffi_log!("subscribe_connection");
        let mut events = self.adapter.subscribe_connection();
        let handle = self.runtime.spawn(async move {
            while let Some(notice) = events.recv().await {
                observer.on_event(notice.into());
            }
            debug!("connection event stream closed");
        });
        Arc::new(TaskHandle::subscription(handle))
    }

    pub fn is_initialized(&self) -> bool {
        self.adapter.session().is_initialized()
    }
}

impl OpenImModule {
    fn sink(callback: Box<dyn HostCallback>) -> Arc<dyn EnvelopeSink> {
        Arc::new(ForeignHostCallback(callback))
    }

    fn dispatch(
        &self,
        method: &str,
        params: Value,
        progress: Option<Arc<dyn ProgressListener>>,
        sink: Arc<dyn EnvelopeSink>,
    ) -> Option<Arc<TaskHandle>> {
        self.adapter
            .invoke(method, params, progress, sink)
            .map(|handle| Arc::new(TaskHandle::detached(handle)))
    }
}

fn parse_params(params_json: &str) -> Result<Value, BridgeError> {
    if params_json.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(params_json)?)
}

fn send_params(recv_id: Option<String>, group_id: Option<String>, text: String) -> Value {
    json!({ "recvID": recv_id, "groupID": group_id, "text": text })
}
