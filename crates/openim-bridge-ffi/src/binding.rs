//! 宿主 SDK 绑定
//!
//! [`NativeImSdk`] 由宿主平台（Kotlin / Swift）实现，包装真正的 OpenIM SDK。
//! 回调方向反过来：Rust 侧把 [`SdkCallback`] 等对象交给宿主，宿主 SDK
//! 在任意线程上调用它们，结果再流回桥接层的一次性完成通知。

use std::sync::Arc;

use openim_bridge::{ConnectionListener, ImSdk, OperationCallback, SdkFault, SendMessageCallback};

use crate::error::ForeignSdkError;

/// 宿主实现的 IM SDK
#[uniffi::export(with_foreign)]
pub trait NativeImSdk: Send + Sync {
    fn init_sdk(
        &self,
        listener: Arc<ConnectionListenerHandle>,
        config_json: String,
    ) -> Result<bool, ForeignSdkError>;

    fn login(&self, callback: Arc<SdkCallback>, user_id: String, token: String) -> Result<(), ForeignSdkError>;

    fn logout(&self, callback: Arc<SdkCallback>) -> Result<(), ForeignSdkError>;

    fn get_login_status(&self) -> Result<i64, ForeignSdkError>;

    fn create_text_message(&self, text: String) -> Result<String, ForeignSdkError>;

    fn send_message(
        &self,
        callback: Arc<SendMessageCallbackHandle>,
        message: String,
        recv_id: String,
        group_id: String,
        offline_push_info: Option<String>,
    ) -> Result<(), ForeignSdkError>;

    fn get_all_conversation_list(&self, callback: Arc<SdkCallback>) -> Result<(), ForeignSdkError>;

    fn un_init_sdk(&self) -> Result<(), ForeignSdkError>;
}

/// 通用成功 / 失败回调，交给宿主 SDK 持有
#[derive(uniffi::Object)]
pub struct SdkCallback {
    inner: Arc<dyn OperationCallback>,
}

#[uniffi::export]
impl SdkCallback {
    pub fn on_error(&self, code: i64, message: String) {
        self.inner.on_error(code, message);
    }

    pub fn on_success(&self, data: String) {
        self.inner.on_success(data);
    }
}

/// 发送消息回调
#[derive(uniffi::Object)]
pub struct SendMessageCallbackHandle {
    inner: Arc<dyn SendMessageCallback>,
}

#[uniffi::export]
impl SendMessageCallbackHandle {
    pub fn on_error(&self, code: i64, message: String) {
        self.inner.on_error(code, message);
    }

    pub fn on_success(&self, data: String) {
        self.inner.on_success(data);
    }

    pub fn on_progress(&self, progress: i64) {
        self.inner.on_progress(progress);
    }
}

/// 连接状态监听，initSDK 时注册
#[derive(uniffi::Object)]
pub struct ConnectionListenerHandle {
    inner: Arc<dyn ConnectionListener>,
}

#[uniffi::export]
impl ConnectionListenerHandle {
    pub fn on_connecting(&self) {
        self.inner.on_connecting();
    }

    pub fn on_connect_success(&self) {
        self.inner.on_connect_success();
    }

    pub fn on_connect_failed(&self, code: i64, message: String) {
        self.inner.on_connect_failed(code, message);
    }

    pub fn on_kicked_offline(&self) {
        self.inner.on_kicked_offline();
    }

    pub fn on_user_token_expired(&self) {
        self.inner.on_user_token_expired();
    }
}

/// 把宿主实现适配为桥接层的 [`ImSdk`]
pub(crate) struct ForeignSdk {
    native: Arc<dyn NativeImSdk>,
}

impl ForeignSdk {
    pub(crate) fn new(native: Arc<dyn NativeImSdk>) -> Self {
        Self { native }
    }

    fn wrap(callback: Arc<dyn OperationCallback>) -> Arc<SdkCallback> {
        Arc::new(SdkCallback { inner: callback })
    }
}

impl ImSdk for ForeignSdk {
    fn init_sdk(&self, listener: Arc<dyn ConnectionListener>, config_json: &str) -> Result<bool, SdkFault> {
        let handle = Arc::new(ConnectionListenerHandle { inner: listener });
        self.native.init_sdk(handle, config_json.to_string()).map_err(SdkFault::from)
    }

    fn login(&self, callback: Arc<dyn OperationCallback>, user_id: &str, token: &str) -> Result<(), SdkFault> {
        self.native
            .login(Self::wrap(callback), user_id.to_string(), token.to_string())
            .map_err(SdkFault::from)
    }

    fn logout(&self, callback: Arc<dyn OperationCallback>) -> Result<(), SdkFault> {
        self.native.logout(Self::wrap(callback)).map_err(SdkFault::from)
    }

    fn get_login_status(&self) -> Result<i64, SdkFault> {
        self.native.get_login_status().map_err(SdkFault::from)
    }

    fn create_text_message(&self, text: &str) -> Result<String, SdkFault> {
        self.native.create_text_message(text.to_string()).map_err(SdkFault::from)
    }

    fn send_message(
        &self,
        callback: Arc<dyn SendMessageCallback>,
        message: &str,
        recv_id: &str,
        group_id: &str,
        offline_push_info: Option<&str>,
    ) -> Result<(), SdkFault> {
        let handle = Arc::new(SendMessageCallbackHandle { inner: callback });
        self.native
            .send_message(
                handle,
                message.to_string(),
                recv_id.to_string(),
                group_id.to_string(),
                offline_push_info.map(str::to_string),
            )
            .map_err(SdkFault::from)
    }

    fn get_all_conversation_list(&self, callback: Arc<dyn OperationCallback>) -> Result<(), SdkFault> {
        self.native.get_all_conversation_list(Self::wrap(callback)).map_err(SdkFault::from)
    }

    fn un_init_sdk(&self) -> Result<(), SdkFault> {
        self.native.un_init_sdk().map_err(SdkFault::from)
    }
}
