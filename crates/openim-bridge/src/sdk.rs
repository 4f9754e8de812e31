//! 外部 IM SDK 协作方契约
//!
//! 桥接层只依赖这里的 trait，真实实现由宿主平台的 SDK 绑定提供。
//! 同步调用可能抛出异常（[`SdkFault`]），异步结果通过回调对象返回；
//! SDK 可以在任意线程上触发回调，也可能触发多次，桥接层负责去重。

use std::sync::Arc;

/// SDK 同步调用抛出的异常
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SdkFault {
    pub message: String,
}

impl SdkFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type SdkResult<T> = std::result::Result<T, SdkFault>;

/// 通用成功 / 失败回调
pub trait OperationCallback: Send + Sync {
    fn on_error(&self, code: i64, message: String);

    fn on_success(&self, data: String);
}

/// 发送消息回调：在通用回调之上多一个非终态的进度事件
pub trait SendMessageCallback: OperationCallback {
    fn on_progress(&self, progress: i64);
}

/// 长连接状态监听，在 init 时注册，生命周期与会话一致
pub trait ConnectionListener: Send + Sync {
    fn on_connecting(&self);

    fn on_connect_success(&self);

    fn on_connect_failed(&self, code: i64, message: String);

    fn on_kicked_offline(&self);

    fn on_user_token_expired(&self);
}

/// 被桥接的 IM SDK
pub trait ImSdk: Send + Sync {
    /// 初始化，立即返回是否成功；连接状态随后通过 `listener` 推送
    fn init_sdk(&self, listener: Arc<dyn ConnectionListener>, config_json: &str) -> SdkResult<bool>;

    fn login(&self, callback: Arc<dyn OperationCallback>, user_id: &str, token: &str) -> SdkResult<()>;

    fn logout(&self, callback: Arc<dyn OperationCallback>) -> SdkResult<()>;

    fn get_login_status(&self) -> SdkResult<i64>;

    /// 消息构造入口，返回 SDK 内部的消息 JSON
    fn create_text_message(&self, text: &str) -> SdkResult<String>;

    fn send_message(
        &self,
        callback: Arc<dyn SendMessageCallback>,
        message: &str,
        recv_id: &str,
        group_id: &str,
        offline_push_info: Option<&str>,
    ) -> SdkResult<()>;

    fn get_all_conversation_list(&self, callback: Arc<dyn OperationCallback>) -> SdkResult<()>;

    fn un_init_sdk(&self) -> SdkResult<()>;
}
