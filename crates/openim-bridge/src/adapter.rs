//! 桥接适配器
//!
//! 每个宿主方法的流程都一样：
//! 1. 从参数包提取字段，失败直接返回本地故障信封，不调用 SDK
//! 2. 在阻塞线程池上调用 SDK，捕获同步异常与 panic
//! 3. 等待 SDK 的一次性回调（或同步返回值），整体受超时约束
//! 4. 归一化为一个结果信封
//!
//! 适配器本身无状态，会话状态全部在 [`ImSession`] 背后的 SDK 里。

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::completion::Completion;
use crate::config::{BridgeConfig, SdkInitConfig};
use crate::dispatch::{Method, ThreadMode};
use crate::envelope::{ResultEnvelope, CODE_FAILURE};
use crate::error::BridgeError;
use crate::events::{ConnectionEvents, ProgressListener};
use crate::host::{HostCallback, Responder};
use crate::params::InvocationParams;
use crate::sdk::SdkResult;
use crate::session::ImSession;

/// 提取失败时直接返回该方法的故障信封
macro_rules! or_envelope {
    ($method:expr, $expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(e) => return BridgeError::from(e).into_envelope($method),
        }
    };
}

pub struct BridgeAdapter {
    session: Arc<ImSession>,
    config: BridgeConfig,
    runtime: Handle,
}

impl BridgeAdapter {
    pub fn new(session: Arc<ImSession>, config: BridgeConfig, runtime: Handle) -> Self {
        Self {
            session,
            config,
            runtime,
        }
    }

    pub fn session(&self) -> &Arc<ImSession> {
        &self.session
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// 订阅连接状态事件
    pub fn subscribe_connection(&self) -> ConnectionEvents {
        self.session.subscribe()
    }

    /// 宿主入口：按方法名分发，宿主回调恰好触发一次
    ///
    /// 同步方法在调用方线程上完成并返回 `None`；其余方法投递到运行时，
    /// 返回的 `JoinHandle` 可用于取消（取消后宿主收到 `operation abandoned`）。
    pub fn invoke(
        self: &Arc<Self>,
        method_name: &str,
        params: Value,
        progress: Option<Arc<dyn ProgressListener>>,
        callback: Arc<dyn HostCallback>,
    ) -> Option<JoinHandle<()>> {
        let method = match method_name.parse::<Method>() {
            Ok(method) => method,
            Err(e) => {
                warn!("⚠️ {}", e);
                Responder::new(None, callback).respond(ResultEnvelope::failure(CODE_FAILURE, e.to_string()));
                return None;
            }
        };

        let responder = Responder::new(Some(method), callback);
        let params = match InvocationParams::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                responder.respond(e.into_envelope(method));
                return None;
            }
        };

        debug!("invoke {} on {:?}", method, method.thread_mode());
        if method.thread_mode() == ThreadMode::Ui {
            if let Some(result) = self.call_inline(method) {
                responder.respond(result);
                return None;
            }
        }

        let adapter = Arc::clone(self);
        Some(self.runtime.spawn(async move {
            let result = AssertUnwindSafe(adapter.call(method, params, progress))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| BridgeError::from_panic(panic).into_envelope(method));
            responder.respond(result);
        }))
    }

    /// 按方法执行并返回信封
    pub async fn call(
        &self,
        method: Method,
        params: InvocationParams,
        progress: Option<Arc<dyn ProgressListener>>,
    ) -> ResultEnvelope {
        match method {
            Method::InitSdk => self.init_sdk(params).await,
            Method::Login => self.login(params).await,
            Method::Logout => self.logout().await,
            Method::GetLoginStatus => self.get_login_status(),
            Method::SendTextMessage => self.send_text_message(params, progress).await,
            Method::GetAllConversationList => self.get_all_conversation_list().await,
            Method::UnInitSdk => self.un_init_sdk().await,
        }
    }

    fn call_inline(&self, method: Method) -> Option<ResultEnvelope> {
        match method {
            Method::GetLoginStatus => Some(self.get_login_status()),
            _ => None,
        }
    }

    /// 初始化 SDK
    ///
    /// 配置不做校验，原样序列化后交给 SDK；连接状态事件走
    /// [`Self::subscribe_connection`]，不进入本次调用的结果。
    pub async fn init_sdk(&self, config: InvocationParams) -> ResultEnvelope {
        let method = Method::InitSdk;
        match SdkInitConfig::from_params(&config) {
            Ok(view) => info!(
                "initSDK: apiAddr={:?}, wsAddr={:?}, platformID={:?}",
                view.api_addr, view.ws_addr, view.platform_id
            ),
            Err(_) => info!("initSDK: {} config keys", config.as_map().len()),
        }
        let config_json = or_envelope!(method, serde_json::to_string(config.as_map()));

        let session = Arc::clone(&self.session);
        match self.run_blocking(method, move || session.init(&config_json)).await {
            Ok(true) => ResultEnvelope::ok("SDK 初始化成功"),
            Ok(false) => ResultEnvelope::failure(CODE_FAILURE, "SDK 初始化失败"),
            Err(e) => e.into_envelope(method),
        }
    }

    pub async fn login(&self, params: InvocationParams) -> ResultEnvelope {
        let method = Method::Login;
        let user_id = or_envelope!(method, params.required_str("userID")).to_owned();
        let token = or_envelope!(method, params.required_str("token")).to_owned();
        info!("login: userID={}", user_id);

        let sdk = Arc::clone(self.session.sdk());
        self.run_callback(method, None, move |completion| {
            sdk.login(completion, &user_id, &token)
        })
        .await
    }

    pub async fn logout(&self) -> ResultEnvelope {
        let sdk = Arc::clone(self.session.sdk());
        self.run_callback(Method::Logout, None, move |completion| sdk.logout(completion))
            .await
    }

    /// 同步查询登录状态，直接在调用方线程执行
    pub fn get_login_status(&self) -> ResultEnvelope {
        let method = Method::GetLoginStatus;
        let sdk = self.session.sdk();
        match catch_unwind(AssertUnwindSafe(|| sdk.get_login_status())) {
            Ok(Ok(status)) => ResultEnvelope::success(status),
            Ok(Err(fault)) => BridgeError::from(fault).into_envelope(method),
            Err(panic) => BridgeError::from_panic(panic).into_envelope(method),
        }
    }

    /// 发送文本消息
    ///
    /// `recvID` 单聊、`groupID` 群聊，缺省按空串转发。进度事件只转给 `progress`，
    /// 结果信封只由成功或失败回调产生。
    pub async fn send_text_message(
        &self,
        params: InvocationParams,
        progress: Option<Arc<dyn ProgressListener>>,
    ) -> ResultEnvelope {
        let method = Method::SendTextMessage;
        let text = or_envelope!(method, params.required_str("text")).to_owned();
        let recv_id = or_envelope!(method, params.optional_str("recvID"))
            .unwrap_or_default()
            .to_owned();
        let group_id = or_envelope!(method, params.optional_str("groupID"))
            .unwrap_or_default()
            .to_owned();

        // 收件方是否合法由 SDK 决定，这里只提示
        match (recv_id.is_empty(), group_id.is_empty()) {
            (true, true) => warn!("⚠️ sendTextMessage: neither recvID nor groupID given, forwarding anyway"),
            (false, false) => warn!(
                "⚠️ sendTextMessage: both recvID={} and groupID={} given, forwarding both",
                recv_id, group_id
            ),
            _ => {}
        }

        let sdk = Arc::clone(self.session.sdk());
        self.run_callback(method, progress, move |completion| {
            let message = sdk.create_text_message(&text)?;
            sdk.send_message(completion, &message, &recv_id, &group_id, None)
        })
        .await
    }

    pub async fn get_all_conversation_list(&self) -> ResultEnvelope {
        let sdk = Arc::clone(self.session.sdk());
        self.run_callback(Method::GetAllConversationList, None, move |completion| {
            sdk.get_all_conversation_list(completion)
        })
        .await
    }

    /// 释放 SDK 会话
    pub async fn un_init_sdk(&self) -> ResultEnvelope {
        let method = Method::UnInitSdk;
        let session = Arc::clone(&self.session);
        match self.run_blocking(method, move || session.teardown()).await {
            Ok(()) => ResultEnvelope::ok("SDK 已释放"),
            Err(e) => e.into_envelope(method),
        }
    }

    /// 在阻塞线程池上执行一次同步 SDK 调用
    async fn run_blocking<T, F>(&self, method: Method, call: F) -> Result<T, BridgeError>
    where
        T: Send + 'static,
        F: FnOnce() -> SdkResult<T> + Send + 'static,
    {
        let deadline = self.config.timeout_for(method);
        let task = self
            .runtime
            .spawn_blocking(move || catch_unwind(AssertUnwindSafe(call)));

        match tokio::time::timeout(deadline, task).await {
            Err(_) => Err(BridgeError::timeout(deadline.as_millis() as u64)),
            Ok(joined) => flatten_blocking(joined),
        }
    }

    /// 发起一次回调式 SDK 调用并等待其唯一的终态结果
    async fn run_callback<F>(
        &self,
        method: Method,
        progress: Option<Arc<dyn ProgressListener>>,
        start: F,
    ) -> ResultEnvelope
    where
        F: FnOnce(Arc<Completion>) -> SdkResult<()> + Send + 'static,
    {
        let deadline = self.config.timeout_for(method);
        let (completion, receiver) = Completion::channel(method, progress);
        // completion 只由 SDK 持有，SDK 释放它时 receiver 才能感知
        let task = self
            .runtime
            .spawn_blocking(move || catch_unwind(AssertUnwindSafe(move || start(completion))));

        let outcome = tokio::time::timeout(deadline, async move {
            flatten_blocking(task.await)?;
            receiver.await.map_err(|_| BridgeError::CallbackDropped)
        })
        .await;

        match outcome {
            Ok(Ok(envelope)) => envelope,
            Ok(Err(e)) => e.into_envelope(method),
            Err(_) => BridgeError::timeout(deadline.as_millis() as u64).into_envelope(method),
        }
    }
}

type Joined<T> = Result<std::thread::Result<SdkResult<T>>, tokio::task::JoinError>;

fn flatten_blocking<T>(joined: Joined<T>) -> Result<T, BridgeError> {
    match joined {
        Ok(Ok(result)) => result.map_err(BridgeError::from),
        Ok(Err(panic)) => Err(BridgeError::from_panic(panic)),
        Err(e) if e.is_panic() => Err(BridgeError::from_panic(e.into_panic())),
        Err(e) => Err(BridgeError::Panicked(e.to_string())),
    }
}
