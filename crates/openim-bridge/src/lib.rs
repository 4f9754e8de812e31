//! OpenIM Bridge - 宿主脚本环境与 OpenIM 客户端 SDK 之间的适配层
//!
//! 本 crate 只做转发，不持有任何业务状态：
//! - 📥 宿主传入松散的 JSON 参数包
//! - 🔁 参数转换后调用外部 SDK（同步返回值或异步回调）
//! - 📤 统一归一化为 `{code, message, data}` 结果信封，且每次调用只回调一次
//! - 📡 连接状态事件与发送进度走独立通道，不进入结果信封
//!
//! # 快速开始
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use openim_bridge::{BridgeAdapter, BridgeConfig, ImSession};
//!
//! let session = Arc::new(ImSession::new(Arc::new(my_sdk), 64));
//! let adapter = Arc::new(BridgeAdapter::new(session, BridgeConfig::default(), runtime.handle().clone()));
//!
//! adapter.invoke("login", serde_json::json!({"userID": "u1", "token": "t1"}), None, host_callback);
//! ```

pub mod adapter;
pub mod completion;
pub mod config;
pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod events;
pub mod host;
pub mod logging;
pub mod params;
pub mod sdk;
pub mod session;

#[cfg(test)]
mod mock_sdk;

pub use adapter::BridgeAdapter;
pub use completion::Completion;
pub use config::{BridgeConfig, SdkInitConfig};
pub use dispatch::{Method, ThreadMode};
pub use envelope::{ResultEnvelope, CODE_FAILURE, CODE_SUCCESS, CODE_TIMEOUT};
pub use error::{BridgeError, Result};
pub use events::{ConnectionEvent, ConnectionEvents, ConnectionNotice, ProgressListener};
pub use host::{HostCallback, Responder};
pub use logging::{init_logging, level_from_sdk};
pub use params::InvocationParams;
pub use sdk::{ConnectionListener, ImSdk, OperationCallback, SdkFault, SendMessageCallback};
pub use session::ImSession;

/// 桥接层版本号
pub const BRIDGE_VERSION: &str = env!("CARGO_PKG_VERSION");
