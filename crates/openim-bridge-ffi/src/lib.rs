//! OpenIM Bridge FFI - UniFFI bindings for the OpenIM host bridge
//!
//! Generates bindings for:
//! - Kotlin (Android)
//! - Swift (iOS)
//!
//! # Architecture
//!
//! - The host implements [`NativeImSdk`] on top of the platform OpenIM SDK
//! - [`OpenImModule`] exposes the host method table; every call answers its
//!   [`HostCallback`] exactly once with a `{code, message, data}` JSON envelope
//! - Connection events and send progress use their own callback interfaces

#![allow(clippy::new_without_default)]

mod binding;
mod config;
mod error;
mod events;
mod helpers;
mod module;
mod task_handle;


// Re-export public types
pub use binding::{ConnectionListenerHandle, NativeImSdk, SdkCallback, SendMessageCallbackHandle};
pub use config::{BridgeSettings, BridgeSettingsBuilder};
pub use error::{ForeignSdkError, OpenImError};
pub use events::{ConnectionEventEntry, ConnectionEventKind, ConnectionObserver, HostCallback, ProgressObserver};
pub use module::OpenImModule;
pub use task_handle::TaskHandle;

uniffi::setup_scaffolding!();

/// Get bridge version string
#[uniffi::export]
pub fn sdk_version() -> String {
    openim_bridge::BRIDGE_VERSION.to_string()
}

/// 安装日志输出，级别沿用 SDK 的 logLevel 约定
///
/// 返回 `false` 表示进程里已有全局 subscriber。
#[uniffi::export]
pub fn init_logger(log_level: i64) -> bool {
    openim_bridge::init_logging(log_level)
}
