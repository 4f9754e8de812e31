//! Error types for FFI layer
//!
//! Host invocations never fail across the boundary: their outcome is always
//! a result envelope. These errors only cover module construction, settings
//! and faults raised by the foreign SDK implementation.

use std::fmt;

use openim_bridge::SdkFault;

/// Errors returned to the foreign caller
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum OpenImError {
    #[error("Invalid parameter: {field} - {msg}")]
    InvalidParameter { field: String, msg: String },

    #[error("Runtime error: {msg}")]
    Runtime { msg: String },
}

impl OpenImError {
    pub fn invalid_parameter(field: &str, msg: &str) -> Self {
        tracing::error!("Invalid parameter {}: {}", field, msg);
        Self::InvalidParameter {
            field: field.to_string(),
            msg: msg.to_string(),
        }
    }

    pub fn runtime<T: fmt::Display>(msg: T) -> Self {
        let msg_str = msg.to_string();
        tracing::error!("Runtime error: {}", msg_str);
        Self::Runtime { msg: msg_str }
    }
}

/// 宿主 SDK 实现抛出的异常
///
/// 外部语言里的任何异常（包括未声明的）都会落到 `Fault`，再转换为
/// 桥接层的 [`SdkFault`]，最终成为带方法前缀的失败信封。
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ForeignSdkError {
    #[error("{message}")]
    Fault { message: String },
}

impl From<uniffi::UnexpectedUniFFICallbackError> for ForeignSdkError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        tracing::error!("Unexpected foreign callback error: {}", error.reason);
        Self::Fault {
            message: error.reason,
        }
    }
}

impl From<ForeignSdkError> for SdkFault {
    fn from(error: ForeignSdkError) -> Self {
        match error {
            ForeignSdkError::Fault { message } if message.trim().is_empty() => {
                SdkFault::new("unknown SDK exception")
            }
            ForeignSdkError::Fault { message } => SdkFault::new(message),
        }
    }
}
