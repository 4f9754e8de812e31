//! 桥接层错误类型
//!
//! 所有错误都只在本地消化：最终转换为带方法前缀的失败信封，绝不抛给宿主。

use std::fmt;

use crate::dispatch::Method;
use crate::envelope::{ResultEnvelope, CODE_FAILURE, CODE_TIMEOUT};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BridgeError {
    #[error("missing required parameter: {field}")]
    MissingParameter { field: String },

    #[error("invalid parameter {field}: {msg}")]
    InvalidParameter { field: String, msg: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    /// SDK 同步调用抛出的异常
    #[error("{0}")]
    SdkFault(String),

    /// SDK 调用过程中发生 panic
    #[error("panicked: {0}")]
    Panicked(String),

    #[error("SDK callback released without a result")]
    CallbackDropped,

    #[error("operation timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("unknown method: {0}")]
    UnknownMethod(String),
}

impl BridgeError {
    pub fn missing_parameter(field: &str) -> Self {
        tracing::error!("Missing parameter: {}", field);
        Self::MissingParameter {
            field: field.to_string(),
        }
    }

    pub fn invalid_parameter(field: &str, msg: impl fmt::Display) -> Self {
        let msg = msg.to_string();
        tracing::error!("Invalid parameter {}: {}", field, msg);
        Self::InvalidParameter {
            field: field.to_string(),
            msg,
        }
    }

    pub fn timeout(timeout_ms: u64) -> Self {
        tracing::error!("Operation timed out after {}ms", timeout_ms);
        Self::Timeout { timeout_ms }
    }

    /// 从 `catch_unwind` 的 payload 提取可读信息
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        tracing::error!("SDK call panicked: {}", msg);
        Self::Panicked(msg)
    }

    /// 信封错误码
    pub fn code(&self) -> i64 {
        match self {
            Self::Timeout { .. } => CODE_TIMEOUT,
            _ => CODE_FAILURE,
        }
    }

    /// 转换为失败信封，message 带上方法对应的异常前缀
    pub fn into_envelope(self, method: Method) -> ResultEnvelope {
        ResultEnvelope::failure(self.code(), format!("{}{}", method.fault_prefix(), self))
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<crate::sdk::SdkFault> for BridgeError {
    fn from(fault: crate::sdk::SdkFault) -> Self {
        tracing::error!("SDK fault: {}", fault);
        Self::SdkFault(fault.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_carries_method_prefix() {
        let env = BridgeError::missing_parameter("userID").into_envelope(Method::Login);
        assert_eq!(env.code, -1);
        assert_eq!(env.message, "登录异常: missing required parameter: userID");
    }

    #[test]
    fn test_timeout_uses_timeout_code() {
        let env = BridgeError::timeout(500).into_envelope(Method::Logout);
        assert_eq!(env.code, CODE_TIMEOUT);
        assert!(env.message.ends_with("operation timed out after 500ms"));
    }

    #[test]
    fn test_panic_payload_extraction() {
        let err = BridgeError::from_panic(Box::new("boom"));
        assert_eq!(err, BridgeError::Panicked("boom".to_string()));

        let err = BridgeError::from_panic(Box::new(String::from("owned boom")));
        assert_eq!(err, BridgeError::Panicked("owned boom".to_string()));

        let err = BridgeError::from_panic(Box::new(42u8));
        assert_eq!(err, BridgeError::Panicked("unknown panic".to_string()));
    }
}
