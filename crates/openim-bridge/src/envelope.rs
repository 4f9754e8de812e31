//! 结果信封
//!
//! 每一次宿主调用最终都归一化为同一个形状：
//! `{ code, message, data? }`，调用方只通过 `code == 0` 判断成功与否。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 成功
pub const CODE_SUCCESS: i64 = 0;
/// 本地故障 / SDK 返回 false
pub const CODE_FAILURE: i64 = -1;
/// 调用超时
pub const CODE_TIMEOUT: i64 = -2;

/// 返回给宿主的结果信封
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ResultEnvelope {
    /// 无数据的成功信封
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            code: CODE_SUCCESS,
            message: message.into(),
            data: None,
        }
    }

    /// 携带数据的成功信封，message 固定为 `success`
    pub fn success(data: impl Into<Value>) -> Self {
        Self {
            code: CODE_SUCCESS,
            message: "success".to_string(),
            data: Some(data.into()),
        }
    }

    /// 失败信封
    ///
    /// `code == 0` 必须等价于成功，所以错误回调误报的 0 会被改写为 [`CODE_FAILURE`]。
    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        let code = if code == CODE_SUCCESS { CODE_FAILURE } else { code };
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == CODE_SUCCESS
    }

    /// 序列化为宿主回调使用的 JSON 字符串
    pub fn to_json(&self) -> String {
        // 只包含 i64 / String / Value，序列化不会失败
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"message":"envelope serialization failed"}}"#, CODE_FAILURE)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let env = ResultEnvelope::success("ok");
        let value: Value = serde_json::from_str(&env.to_json()).unwrap();
        assert_eq!(value, json!({"code": 0, "data": "ok", "message": "success"}));
    }

    #[test]
    fn test_ok_envelope_omits_data() {
        let value: Value = serde_json::from_str(&ResultEnvelope::ok("SDK 初始化成功").to_json()).unwrap();
        assert_eq!(value, json!({"code": 0, "message": "SDK 初始化成功"}));
    }

    #[test]
    fn test_failure_never_reports_zero() {
        let env = ResultEnvelope::failure(0, "bogus");
        assert_eq!(env.code, CODE_FAILURE);
        assert!(!env.is_success());

        let env = ResultEnvelope::failure(10102, "token expired");
        assert_eq!(env.code, 10102);
        assert_eq!(env.message, "token expired");
    }
}
