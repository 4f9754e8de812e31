//! 配置
//!
//! - [`BridgeConfig`]：桥接层自身的超时与事件缓冲配置
//! - [`SdkInitConfig`]：initSDK 参数的只读视图，仅用于日志；交给 SDK 的始终是原始参数

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dispatch::Method;
use crate::error::Result;
use crate::params::InvocationParams;

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeConfig {
    /// 默认调用超时（毫秒）
    pub timeout_ms: u64,
    /// 按方法覆盖的超时（毫秒）
    pub method_timeouts_ms: HashMap<Method, u64>,
    /// 连接事件广播缓冲大小
    pub event_capacity: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            method_timeouts_ms: HashMap::new(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl BridgeConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_method_timeout(mut self, method: Method, timeout: Duration) -> Self {
        self.method_timeouts_ms.insert(method, timeout.as_millis() as u64);
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub fn timeout_for(&self, method: Method) -> Duration {
        let ms = self
            .method_timeouts_ms
            .get(&method)
            .copied()
            .unwrap_or(self.timeout_ms);
        Duration::from_millis(ms)
    }
}

/// initSDK 配置视图
///
/// 只用于记录日志。SDK 收到的是宿主传入参数的原样序列化结果，
/// 这里解析失败不影响调用。
///
/// ```json
/// {
///   "apiAddr": "http://your-server/api",
///   "wsAddr": "ws://your-server/msg_gateway",
///   "dataDir": "/data/user/0/your.package/files/",
///   "logLevel": 5,
///   "isLogStandardOutput": true,
///   "logFilePath": "/storage/emulated/0/Android/data/your.package/files/logs/",
///   "platformID": 2
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkInitConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ws_addr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_log_standard_output: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    #[serde(rename = "platformID", default, skip_serializing_if = "Option::is_none")]
    pub platform_id: Option<i64>,
    /// 其余字段
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SdkInitConfig {
    pub fn from_params(params: &InvocationParams) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(params.as_map().clone()))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_timeouts() {
        let config = BridgeConfig::default().with_method_timeout(Method::Login, Duration::from_secs(5));
        assert_eq!(config.timeout_for(Method::Login), Duration::from_secs(5));
        assert_eq!(config.timeout_for(Method::Logout), Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }

    #[test]
    fn test_bridge_config_from_json() {
        let config = BridgeConfig::from_json(
            r#"{"timeoutMs": 1000, "methodTimeoutsMs": {"sendTextMessage": 5000}}"#,
        )
        .unwrap();
        assert_eq!(config.timeout_ms, 1000);
        assert_eq!(config.timeout_for(Method::SendTextMessage), Duration::from_secs(5));
        assert_eq!(config.event_capacity, DEFAULT_EVENT_CAPACITY);
    }

    #[test]
    fn test_init_config_view() {
        let params = InvocationParams::from_value(json!({
            "apiAddr": "http://x",
            "wsAddr": "ws://x",
            "dataDir": "/d",
            "logLevel": 5,
            "platformID": 2,
            "sdkVersion": "3.8"
        }))
        .unwrap();
        let config = SdkInitConfig::from_params(&params).unwrap();
        assert_eq!(config.api_addr.as_deref(), Some("http://x"));
        assert_eq!(config.platform_id, Some(2));
        assert_eq!(config.extra.get("sdkVersion"), Some(&json!("3.8")));
    }

    #[test]
    fn test_init_config_view_is_strict() {
        let params = InvocationParams::from_value(json!({"logLevel": "verbose"})).unwrap();
        assert!(SdkInitConfig::from_params(&params).is_err());
    }
}
