//! Configuration types and builder for FFI

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use openim_bridge::config::{DEFAULT_EVENT_CAPACITY, DEFAULT_TIMEOUT_MS};
use openim_bridge::{BridgeConfig, Method};

use crate::error::OpenImError;
use crate::helpers::unwrap_or_clone_arc;

/// Bridge settings
///
/// 方法名使用宿主侧名称（`login`、`sendTextMessage` ...）。
#[derive(Debug, Clone, uniffi::Record)]
pub struct BridgeSettings {
    /// 默认调用超时（毫秒）
    pub timeout_ms: u64,
    /// 按方法覆盖的超时（毫秒）
    pub method_timeouts_ms: HashMap<String, u64>,
    /// 连接事件缓冲大小
    pub event_capacity: u32,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            method_timeouts_ms: HashMap::new(),
            event_capacity: DEFAULT_EVENT_CAPACITY as u32,
        }
    }
}

impl TryFrom<BridgeSettings> for BridgeConfig {
    type Error = OpenImError;

    fn try_from(settings: BridgeSettings) -> Result<Self, Self::Error> {
        if settings.timeout_ms == 0 {
            return Err(OpenImError::invalid_parameter("timeout_ms", "timeout must be positive"));
        }
        if settings.event_capacity == 0 {
            return Err(OpenImError::invalid_parameter(
                "event_capacity",
                "event capacity must be positive",
            ));
        }

        let mut config = BridgeConfig::default()
            .with_timeout(Duration::from_millis(settings.timeout_ms))
            .with_event_capacity(settings.event_capacity as usize);
        for (name, ms) in settings.method_timeouts_ms {
            let method = name
                .parse::<Method>()
                .map_err(|e| OpenImError::invalid_parameter("method_timeouts_ms", &e.to_string()))?;
            if ms == 0 {
                return Err(OpenImError::invalid_parameter(
                    "method_timeouts_ms",
                    &format!("timeout for {} must be positive", name),
                ));
            }
            config = config.with_method_timeout(method, Duration::from_millis(ms));
        }
        Ok(config)
    }
}

/// Settings builder with fluent API
#[derive(Clone, uniffi::Object)]
pub struct BridgeSettingsBuilder {
    timeout_ms: u64,
    method_timeouts_ms: HashMap<String, u64>,
    event_capacity: u32,
}

#[uniffi::export]
impl BridgeSettingsBuilder {
    #[uniffi::constructor]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default timeout in milliseconds
    pub fn timeout_ms(self: Arc<Self>, ms: u64) -> Arc<Self> {
        let mut builder = unwrap_or_clone_arc(self);
        builder.timeout_ms = ms;
        Arc::new(builder)
    }

    /// Override the timeout of a single host method
    pub fn method_timeout_ms(self: Arc<Self>, method: String, ms: u64) -> Arc<Self> {
        let mut builder = unwrap_or_clone_arc(self);
        builder.method_timeouts_ms.insert(method, ms);
        Arc::new(builder)
    }

    pub fn event_capacity(self: Arc<Self>, capacity: u32) -> Arc<Self> {
        let mut builder = unwrap_or_clone_arc(self);
        builder.event_capacity = capacity;
        Arc::new(builder)
    }

    /// Build and validate the settings
    pub fn build(self: Arc<Self>) -> Result<BridgeSettings, OpenImError> {
        let builder = unwrap_or_clone_arc(self);
        let settings = BridgeSettings {
            timeout_ms: builder.timeout_ms,
            method_timeouts_ms: builder.method_timeouts_ms,
            event_capacity: builder.event_capacity,
        };
        BridgeConfig::try_from(settings.clone())?;
        Ok(settings)
    }
}

impl Default for BridgeSettingsBuilder {
    fn default() -> Self {
        let defaults = BridgeSettings::default();
        Self {
            timeout_ms: defaults.timeout_ms,
            method_timeouts_ms: defaults.method_timeouts_ms,
            event_capacity: defaults.event_capacity,
        }
    }
}
