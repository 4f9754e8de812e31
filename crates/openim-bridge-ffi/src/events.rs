//! Event system for FFI callbacks

use openim_bridge::{ConnectionEvent, ConnectionNotice, HostCallback as EnvelopeSink, ProgressListener, ResultEnvelope};

// ============================================================================
// Callback Interfaces
// ============================================================================

/// 宿主结果回调
///
/// 每次调用恰好触发一次，参数为 `{code, message, data}` 结果信封的 JSON 文本。
#[uniffi::export(callback_interface)]
pub trait HostCallback: Send + Sync {
    fn invoke(&self, result_json: String);
}

/// 连接状态观察者
#[uniffi::export(callback_interface)]
pub trait ConnectionObserver: Send + Sync {
    fn on_event(&self, event: ConnectionEventEntry);
}

/// 发送进度观察者
///
/// 进度事件不是终态，不会产生结果信封。
#[uniffi::export(callback_interface)]
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, progress: i64);
}

// ============================================================================
// Event Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum ConnectionEventKind {
    Connecting,
    ConnectSuccess,
    ConnectFailed,
    KickedOffline,
    UserTokenExpired,
}

/// Connection event entry
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct ConnectionEventEntry {
    pub kind: ConnectionEventKind,
    /// 宿主侧事件名，如 `onConnectFailed`
    pub name: String,
    /// 仅 ConnectFailed 携带
    pub code: Option<i64>,
    pub message: Option<String>,
    pub timestamp_ms: i64,
}

impl From<ConnectionNotice> for ConnectionEventEntry {
    fn from(notice: ConnectionNotice) -> Self {
        let name = notice.event.name().to_string();
        let (kind, code, message) = match notice.event {
            ConnectionEvent::Connecting => (ConnectionEventKind::Connecting, None, None),
            ConnectionEvent::ConnectSuccess => (ConnectionEventKind::ConnectSuccess, None, None),
            ConnectionEvent::ConnectFailed { code, message } => {
                (ConnectionEventKind::ConnectFailed, Some(code), Some(message))
            }
            ConnectionEvent::KickedOffline => (ConnectionEventKind::KickedOffline, None, None),
            ConnectionEvent::UserTokenExpired => (ConnectionEventKind::UserTokenExpired, None, None),
        };
        Self {
            kind,
            name,
            code,
            message,
            timestamp_ms: notice.timestamp_ms,
        }
    }
}

// ============================================================================
// Adapters into the core bridge
// ============================================================================

/// 把结果信封序列化后交给外部回调
pub(crate) struct ForeignHostCallback(pub(crate) Box<dyn HostCallback>);

impl EnvelopeSink for ForeignHostCallback {
    fn invoke(&self, result: ResultEnvelope) {
        self.0.invoke(result.to_json());
    }
}

pub(crate) struct ForeignProgress(pub(crate) Box<dyn ProgressObserver>);

impl ProgressListener for ForeignProgress {
    fn on_progress(&self, progress: i64) {
        self.0.on_progress(progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_conversion() {
        let entry = ConnectionEventEntry::from(ConnectionNotice {
            event: ConnectionEvent::ConnectFailed {
                code: 10002,
                message: "network".to_string(),
            },
            timestamp_ms: 1_700_000_000_000,
        });
        assert_eq!(entry.kind, ConnectionEventKind::ConnectFailed);
        assert_eq!(entry.name, "onConnectFailed");
        assert_eq!(entry.code, Some(10002));
        assert_eq!(entry.message.as_deref(), Some("network"));

        let entry = ConnectionEventEntry::from(ConnectionNotice::now(ConnectionEvent::KickedOffline));
        assert_eq!(entry.kind, ConnectionEventKind::KickedOffline);
        assert!(entry.code.is_none());
        assert!(entry.timestamp_ms > 0);
    }
}
