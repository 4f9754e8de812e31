//! 事件通道
//!
//! 与结果信封分离的两条通知通道：
//! - 连接状态事件：init 时注册的长连接监听，广播给所有订阅者
//! - 发送进度：按次发送注册的观察者，只做通知，不结束调用

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::sdk::ConnectionListener;

/// 连接状态事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ConnectionEvent {
    #[serde(rename = "onConnecting")]
    Connecting,
    #[serde(rename = "onConnectSuccess")]
    ConnectSuccess,
    #[serde(rename = "onConnectFailed")]
    ConnectFailed { code: i64, message: String },
    #[serde(rename = "onKickedOffline")]
    KickedOffline,
    #[serde(rename = "onUserTokenExpired")]
    UserTokenExpired,
}

impl ConnectionEvent {
    /// 宿主侧事件名
    pub fn name(&self) -> &'static str {
        match self {
            ConnectionEvent::Connecting => "onConnecting",
            ConnectionEvent::ConnectSuccess => "onConnectSuccess",
            ConnectionEvent::ConnectFailed { .. } => "onConnectFailed",
            ConnectionEvent::KickedOffline => "onKickedOffline",
            ConnectionEvent::UserTokenExpired => "onUserTokenExpired",
        }
    }
}

/// 带接收时间戳的连接事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionNotice {
    #[serde(flatten)]
    pub event: ConnectionEvent,
    /// UNIX 时间戳（毫秒，UTC）
    pub timestamp_ms: i64,
}

impl ConnectionNotice {
    pub fn now(event: ConnectionEvent) -> Self {
        Self {
            event,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// 连接事件订阅
///
/// drop 即取消订阅。
pub struct ConnectionEvents {
    receiver: broadcast::Receiver<ConnectionNotice>,
}

impl ConnectionEvents {
    pub(crate) fn new(receiver: broadcast::Receiver<ConnectionNotice>) -> Self {
        Self { receiver }
    }

    /// 等待下一个事件，通道关闭时返回 `None`
    ///
    /// 订阅者处理过慢时跳过丢失的事件继续接收。
    pub async fn recv(&mut self) -> Option<ConnectionNotice> {
        loop {
            match self.receiver.recv().await {
                Ok(notice) => return Some(notice),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("⚠️ 连接事件订阅者落后，跳过 {} 个事件", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// 非阻塞获取一个已到达的事件
    pub fn try_recv(&mut self) -> Option<ConnectionNotice> {
        loop {
            match self.receiver.try_recv() {
                Ok(notice) => return Some(notice),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!("⚠️ 连接事件订阅者落后，跳过 {} 个事件", skipped);
                }
                Err(_) => return None,
            }
        }
    }
}

/// 把 SDK 的连接监听回调转发到广播通道
pub(crate) struct ConnectionForwarder {
    sender: broadcast::Sender<ConnectionNotice>,
}

impl ConnectionForwarder {
    pub(crate) fn new(sender: broadcast::Sender<ConnectionNotice>) -> Self {
        Self { sender }
    }

    fn publish(&self, event: ConnectionEvent) {
        debug!("connection event: {}", event.name());
        // 没有订阅者时发送失败是正常情况
        let _ = self.sender.send(ConnectionNotice::now(event));
    }
}

impl ConnectionListener for ConnectionForwarder {
    fn on_connecting(&self) {
        self.publish(ConnectionEvent::Connecting);
    }

    fn on_connect_success(&self) {
        self.publish(ConnectionEvent::ConnectSuccess);
    }

    fn on_connect_failed(&self, code: i64, message: String) {
        self.publish(ConnectionEvent::ConnectFailed { code, message });
    }

    fn on_kicked_offline(&self) {
        self.publish(ConnectionEvent::KickedOffline);
    }

    fn on_user_token_expired(&self) {
        self.publish(ConnectionEvent::UserTokenExpired);
    }
}

/// 发送进度观察者
pub trait ProgressListener: Send + Sync {
    fn on_progress(&self, progress: i64);
}

impl<F> ProgressListener for F
where
    F: Fn(i64) + Send + Sync,
{
    fn on_progress(&self, progress: i64) {
        self(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notice_serializes_with_event_tag() {
        let notice = ConnectionNotice {
            event: ConnectionEvent::ConnectFailed {
                code: 10002,
                message: "network".to_string(),
            },
            timestamp_ms: 1_700_000_000_000,
        };
        let value = serde_json::to_value(&notice).unwrap();
        assert_eq!(
            value,
            json!({
                "event": "onConnectFailed",
                "code": 10002,
                "message": "network",
                "timestamp_ms": 1_700_000_000_000i64
            })
        );
    }

    #[tokio::test]
    async fn test_forwarder_fans_out_to_subscribers() {
        let (tx, _) = broadcast::channel(8);
        let forwarder = ConnectionForwarder::new(tx.clone());
        let mut first = ConnectionEvents::new(tx.subscribe());
        let mut second = ConnectionEvents::new(tx.subscribe());

        forwarder.on_connecting();
        forwarder.on_connect_success();

        assert_eq!(first.recv().await.unwrap().event, ConnectionEvent::Connecting);
        assert_eq!(first.recv().await.unwrap().event, ConnectionEvent::ConnectSuccess);
        assert_eq!(second.recv().await.unwrap().event, ConnectionEvent::Connecting);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_and_continues() {
        let (tx, _) = broadcast::channel(2);
        let forwarder = ConnectionForwarder::new(tx.clone());
        let mut events = ConnectionEvents::new(tx.subscribe());

        forwarder.on_connecting();
        forwarder.on_connect_success();
        forwarder.on_kicked_offline();

        // 容量为 2，最早的 Connecting 被挤掉
        assert_eq!(events.recv().await.unwrap().event, ConnectionEvent::ConnectSuccess);
        assert_eq!(events.recv().await.unwrap().event, ConnectionEvent::KickedOffline);
        assert!(events.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_closed_channel_ends_stream() {
        let (tx, _) = broadcast::channel::<ConnectionNotice>(2);
        let mut events = ConnectionEvents::new(tx.subscribe());
        drop(tx);
        assert!(events.recv().await.is_none());
    }
}
