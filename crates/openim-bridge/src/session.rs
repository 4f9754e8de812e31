//! SDK 会话句柄
//!
//! 进程内唯一的 SDK 会话，显式注入到适配器中，替代隐式的静态单例。
//! 会话状态本身仍由外部 SDK 持有，这里只管理：
//! - SDK 实例
//! - 连接事件广播通道
//! - init / teardown 生命周期标记

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::events::{ConnectionEvents, ConnectionForwarder, ConnectionNotice};
use crate::sdk::{ImSdk, SdkResult};

pub struct ImSession {
    sdk: Arc<dyn ImSdk>,
    events: broadcast::Sender<ConnectionNotice>,
    initialized: AtomicBool,
}

impl ImSession {
    pub fn new(sdk: Arc<dyn ImSdk>, event_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            sdk,
            events,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn sdk(&self) -> &Arc<dyn ImSdk> {
        &self.sdk
    }

    /// 初始化 SDK 并注册连接监听
    ///
    /// 重复初始化照常转发给 SDK，由 SDK 决定结果。
    pub fn init(&self, config_json: &str) -> SdkResult<bool> {
        if self.is_initialized() {
            warn!("⚠️ SDK 已初始化，重复调用 initSDK");
        }
        let listener = Arc::new(ConnectionForwarder::new(self.events.clone()));
        let ok = self.sdk.init_sdk(listener, config_json)?;
        if ok {
            self.initialized.store(true, Ordering::SeqCst);
            info!("✅ SDK 初始化成功");
        } else {
            warn!("⚠️ SDK 初始化失败");
        }
        Ok(ok)
    }

    /// 释放 SDK 会话
    pub fn teardown(&self) -> SdkResult<()> {
        if !self.initialized.swap(false, Ordering::SeqCst) {
            info!("SDK 未初始化，仍转发 unInitSDK");
        }
        self.sdk.un_init_sdk()?;
        info!("✅ SDK 已释放");
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// 订阅连接状态事件，drop 返回值即取消订阅
    pub fn subscribe(&self) -> ConnectionEvents {
        ConnectionEvents::new(self.events.subscribe())
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }
}
