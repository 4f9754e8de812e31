//! 宿主方法表
//!
//! 方法名与宿主脚本侧保持一致（`initSDK`、`login` ...），
//! 每个方法声明自己跑在 UI 线程还是后台线程。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// 调度线程
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadMode {
    /// 在调用方线程上同步执行（同步且快速的查询）
    Ui,
    /// 投递到运行时，可能阻塞在网络 I/O 或 SDK 内部锁上
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    #[serde(rename = "initSDK")]
    InitSdk,
    #[serde(rename = "login")]
    Login,
    #[serde(rename = "logout")]
    Logout,
    #[serde(rename = "getLoginStatus")]
    GetLoginStatus,
    #[serde(rename = "sendTextMessage")]
    SendTextMessage,
    #[serde(rename = "getAllConversationList")]
    GetAllConversationList,
    #[serde(rename = "unInitSDK")]
    UnInitSdk,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::InitSdk,
        Method::Login,
        Method::Logout,
        Method::GetLoginStatus,
        Method::SendTextMessage,
        Method::GetAllConversationList,
        Method::UnInitSdk,
    ];

    /// 宿主侧方法名
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::InitSdk => "initSDK",
            Method::Login => "login",
            Method::Logout => "logout",
            Method::GetLoginStatus => "getLoginStatus",
            Method::SendTextMessage => "sendTextMessage",
            Method::GetAllConversationList => "getAllConversationList",
            Method::UnInitSdk => "unInitSDK",
        }
    }

    pub fn thread_mode(&self) -> ThreadMode {
        match self {
            Method::GetLoginStatus => ThreadMode::Ui,
            _ => ThreadMode::Background,
        }
    }

    /// 本地故障信封的 message 前缀
    pub fn fault_prefix(&self) -> &'static str {
        match self {
            Method::InitSdk => "初始化异常: ",
            Method::Login => "登录异常: ",
            Method::Logout => "登出异常: ",
            Method::GetLoginStatus => "获取状态异常: ",
            Method::SendTextMessage => "发送消息异常: ",
            Method::GetAllConversationList => "获取会话列表异常: ",
            Method::UnInitSdk => "释放异常: ",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| BridgeError::UnknownMethod(s.to_string()))
    }
}
