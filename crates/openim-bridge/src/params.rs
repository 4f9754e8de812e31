//! 调用参数包
//!
//! 宿主传入的是松散类型的 JSON 对象，字段是否存在由各方法自行决定。
//! 可选字段缺失或为 `null` 不算故障；必填字段缺失或类型不对则是本地故障。

use serde_json::{Map, Value};

use crate::error::{BridgeError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvocationParams(Map<String, Value>);

impl InvocationParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从宿主传入的任意 JSON 值构造
    ///
    /// `null` 视为空参数包，其他非对象值视为本地故障。
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(BridgeError::invalid_parameter(
                "params",
                format!("expected object, got {}", type_name(&other)),
            )),
        }
    }

    /// 从 JSON 字符串构造，空串等价于 `{}`
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// 必填字符串参数
    pub fn required_str(&self, key: &str) -> Result<&str> {
        match self.0.get(key) {
            None | Some(Value::Null) => Err(BridgeError::missing_parameter(key)),
            Some(Value::String(s)) => Ok(s.as_str()),
            Some(other) => Err(BridgeError::invalid_parameter(
                key,
                format!("expected string, got {}", type_name(other)),
            )),
        }
    }

    /// 可选字符串参数
    pub fn optional_str(&self, key: &str) -> Result<Option<&str>> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(BridgeError::invalid_parameter(
                key,
                format!("expected string, got {}", type_name(other)),
            )),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for InvocationParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
