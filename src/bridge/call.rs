use serde_json::{Map, Value};

use crate::error::{BridgeError, BridgeResult};

/// A named remote call: method name plus a mapping of named arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    method: String,
    arguments: Map<String, Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Map::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn str_arg(&self, key: &str) -> BridgeResult<&str> {
        self.arguments
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                BridgeError::invalid_argument(format!("argument `{key}` must be a string"))
            })
    }

    pub fn int_arg(&self, key: &str) -> BridgeResult<i64> {
        self.arguments
            .get(key)
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                BridgeError::invalid_argument(format!("argument `{key}` must be an integer"))
            })
    }
}

/// Exactly one of these is delivered per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// `None` means the operation failed; callers cannot distinguish why.
    Success(Option<String>),
    NotImplemented,
}
