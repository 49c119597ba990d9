use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default interpreter stack guard. Must stay well below the smallest native
/// stack the bridge runs on (1 MiB on wasm32), or runaway recursion overflows
/// the real stack before the engine can throw.
pub const DEFAULT_MAX_STACK_SIZE: usize = 256 * 1024;

/// Per-evaluation engine limits and capability names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Interpreter stack guard in bytes. `0` disables the check.
    pub max_stack_size: usize,
    pub memory_limit: Option<usize>,
    /// Size of the buffer the host writes its call-out response into.
    pub response_capacity: usize,
    pub host_namespace: String,
    pub host_call_name: String,
    pub log_namespace: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
            memory_limit: None,
            response_capacity: 4096,
            host_namespace: "__host".to_string(),
            host_call_name: "bridge".to_string(),
            log_namespace: "console".to_string(),
        }
    }
}

impl Config {
    pub fn from_json(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    #[must_use]
    pub const fn max_stack_size(mut self, size: usize) -> Self {
        self.max_stack_size = size;
        self
    }

    #[must_use]
    pub const fn memory_limit(mut self, limit: Option<usize>) -> Self {
        self.memory_limit = limit;
        self
    }

    #[must_use]
    pub const fn response_capacity(mut self, capacity: usize) -> Self {
        self.response_capacity = capacity;
        self
    }

    #[must_use]
    pub fn host_namespace(mut self, name: impl Into<String>) -> Self {
        self.host_namespace = name.into();
        self
    }

    #[must_use]
    pub fn host_call_name(mut self, name: impl Into<String>) -> Self {
        self.host_call_name = name.into();
        self
    }

    #[must_use]
    pub fn log_namespace(mut self, name: impl Into<String>) -> Self {
        self.log_namespace = name.into();
        self
    }
}
