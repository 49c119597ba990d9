pub mod abi;
mod bridge;
pub mod buffer;
mod canonical;
mod capability;
pub mod config;
pub mod error;
mod exception;
pub mod host;
mod scope;
#[cfg(target_arch = "wasm32")]
mod wasm;

pub const TRACE_TARGET: &str = "scriptbox::bridge";

pub use bridge::{Bridge, self_test};
pub use config::Config;
pub use error::{Error, Result, SelfTestStatus, StatusCode};
pub use host::Host;
