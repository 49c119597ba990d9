use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("code_ptr is NULL")]
    NullInput,

    #[error("Invalid code length: {0}")]
    InvalidLength(i32),

    #[error("Failed to create JavaScript runtime: {0}")]
    RuntimeCreate(#[source] rquickjs::Error),

    #[error("Failed to create JavaScript context: {0}")]
    ContextCreate(#[source] rquickjs::Error),

    #[error("{0}")]
    BridgeInstall(&'static str),

    #[error("Failed to allocate code buffer ({0} bytes)")]
    Alloc(usize),

    #[error("Exception: {message}{}", stack_suffix(.stack))]
    Exception {
        message: String,
        stack: Option<String>,
    },

    #[error("{0}")]
    ResultConvert(String),

    #[error("Selftest: unexpected result {0:?}")]
    SelfTestMismatch(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

fn stack_suffix(stack: &Option<String>) -> String {
    stack
        .as_deref()
        .map(|s| format!("\nStack: {s}"))
        .unwrap_or_default()
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Status codes returned across the ABI boundary.
///
/// The numeric values are part of the wire contract and never change.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Success = 0,
    RuntimeCreateFailed = 20,
    ContextCreateFailed = 21,
    ExceptionRaised = 22,
    BridgeInstallFailed = 23,
    NullInput = 24,
    AllocFailed = 25,
    ResultConvertFailed = 26,
    ConfigInvalid = 27,
}

/// Status codes returned by the self-test, kept disjoint from [`StatusCode`].
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfTestStatus {
    Ok = 0,
    RuntimeCreateFailed = 100,
    ContextCreateFailed = 101,
    EvalFailed = 102,
}

impl StatusCode {
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl SelfTestStatus {
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl From<&Error> for StatusCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::NullInput | Error::InvalidLength(_) => Self::NullInput,
            Error::RuntimeCreate(_) => Self::RuntimeCreateFailed,
            Error::ContextCreate(_) => Self::ContextCreateFailed,
            Error::BridgeInstall(_) => Self::BridgeInstallFailed,
            Error::Alloc(_) => Self::AllocFailed,
            Error::Exception { .. } | Error::SelfTestMismatch(_) => Self::ExceptionRaised,
            Error::ResultConvert(_) => Self::ResultConvertFailed,
            Error::Config(_) => Self::ConfigInvalid,
        }
    }
}

impl From<&Error> for SelfTestStatus {
    fn from(err: &Error) -> Self {
        match err {
            Error::RuntimeCreate(_) => Self::RuntimeCreateFailed,
            Error::ContextCreate(_) => Self::ContextCreateFailed,
            _ => Self::EvalFailed,
        }
    }
}

impl Error {
    pub(crate) fn exception(message: impl Into<String>) -> Self {
        Self::Exception {
            message: message.into(),
            stack: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.into()
    }
}
