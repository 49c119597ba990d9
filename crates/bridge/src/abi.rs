//! Byte-buffer boundary for hosts that can only exchange pointers and lengths.
//!
//! Every entry point reports its outcome as a status code and leaves the
//! details in two process-wide buffers: the diagnostic record and the
//! canonical result. Their content stays valid until the next call into this
//! module. None of this is reentrant; hosts must serialize calls.

use std::cell::RefCell;

use crate::{
    bridge::{Bridge, self_test as run_self_test},
    buffer::{BoundedText, ERROR_CAPACITY, RESULT_CAPACITY},
    config::Config,
    error::{Error, Result, SelfTestStatus, StatusCode},
    host::Host,
};

const SELF_TEST_OK: &str = "Selftest: OK (QuickJS is functional)";

thread_local! {
    static LAST_ERROR: RefCell<BoundedText<ERROR_CAPACITY>> =
        const { RefCell::new(BoundedText::new()) };
    static RESULT: RefCell<BoundedText<RESULT_CAPACITY>> =
        const { RefCell::new(BoundedText::new()) };
    static CONFIG: RefCell<Config> = RefCell::new(Config::default());
}

/// Evaluate the script at `code_ptr` and record the outcome.
///
/// # Safety
///
/// Unless `code_ptr` is null, it must be valid for reads of `len` bytes for
/// the duration of the call.
pub unsafe fn eval<H: Host>(host: H, code_ptr: *const u8, len: i32) -> i32 {
    let outcome = unsafe { span(code_ptr, len) }.and_then(|source| {
        let bridge = Bridge::with_config(host, current_config());
        bridge.evaluate(Some(source))
    });
    record(outcome).code()
}

/// Run the built-in self-test and record its outcome.
pub fn self_test() -> i32 {
    match run_self_test(&current_config()) {
        Ok(_) => {
            set_last_error(SELF_TEST_OK);
            SelfTestStatus::Ok.code()
        }
        Err(err) => {
            match &err {
                Error::RuntimeCreate(_) => set_last_error("Selftest: Failed to create runtime"),
                Error::ContextCreate(_) => set_last_error("Selftest: Failed to create context"),
                _ => set_last_error(&err.to_string()),
            }
            SelfTestStatus::from(&err).code()
        }
    }
}

/// Replace the configuration used by subsequent evaluations with the JSON
/// document at `ptr`.
///
/// # Safety
///
/// Unless `ptr` is null, it must be valid for reads of `len` bytes for the
/// duration of the call.
pub unsafe fn configure(ptr: *const u8, len: i32) -> i32 {
    match unsafe { span(ptr, len) }.and_then(Config::from_json) {
        Ok(config) => {
            CONFIG.with_borrow_mut(|slot| *slot = config);
            set_last_error("OK");
            StatusCode::Success.code()
        }
        Err(err) => {
            set_last_error(&err.to_string());
            err.status().code()
        }
    }
}

pub fn current_config() -> Config {
    CONFIG.with_borrow(Clone::clone)
}

pub fn last_error_ptr() -> *const u8 {
    LAST_ERROR.with_borrow(BoundedText::as_ptr)
}

pub fn last_error_len() -> i32 {
    LAST_ERROR.with_borrow(|buf| to_i32(buf.len()))
}

pub fn result_ptr() -> *const u8 {
    RESULT.with_borrow(BoundedText::as_ptr)
}

pub fn result_len() -> i32 {
    RESULT.with_borrow(|buf| to_i32(buf.len()))
}

/// Owned copy of the diagnostic record.
pub fn last_error() -> String {
    LAST_ERROR.with_borrow(|buf| buf.as_str().to_owned())
}

/// Owned copy of the canonical result.
pub fn result() -> String {
    RESULT.with_borrow(|buf| buf.as_str().to_owned())
}

fn set_last_error(text: &str) {
    LAST_ERROR.with_borrow_mut(|buf| buf.set(text));
}

fn record(outcome: Result<String>) -> StatusCode {
    match outcome {
        Ok(value) => {
            RESULT.with_borrow_mut(|buf| buf.set(&value));
            set_last_error("OK");
            StatusCode::Success
        }
        Err(err) => {
            if matches!(err, Error::ResultConvert(_)) {
                RESULT.with_borrow_mut(BoundedText::clear);
            }
            set_last_error(&err.to_string());
            err.status()
        }
    }
}

unsafe fn span<'a>(ptr: *const u8, len: i32) -> Result<&'a [u8]> {
    if ptr.is_null() {
        return Err(Error::NullInput);
    }
    let len = usize::try_from(len).map_err(|_| Error::InvalidLength(len))?;
    Ok(unsafe { std::slice::from_raw_parts(ptr, len) })
}

fn to_i32(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}
