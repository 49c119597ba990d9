mod common;

use std::rc::Rc;

use scriptbox_bridge::{
    SelfTestStatus, StatusCode, abi,
    buffer::{ERROR_CAPACITY, RESULT_CAPACITY},
};

use common::{RecordingHost, Reply, shared_host};

fn eval(host: &Rc<RecordingHost>, source: &str) -> i32 {
    let len = i32::try_from(source.len()).expect("source fits in i32");
    unsafe { abi::eval(Rc::clone(host), source.as_ptr(), len) }
}

fn read(ptr: *const u8, len: i32) -> String {
    let len = usize::try_from(len).expect("non-negative length");
    let bytes = unsafe { std::slice::from_raw_parts(ptr, len) };
    String::from_utf8(bytes.to_vec()).expect("buffers hold utf-8")
}

fn last_error() -> String {
    read(abi::last_error_ptr(), abi::last_error_len())
}

fn result() -> String {
    read(abi::result_ptr(), abi::result_len())
}

#[test]
fn abi_eval_success() {
    let host = shared_host(Reply::Echo);
    assert_eq!(eval(&host, "1+1"), StatusCode::Success.code());
    assert_eq!(result(), "2");
    assert_eq!(last_error(), "OK");

    assert_eq!(eval(&host, "({a:1,b:[2,3]})"), 0);
    assert_eq!(result(), r#"{"a":1,"b":[2,3]}"#);
}

#[test]
fn abi_eval_reads_only_declared_span() {
    let host = shared_host(Reply::Echo);
    let source = "40+2; throw new Error('past the end')";
    let status = unsafe { abi::eval(Rc::clone(&host), source.as_ptr(), 4) };
    assert_eq!(status, 0);
    assert_eq!(result(), "42");
}

#[test]
fn abi_eval_exception() {
    let host = shared_host(Reply::Echo);
    assert_eq!(eval(&host, "'previous'"), 0);

    assert_eq!(
        eval(&host, "throw new Error('bad')"),
        StatusCode::ExceptionRaised.code()
    );
    let record = last_error();
    assert!(record.starts_with("Exception: bad"), "unexpected record: {record}");
    assert!(record.contains("\nStack: "), "missing stack: {record}");
    // The result buffer is stale on failure.
    assert_eq!(result(), "previous");
}

#[test]
fn abi_eval_null_input() {
    let host = shared_host(Reply::Echo);
    let status = unsafe { abi::eval(Rc::clone(&host), std::ptr::null(), 0) };
    assert_eq!(status, StatusCode::NullInput.code());
    assert_eq!(last_error(), "code_ptr is NULL");
    assert!(host.requests().is_empty());
}

#[test]
fn abi_eval_negative_length() {
    let host = shared_host(Reply::Echo);
    let source = "1+1";
    let status = unsafe { abi::eval(Rc::clone(&host), source.as_ptr(), -1) };
    assert_eq!(status, StatusCode::NullInput.code());
}

#[test]
fn abi_eval_empty_source() {
    let host = shared_host(Reply::Echo);
    assert_eq!(eval(&host, ""), 0);
    assert_eq!(result(), "undefined");
}

#[test]
fn abi_long_message_is_truncated() {
    let host = shared_host(Reply::Echo);
    assert_eq!(
        eval(&host, "throw new Error('é'.repeat(5000))"),
        StatusCode::ExceptionRaised.code()
    );
    let len = usize::try_from(abi::last_error_len()).expect("non-negative length");
    assert!(len <= ERROR_CAPACITY);
    let record = last_error();
    assert!(record.starts_with("Exception: éé"));
    assert!(!record.contains("Stack"));

    assert_eq!(eval(&host, "1+1"), 0);
    assert_eq!(last_error(), "OK");
    assert_eq!(result(), "2");
}

#[test]
fn abi_long_stack_is_truncated() {
    let host = shared_host(Reply::Echo);
    let status = eval(
        &host,
        "throw { message: 'short', stack: 'frame\\n'.repeat(1000), toString() { return 'short' } }",
    );
    assert_eq!(status, StatusCode::ExceptionRaised.code());
    let record = last_error();
    assert!(record.starts_with("Exception: short\nStack: frame\nframe"));
    assert_eq!(record.len(), ERROR_CAPACITY);
}

#[test]
fn abi_long_result_is_truncated() {
    let host = shared_host(Reply::Echo);
    assert_eq!(eval(&host, "'y'.repeat(70000)"), 0);
    assert_eq!(
        usize::try_from(abi::result_len()).expect("non-negative length"),
        RESULT_CAPACITY
    );
    assert!(result().bytes().all(|b| b == b'y'));
}

#[test]
fn abi_convert_failure_clears_result() {
    let host = shared_host(Reply::Echo);
    assert_eq!(eval(&host, "'previous'"), 0);
    let status = eval(
        &host,
        "({ toJSON() { throw 1 }, toString() { throw new Error('no text') } })",
    );
    assert_eq!(status, StatusCode::ResultConvertFailed.code());
    assert_eq!(result(), "");
    assert!(last_error().contains("no text"));
}

#[test]
fn abi_self_test() {
    assert_eq!(abi::self_test(), SelfTestStatus::Ok.code());
    assert_eq!(last_error(), "Selftest: OK (QuickJS is functional)");
}

#[test]
fn abi_configure() {
    let host = shared_host(Reply::Echo);

    let config = br#"{"host_namespace": "sandbox", "host_call_name": "call"}"#;
    let status = unsafe { abi::configure(config.as_ptr(), i32::try_from(config.len()).unwrap()) };
    assert_eq!(status, 0);
    assert_eq!(abi::current_config().host_namespace, "sandbox");

    assert_eq!(eval(&host, "sandbox.call('via config')"), 0);
    assert_eq!(result(), "via config");

    let invalid = b"{\"no_such_field\": 1}";
    let status =
        unsafe { abi::configure(invalid.as_ptr(), i32::try_from(invalid.len()).unwrap()) };
    assert_eq!(status, StatusCode::ConfigInvalid.code());
    assert!(last_error().starts_with("Invalid configuration"));
    assert_eq!(abi::current_config().host_namespace, "sandbox");

    let reset = b"{}";
    let status = unsafe { abi::configure(reset.as_ptr(), 2) };
    assert_eq!(status, 0);
    assert_eq!(abi::current_config().host_namespace, "__host");
}
