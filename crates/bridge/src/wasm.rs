use crate::{abi, host::Host};

mod imports {
    #[link(wasm_import_module = "host")]
    unsafe extern "C" {
        #[link_name = "call"]
        pub fn host_call(in_ptr: *const u8, in_len: i32, out_ptr: *mut u8, out_cap: i32) -> i32;

        #[link_name = "log"]
        pub fn host_log(ptr: *const u8, len: i32);
    }
}

/// Host backed by the `host.call` / `host.log` module imports.
pub struct ImportedHost;

impl Host for ImportedHost {
    fn call(&self, request: &[u8], response: &mut [u8]) -> i32 {
        let (Ok(in_len), Ok(out_cap)) = (
            i32::try_from(request.len()),
            i32::try_from(response.len()),
        ) else {
            return -1;
        };
        unsafe { imports::host_call(request.as_ptr(), in_len, response.as_mut_ptr(), out_cap) }
    }

    fn log(&self, message: &[u8]) {
        let Ok(len) = i32::try_from(message.len()) else {
            return;
        };
        unsafe { imports::host_log(message.as_ptr(), len) };
    }
}

/// # Safety
///
/// `code_ptr` must be null or valid for reads of `len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn eval_js(code_ptr: *const u8, len: i32) -> i32 {
    unsafe { abi::eval(ImportedHost, code_ptr, len) }
}

/// # Safety
///
/// `ptr` must be null or valid for reads of `len` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bridge_configure(ptr: *const u8, len: i32) -> i32 {
    unsafe { abi::configure(ptr, len) }
}

#[unsafe(no_mangle)]
pub extern "C" fn quickjs_selftest() -> i32 {
    abi::self_test()
}

#[unsafe(no_mangle)]
pub extern "C" fn get_last_error_ptr() -> *const u8 {
    abi::last_error_ptr()
}

#[unsafe(no_mangle)]
pub extern "C" fn get_last_error_len() -> i32 {
    abi::last_error_len()
}

#[unsafe(no_mangle)]
pub extern "C" fn get_result_ptr() -> *const u8 {
    abi::result_ptr()
}

#[unsafe(no_mangle)]
pub extern "C" fn get_result_len() -> i32 {
    abi::result_len()
}
