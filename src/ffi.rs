//! C-ABI Foreign Function Interface for xlsx2xml.
//!
//! Lets a host that is not written in Rust hand over workbook bytes and get
//! the XML document back, together with the file name to deliver it under.
//!
//! # Memory Management
//!
//! All strings returned by this library must be freed using `xlsx2xml_free_string`.
//!
//! # Error Handling
//!
//! Functions that can fail return a null pointer on error. Use
//! `xlsx2xml_last_error` to retrieve the error message.
//!
//! # Example (C)
//!
//! ```c
//! #include <stdio.h>
//! #include "xlsx2xml.h"
//!
//! int main() {
//!     char* xml = xlsx2xml_convert_file("data.xlsx");
//!     if (!xml) {
//!         fprintf(stderr, "Error: %s\n", xlsx2xml_last_error());
//!         return 1;
//!     }
//!
//!     FILE* out = fopen(xlsx2xml_output_name(), "w");
//!     fputs(xml, out);
//!     fclose(out);
//!
//!     xlsx2xml_free_string(xml);
//!     return 0;
//! }
//! ```

use std::cell::RefCell;
use std::ffi::{c_char, CStr, CString};
use std::panic::catch_unwind;
use std::ptr;

// Thread-local storage for the last error message.
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Set the last error message.
fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Clear the last error message.
fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Turn a conversion result into an owned C string, recording failures.
fn into_c_string(result: std::thread::Result<Result<String, String>>) -> *mut c_char {
    match result {
        Ok(Ok(xml)) => match CString::new(xml) {
            Ok(s) => s.into_raw(),
            Err(_) => {
                set_last_error("document contains an interior NUL byte");
                ptr::null_mut()
            }
        },
        Ok(Err(e)) => {
            set_last_error(&e);
            ptr::null_mut()
        }
        Err(_) => {
            set_last_error("panic occurred during conversion");
            ptr::null_mut()
        }
    }
}

/// Get the version of the library.
///
/// # Safety
///
/// Returns a static string that must not be freed.
#[no_mangle]
pub extern "C" fn xlsx2xml_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

/// Get the file name converted documents are delivered under.
///
/// # Safety
///
/// Returns a static string that must not be freed.
#[no_mangle]
pub extern "C" fn xlsx2xml_output_name() -> *const c_char {
    c"converted.xml".as_ptr()
}

/// Get the last error message.
///
/// # Safety
///
/// Returns a pointer to a thread-local error string. The pointer is valid until
/// the next call to any xlsx2xml function on the same thread.
#[no_mangle]
pub extern "C" fn xlsx2xml_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        e.borrow()
            .as_ref()
            .map(|s| s.as_ptr())
            .unwrap_or(ptr::null())
    })
}

/// Convert a workbook held in a byte buffer.
///
/// # Safety
///
/// - `data` must be a valid pointer to a byte buffer of at least `len` bytes.
/// - Returns null on error. Use `xlsx2xml_last_error` to get the error message.
/// - The returned string must be freed with `xlsx2xml_free_string`.
#[no_mangle]
pub unsafe extern "C" fn xlsx2xml_convert_bytes(data: *const u8, len: usize) -> *mut c_char {
    clear_last_error();

    if data.is_null() {
        set_last_error("data is null");
        return ptr::null_mut();
    }

    let result = catch_unwind(|| {
        let bytes = std::slice::from_raw_parts(data, len);
        crate::convert_bytes(bytes).map_err(|e| e.to_string())
    });

    into_c_string(result)
}

/// Convert a workbook file.
///
/// # Safety
///
/// - `path` must be a valid null-terminated UTF-8 string.
/// - Returns null on error. Use `xlsx2xml_last_error` to get the error message.
/// - The returned string must be freed with `xlsx2xml_free_string`.
#[no_mangle]
pub unsafe extern "C" fn xlsx2xml_convert_file(path: *const c_char) -> *mut c_char {
    clear_last_error();

    if path.is_null() {
        set_last_error("path is null");
        return ptr::null_mut();
    }

    let result = catch_unwind(|| {
        let path_str = CStr::from_ptr(path).to_str().map_err(|e| e.to_string())?;
        crate::convert_file(path_str).map_err(|e| e.to_string())
    });

    into_c_string(result)
}

/// Free a string allocated by this library.
///
/// # Safety
///
/// - `s` must be a pointer returned by an xlsx2xml function, or null.
/// - After calling this function, the pointer is invalid and must not be used.
#[no_mangle]
pub unsafe extern "C" fn xlsx2xml_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = CString::from_raw(s);
    }
}
