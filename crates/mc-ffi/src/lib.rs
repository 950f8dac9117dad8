mod types;
mod error;
mod context;
mod streaming;

pub use types::*;
pub use error::*;
pub use context::*;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use mc_chain::ChainConfig;

use crate::streaming::Generation;

/// Execute a closure that returns an `MCStatus`, catching any panics
/// and converting them into `MCStatus::ErrorInternal`.
fn catch_panic<F: FnOnce() -> MCStatus + std::panic::UnwindSafe>(f: F) -> MCStatus {
    match std::panic::catch_unwind(f) {
        Ok(status) => status,
        Err(_) => {
            set_last_error("internal panic".to_string());
            MCStatus::ErrorInternal
        }
    }
}

/// Borrow a C string argument as UTF-8, recording an error on failure.
unsafe fn word_arg<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, MCStatus> {
    match CStr::from_ptr(ptr).to_str() {
        Ok(s) => Ok(s),
        Err(e) => {
            set_last_error(format!("invalid {}: {}", what, e));
            Err(MCStatus::ErrorInvalidArgument)
        }
    }
}

/// Hand a string to the caller through `out`.
unsafe fn write_output(text: String, out: *mut *mut c_char) -> MCStatus {
    match CString::new(text) {
        Ok(c) => {
            *out = c.into_raw();
            MCStatus::Ok
        }
        Err(e) => {
            set_last_error(format!("output encoding error: {}", e));
            MCStatus::ErrorInternal
        }
    }
}

/// Create a new, untrained chain context.
///
/// On success, writes a heap-allocated `MCContext` pointer into `*ctx_out`
/// and returns `MCStatus::Ok`. The caller must later call `mc_context_destroy`
/// to free the context.
#[no_mangle]
pub extern "C" fn mc_context_create(
    params: MCChainParams,
    ctx_out: *mut *mut MCContext,
) -> MCStatus {
    catch_panic(|| {
        if ctx_out.is_null() {
            set_last_error("ctx_out is null".to_string());
            return MCStatus::ErrorInvalidArgument;
        }
        let config = ChainConfig::from(&params);
        let ctx = Box::new(MCContext::new(&config));
        unsafe {
            *ctx_out = Box::into_raw(ctx);
        }
        MCStatus::Ok
    })
}

/// Destroy a context previously created by `mc_context_create`.
///
/// Passing a null pointer is a no-op and returns `MCStatus::Ok`.
#[no_mangle]
pub unsafe extern "C" fn mc_context_destroy(ctx: *mut MCContext) -> MCStatus {
    if ctx.is_null() {
        return MCStatus::Ok;
    }
    drop(Box::from_raw(ctx));
    MCStatus::Ok
}

/// Feed the next word of the training sequence.
#[no_mangle]
pub unsafe extern "C" fn mc_train(ctx: *mut MCContext, word: *const c_char) -> MCStatus {
    catch_panic(|| {
        if ctx.is_null() || word.is_null() {
            set_last_error("null argument".to_string());
            return MCStatus::ErrorInvalidArgument;
        }
        let ctx = unsafe { &mut *ctx };
        let word = match unsafe { word_arg(word, "word") } {
            Ok(w) => w,
            Err(status) => return status,
        };
        ctx.chain.train(word.to_string());
        MCStatus::Ok
    })
}

/// Draw a successor of `word`.
///
/// On success, writes a heap-allocated C string into `*output`, which the
/// caller must free with `mc_free_string`. Returns
/// `MCStatus::ErrorEmptyDistribution` if nothing has been trained yet.
#[no_mangle]
pub unsafe extern "C" fn mc_predict(
    ctx: *mut MCContext,
    word: *const c_char,
    output: *mut *mut c_char,
) -> MCStatus {
    catch_panic(|| {
        if ctx.is_null() || word.is_null() || output.is_null() {
            set_last_error("null argument".to_string());
            return MCStatus::ErrorInvalidArgument;
        }
        let ctx = unsafe { &mut *ctx };
        let word = match unsafe { word_arg(word, "word") } {
            Ok(w) => w,
            Err(status) => return status,
        };

        match ctx.chain.predict(word) {
            Ok(next) => unsafe { write_output(next.clone(), output) },
            Err(e) => prediction_failed(e),
        }
    })
}

/// Generate text by repeatedly predicting from the previous word (non-streaming).
///
/// Starting from `start`, up to `params.max_tokens` words are generated and
/// joined with single spaces; `start` itself is not included. On success,
/// writes a heap-allocated C string into `*output`. The caller must later
/// call `mc_free_string` to free the output string.
#[no_mangle]
pub unsafe extern "C" fn mc_generate(
    ctx: *mut MCContext,
    start: *const c_char,
    params: MCGenerateParams,
    output: *mut *mut c_char,
) -> MCStatus {
    catch_panic(|| {
        if ctx.is_null() || start.is_null() || output.is_null() {
            set_last_error("null argument".to_string());
            return MCStatus::ErrorInvalidArgument;
        }
        let ctx = unsafe { &mut *ctx };
        let start = match unsafe { word_arg(start, "start word") } {
            Ok(w) => w,
            Err(status) => return status,
        };

        let generated = match Generation::new(&mut ctx.chain, start, params.max_tokens)
            .collect::<mc_chain::Result<Vec<String>>>()
        {
            Ok(words) => words,
            Err(e) => return prediction_failed(e),
        };

        unsafe { write_output(generated.join(" "), output) }
    })
}

/// Generate text with streaming output.
///
/// Each generated word is passed to the `callback` function as a C string.
/// The callback should return `true` to continue generation, or `false` to stop.
#[no_mangle]
pub unsafe extern "C" fn mc_generate_streaming(
    ctx: *mut MCContext,
    start: *const c_char,
    params: MCGenerateParams,
    callback: MCStreamCallback,
    user_data: *mut std::os::raw::c_void,
) -> MCStatus {
    catch_panic(|| {
        if ctx.is_null() || start.is_null() {
            set_last_error("null argument".to_string());
            return MCStatus::ErrorInvalidArgument;
        }
        let ctx = unsafe { &mut *ctx };
        let start = match unsafe { word_arg(start, "start word") } {
            Ok(w) => w,
            Err(status) => return status,
        };

        for word in Generation::new(&mut ctx.chain, start, params.max_tokens) {
            let word = match word {
                Ok(w) => w,
                Err(e) => return prediction_failed(e),
            };
            if !streaming::invoke_callback(callback, user_data, &word) {
                break; // caller requested stop
            }
        }

        MCStatus::Ok
    })
}

/// Retrieve the last error message.
///
/// Returns a pointer to a C string describing the most recent error, or
/// null if no error has occurred. The caller must free the returned string
/// with `mc_free_string`.
#[no_mangle]
pub extern "C" fn mc_last_error() -> *const c_char {
    match error::take_last_error() {
        Some(e) => e.into_raw(),
        None => std::ptr::null(),
    }
}

/// Free a string previously returned by `mc_predict`, `mc_generate` or `mc_last_error`.
#[no_mangle]
pub unsafe extern "C" fn mc_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
