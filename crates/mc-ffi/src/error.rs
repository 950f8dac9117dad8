use std::cell::RefCell;
use std::ffi::CString;

use mc_chain::{ChainError, SamplerError};

use crate::types::MCStatus;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Store an error message for later retrieval via `mc_last_error`.
pub fn set_last_error(msg: String) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Take the last error message, leaving `None` in its place.
pub fn take_last_error() -> Option<CString> {
    LAST_ERROR.with(|e| e.borrow_mut().take())
}

/// Status code reported for a failed prediction.
pub fn status_for(err: &ChainError) -> MCStatus {
    match err {
        ChainError::Sampler(SamplerError::EmptyDistribution) => MCStatus::ErrorEmptyDistribution,
    }
}

/// Record `err` as the last error and return its status code.
pub fn prediction_failed(err: ChainError) -> MCStatus {
    set_last_error(format!("prediction failed: {}", err));
    status_for(&err)
}
