//! C ABI exported to the host engine.
//!
//! The host passes two NUL-terminated UTF-16 strings and never looks at a result.
//! `SetStartupMovie` therefore has no way to report a failure. Failures are emitted as
//! `tracing` events, which are dropped unless the host process installs a subscriber; this
//! library never installs one. Hosts that need to see failures call
//! `SetStartupMovieWithStatus`, which returns one of the `STATUS_*` codes.
#![allow(unsafe_code)]

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::foundation::error::{StartupMovieError, StartupMovieResult};
use crate::layout::config::MovieLayout;
use crate::slots::fs::SlotFs;
use crate::transition::{MovieSwitcher, TransitionOutcome};

/// Nothing was moved.
pub const STATUS_UNCHANGED: i32 = 0;
/// The state file was updated and the rotation completed.
pub const STATUS_ROTATED: i32 = 1;
/// A level name pointer was null.
pub const STATUS_NULL_ARGUMENT: i32 = -1;
/// A level name was rejected.
pub const STATUS_INVALID_LEVEL: i32 = -2;
/// The state file could not be opened for writing; nothing was moved.
pub const STATUS_STATE_NOT_WRITABLE: i32 = -3;
/// Reading or writing the state file failed.
pub const STATUS_STATE_IO: i32 = -4;
/// A rename or delete failed part way through a rotation.
pub const STATUS_ROTATION_FAILED: i32 = -5;
/// Any other failure, including a panic caught at this boundary.
pub const STATUS_OTHER: i32 = -6;

// Longest host string scanned for its terminator. Level names are far shorter.
const MAX_WIDE_UNITS: usize = 32 * 1024;

/// Map a transition result to its exported status code.
pub fn status_code(result: &StartupMovieResult<TransitionOutcome>) -> i32 {
    match result {
        Ok(TransitionOutcome::Unchanged(_)) => STATUS_UNCHANGED,
        Ok(TransitionOutcome::Rotated { .. }) => STATUS_ROTATED,
        Err(StartupMovieError::Validation(_)) => STATUS_INVALID_LEVEL,
        Err(StartupMovieError::StateNotWritable { .. }) => STATUS_STATE_NOT_WRITABLE,
        Err(StartupMovieError::State { .. }) => STATUS_STATE_IO,
        Err(StartupMovieError::Rotation { .. }) => STATUS_ROTATION_FAILED,
        Err(StartupMovieError::Config(_) | StartupMovieError::Other(_)) => STATUS_OTHER,
    }
}

/// Select the loading movie for a `leaving -> loading` level transition.
///
/// Operates on the stock UDK movies directory relative to the host's working directory.
///
/// # Safety
///
/// Each pointer must be null or point to a NUL-terminated UTF-16 string that stays valid and
/// unmodified for the duration of the call.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub unsafe extern "C" fn SetStartupMovie(leaving_level: *const u16, loading_level: *const u16) {
    // SAFETY: forwarded caller contract.
    unsafe { SetStartupMovieWithStatus(leaving_level, loading_level) };
}

/// Same as [`SetStartupMovie`], returning one of the `STATUS_*` codes.
///
/// # Safety
///
/// Same contract as [`SetStartupMovie`].
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub unsafe extern "C" fn SetStartupMovieWithStatus(
    leaving_level: *const u16,
    loading_level: *const u16,
) -> i32 {
    let switcher = MovieSwitcher::on_disk(MovieLayout::udk_default());
    // SAFETY: forwarded caller contract.
    unsafe { set_startup_movie_raw(&switcher, leaving_level, loading_level) }
}

/// Run one transition from raw host pointers through `switcher`.
///
/// Failures are returned as a status code and emitted as `tracing` error events.
///
/// # Safety
///
/// Same pointer contract as [`SetStartupMovie`].
pub unsafe fn set_startup_movie_raw<F: SlotFs>(
    switcher: &MovieSwitcher<F>,
    leaving_level: *const u16,
    loading_level: *const u16,
) -> i32 {
    // SAFETY: forwarded caller contract.
    let (leaving, loading) = unsafe { (wide_units(leaving_level), wide_units(loading_level)) };
    let (Some(leaving), Some(loading)) = (leaving, loading) else {
        tracing::error!("SetStartupMovie called with a null level name");
        return STATUS_NULL_ARGUMENT;
    };

    let result = catch_unwind(AssertUnwindSafe(|| {
        switcher.set_startup_movie_wide(leaving, loading)
    }));
    let Ok(result) = result else {
        tracing::error!("SetStartupMovie panicked; movie slots may need inspection");
        return STATUS_OTHER;
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "loading movie selection failed");
    }
    status_code(&result)
}

/// Borrow the units of a NUL-terminated wide string, excluding the terminator.
///
/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated UTF-16 string valid for the returned
/// lifetime. Strings longer than `MAX_WIDE_UNITS` are cut at that length.
unsafe fn wide_units<'a>(ptr: *const u16) -> Option<&'a [u16]> {
    if ptr.is_null() {
        return None;
    }
    let mut len = 0;
    // SAFETY: every unit up to and including the terminator is readable per the contract,
    // and the scan stops at the first NUL.
    while len < MAX_WIDE_UNITS && unsafe { *ptr.add(len) } != 0 {
        len += 1;
    }
    // SAFETY: the `len` units just scanned are initialized and readable.
    Some(unsafe { std::slice::from_raw_parts(ptr, len) })
}

#[cfg(test)]
#[path = "../tests/unit/ffi.rs"]
mod tests;
