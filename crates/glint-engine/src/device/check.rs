use std::panic::Location;

use super::api::{GraphicsApi, error_code};

/// Upper bound on errors drained per check. Some drivers keep returning the
/// same code when the context is lost.
const MAX_DRAINED: usize = 32;

/// Runs one GL operation and, in debug builds, asserts it raised no error.
///
/// Stale errors are drained first so that only errors produced by `f` are
/// attributed to `op`. Any error is logged with the caller location and
/// aborts via panic. In release builds this is a plain call.
#[track_caller]
#[inline]
pub fn checked<R>(api: &dyn GraphicsApi, op: &str, f: impl FnOnce(&dyn GraphicsApi) -> R) -> R {
    if cfg!(debug_assertions) {
        let caller = Location::caller();
        let stale = drain_errors(api);
        if !stale.is_empty() {
            log::trace!("discarding stale GL errors {stale:x?} before {op} ({caller})");
        }

        let out = f(api);

        let raised = drain_errors(api);
        if !raised.is_empty() {
            for code in &raised {
                log::error!("[GL error] 0x{code:04x} in {op} at {caller}");
            }
            panic!("GL call {op} raised {raised:x?} at {caller}");
        }
        out
    } else {
        f(api)
    }
}

/// [`checked`] for `Drop` impls: skips the check while the thread is already
/// unwinding, where a second panic would abort.
#[track_caller]
pub fn checked_release(api: &dyn GraphicsApi, op: &str, f: impl FnOnce(&dyn GraphicsApi)) {
    if std::thread::panicking() {
        f(api);
    } else {
        checked(api, op, f);
    }
}

/// Pops every pending error code.
pub fn drain_errors(api: &dyn GraphicsApi) -> Vec<u32> {
    let mut codes = Vec::new();
    while codes.len() < MAX_DRAINED {
        match api.get_error() {
            error_code::NO_ERROR => break,
            code => codes.push(code),
        }
    }
    codes
}
