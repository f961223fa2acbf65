//! C boundary API for the EGL platform loader
//!
//! These functions are the only entry points external code calls. They wrap
//! one process-wide [`ShimSession`], lazily constructed by `ShimInitialize`
//! and explicitly destroyed by `ShimTerminate`; nothing constructs it
//! implicitly. The slot's mutex serializes boundary access, preserving the
//! single-writer semantics the contract assumes.
//!
//! Every call blocks until the compositor call completes and reports its
//! result synchronously; failures come back as a false/null/0 return plus a
//! diagnostic, never a fault.

use crate::config::ShimConfig;
use crate::error::Error;
use crate::ffi::{
    ShimEGLNativeDisplayType, ShimEGLNativeWindowType, ShimNativeWindowId, SHIM_EGL_LIBRARY,
    SHIM_GLES_LIBRARY, SHIM_WINDOW_HEIGHT, SHIM_WINDOW_WIDTH,
};
use crate::session::ShimSession;
use libc::{c_char, c_int};
use std::ptr;
use std::sync::Mutex;
use tracing::{debug, error, info};

/// Process-wide session slot
static SESSION: Mutex<Option<ShimSession>> = Mutex::new(None);

/// Resolve a library name constant to the dynamic library implementing it.
///
/// Stateless; works before `ShimInitialize`. Unknown names yield null.
#[no_mangle]
pub extern "C" fn ShimQueryString(name: c_int) -> *const c_char {
    debug!("ShimQueryString {}", name);
    match name {
        SHIM_EGL_LIBRARY => b"libEGL.so\0".as_ptr() as *const c_char,
        SHIM_GLES_LIBRARY => b"libGLESv2.so\0".as_ptr() as *const c_char,
        _ => {
            debug!("unhandled string query {}", name);
            ptr::null()
        }
    }
}

/// Create the process-wide session.
///
/// Idempotent: a second call with a live session succeeds without creating
/// another one. On a failed init any partial state is torn down.
#[no_mangle]
pub extern "C" fn ShimInitialize() -> bool {
    info!("ShimInitialize");
    let mut slot = match SESSION.lock() {
        Ok(slot) => slot,
        Err(_) => return false,
    };
    if slot.is_some() {
        return true;
    }
    match ShimSession::new(ShimConfig::from_env()) {
        Ok(session) => {
            *slot = Some(session);
            true
        }
        Err(e) => {
            error!("failed to initialize compositor session: {}", e);
            *slot = None;
            false
        }
    }
}

/// Destroy the session and release the compositor connection.
///
/// Idempotent: safe to call when no session exists.
#[no_mangle]
pub extern "C" fn ShimTerminate() -> bool {
    info!("ShimTerminate");
    match SESSION.lock() {
        Ok(mut slot) => {
            slot.take();
            true
        }
        Err(_) => false,
    }
}

/// This compositor model has no native display distinct from the session
/// itself, so the display handle is always null.
#[no_mangle]
pub extern "C" fn ShimGetNativeDisplay() -> ShimEGLNativeDisplayType {
    debug!("ShimGetNativeDisplay");
    ptr::null_mut()
}

/// Create a window surface and return its id, or 0 on failure.
#[no_mangle]
pub extern "C" fn ShimCreateWindow(
    left: i32,
    top: i32,
    width: u32,
    height: u32,
) -> ShimNativeWindowId {
    debug!(
        "ShimCreateWindow at ({}, {}) size {}x{}",
        left, top, width, height
    );
    let mut slot = match SESSION.lock() {
        Ok(slot) => slot,
        Err(_) => return 0,
    };
    let session = match slot.as_mut() {
        Some(session) => session,
        None => {
            error!("ShimCreateWindow called before ShimInitialize");
            return 0;
        }
    };
    match session.create_surface(left, top, width, height) {
        Ok(id) => {
            debug!("returning window id {}", id);
            id
        }
        Err(e) => {
            error!("window creation failed: {}", e);
            0
        }
    }
}

/// Query a window attribute into `value`.
///
/// Unknown ids and attributes outside WIDTH/HEIGHT report failure and leave
/// `value` untouched.
///
/// # Safety
/// `value` must be null or point to writable int storage.
#[no_mangle]
pub unsafe extern "C" fn ShimQueryWindow(
    window_id: ShimNativeWindowId,
    attribute: c_int,
    value: *mut c_int,
) -> bool {
    debug!("ShimQueryWindow {} {}", window_id, attribute);
    if value.is_null() {
        return false;
    }
    let slot = match SESSION.lock() {
        Ok(slot) => slot,
        Err(_) => return false,
    };
    let session = match slot.as_ref() {
        Some(session) => session,
        None => {
            error!("ShimQueryWindow called before ShimInitialize");
            return false;
        }
    };
    let surface = match session.surface(window_id) {
        Ok(surface) => surface,
        Err(e) => {
            error!("{}", e);
            return false;
        }
    };
    match attribute {
        SHIM_WINDOW_WIDTH => *value = surface.width() as c_int,
        SHIM_WINDOW_HEIGHT => *value = surface.height() as c_int,
        _ => {
            error!("{}", Error::UnsupportedAttribute(attribute));
            return false;
        }
    }
    true
}

/// Native window reference for a window id, or null if it is unknown.
#[no_mangle]
pub extern "C" fn ShimGetNativeWindow(window_id: ShimNativeWindowId) -> ShimEGLNativeWindowType {
    let slot = match SESSION.lock() {
        Ok(slot) => slot,
        Err(_) => return ptr::null_mut(),
    };
    match slot.as_ref().and_then(|s| s.surface(window_id).ok()) {
        Some(surface) => {
            debug!("ShimGetNativeWindow {}", window_id);
            surface.native_window() as ShimEGLNativeWindowType
        }
        None => {
            debug!("ShimGetNativeWindow {}: no such window", window_id);
            ptr::null_mut()
        }
    }
}

/// Remove the window from the session and release its compositor surface.
#[no_mangle]
pub extern "C" fn ShimDestroyWindow(window_id: ShimNativeWindowId) -> bool {
    debug!("ShimDestroyWindow {}", window_id);
    let mut slot = match SESSION.lock() {
        Ok(slot) => slot,
        Err(_) => return false,
    };
    match slot.as_mut() {
        Some(session) => match session.destroy_surface(window_id) {
            Ok(()) => true,
            Err(e) => {
                error!("{}", e);
                false
            }
        },
        None => {
            error!("ShimDestroyWindow called before ShimInitialize");
            false
        }
    }
}

/// Intentional no-op: native window references are owned by their surface and
/// released by `ShimDestroyWindow`, so there is nothing separate to free.
#[no_mangle]
pub extern "C" fn ShimReleaseNativeWindow(native_window: ShimEGLNativeWindowType) -> bool {
    debug!("ShimReleaseNativeWindow {:?}", native_window);
    true
}
