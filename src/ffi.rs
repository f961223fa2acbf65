//! C-level constants and types for the boundary API
//!
//! These mirror the compositor client library's status codes and pixel
//! formats plus the small set of name/attribute constants the EGL loader
//! passes across the shim boundary.

use libc::{c_int, c_void};

/// Compositor client status code type
pub type StatusT = i32;

/// Status codes reported by the compositor client
pub const NO_ERROR: StatusT = 0;
pub const NO_INIT: StatusT = -19;
pub const PERMISSION_DENIED: StatusT = -1;
pub const DEAD_OBJECT: StatusT = -32;

/// Pixel formats understood by the compositor
pub const PIXEL_FORMAT_RGBA_8888: c_int = 1;
pub const PIXEL_FORMAT_RGBX_8888: c_int = 2;
pub const PIXEL_FORMAT_BGRA_8888: c_int = 5;

/// Library name constants recognized by `ShimQueryString`
pub const SHIM_EGL_LIBRARY: c_int = 1;
pub const SHIM_GLES_LIBRARY: c_int = 2;

/// Window attributes recognized by `ShimQueryWindow`
pub const SHIM_WINDOW_WIDTH: c_int = 1;
pub const SHIM_WINDOW_HEIGHT: c_int = 2;

/// Window id handed across the boundary; 0 is the invalid sentinel and is
/// never issued for a created window.
pub type ShimNativeWindowId = i64;

/// Opaque display handle type expected by the EGL loader
pub type ShimEGLNativeDisplayType = *mut c_void;

/// Opaque native window handle type expected by the EGL loader
pub type ShimEGLNativeWindowType = *mut c_void;
