//! End-to-end exercise of the C boundary API.
//!
//! The boundary wraps one process-wide session, so the whole flow lives in a
//! single test to keep an explicit ordering.

use surface_composer_shim::c_api::*;
use surface_composer_shim::ffi::{SHIM_WINDOW_HEIGHT, SHIM_WINDOW_WIDTH};
use surface_composer_shim::SURFACE_ID_BASE;

#[test]
fn boundary_api_lifecycle() {
    // Terminate with no session is a successful no-op.
    assert!(ShimTerminate());

    assert!(ShimInitialize());
    // Idempotent: no second session, still success.
    assert!(ShimInitialize());

    let first = ShimCreateWindow(0, 0, 800, 600);
    assert_eq!(first, SURFACE_ID_BASE + 1);
    let second = ShimCreateWindow(100, 100, 320, 240);
    assert_eq!(second, SURFACE_ID_BASE + 2);

    unsafe {
        let mut value = 0;
        assert!(ShimQueryWindow(first, SHIM_WINDOW_WIDTH, &mut value));
        assert_eq!(value, 800);
        assert!(ShimQueryWindow(first, SHIM_WINDOW_HEIGHT, &mut value));
        assert_eq!(value, 600);
        assert!(ShimQueryWindow(second, SHIM_WINDOW_WIDTH, &mut value));
        assert_eq!(value, 320);

        // Unsupported attribute: failure, output untouched.
        let mut untouched = -7;
        assert!(!ShimQueryWindow(first, 99, &mut untouched));
        assert_eq!(untouched, -7);

        // Unknown id: failure, output untouched.
        assert!(!ShimQueryWindow(424242, SHIM_WINDOW_WIDTH, &mut untouched));
        assert_eq!(untouched, -7);
    }

    let window = ShimGetNativeWindow(second);
    assert!(!window.is_null());
    assert!(ShimGetNativeWindow(424242).is_null());

    // Native window references are owned by their surface; release is a
    // documented no-op that still reports success.
    assert!(ShimReleaseNativeWindow(window));

    // Destroy really removes the surface.
    assert!(ShimDestroyWindow(first));
    assert!(ShimGetNativeWindow(first).is_null());
    assert!(!ShimDestroyWindow(first));

    assert!(ShimTerminate());

    // After terminate the session is gone; lookups fail cleanly.
    assert!(ShimGetNativeWindow(second).is_null());
    unsafe {
        let mut value = 0;
        assert!(!ShimQueryWindow(second, SHIM_WINDOW_WIDTH, &mut value));
    }
    assert_eq!(ShimCreateWindow(0, 0, 64, 64), 0);

    // And a fresh session starts the id sequence over.
    assert!(ShimInitialize());
    assert_eq!(ShimCreateWindow(0, 0, 64, 64), SURFACE_ID_BASE + 1);
    assert!(ShimTerminate());
}
