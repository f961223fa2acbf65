//! Failed init-check path.
//!
//! Runs as its own process so forcing the composer health status through the
//! environment cannot leak into the other tests.

use surface_composer_shim::c_api::{ShimCreateWindow, ShimGetNativeWindow, ShimInitialize};
use surface_composer_shim::{Error, ShimConfig, ShimSession};

#[test]
fn unhealthy_composer_fails_fast() {
    std::env::set_var("SHIM_COMPOSER_STATUS", "-32");

    match ShimSession::new(ShimConfig::default()) {
        Err(Error::ComposerInit(status)) => assert_eq!(status, -32),
        other => panic!("expected ComposerInit error, got {:?}", other.map(|_| ())),
    }

    // The boundary reports the failure and leaves no session behind.
    assert!(!ShimInitialize());
    assert_eq!(ShimCreateWindow(0, 0, 800, 600), 0);
    assert!(ShimGetNativeWindow(500001).is_null());
}
