//! Error types for the surface composer shim

use crate::ffi::StatusT;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("composer init check failed with status {0}")]
    ComposerInit(StatusT),

    #[error("surface allocation failed: {0}")]
    SurfaceAlloc(String),

    #[error("no surface with id {0}")]
    SurfaceNotFound(i64),

    #[error("unsupported window attribute {0}")]
    UnsupportedAttribute(i32),

    #[error("composer transport error: {0}")]
    Transport(String),
}
