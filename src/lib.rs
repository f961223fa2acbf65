//! EGL platform shim for a compositor service
//!
//! This library lets an EGL/GLES loader create and query native on-screen
//! window surfaces through a compositor service without linking against the
//! compositor's client-library types. The boundary is a small C-style
//! function table; internally the shim owns one compositor connection and a
//! table of surface handles keyed by monotonically increasing ids.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              EGL / GLES loader                  │
//! └─────────────────────────────────────────────────┘
//!                        │
//!          C boundary API (ShimCreateWindow, ...)
//!                        │
//! ┌─────────────────────────────────────────────────┐
//! │            surface-composer-shim                │
//! │  ┌─────────────┐  ┌──────────────────────────┐  │
//! │  │ ShimSession │  │ ComposerClient           │  │
//! │  │ (id table)  │  │ (connection + transport) │  │
//! │  └─────────────┘  └──────────────────────────┘  │
//! └─────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────┐
//! │              Compositor service                 │
//! │   (surface allocation, stacking, placement)     │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use surface_composer_shim::{ShimConfig, ShimSession};
//!
//! let mut session = ShimSession::new(ShimConfig::from_env())?;
//! let id = session.create_surface(0, 0, 800, 600)?;
//! let window = session.surface(id)?.native_window();
//! // Hand window to the EGL windowing binding...
//! ```

pub mod c_api;
pub mod composer;
pub mod config;
pub mod error;
pub mod ffi;
pub mod session;
pub mod surface;

pub use config::ShimConfig;
pub use error::Error;
pub use session::{ShimSession, SURFACE_ID_BASE};
pub use surface::ShimSurface;

/// Result type for this crate
pub type Result<T> = std::result::Result<T, Error>;
