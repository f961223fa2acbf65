//! Process session owning the composer connection and surface table

use crate::composer::ComposerClient;
use crate::config::ShimConfig;
use crate::ffi::PIXEL_FORMAT_BGRA_8888;
use crate::surface::ShimSurface;
use crate::{Error, Result};
use std::collections::HashMap;
use tracing::{debug, info};

/// Generated window ids start above this base so they cannot collide with
/// the ids the host window system assigns to other on-screen surfaces.
pub const SURFACE_ID_BASE: i64 = 500_000;

/// Surface name reported to the compositor's debugging tools
const SURFACE_NAME: &str = "shim";

/// One compositor connection plus the id-keyed table of created surfaces.
///
/// Ids are assigned by pre-incrementing a counter seeded at
/// [`SURFACE_ID_BASE`], so the first id is 500001, ids are strictly
/// increasing, never reused, and the boundary sentinel 0 is never issued.
pub struct ShimSession {
    // Declared before the client so surfaces release while the transport
    // is still running.
    surfaces: HashMap<i64, ShimSurface>,
    client: ComposerClient,
    config: ShimConfig,
    next_id: i64,
}

impl ShimSession {
    /// Connect to the compositor and verify the connection is healthy.
    pub fn new(config: ShimConfig) -> Result<Self> {
        let client = ComposerClient::connect()?;
        client.init_check()?;
        info!("compositor session established");
        Ok(Self {
            surfaces: HashMap::new(),
            client,
            config,
            next_id: SURFACE_ID_BASE,
        })
    }

    /// Allocate a BGRA8888 surface, place it, and return its id.
    ///
    /// Stacking order and position are applied inside one global transaction
    /// so the compositor never sees the position without the layer.
    pub fn create_surface(
        &mut self,
        left: i32,
        top: i32,
        width: u32,
        height: u32,
    ) -> Result<i64> {
        let (width, height) = self.config.apply(width, height);

        let control =
            self.client
                .create_surface(SURFACE_NAME, width, height, PIXEL_FORMAT_BGRA_8888)?;

        self.next_id += 1;
        let id = self.next_id;

        // Stacking layers are i32 on the compositor side.
        let layer = i32::try_from(id)
            .map_err(|_| Error::SurfaceAlloc(format!("surface id {id} out of layer range")))?;

        let mut txn = self.client.open_global_transaction();
        txn.set_layer(&control, layer);
        txn.set_position(&control, left, top);
        txn.commit()?;

        self.surfaces.insert(id, ShimSurface::new(control, width, height));
        debug!(
            "surface {} created at ({}, {}) size {}x{}",
            id, left, top, width, height
        );
        Ok(id)
    }

    /// Look up a surface by id.
    pub fn surface(&self, id: i64) -> Result<&ShimSurface> {
        self.surfaces.get(&id).ok_or(Error::SurfaceNotFound(id))
    }

    /// Remove a surface and release its compositor resources.
    pub fn destroy_surface(&mut self, id: i64) -> Result<()> {
        match self.surfaces.remove(&id) {
            Some(_surface) => {
                debug!("surface {} destroyed", id);
                Ok(())
            }
            None => Err(Error::SurfaceNotFound(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ShimSession {
        ShimSession::new(ShimConfig::default()).unwrap()
    }

    #[test]
    fn ids_start_above_base_and_increase() {
        let mut session = session();
        let first = session.create_surface(0, 0, 800, 600).unwrap();
        let second = session.create_surface(100, 100, 320, 240).unwrap();
        assert_eq!(first, SURFACE_ID_BASE + 1);
        assert_eq!(second, SURFACE_ID_BASE + 2);
        assert!(second > first);
    }

    #[test]
    fn surface_reports_requested_dimensions() {
        let mut session = session();
        let id = session.create_surface(10, 20, 1024, 768).unwrap();
        let surface = session.surface(id).unwrap();
        assert_eq!(surface.width(), 1024);
        assert_eq!(surface.height(), 768);
        assert!(!surface.native_window().is_null());
    }

    #[test]
    fn overrides_win_over_caller_dimensions() {
        let config = ShimConfig {
            width_override: Some(1440),
            height_override: Some(2560),
        };
        let mut session = ShimSession::new(config).unwrap();
        let id = session.create_surface(0, 0, 800, 600).unwrap();
        let surface = session.surface(id).unwrap();
        assert_eq!(surface.width(), 1440);
        assert_eq!(surface.height(), 2560);
    }

    #[test]
    fn unknown_id_is_an_explicit_error() {
        let session = session();
        let err = session.surface(12345).unwrap_err();
        assert!(matches!(err, Error::SurfaceNotFound(12345)));
    }

    #[test]
    fn destroy_removes_the_surface() {
        let mut session = session();
        let id = session.create_surface(0, 0, 64, 64).unwrap();
        session.destroy_surface(id).unwrap();
        assert!(session.surface(id).is_err());

        let err = session.destroy_surface(id).unwrap_err();
        assert!(matches!(err, Error::SurfaceNotFound(_)));
    }

    #[test]
    fn id_beyond_layer_range_is_rejected() {
        let mut session = session();
        session.next_id = i64::from(i32::MAX);
        let err = session.create_surface(0, 0, 64, 64).unwrap_err();
        assert!(matches!(err, Error::SurfaceAlloc(_)));
        assert!(session.surface(i64::from(i32::MAX) + 1).is_err());
    }

    #[test]
    fn destroyed_ids_are_never_reissued() {
        let mut session = session();
        let first = session.create_surface(0, 0, 64, 64).unwrap();
        session.destroy_surface(first).unwrap();
        let second = session.create_surface(0, 0, 64, 64).unwrap();
        assert_eq!(second, first + 1);
    }
}
