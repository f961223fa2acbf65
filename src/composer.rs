//! Compositor client connection
//!
//! Safe wrappers around the compositor service the shim consumes: connect,
//! health check, surface allocation, and the global transaction that applies
//! layer/position changes atomically.
//!
//! The compositor transport is inherently multi-threaded: the service must be
//! able to deliver traffic concurrently with the caller's synchronous calls,
//! so the connection keeps a small worker pool running for its whole life.
//! Requests travel over a channel to the workers and every client call blocks
//! on its reply, which keeps the boundary API fully synchronous.

use crate::ffi::{StatusT, DEAD_OBJECT, NO_ERROR};
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

/// Transport worker threads kept alive per connection
const TRANSPORT_THREADS: usize = 2;

/// Environment knob forcing the health check to report a given status
const COMPOSER_STATUS_ENV: &str = "SHIM_COMPOSER_STATUS";

/// Native window record backing a compositor surface.
///
/// The compositor side owns this allocation. `SurfaceControl::native_window`
/// hands out a raw back-reference that is valid only while the owning surface
/// is alive.
#[repr(C)]
pub struct NativeWindow {
    pub width: u32,
    pub height: u32,
    pub format: i32,
}

/// Compositor-side state for one surface
struct SurfaceState {
    native: Box<NativeWindow>,
    layer: i32,
    x: i32,
    y: i32,
}

/// One staged change inside a global transaction
enum SurfaceChange {
    SetLayer { token: u64, layer: i32 },
    SetPosition { token: u64, x: i32, y: i32 },
}

/// Raw pointer wrapper so native window references can cross the transport
/// channel.
struct SendPtr(*mut NativeWindow);
unsafe impl Send for SendPtr {}

type CreateReply = std::result::Result<(u64, SendPtr), String>;

enum Request {
    CheckHealth {
        reply: Sender<StatusT>,
    },
    CreateSurface {
        name: String,
        width: u32,
        height: u32,
        format: i32,
        reply: Sender<CreateReply>,
    },
    Commit {
        changes: Vec<SurfaceChange>,
        reply: Sender<StatusT>,
    },
    ReleaseSurface {
        token: u64,
    },
    Shutdown,
}

/// A handle to one compositor-side surface.
///
/// Dropping the control releases the surface, after which the native window
/// reference obtained from it dangles.
#[derive(Debug)]
pub struct SurfaceControl {
    token: u64,
    native: *mut NativeWindow,
    tx: Sender<Request>,
}

unsafe impl Send for SurfaceControl {}

impl SurfaceControl {
    pub fn token(&self) -> u64 {
        self.token
    }

    /// Back-reference into the compositor-owned native window.
    pub fn native_window(&self) -> *mut NativeWindow {
        self.native
    }
}

impl Drop for SurfaceControl {
    fn drop(&mut self) {
        // Transport may already be gone during teardown
        let _ = self.tx.send(Request::ReleaseSurface { token: self.token });
    }
}

/// Client side of the compositor connection.
///
/// Dropping the client shuts the transport pool down and joins the workers.
pub struct ComposerClient {
    tx: Sender<Request>,
    workers: Vec<JoinHandle<()>>,
}

impl ComposerClient {
    /// Establish the connection and start the transport worker pool.
    pub fn connect() -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let rx = Arc::new(Mutex::new(rx));
        let state = Arc::new(Mutex::new(ServiceState::new()));

        let mut workers = Vec::with_capacity(TRANSPORT_THREADS);
        for n in 0..TRANSPORT_THREADS {
            let rx = Arc::clone(&rx);
            let state = Arc::clone(&state);
            let handle = std::thread::Builder::new()
                .name(format!("composer-transport-{n}"))
                .spawn(move || transport_worker(rx, state))
                .map_err(|e| Error::Transport(e.to_string()))?;
            workers.push(handle);
        }

        info!(
            "composer connection established ({} transport threads)",
            TRANSPORT_THREADS
        );
        Ok(Self { tx, workers })
    }

    /// Explicit health probe, run immediately after connecting.
    ///
    /// A non-zero status means the service is not usable; callers must fail
    /// fast instead of keeping a half-usable connection around.
    pub fn init_check(&self) -> Result<()> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(Request::CheckHealth { reply: reply_tx })
            .map_err(|_| Error::ComposerInit(DEAD_OBJECT))?;
        let status = reply_rx
            .recv()
            .map_err(|_| Error::ComposerInit(DEAD_OBJECT))?;
        if status != NO_ERROR {
            return Err(Error::ComposerInit(status));
        }
        debug!("composer init check passed");
        Ok(())
    }

    /// Allocate a compositor surface and return the owning control.
    pub fn create_surface(
        &self,
        name: &str,
        width: u32,
        height: u32,
        format: i32,
    ) -> Result<SurfaceControl> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(Request::CreateSurface {
                name: name.to_owned(),
                width,
                height,
                format,
                reply: reply_tx,
            })
            .map_err(|_| Error::Transport("create request dropped".into()))?;
        let (token, native) = reply_rx
            .recv()
            .map_err(|_| Error::Transport("create reply dropped".into()))?
            .map_err(Error::SurfaceAlloc)?;
        Ok(SurfaceControl {
            token,
            native: native.0,
            tx: self.tx.clone(),
        })
    }

    /// Open a global transaction for staging layer/position changes.
    pub fn open_global_transaction(&self) -> GlobalTransaction<'_> {
        GlobalTransaction {
            tx: &self.tx,
            changes: Vec::new(),
            committed: false,
        }
    }
}

impl Drop for ComposerClient {
    fn drop(&mut self) {
        for _ in &self.workers {
            let _ = self.tx.send(Request::Shutdown);
        }
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        debug!("composer connection released");
    }
}

/// A batch of compositor state changes applied atomically on commit.
///
/// The compositor never observes a subset of the staged changes: they all
/// land under one service-side critical section.
pub struct GlobalTransaction<'a> {
    tx: &'a Sender<Request>,
    changes: Vec<SurfaceChange>,
    committed: bool,
}

impl GlobalTransaction<'_> {
    pub fn set_layer(&mut self, control: &SurfaceControl, layer: i32) {
        self.changes.push(SurfaceChange::SetLayer {
            token: control.token,
            layer,
        });
    }

    pub fn set_position(&mut self, control: &SurfaceControl, x: i32, y: i32) {
        self.changes.push(SurfaceChange::SetPosition {
            token: control.token,
            x,
            y,
        });
    }

    /// Apply every staged change in one step.
    pub fn commit(mut self) -> Result<()> {
        let changes = std::mem::take(&mut self.changes);
        self.committed = true;

        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(Request::Commit {
                changes,
                reply: reply_tx,
            })
            .map_err(|_| Error::Transport("commit request dropped".into()))?;
        let status = reply_rx
            .recv()
            .map_err(|_| Error::Transport("commit reply dropped".into()))?;
        if status != NO_ERROR {
            return Err(Error::Transport(format!(
                "commit failed with status {status}"
            )));
        }
        Ok(())
    }
}

impl Drop for GlobalTransaction<'_> {
    fn drop(&mut self) {
        if !self.committed && !self.changes.is_empty() {
            warn!(
                "global transaction dropped without commit, {} staged changes discarded",
                self.changes.len()
            );
        }
    }
}

/// Service-side surface table, shared by the transport workers.
struct ServiceState {
    surfaces: HashMap<u64, SurfaceState>,
    next_token: u64,
    health: StatusT,
}

impl ServiceState {
    fn new() -> Self {
        let health = std::env::var(COMPOSER_STATUS_ENV)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(NO_ERROR);
        if health != NO_ERROR {
            warn!("{} forces composer health status {}", COMPOSER_STATUS_ENV, health);
        }
        Self {
            surfaces: HashMap::new(),
            next_token: 0,
            health,
        }
    }

    fn create_surface(&mut self, name: &str, width: u32, height: u32, format: i32) -> CreateReply {
        if width == 0 || height == 0 {
            return Err(format!(
                "refusing zero-sized surface \"{name}\" ({width}x{height})"
            ));
        }

        self.next_token += 1;
        let token = self.next_token;

        let mut native = Box::new(NativeWindow {
            width,
            height,
            format,
        });
        // The box never moves inside the table, so the pointer stays stable
        // until the surface is released.
        let ptr = &mut *native as *mut NativeWindow;

        self.surfaces.insert(
            token,
            SurfaceState {
                native,
                layer: 0,
                x: 0,
                y: 0,
            },
        );
        debug!("allocated surface \"{}\" token {} ({}x{})", name, token, width, height);
        Ok((token, SendPtr(ptr)))
    }

    fn apply(&mut self, changes: Vec<SurfaceChange>) {
        for change in changes {
            match change {
                SurfaceChange::SetLayer { token, layer } => {
                    match self.surfaces.get_mut(&token) {
                        Some(surface) => surface.layer = layer,
                        None => warn!("set_layer on unknown surface {}", token),
                    }
                }
                SurfaceChange::SetPosition { token, x, y } => {
                    match self.surfaces.get_mut(&token) {
                        Some(surface) => {
                            surface.x = x;
                            surface.y = y;
                        }
                        None => warn!("set_position on unknown surface {}", token),
                    }
                }
            }
        }
    }

    fn release_surface(&mut self, token: u64) {
        if let Some(surface) = self.surfaces.remove(&token) {
            debug!(
                "released surface {} ({}x{}) at layer {} pos ({}, {})",
                token, surface.native.width, surface.native.height, surface.layer, surface.x,
                surface.y
            );
        }
    }
}

fn transport_worker(rx: Arc<Mutex<Receiver<Request>>>, state: Arc<Mutex<ServiceState>>) {
    loop {
        let request = {
            let guard = match rx.lock() {
                Ok(guard) => guard,
                Err(_) => break,
            };
            match guard.recv() {
                Ok(request) => request,
                Err(_) => break,
            }
        };

        match request {
            Request::Shutdown => break,
            Request::CheckHealth { reply } => {
                let health = state.lock().map(|s| s.health).unwrap_or(DEAD_OBJECT);
                let _ = reply.send(health);
            }
            Request::CreateSurface {
                name,
                width,
                height,
                format,
                reply,
            } => {
                let result = match state.lock() {
                    Ok(mut state) => state.create_surface(&name, width, height, format),
                    Err(_) => Err("composer state poisoned".into()),
                };
                let _ = reply.send(result);
            }
            Request::Commit { changes, reply } => {
                // All staged changes land under one lock so no caller can
                // observe a partially applied transaction.
                let status = match state.lock() {
                    Ok(mut state) => {
                        state.apply(changes);
                        NO_ERROR
                    }
                    Err(_) => DEAD_OBJECT,
                };
                let _ = reply.send(status);
            }
            Request::ReleaseSurface { token } => {
                if let Ok(mut state) = state.lock() {
                    state.release_surface(token);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ffi::PIXEL_FORMAT_BGRA_8888;

    #[test]
    fn connect_passes_init_check() {
        let client = ComposerClient::connect().unwrap();
        client.init_check().unwrap();
    }

    #[test]
    fn created_surface_exposes_native_window() {
        let client = ComposerClient::connect().unwrap();
        let control = client
            .create_surface("test", 640, 480, PIXEL_FORMAT_BGRA_8888)
            .unwrap();

        let native = control.native_window();
        assert!(!native.is_null());
        unsafe {
            assert_eq!((*native).width, 640);
            assert_eq!((*native).height, 480);
            assert_eq!((*native).format, PIXEL_FORMAT_BGRA_8888);
        }
    }

    #[test]
    fn zero_sized_surface_is_rejected() {
        let client = ComposerClient::connect().unwrap();
        let err = client
            .create_surface("test", 0, 480, PIXEL_FORMAT_BGRA_8888)
            .unwrap_err();
        assert!(matches!(err, Error::SurfaceAlloc(_)));
    }

    #[test]
    fn transaction_commit_succeeds() {
        let client = ComposerClient::connect().unwrap();
        let control = client
            .create_surface("test", 320, 240, PIXEL_FORMAT_BGRA_8888)
            .unwrap();

        let mut txn = client.open_global_transaction();
        txn.set_layer(&control, 7);
        txn.set_position(&control, 100, 200);
        txn.commit().unwrap();
    }

    #[test]
    fn tokens_are_unique_per_connection() {
        let client = ComposerClient::connect().unwrap();
        let a = client
            .create_surface("a", 32, 32, PIXEL_FORMAT_BGRA_8888)
            .unwrap();
        let b = client
            .create_surface("b", 32, 32, PIXEL_FORMAT_BGRA_8888)
            .unwrap();
        assert_ne!(a.token(), b.token());
    }
}
