//! Per-window surface handle

use crate::composer::{NativeWindow, SurfaceControl};

/// Pairs a compositor surface with the dimensions it was created at.
///
/// The handle owns the `SurfaceControl`; the native window reference it hands
/// out is a back-pointer into connection-owned memory and stays valid only
/// while this handle is alive.
#[derive(Debug)]
pub struct ShimSurface {
    control: SurfaceControl,
    width: u32,
    height: u32,
}

impl ShimSurface {
    pub fn new(control: SurfaceControl, width: u32, height: u32) -> Self {
        Self {
            control,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn native_window(&self) -> *mut NativeWindow {
        self.control.native_window()
    }
}
