//! GPUI integration for gpui_guideplot.
//!
//! This module provides a GPUI view that hosts a [`Surface`](crate::surface::Surface),
//! forwards mouse input to it, and paints the frames it submits. A tick loop
//! driven by a shared [`TickScheduler`](crate::tick::TickScheduler) asks each
//! view to redraw when its surface is due.

mod paint;
mod view;

pub use view::{GpuiSurfaceView, SurfaceHandle, spawn_tick_loop};
