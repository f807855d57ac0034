//! gpui_guideplot hosts several independent interactive plot surfaces in one
//! process. Each surface owns its guide values and drawing context, and all
//! drawing goes through the single active-context token, so surfaces never
//! draw into each other.

#![forbid(unsafe_code)]

pub mod backend;
pub mod context;
pub mod error;
pub mod frame;
pub mod geom;
pub mod guide;
pub mod interaction;
pub mod overlay;
pub mod render;
pub mod signal;
pub mod surface;
pub mod tick;
pub mod transform;
pub mod view;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use backend::{FrameBackend, RecordedFrame, RecordingBackend};
pub use context::{ActiveContext, ContextEvent, ContextHandle, ContextId, ContextManager};
pub use error::{ContextError, SubmitError, SurfaceError};
pub use frame::PanelLayout;
pub use geom::{Point, ScreenPoint, ScreenRect};
pub use guide::{GuideAxis, GuideId, GuideState};
pub use interaction::{
    InteractionState, PointerEvent, checkbox, drag_line_x, drag_line_y, fit_guides, navigate,
};
pub use overlay::GuideOverlay;
pub use render::{
    Color, LineSegment, LineStyle, RectStyle, RenderCommand, RenderList, TextStyle,
    build_line_segments,
};
pub use signal::{generate, generate_into};
pub use surface::{Surface, SurfaceConfig, SurfaceId, SurfaceState, TickOutcome};
pub use tick::TickScheduler;
pub use transform::Transform;
pub use view::{Range, Viewport, ViewportSize};

#[cfg(feature = "gpui")]
pub use gpui_backend::{GpuiSurfaceView, SurfaceHandle, spawn_tick_loop};
