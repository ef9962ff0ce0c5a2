use std::sync::Arc;

use crate::{DisplayHandle, Rect, WindowHandle};

/// A renderer element that can draw into an externally supplied window.
///
/// Implemented by whatever element posted the "prepare window handle" request.
/// That may be the sink itself or a container that forwards to it.
pub trait WindowBindable: Send + Sync {
	/// Render into the given window instead of creating one.
	fn set_window_handle(&self, handle: WindowHandle);

	/// Restrict rendering to this area of the window.
	fn set_render_rectangle(&self, rect: Rect);
}

/// A renderer element speaking an asynchronous display protocol.
///
/// Resizes are bracketed by [GeometryNegotiable::begin_geometry_change] and
/// [GeometryNegotiable::end_geometry_change], so the renderer never submits a buffer
/// sized for a surface the compositor no longer agrees with.
pub trait GeometryNegotiable: Send + Sync {
	/// Share the application's display connection instead of opening a private one.
	fn set_display_context(&self, display: DisplayHandle);

	fn begin_geometry_change(&self);
	fn end_geometry_change(&self);
}

/// The element currently bound to the window.
pub type OverlayTarget = Arc<dyn WindowBindable>;

/// The element currently negotiating surface geometry.
pub type NegotiationTarget = Arc<dyn GeometryNegotiable>;

/// The kind of display protocol the window lives on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Backend {
	/// X11: the window id is bound directly, no negotiation.
	X11,

	/// Wayland: a display context is shared and resizes are bracketed.
	Wayland,
}

impl Backend {
	/// Whether surface resizes need a begin/end handshake with the renderer.
	pub fn negotiates_geometry(self) -> bool {
		matches!(self, Self::Wayland)
	}

	pub fn name(self) -> &'static str {
		match self {
			Self::X11 => "X11",
			Self::Wayland => "Wayland",
		}
	}
}

impl std::fmt::Display for Backend {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}
