use std::sync::Arc;

use parking_lot::Mutex;

use crate::{DisplayHandle, GeometryNegotiable, Rect, WindowHandle, WindowBindable};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
	SetWindowHandle(usize),
	SetRenderRectangle(Rect),
	SetDisplayContext(usize),
	BeginGeometryChange,
	EndGeometryChange,
}

/// A renderer that records every call made on it.
#[derive(Default)]
pub struct MockRenderer {
	calls: Mutex<Vec<Call>>,
}

impl MockRenderer {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn calls(&self) -> Vec<Call> {
		self.calls.lock().clone()
	}

	pub fn count(&self, call: Call) -> usize {
		self.calls.lock().iter().filter(|c| **c == call).count()
	}

	pub fn clear(&self) {
		self.calls.lock().clear();
	}

	fn record(&self, call: Call) {
		self.calls.lock().push(call);
	}
}

impl WindowBindable for MockRenderer {
	fn set_window_handle(&self, handle: WindowHandle) {
		self.record(Call::SetWindowHandle(handle.get()));
	}

	fn set_render_rectangle(&self, rect: Rect) {
		self.record(Call::SetRenderRectangle(rect));
	}
}

impl GeometryNegotiable for MockRenderer {
	fn set_display_context(&self, display: DisplayHandle) {
		self.record(Call::SetDisplayContext(display.get()));
	}

	fn begin_geometry_change(&self) {
		self.record(Call::BeginGeometryChange);
	}

	fn end_geometry_change(&self) {
		self.record(Call::EndGeometryChange);
	}
}
