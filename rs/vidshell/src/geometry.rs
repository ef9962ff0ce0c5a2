use std::fmt;
use std::sync::Arc;

use crate::{NegotiationTarget, OverlayContext};

/// A rectangle in surface-local coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
	pub x: i32,
	pub y: i32,
	pub width: i32,
	pub height: i32,
}

impl Rect {
	pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
		Self { x, y, width, height }
	}

	pub fn is_empty(&self) -> bool {
		self.width <= 0 || self.height <= 0
	}
}

impl fmt::Display for Rect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
	}
}

/// The in-flight geometry change, if any.
#[derive(Default)]
enum Bracket {
	#[default]
	Idle,

	// Holds the renderer that received `begin`, so `end` goes to the same one.
	ChangePending(NegotiationTarget),
}

/// Brackets surface resizes for asynchronous display backends.
///
/// Driven from the UI thread: [GeometryNegotiator::about_to_paint] when a frame
/// is about to be drawn and [GeometryNegotiator::paint_completed] once that frame
/// was submitted. At most one change is in flight; the renderer sees the size
/// of the frame it is about to render, never one computed mid-frame.
pub struct GeometryNegotiator {
	context: Arc<OverlayContext>,
	bracket: Bracket,
}

impl GeometryNegotiator {
	pub fn new(context: Arc<OverlayContext>) -> Self {
		Self {
			context,
			bracket: Bracket::Idle,
		}
	}

	pub fn is_pending(&self) -> bool {
		matches!(self.bracket, Bracket::ChangePending(_))
	}

	/// The video surface is about to be painted with the given allocation.
	pub fn about_to_paint(&mut self, rect: Rect) {
		// Cached even without a renderer, so the next window handle request uses it.
		self.context.set_rect(rect);

		if !self.context.backend().negotiates_geometry() || self.is_pending() {
			return;
		}

		let targets = self.context.targets();
		let (Some(negotiable), Some(overlay)) = (targets.negotiable, targets.overlay) else {
			return;
		};

		tracing::debug!(%rect, "begin geometry change");
		negotiable.begin_geometry_change();
		overlay.set_render_rectangle(rect);

		self.bracket = Bracket::ChangePending(negotiable);
	}

	/// The frame started by the last [GeometryNegotiator::about_to_paint] was submitted.
	pub fn paint_completed(&mut self) {
		if let Bracket::ChangePending(negotiable) = std::mem::take(&mut self.bracket) {
			tracing::debug!("end geometry change");
			negotiable.end_geometry_change();
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::mock::{Call, MockRenderer};
	use crate::{Backend, BusMessage, DisplayHandle, Handles, Interceptor, WindowHandle};

	fn wayland() -> (Interceptor, GeometryNegotiator) {
		let context = Arc::new(OverlayContext::new(Backend::Wayland));
		let handles = Handles::asynchronous(DisplayHandle::new(0xd15).unwrap(), WindowHandle::new(0x1234).unwrap());
		context.handles().set(handles).unwrap();

		(Interceptor::new(context.clone()), GeometryNegotiator::new(context))
	}

	// Let `sink` answer both handle requests, then forget those calls.
	fn attach(interceptor: &Interceptor, sink: &Arc<MockRenderer>) {
		interceptor.intercept(BusMessage::NeedDisplayContext(sink.clone()));
		interceptor.intercept(BusMessage::PrepareWindowHandle(sink.clone()));
		sink.clear();
	}

	#[test]
	fn bracket_resize() {
		let (interceptor, mut negotiator) = wayland();
		let sink = MockRenderer::new();
		attach(&interceptor, &sink);

		negotiator.about_to_paint(Rect::new(0, 0, 320, 240));
		assert!(negotiator.is_pending());
		assert_eq!(
			sink.calls(),
			vec![
				Call::BeginGeometryChange,
				Call::SetRenderRectangle(Rect::new(0, 0, 320, 240))
			]
		);

		negotiator.paint_completed();
		assert!(!negotiator.is_pending());
		assert_eq!(sink.count(Call::EndGeometryChange), 1);

		// A second completion in the same cycle does nothing.
		negotiator.paint_completed();
		assert_eq!(sink.count(Call::EndGeometryChange), 1);
	}

	#[test]
	fn no_double_open() {
		let (interceptor, mut negotiator) = wayland();
		let sink = MockRenderer::new();
		attach(&interceptor, &sink);

		negotiator.about_to_paint(Rect::new(0, 0, 320, 240));
		negotiator.about_to_paint(Rect::new(0, 0, 640, 480));
		assert_eq!(sink.count(Call::BeginGeometryChange), 1);
		assert_eq!(sink.count(Call::SetRenderRectangle(Rect::new(0, 0, 640, 480))), 0);

		// The newer size is still remembered.
		assert_eq!(interceptor.context().targets().rect, Some(Rect::new(0, 0, 640, 480)));

		negotiator.paint_completed();
		negotiator.about_to_paint(Rect::new(0, 0, 640, 480));
		assert_eq!(sink.count(Call::BeginGeometryChange), 2);
		assert_eq!(sink.count(Call::SetRenderRectangle(Rect::new(0, 0, 640, 480))), 1);
	}

	#[test]
	fn completion_while_idle() {
		let (interceptor, mut negotiator) = wayland();
		let sink = MockRenderer::new();
		attach(&interceptor, &sink);

		negotiator.paint_completed();
		assert!(!negotiator.is_pending());
		assert!(sink.calls().is_empty());
	}

	#[test]
	fn begin_and_end_alternate() {
		let (interceptor, mut negotiator) = wayland();
		let sink = MockRenderer::new();
		attach(&interceptor, &sink);

		// An irregular interleaving of paint and completion events.
		let events = [true, true, false, false, true, false, true, true, true, false];
		for (i, paint) in events.into_iter().enumerate() {
			match paint {
				true => negotiator.about_to_paint(Rect::new(0, 0, 100 + i as i32, 100)),
				false => negotiator.paint_completed(),
			}
		}

		let brackets: Vec<Call> = sink
			.calls()
			.into_iter()
			.filter(|call| matches!(call, Call::BeginGeometryChange | Call::EndGeometryChange))
			.collect();

		assert_eq!(
			brackets,
			vec![
				Call::BeginGeometryChange,
				Call::EndGeometryChange,
				Call::BeginGeometryChange,
				Call::EndGeometryChange,
				Call::BeginGeometryChange,
				Call::EndGeometryChange,
			]
		);
	}

	#[test]
	fn rect_cached_without_target() {
		let (interceptor, mut negotiator) = wayland();

		negotiator.about_to_paint(Rect::new(0, 0, 800, 600));
		assert!(!negotiator.is_pending());

		// The window handle request picks up the freshest size.
		let sink = MockRenderer::new();
		interceptor.intercept(BusMessage::PrepareWindowHandle(sink.clone()));
		assert_eq!(
			sink.calls(),
			vec![
				Call::SetWindowHandle(0x1234),
				Call::SetRenderRectangle(Rect::new(0, 0, 800, 600))
			]
		);
	}

	#[test]
	fn needs_both_targets() {
		let (interceptor, mut negotiator) = wayland();
		let sink = MockRenderer::new();

		// Only the window handle was requested, nothing to negotiate with.
		interceptor.intercept(BusMessage::PrepareWindowHandle(sink.clone()));
		sink.clear();

		negotiator.about_to_paint(Rect::new(0, 0, 320, 240));
		assert!(!negotiator.is_pending());
		assert!(sink.calls().is_empty());
	}

	#[test]
	fn end_goes_to_the_renderer_that_began() {
		let (interceptor, mut negotiator) = wayland();
		let first = MockRenderer::new();
		attach(&interceptor, &first);

		negotiator.about_to_paint(Rect::new(0, 0, 320, 240));

		// The pipeline restarts mid-frame and a new sink shows up.
		let second = MockRenderer::new();
		attach(&interceptor, &second);

		negotiator.paint_completed();
		assert_eq!(first.count(Call::EndGeometryChange), 1);
		assert_eq!(second.count(Call::EndGeometryChange), 0);

		negotiator.about_to_paint(Rect::new(0, 0, 320, 240));
		assert_eq!(second.count(Call::BeginGeometryChange), 1);
	}

	#[test]
	fn synchronous_backend_never_negotiates() {
		let context = Arc::new(OverlayContext::new(Backend::X11));
		context
			.handles()
			.set(Handles::synchronous(WindowHandle::new(0x1234).unwrap()))
			.unwrap();

		let interceptor = Interceptor::new(context.clone());
		let mut negotiator = GeometryNegotiator::new(context.clone());

		let sink = MockRenderer::new();
		attach(&interceptor, &sink);

		negotiator.about_to_paint(Rect::new(0, 0, 320, 240));
		negotiator.paint_completed();

		assert!(sink.calls().is_empty());
		assert_eq!(context.targets().rect, Some(Rect::new(0, 0, 320, 240)));
	}

	#[test]
	fn bus_thread_and_ui_thread() {
		let (interceptor, mut negotiator) = wayland();
		let sink = MockRenderer::new();

		let bus = {
			let sink = sink.clone();
			std::thread::spawn(move || {
				for _ in 0..100 {
					interceptor.intercept(BusMessage::NeedDisplayContext(sink.clone()));
					interceptor.intercept(BusMessage::PrepareWindowHandle(sink.clone()));
				}
			})
		};

		for i in 0..100 {
			negotiator.about_to_paint(Rect::new(0, 0, 100 + i, 100));
			negotiator.paint_completed();
		}

		bus.join().unwrap();

		let begins = sink.count(Call::BeginGeometryChange);
		let ends = sink.count(Call::EndGeometryChange);
		assert_eq!(begins, ends);
		assert_eq!(sink.count(Call::SetWindowHandle(0x1234)), 100);
	}

	#[test]
	fn rect_display() {
		assert_eq!(Rect::new(1, 2, 320, 240).to_string(), "320x240+1+2");
		assert!(Rect::new(0, 0, 0, 240).is_empty());
		assert!(!Rect::new(0, 0, 1, 1).is_empty());
	}
}
