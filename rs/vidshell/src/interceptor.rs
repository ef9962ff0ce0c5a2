use std::sync::Arc;

use crate::{BusMessage, NegotiationTarget, OverlayContext, OverlayTarget, Reply};

/// Synchronous filter for pipeline control messages.
///
/// Called on whatever thread the pipeline posts messages from, before the
/// default dispatcher runs on the UI thread. Must not touch UI toolkit APIs.
#[derive(Clone)]
pub struct Interceptor {
	context: Arc<OverlayContext>,
}

impl Interceptor {
	pub fn new(context: Arc<OverlayContext>) -> Self {
		Self { context }
	}

	pub fn context(&self) -> &Arc<OverlayContext> {
		&self.context
	}

	/// Handle a message, returning whether the bus should still dispatch it.
	///
	/// Handle requests are always dropped, even when no handle is available:
	/// letting them through would let the renderer open its own top-level window.
	pub fn intercept(&self, message: BusMessage) -> Reply {
		match message {
			BusMessage::NeedDisplayContext(source) => {
				self.provide_display(source);
				Reply::Drop
			}
			BusMessage::PrepareWindowHandle(source) => {
				self.provide_window(source);
				Reply::Drop
			}
			BusMessage::Other => {
				tracing::trace!("passing message to default dispatch");
				Reply::Pass
			}
		}
	}

	fn provide_display(&self, source: NegotiationTarget) {
		let Some(handle) = self.context.handles().display() else {
			// The renderer falls back to a private display connection.
			tracing::warn!(backend = %self.context.backend(), "display context requested before the surface was realized");
			return;
		};

		source.set_display_context(handle);
		self.context.bind_negotiable(source);

		tracing::debug!(display = %handle, "provided display context");
	}

	fn provide_window(&self, source: OverlayTarget) {
		let Some(window) = self.context.handles().window() else {
			// The renderer falls back to a default top-level window.
			tracing::warn!(backend = %self.context.backend(), "window handle requested before the surface was realized");
			return;
		};

		// The source may be a container rather than the sink; whichever asked last wins.
		let rect = self.context.bind_overlay(source.clone());
		source.set_window_handle(window);

		if self.context.backend().negotiates_geometry() {
			match rect {
				Some(rect) => {
					tracing::debug!(%window, %rect, "provided window handle and geometry");
					source.set_render_rectangle(rect);
				}
				None => tracing::debug!(%window, "provided window handle, geometry not known yet"),
			}
		} else {
			tracing::debug!(%window, "provided window handle");
		}
	}
}
