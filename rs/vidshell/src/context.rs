use parking_lot::Mutex;

use crate::{Backend, HandleRegistry, NegotiationTarget, OverlayTarget, Rect};

/// State shared between the UI thread and the pipeline's bus thread.
///
/// Thread affinity per field:
/// - `handles`: written once on the UI thread at realization, read anywhere.
/// - `targets`: written by the bus thread on every handle request, read by the UI thread on every paint.
/// - `rect`: written by the UI thread on every paint, read by the bus thread on every handle request.
///
/// The lock is never held while calling into a renderer; targets are cloned out first.
pub struct OverlayContext {
	backend: Backend,
	handles: HandleRegistry,
	shared: Mutex<Shared>,
}

#[derive(Default)]
struct Shared {
	// The most recent source of a "prepare window handle" request.
	overlay: Option<OverlayTarget>,

	// The most recent source of a "need display context" request.
	negotiable: Option<NegotiationTarget>,

	// The last known allocation of the video surface.
	rect: Option<Rect>,
}

/// A consistent copy of the shared fields.
#[derive(Clone, Default)]
pub struct Targets {
	pub overlay: Option<OverlayTarget>,
	pub negotiable: Option<NegotiationTarget>,
	pub rect: Option<Rect>,
}

impl OverlayContext {
	pub fn new(backend: Backend) -> Self {
		Self {
			backend,
			handles: HandleRegistry::new(),
			shared: Mutex::new(Shared::default()),
		}
	}

	pub fn backend(&self) -> Backend {
		self.backend
	}

	pub fn handles(&self) -> &HandleRegistry {
		&self.handles
	}

	/// Rebind the overlay target, returning the cached rectangle for the new target.
	pub fn bind_overlay(&self, overlay: OverlayTarget) -> Option<Rect> {
		let mut shared = self.shared.lock();
		shared.overlay = Some(overlay);
		shared.rect
	}

	pub fn bind_negotiable(&self, negotiable: NegotiationTarget) {
		self.shared.lock().negotiable = Some(negotiable);
	}

	pub fn set_rect(&self, rect: Rect) {
		self.shared.lock().rect = Some(rect);
	}

	pub fn targets(&self) -> Targets {
		let shared = self.shared.lock();
		Targets {
			overlay: shared.overlay.clone(),
			negotiable: shared.negotiable.clone(),
			rect: shared.rect,
		}
	}

	/// Forget both targets, for when the pipeline is torn down.
	pub fn unbind(&self) {
		let mut shared = self.shared.lock();
		shared.overlay = None;
		shared.negotiable = None;
	}
}
