use std::fmt;

use crate::Result;

/// The states a pipeline can be asked to reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaybackState {
	/// Stopped, all resources released.
	Null,
	Ready,
	Paused,
	Playing,
}

impl fmt::Display for PlaybackState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Null => "null",
			Self::Ready => "ready",
			Self::Paused => "paused",
			Self::Playing => "playing",
		})
	}
}

/// The media pipeline, as seen from the UI.
pub trait Pipeline {
	/// Ask the pipeline to move to `state`.
	///
	/// Must not block waiting for the transition to finish.
	fn request_state(&self, state: PlaybackState) -> Result<()>;
}

/// Turns play/pause/stop clicks into pipeline state requests.
///
/// Requests are fire-and-forget; a refusal is logged and the UI carries on.
pub struct PlaybackController<P> {
	pipeline: P,
}

impl<P: Pipeline> PlaybackController<P> {
	pub fn new(pipeline: P) -> Self {
		Self { pipeline }
	}

	pub fn pipeline(&self) -> &P {
		&self.pipeline
	}

	pub fn play(&self) {
		self.request(PlaybackState::Playing)
	}

	pub fn pause(&self) {
		self.request(PlaybackState::Paused)
	}

	pub fn stop(&self) {
		self.request(PlaybackState::Null)
	}

	fn request(&self, state: PlaybackState) {
		tracing::info!(%state, "requesting state");
		if let Err(err) = self.pipeline.request_state(state) {
			tracing::warn!(%err, %state, "state change refused");
		}
	}
}

impl<P: Pipeline + ?Sized> Pipeline for Box<P> {
	fn request_state(&self, state: PlaybackState) -> Result<()> {
		(**self).request_state(state)
	}
}
