use crate::PlaybackState;

/// Errors surfaced by the overlay glue and the pipeline boundary.
///
/// Nothing in the binding path is fatal; these only reach callers that asked for a result.
#[derive(thiserror::Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
	/// The surface handles were already registered.
	#[error("surface already realized")]
	AlreadyRealized,

	/// The pipeline refused a state change.
	#[error("failed to change state to {state}")]
	StateChange { state: PlaybackState },
}

pub type Result<T> = std::result::Result<T, Error>;
