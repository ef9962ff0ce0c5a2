use std::fmt;

use crate::{NegotiationTarget, OverlayTarget};

/// A pipeline control message, as far as window binding is concerned.
///
/// Pipelines classify their native messages into this type before calling
/// [crate::Interceptor::intercept]; everything unrelated becomes [BusMessage::Other].
pub enum BusMessage {
	/// The renderer wants the application's display connection.
	NeedDisplayContext(NegotiationTarget),

	/// The renderer is about to create a window unless it is given one.
	PrepareWindowHandle(OverlayTarget),

	/// Anything else, left for the default dispatcher.
	Other,
}

impl BusMessage {
	pub fn kind(&self) -> &'static str {
		match self {
			Self::NeedDisplayContext(_) => "need-display-context",
			Self::PrepareWindowHandle(_) => "prepare-window-handle",
			Self::Other => "other",
		}
	}
}

impl fmt::Debug for BusMessage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.kind())
	}
}

/// What the bus should do with a message after interception.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reply {
	/// Hand the message on to the default dispatcher.
	Pass,

	/// The message was fully handled and must not be seen by anyone else.
	Drop,
}
