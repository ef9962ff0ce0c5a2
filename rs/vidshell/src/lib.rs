//! # vidshell: embed a video renderer into a native window
//!
//! A media pipeline renders video on its own threads, but the pixels have to end up
//! inside a window owned by the UI toolkit. This crate holds the small amount of
//! state that glues the two together:
//!
//! - [HandleRegistry]: the native window (and display) handles, written once when the UI surface is realized.
//! - [Interceptor]: runs on the pipeline's bus thread and hands those handles to the renderer before it opens a window of its own.
//! - [GeometryNegotiator]: runs on the UI thread and brackets every surface resize for asynchronous display protocols like Wayland.
//! - [PlaybackController]: forwards play/pause/stop requests to the [Pipeline].
//!
//! The renderer is reached only through the [WindowBindable] and [GeometryNegotiable]
//! capability traits, so any pipeline implementation can plug in.
//! State shared between the bus thread and the UI thread lives in an [OverlayContext].

mod context;
mod controller;
mod error;
mod geometry;
mod handle;
mod interceptor;
mod message;
mod playlist;
mod target;

#[cfg(test)]
mod mock;

pub use context::*;
pub use controller::*;
pub use error::*;
pub use geometry::*;
pub use handle::*;
pub use interceptor::*;
pub use message::*;
pub use playlist::*;
pub use target::*;
