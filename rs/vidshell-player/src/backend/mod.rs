//! The media pipeline behind the window.

#[cfg(feature = "gstreamer")]
mod gst;

use vidshell::{Backend, Interceptor, Media, Pipeline};
use vidshell_native::CodecProperties;
use winit::event_loop::EventLoopProxy;

/// Bus messages the interceptor let through, delivered to the UI thread.
#[cfg_attr(not(feature = "gstreamer"), allow(dead_code))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerEvent {
	EndOfStream,
	Warning(String),
	Error(String),
}

/// Everything needed to build a pipeline for a realized window.
#[cfg_attr(not(feature = "gstreamer"), allow(dead_code))]
pub struct Setup {
	pub backend: Backend,
	pub media: Media,

	/// The factory name of the video sink.
	pub sink: String,

	pub codec_properties: CodecProperties,
	pub interceptor: Interceptor,
	pub events: EventLoopProxy<PlayerEvent>,
}

/// The sink used when none was configured.
pub fn default_sink(backend: Backend) -> &'static str {
	match backend {
		Backend::X11 => "glimagesink",
		Backend::Wayland => "waylandsink",
	}
}

/// Build the pipeline, installing the interceptor on its bus.
///
/// The window handles must already be registered with the interceptor's context.
#[cfg(feature = "gstreamer")]
pub fn open(setup: Setup) -> anyhow::Result<Box<dyn Pipeline>> {
	Ok(Box::new(gst::GstPipeline::open(setup)?))
}

#[cfg(not(feature = "gstreamer"))]
pub fn open(setup: Setup) -> anyhow::Result<Box<dyn Pipeline>> {
	anyhow::bail!(
		"cannot play {:?} with {}: vidshell was built without the `gstreamer` feature",
		setup.media,
		setup.sink
	)
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn default_sinks() {
		assert_eq!(default_sink(Backend::X11), "glimagesink");
		assert_eq!(default_sink(Backend::Wayland), "waylandsink");
	}
}
