use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use anyhow::Context;
use gst::glib;
use gst::glib::translate::IntoGlib;
use gst::prelude::*;
use gst_video::prelude::*;
use gstreamer as gst;
use gstreamer_video as gst_video;
use parking_lot::Mutex;
use vidshell::{
	Backend, BusMessage, DisplayHandle, Error, GeometryNegotiable, Interceptor, Media, PlaybackState, Playlist, Rect,
	Reply, WindowBindable, WindowHandle,
};
use vidshell_native::CodecProperties;
use winit::event_loop::EventLoopProxy;

use super::{PlayerEvent, Setup};

/// Context types waylandsink requests the application's `wl_display` with.
const DISPLAY_CONTEXT_TYPES: [&str; 2] = ["GstWlDisplayHandleContextType", "GstWaylandDisplayHandleContextType"];

/// videotestsrc's "ball" on green.
const TEST_PATTERN: &str = "ball";
const TEST_PATTERN_BACKGROUND: u32 = 0x0000_f000;

/// How long the forwarder waits for a message before checking whether to stop.
const POLL_INTERVAL_MS: u64 = 100;

pub struct GstPipeline {
	pipeline: gst::Pipeline,
	interceptor: Interceptor,
	forwarder: Forwarder,
}

impl GstPipeline {
	pub fn open(setup: Setup) -> anyhow::Result<Self> {
		gst::init().context("failed to initialize GStreamer")?;

		let sink = gst::ElementFactory::make(&setup.sink)
			.build()
			.with_context(|| format!("failed to create video sink {}", setup.sink))?;

		let pipeline = match setup.media {
			Media::Playlist(playlist) => playbin(playlist, &sink)?,
			Media::TestPattern => test_pattern(&sink)?,
		};

		if !setup.codec_properties.is_empty() {
			let properties = setup.codec_properties;
			pipeline.connect_deep_element_added(move |_, _, element| apply_properties(element, &properties));
		}

		if setup.backend == Backend::X11 {
			pipeline.use_clock(Some(&gst::SystemClock::obtain()));
		}

		// The forwarder keeps draining the bus while the pipeline is stopped.
		pipeline.set_auto_flush_bus(false);

		let bus = pipeline.bus().context("pipeline has no bus")?;

		// Runs on whichever thread posted the message.
		let interceptor = setup.interceptor.clone();
		bus.set_sync_handler(move |_, message| match interceptor.intercept(classify(message)) {
			Reply::Pass => gst::BusSyncReply::Pass,
			Reply::Drop => gst::BusSyncReply::Drop,
		});

		let events = setup.events;
		let forwarder = Forwarder::spawn(bus, move |event| events.send_event(event).is_ok())?;

		Ok(Self {
			pipeline,
			interceptor: setup.interceptor,
			forwarder,
		})
	}
}

impl vidshell::Pipeline for GstPipeline {
	fn request_state(&self, state: PlaybackState) -> vidshell::Result<()> {
		let target = match state {
			PlaybackState::Null => gst::State::Null,
			PlaybackState::Ready => gst::State::Ready,
			PlaybackState::Paused => gst::State::Paused,
			PlaybackState::Playing => gst::State::Playing,
		};

		// Targets stay bound across NULL; the next handle request rebinds them.
		self.pipeline.set_state(target).map_err(|_| Error::StateChange { state })?;

		Ok(())
	}
}

impl Drop for GstPipeline {
	fn drop(&mut self) {
		if let Err(err) = self.pipeline.set_state(gst::State::Null) {
			tracing::warn!(%err, "failed to stop pipeline");
		}

		if let Some(bus) = self.pipeline.bus() {
			bus.unset_sync_handler();
		}

		// The pipeline is gone for good, so drop our references to its elements.
		self.interceptor.context().unbind();
		self.forwarder.stop();
	}
}

fn playbin(playlist: Playlist, sink: &gst::Element) -> anyhow::Result<gst::Pipeline> {
	let playbin = gst::ElementFactory::make("playbin")
		.property("uri", playlist.current())
		.build()
		.context("failed to create playbin")?;
	playbin.set_property_from_value("video-sink", &sink.to_value());

	tracing::info!(uri = %playlist.current(), "now playing");

	// Queue the next URI while the current one is still draining, for gapless looping.
	let playlist = Mutex::new(playlist);
	playbin.connect("about-to-finish", false, move |values| {
		let playbin = values.first()?.get::<gst::Element>().ok()?;
		let uri = playlist.lock().advance().to_string();
		playbin.set_property_from_value("uri", &uri.to_value());
		None
	});

	playbin
		.downcast::<gst::Pipeline>()
		.map_err(|_| anyhow::anyhow!("playbin is not a pipeline"))
}

fn test_pattern(sink: &gst::Element) -> anyhow::Result<gst::Pipeline> {
	let source = gst::ElementFactory::make("videotestsrc")
		.property_from_str("pattern", TEST_PATTERN)
		.property("background-color", TEST_PATTERN_BACKGROUND)
		.build()
		.context("failed to create videotestsrc")?;

	let pipeline = gst::Pipeline::new();
	pipeline.add_many([&source, sink])?;
	gst::Element::link_many([&source, sink])?;

	Ok(pipeline)
}

/// Map a GStreamer message onto the messages the interceptor handles.
fn classify(message: &gst::Message) -> BusMessage {
	match message.view() {
		gst::MessageView::NeedContext(need) => {
			let context_type: &str = need.context_type().as_ref();
			if !DISPLAY_CONTEXT_TYPES.iter().any(|t| *t == context_type) {
				return BusMessage::Other;
			}

			match message.src().and_then(|src| src.downcast_ref::<gst::Element>()) {
				Some(element) => BusMessage::NeedDisplayContext(Arc::new(WaylandSink {
					element: element.clone(),
					context_type: context_type.to_string(),
				})),
				None => BusMessage::Other,
			}
		}
		_ if gst_video::is_video_overlay_prepare_window_handle_message(message) => {
			// Either the sink itself or a bin like playbin that proxies the overlay.
			match message
				.src()
				.and_then(|src| src.dynamic_cast_ref::<gst_video::VideoOverlay>())
			{
				Some(overlay) => BusMessage::PrepareWindowHandle(Arc::new(Overlay(overlay.clone()))),
				None => BusMessage::Other,
			}
		}
		_ => BusMessage::Other,
	}
}

struct Overlay(gst_video::VideoOverlay);

impl WindowBindable for Overlay {
	fn set_window_handle(&self, handle: WindowHandle) {
		// SAFETY: the window outlives the pipeline, which is stopped before the window is dropped.
		unsafe { self.0.set_window_handle(handle.get()) }
	}

	fn set_render_rectangle(&self, rect: Rect) {
		if let Err(err) = self.0.set_render_rectangle(rect.x, rect.y, rect.width, rect.height) {
			tracing::warn!(%err, %rect, "failed to set render rectangle");
		}
	}
}

struct WaylandSink {
	element: gst::Element,
	context_type: String,
}

impl GeometryNegotiable for WaylandSink {
	fn set_display_context(&self, display: DisplayHandle) {
		self.element.set_context(&display_context(&self.context_type, display));
	}

	/// A no-op: waylandsink has no begin/end geometry call and switches its
	/// subsurface to synchronized commits by itself whenever the render
	/// rectangle changes. The bracket only reaches sinks that expose one.
	fn begin_geometry_change(&self) {
		tracing::trace!(element = %self.element.name(), "begin geometry change");
	}

	/// A no-op, see [WaylandSink::begin_geometry_change].
	fn end_geometry_change(&self) {
		tracing::trace!(element = %self.element.name(), "end geometry change");
	}
}

/// A context carrying the `wl_display` pointer in its "handle" field.
fn display_context(context_type: &str, display: DisplayHandle) -> gst::Context {
	let context = gst::Context::new(context_type, true);

	// SAFETY: the context was just created, so it is writable, and the
	// varargs list is terminated by a null field name.
	unsafe {
		let structure = gst::ffi::gst_context_writable_structure(context.as_ptr() as *mut gst::ffi::GstContext);
		gst::ffi::gst_structure_set(
			structure,
			c"handle".as_ptr(),
			glib::Type::POINTER.into_glib(),
			display.get() as glib::ffi::gpointer,
			std::ptr::null::<std::ffi::c_char>(),
		);
	}

	context
}

fn apply_properties(element: &gst::Element, properties: &CodecProperties) {
	let Some(factory) = element.factory() else {
		return;
	};
	let factory = factory.name();

	for (name, value) in properties.for_factory(&factory) {
		let Some(pspec) = element.find_property(name) else {
			tracing::warn!(%factory, property = name, "no such property");
			continue;
		};

		match glib::Value::deserialize(&value.to_string(), pspec.value_type()) {
			Ok(parsed) => {
				element.set_property_from_value(name, &parsed);
				tracing::debug!(%factory, property = name, %value, "applied codec property");
			}
			Err(err) => tracing::warn!(%factory, property = name, %value, %err, "invalid codec property"),
		}
	}
}

/// Delivers the messages the interceptor passed to the UI thread.
///
/// Polls with a timeout rather than blocking on the bus, so stopping never
/// depends on a message getting through a bus that may be flushing.
struct Forwarder {
	running: Arc<AtomicBool>,
	thread: Option<JoinHandle<()>>,
}

impl Forwarder {
	/// `deliver` returns false once nobody is listening anymore.
	fn spawn<F>(bus: gst::Bus, deliver: F) -> anyhow::Result<Self>
	where
		F: Fn(PlayerEvent) -> bool + Send + 'static,
	{
		let running = Arc::new(AtomicBool::new(true));
		let thread = std::thread::Builder::new()
			.name("vidshell-bus".to_string())
			.spawn({
				let running = running.clone();
				move || forward(&bus, &running, deliver)
			})
			.context("failed to spawn bus thread")?;

		Ok(Self {
			running,
			thread: Some(thread),
		})
	}

	fn stop(&mut self) {
		self.running.store(false, Ordering::Release);

		if let Some(thread) = self.thread.take() {
			if thread.join().is_err() {
				tracing::warn!("bus thread panicked");
			}
		}
	}
}

impl Drop for Forwarder {
	fn drop(&mut self) {
		self.stop();
	}
}

fn forward<F>(bus: &gst::Bus, running: &AtomicBool, deliver: F)
where
	F: Fn(PlayerEvent) -> bool,
{
	while running.load(Ordering::Acquire) {
		let Some(message) = bus.timed_pop(gst::ClockTime::from_mseconds(POLL_INTERVAL_MS)) else {
			continue;
		};

		let event = match message.view() {
			gst::MessageView::Eos(_) => PlayerEvent::EndOfStream,
			gst::MessageView::Warning(warning) => PlayerEvent::Warning(describe(warning.error(), warning.debug())),
			gst::MessageView::Error(err) => PlayerEvent::Error(describe(err.error(), err.debug())),
			_ => {
				tracing::trace!(kind = ?message.type_(), "bus message");
				continue;
			}
		};

		// The event loop is gone.
		if !deliver(event) {
			break;
		}
	}
}

fn describe(error: glib::Error, debug: Option<glib::GString>) -> String {
	match debug {
		Some(debug) => format!("{error} ({debug})"),
		None => error.to_string(),
	}
}
