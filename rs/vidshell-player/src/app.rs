use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use vidshell::{GeometryNegotiator, Interceptor, Media, OverlayContext, Pipeline, PlaybackController};
use vidshell_native::{CodecProperties, DataDirs};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use crate::backdrop::Backdrop;
use crate::backend::{self, PlayerEvent};
use crate::config::{BackendChoice, Config};
use crate::surface;

/// Installed under `$XDG_DATA_DIRS/vidshell/`.
const CODEC_PROPERTIES: &str = "codec-properties.toml";

/// Build an event loop, restricted to one windowing backend if requested.
pub fn event_loop(choice: BackendChoice) -> anyhow::Result<EventLoop<PlayerEvent>> {
	let mut builder = EventLoop::<PlayerEvent>::with_user_event();

	#[cfg(target_os = "linux")]
	match choice {
		BackendChoice::Auto => {}
		BackendChoice::X11 => {
			use winit::platform::x11::EventLoopBuilderExtX11;
			builder.with_x11();
		}
		BackendChoice::Wayland => {
			use winit::platform::wayland::EventLoopBuilderExtWayland;
			builder.with_wayland();
		}
	}

	#[cfg(not(target_os = "linux"))]
	if choice != BackendChoice::Auto {
		tracing::warn!(?choice, "backend selection is only supported on Linux");
	}

	builder.build().context("failed to create event loop")
}

/// Playback controls, bound to keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
	Play,
	Pause,
	Stop,
	Quit,
}

impl Action {
	fn from_key(key: &Key) -> Option<Self> {
		match key {
			Key::Character(c) => match c.as_str() {
				"p" => Some(Self::Play),
				"s" => Some(Self::Stop),
				"q" => Some(Self::Quit),
				_ => None,
			},
			Key::Named(NamedKey::Space) => Some(Self::Pause),
			Key::Named(NamedKey::Escape) => Some(Self::Quit),
			_ => None,
		}
	}
}

pub struct Player {
	config: Config,
	events: EventLoopProxy<PlayerEvent>,
	session: Option<Session>,
	error: Option<anyhow::Error>,
}

/// A realized window and the pipeline rendering into it.
struct Session {
	// Dropped first: the pipeline must stop before the window goes away.
	controller: PlaybackController<Box<dyn Pipeline>>,
	negotiator: GeometryNegotiator,
	backdrop: Option<Backdrop>,
	window: Arc<Window>,
}

impl Player {
	pub fn new(config: Config, events: EventLoopProxy<PlayerEvent>) -> Self {
		Self {
			config,
			events,
			session: None,
			error: None,
		}
	}

	/// The error that ended the run, if any.
	pub fn finish(self) -> anyhow::Result<()> {
		match self.error {
			Some(err) => Err(err),
			None => Ok(()),
		}
	}

	fn start(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<Session> {
		let (width, height) = self.config.window.size();
		let attributes = Window::default_attributes()
			.with_title("vidshell")
			.with_inner_size(PhysicalSize::new(width, height));
		let window = Arc::new(event_loop.create_window(attributes).context("failed to create window")?);

		// Realize: the handles are registered before the pipeline exists.
		let (backend, handles) = surface::realize(window.as_ref())?;
		window.set_title(&self.config.window.title(backend));
		tracing::info!(%backend, window = %handles.window, "surface realized");

		let context = Arc::new(OverlayContext::new(backend));
		context.handles().set(handles)?;
		context.set_rect(surface::allocation(window.inner_size()));

		let backdrop = if backend.negotiates_geometry() {
			Backdrop::new(window.clone())
				.inspect_err(|err| tracing::warn!(%err, "video may not be shown"))
				.ok()
		} else {
			None
		};

		let sink = match &self.config.video_sink {
			Some(sink) => sink.clone(),
			None => backend::default_sink(backend).to_string(),
		};

		let pipeline = backend::open(backend::Setup {
			backend,
			media: Media::from_uris(self.config.uris.iter().cloned()),
			sink,
			codec_properties: self.codec_properties(),
			interceptor: Interceptor::new(context.clone()),
			events: self.events.clone(),
		})?;

		let controller = PlaybackController::new(pipeline);
		controller.play();
		window.request_redraw();

		Ok(Session {
			controller,
			negotiator: GeometryNegotiator::new(context),
			backdrop,
			window,
		})
	}

	fn codec_properties(&self) -> CodecProperties {
		if let Some(path) = &self.config.codec_properties {
			return CodecProperties::load_or_default(path);
		}

		let path: PathBuf = DataDirs::system("vidshell").find(CODEC_PROPERTIES);
		if !path.exists() {
			tracing::debug!(name = CODEC_PROPERTIES, "no codec properties installed");
			return CodecProperties::default();
		}

		CodecProperties::load_or_default(path)
	}

	fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
		tracing::error!("{err:#}");
		self.error.get_or_insert(err);
		event_loop.exit();
	}
}

impl Session {
	/// One display refresh: announce the size, draw, then report the frame as submitted.
	fn frame(&mut self) {
		let size = self.window.inner_size();
		let allocation = surface::allocation(size);

		// Minimized: nothing to draw and no size worth negotiating.
		if allocation.is_empty() {
			return;
		}

		self.negotiator.about_to_paint(allocation);

		self.window.pre_present_notify();
		if let Some(backdrop) = &mut self.backdrop {
			backdrop.resize(size.width, size.height);
			if let Err(err) = backdrop.paint() {
				tracing::warn!(%err, "failed to paint backdrop");
			}
		}

		self.negotiator.paint_completed();
	}
}

impl ApplicationHandler<PlayerEvent> for Player {
	fn resumed(&mut self, event_loop: &ActiveEventLoop) {
		if self.session.is_some() {
			return;
		}

		match self.start(event_loop) {
			Ok(session) => self.session = Some(session),
			Err(err) => self.fail(event_loop, err),
		}
	}

	fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
		let Some(session) = self.session.as_mut() else {
			return;
		};

		match event {
			WindowEvent::CloseRequested => {
				session.controller.stop();
				event_loop.exit();
			}
			WindowEvent::Resized(_) => session.window.request_redraw(),
			WindowEvent::RedrawRequested => session.frame(),
			WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed && !event.repeat => {
				match Action::from_key(&event.logical_key) {
					Some(Action::Play) => session.controller.play(),
					Some(Action::Pause) => session.controller.pause(),
					Some(Action::Stop) => session.controller.stop(),
					Some(Action::Quit) => {
						session.controller.stop();
						event_loop.exit();
					}
					None => {}
				}
			}
			_ => {}
		}
	}

	fn user_event(&mut self, event_loop: &ActiveEventLoop, event: PlayerEvent) {
		match event {
			PlayerEvent::EndOfStream => tracing::info!("end of stream"),
			PlayerEvent::Warning(warning) => tracing::warn!(%warning, "pipeline warning"),
			PlayerEvent::Error(err) => self.fail(event_loop, anyhow::anyhow!(err).context("pipeline error")),
		}
	}

	fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
		self.session.take();
	}
}
