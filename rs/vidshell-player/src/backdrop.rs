//! Paints the window background behind the video.
//!
//! On Wayland the video sink draws into subsurfaces of the window, and a
//! subsurface is only shown while its parent surface has a buffer attached.
//! The backdrop gives the parent that buffer: a plain black frame presented
//! with wgpu on every repaint.

use std::sync::Arc;

use winit::window::Window;

#[derive(Debug, thiserror::Error)]
pub enum BackdropError {
	#[error("failed to initialize backdrop: {0}")]
	Init(String),

	#[error("failed to paint backdrop: {0}")]
	Paint(String),
}

pub type Result<T> = std::result::Result<T, BackdropError>;

pub struct Backdrop {
	device: wgpu::Device,
	queue: wgpu::Queue,
	surface: wgpu::Surface<'static>,
	surface_config: wgpu::SurfaceConfiguration,
}

impl Backdrop {
	pub fn new(window: Arc<Window>) -> Result<Self> {
		pollster::block_on(Self::init(window))
	}

	async fn init(window: Arc<Window>) -> Result<Self> {
		let size = window.inner_size();

		let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
			backends: wgpu::Backends::all(),
			..Default::default()
		});

		let surface = instance
			.create_surface(window)
			.map_err(|e| BackdropError::Init(format!("failed to create surface: {e}")))?;

		let adapter = instance
			.request_adapter(&wgpu::RequestAdapterOptions {
				power_preference: wgpu::PowerPreference::LowPower,
				compatible_surface: Some(&surface),
				force_fallback_adapter: false,
			})
			.await
			.ok_or_else(|| BackdropError::Init("failed to find suitable adapter".to_string()))?;

		let (device, queue) = adapter
			.request_device(
				&wgpu::DeviceDescriptor {
					label: Some("Backdrop Device"),
					required_features: wgpu::Features::empty(),
					required_limits: adapter.limits(),
					memory_hints: wgpu::MemoryHints::MemoryUsage,
				},
				None,
			)
			.await
			.map_err(|e| BackdropError::Init(format!("failed to create device: {e}")))?;

		let caps = surface.get_capabilities(&adapter);
		let format = caps
			.formats
			.iter()
			.copied()
			.find(|f| f.is_srgb())
			.or_else(|| caps.formats.first().copied())
			.ok_or_else(|| BackdropError::Init("surface has no supported formats".to_string()))?;
		let alpha_mode = caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto);

		let surface_config = wgpu::SurfaceConfiguration {
			usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
			format,
			width: size.width.max(1),
			height: size.height.max(1),
			present_mode: wgpu::PresentMode::Fifo,
			alpha_mode,
			view_formats: vec![],
			desired_maximum_frame_latency: 2,
		};
		surface.configure(&device, &surface_config);

		tracing::debug!(?format, width = size.width, height = size.height, "backdrop ready");

		Ok(Self {
			device,
			queue,
			surface,
			surface_config,
		})
	}

	pub fn resize(&mut self, width: u32, height: u32) {
		if width == 0 || height == 0 {
			return;
		}

		if width == self.surface_config.width && height == self.surface_config.height {
			return;
		}

		self.surface_config.width = width;
		self.surface_config.height = height;
		self.surface.configure(&self.device, &self.surface_config);
	}

	/// Clear the window to black and present it.
	pub fn paint(&mut self) -> Result<()> {
		let frame = match self.surface.get_current_texture() {
			Ok(frame) => frame,
			Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
				// Skip this frame, the next repaint uses the new configuration.
				self.surface.configure(&self.device, &self.surface_config);
				return Ok(());
			}
			Err(e) => return Err(BackdropError::Paint(format!("failed to get surface texture: {e}"))),
		};

		let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

		let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
			label: Some("Backdrop Encoder"),
		});

		{
			let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
				label: Some("Backdrop Pass"),
				color_attachments: &[Some(wgpu::RenderPassColorAttachment {
					view: &view,
					resolve_target: None,
					ops: wgpu::Operations {
						load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
						store: wgpu::StoreOp::Store,
					},
				})],
				depth_stencil_attachment: None,
				timestamp_writes: None,
				occlusion_query_set: None,
			});
		}

		self.queue.submit(Some(encoder.finish()));
		frame.present();

		Ok(())
	}
}
