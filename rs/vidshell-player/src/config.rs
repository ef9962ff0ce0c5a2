use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use vidshell::Backend;
use vidshell_native::Log;

/// The windowing backend to run on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
	/// Whatever the session provides.
	#[default]
	Auto,
	X11,
	Wayland,
}

#[derive(Clone, Debug, Default, clap::Args, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
	/// Restrict the windowing backend.
	#[arg(long, value_enum, env = "VIDSHELL_BACKEND")]
	pub backend: Option<BackendChoice>,

	/// The window title, defaults to one naming the backend.
	#[arg(long, env = "VIDSHELL_TITLE")]
	pub title: Option<String>,

	/// The initial window width.
	#[arg(long, env = "VIDSHELL_WIDTH")]
	pub width: Option<u32>,

	/// The initial window height.
	#[arg(long, env = "VIDSHELL_HEIGHT")]
	pub height: Option<u32>,
}

impl WindowConfig {
	pub const DEFAULT_WIDTH: u32 = 640;
	pub const DEFAULT_HEIGHT: u32 = 480;

	pub fn backend(&self) -> BackendChoice {
		self.backend.unwrap_or_default()
	}

	pub fn title(&self, backend: Backend) -> String {
		match &self.title {
			Some(title) => title.clone(),
			None => format!("vidshell ({backend})"),
		}
	}

	pub fn size(&self) -> (u32, u32) {
		(
			self.width.unwrap_or(Self::DEFAULT_WIDTH),
			self.height.unwrap_or(Self::DEFAULT_HEIGHT),
		)
	}
}

#[derive(Clone, Debug, Default, Parser, serde::Serialize, serde::Deserialize)]
#[command(name = "vidshell", version, about = "Play video inside a native window")]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Load settings from this TOML file; command line arguments take precedence.
	#[arg(long, env = "VIDSHELL_CONFIG")]
	#[serde(skip)]
	pub config: Option<PathBuf>,

	#[command(flatten)]
	pub log: Log,

	#[command(flatten)]
	pub window: WindowConfig,

	/// The video sink element, defaults to glimagesink on X11 and waylandsink on Wayland.
	#[arg(long, env = "VIDSHELL_VIDEO_SINK")]
	pub video_sink: Option<String>,

	/// Element properties to apply, searched in the system data directories by default.
	#[arg(long, env = "VIDSHELL_CODEC_PROPERTIES")]
	pub codec_properties: Option<PathBuf>,

	/// Media URIs to play in a loop, a test pattern is shown when empty.
	pub uris: Vec<String>,
}

impl Config {
	pub fn load() -> anyhow::Result<Self> {
		Self::load_from(std::env::args_os())
	}

	pub fn load_from<I, T>(args: I) -> anyhow::Result<Self>
	where
		I: IntoIterator<Item = T>,
		T: Into<OsString>,
	{
		let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

		let mut config = Self::parse_from(&args);
		if let Some(path) = config.config.clone() {
			let contents =
				std::fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
			config = toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))?;

			// Command line arguments override the file.
			config.update_from(&args);
			config.config = Some(path);
		}

		Ok(config)
	}
}
