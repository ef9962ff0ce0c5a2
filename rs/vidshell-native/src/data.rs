use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Used when `XDG_DATA_DIRS` is unset or empty.
const DEFAULT_DATA_DIRS: &str = "/usr/local/share:/usr/share";

/// The system data directories an application installs its files into.
///
/// Files live at `<dir>/<app>/<name>`, searched in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataDirs {
	app: String,
	dirs: Vec<PathBuf>,
}

impl DataDirs {
	pub fn new(app: impl Into<String>, dirs: Vec<PathBuf>) -> Self {
		Self { app: app.into(), dirs }
	}

	/// The directories listed in `XDG_DATA_DIRS`.
	pub fn system(app: impl Into<String>) -> Self {
		let var = std::env::var_os("XDG_DATA_DIRS");
		Self::new(app, Self::parse(var.as_deref()))
	}

	fn parse(var: Option<&OsStr>) -> Vec<PathBuf> {
		let var = match var {
			Some(var) if !var.is_empty() => var,
			_ => OsStr::new(DEFAULT_DATA_DIRS),
		};

		std::env::split_paths(var)
			.filter(|dir| !dir.as_os_str().is_empty())
			.collect()
	}

	pub fn dirs(&self) -> &[PathBuf] {
		&self.dirs
	}

	/// The first installed copy of `name`, if any.
	pub fn locate(&self, name: impl AsRef<Path>) -> Option<PathBuf> {
		let name = name.as_ref();
		self.dirs
			.iter()
			.map(|dir| dir.join(&self.app).join(name))
			.find(|path| path.exists())
	}

	/// Like [DataDirs::locate], but falls back to `name` relative to the working directory.
	pub fn find(&self, name: impl AsRef<Path>) -> PathBuf {
		let name = name.as_ref();
		match self.locate(name) {
			Some(path) => {
				tracing::info!(name = %name.display(), path = %path.display(), "found data file");
				path
			}
			None => name.to_path_buf(),
		}
	}
}
