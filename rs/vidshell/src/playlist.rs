/// What the pipeline should render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Media {
	/// Play these URIs in order, looping forever.
	Playlist(Playlist),

	/// Render a generated test pattern.
	TestPattern,
}

impl Media {
	/// A looping playlist, or the test pattern when no URIs were given.
	pub fn from_uris<I, S>(uris: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		match Playlist::new(uris) {
			Some(playlist) => Self::Playlist(playlist),
			None => Self::TestPattern,
		}
	}
}

/// A non-empty list of URIs that wraps around at the end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Playlist {
	uris: Vec<String>,
	current: usize,
}

impl Playlist {
	/// Returns `None` if there are no URIs.
	pub fn new<I, S>(uris: I) -> Option<Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let uris: Vec<String> = uris.into_iter().map(Into::into).collect();
		if uris.is_empty() {
			return None;
		}

		Some(Self { uris, current: 0 })
	}

	pub fn current(&self) -> &str {
		&self.uris[self.current]
	}

	/// Move to the next URI, back to the first after the last, and return it.
	pub fn advance(&mut self) -> &str {
		self.current = (self.current + 1) % self.uris.len();
		tracing::info!(uri = %self.current(), "now playing");
		self.current()
	}
}
