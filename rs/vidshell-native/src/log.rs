use serde_with::{DisplayFromStr, serde_as};
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Logging configuration.
#[serde_as]
#[derive(Clone, Debug, Default, clap::Args, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
#[non_exhaustive]
pub struct Log {
	/// The level to log at unless overridden by RUST_LOG [default: info].
	#[arg(id = "log-level", long = "log-level", env = "VIDSHELL_LOG_LEVEL")]
	#[serde_as(as = "Option<DisplayFromStr>")]
	pub level: Option<Level>,
}

impl Log {
	pub fn new(level: Level) -> Self {
		Self { level: Some(level) }
	}

	/// The configured level, or INFO.
	pub fn level(&self) -> Level {
		self.level.unwrap_or(Level::INFO)
	}

	fn filter(&self) -> EnvFilter {
		EnvFilter::builder()
			.with_default_directive(LevelFilter::from_level(self.level()).into())
			.from_env_lossy()
	}

	/// Install a global subscriber writing to stderr.
	pub fn init(&self) {
		tracing_subscriber::registry()
			.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
			.with(self.filter())
			.init();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::Parser;

	#[derive(clap::Parser, serde::Deserialize)]
	struct Cli {
		#[command(flatten)]
		log: Log,
	}

	#[test]
	fn test_default_level() {
		let cli = Cli::parse_from(["test"]);
		assert_eq!(cli.log.level, None);
		assert_eq!(cli.log.level(), Level::INFO);
	}

	#[test]
	fn test_cli_level() {
		let cli = Cli::parse_from(["test", "--log-level", "debug"]);
		assert_eq!(cli.log.level(), Level::DEBUG);
	}

	#[test]
	fn test_toml_level() {
		let log: Log = toml::from_str(r#"level = "warn""#).unwrap();
		assert_eq!(log.level(), Level::WARN);

		let log: Log = toml::from_str("").unwrap();
		assert_eq!(log.level, None);
		assert_eq!(log.level(), Level::INFO);
	}

	#[test]
	fn test_toml_level_survives_update_from() {
		let mut cli: Cli = toml::from_str("[log]\nlevel = \"warn\"").unwrap();
		cli.update_from(["test"]);
		assert_eq!(cli.log.level(), Level::WARN);

		cli.update_from(["test", "--log-level", "trace"]);
		assert_eq!(cli.log.level(), Level::TRACE);
	}
}
