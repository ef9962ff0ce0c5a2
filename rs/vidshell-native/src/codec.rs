use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::Context;

/// A single element property value from a codec property file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
	Bool(bool),
	Integer(i64),
	Float(f64),
	String(String),
}

impl fmt::Display for PropertyValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(v) => write!(f, "{v}"),
			Self::Integer(v) => write!(f, "{v}"),
			Self::Float(v) => write!(f, "{v}"),
			Self::String(v) => f.write_str(v),
		}
	}
}

/// Element property presets, keyed by element factory name.
///
/// ```toml
/// [vp8enc]
/// deadline = 1
/// cpu-used = 4
///
/// [x264enc]
/// tune = "zerolatency"
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CodecProperties {
	factories: BTreeMap<String, BTreeMap<String, PropertyValue>>,
}

impl CodecProperties {
	pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
		let path = path.as_ref();
		let contents =
			std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
		contents
			.parse()
			.with_context(|| format!("failed to parse {}", path.display()))
	}

	/// Like [CodecProperties::load], but a missing or broken file only logs a warning.
	pub fn load_or_default(path: impl AsRef<Path>) -> Self {
		match Self::load(path) {
			Ok(properties) => properties,
			Err(err) => {
				tracing::warn!("ignoring codec properties: {err:#}");
				Self::default()
			}
		}
	}

	/// The properties to set on elements created by `factory`.
	pub fn for_factory<'a>(&'a self, factory: &str) -> impl Iterator<Item = (&'a str, &'a PropertyValue)> + use<'a> {
		self.factories
			.get(factory)
			.into_iter()
			.flat_map(|props| props.iter().map(|(name, value)| (name.as_str(), value)))
	}

	pub fn is_empty(&self) -> bool {
		self.factories.is_empty()
	}
}

impl std::str::FromStr for CodecProperties {
	type Err = toml::de::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		toml::from_str(s)
	}
}
