//! Output formats and how commands declare the ones they accept.
//!
//! Every concrete [`OutputFormat`] belongs to exactly one [`OutputType`].
//! Commands declare their default type and the set of types they support
//! through [`Outputs`]; [`resolve`] and [`validate`] turn the user's flag and
//! the persisted preference into the format a command renders with.

mod render;
mod resolve;

pub use render::{write_record, Printer, Short};
pub use resolve::{resolve, validate, FormatError};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Name of the flag, and of the config key, that selects the output format.
pub const OUTPUT_FORMAT_KEY: &str = "output-format";

/// Coarse classification used for command compatibility checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputType {
    /// Structured serialization (json, yaml, ndjson)
    Data,
    /// Command-specific human rendering
    Short,
    /// User-supplied handlebars template
    Template,
}

impl OutputType {
    /// The format a command defaulting to this type renders with, if it is fixed.
    ///
    /// `Data` has no fixed format: it follows the persisted preference.
    pub const fn fixed_format(self) -> Option<OutputFormat> {
        match self {
            Self::Data => None,
            Self::Short => Some(OutputFormat::Short),
            Self::Template => Some(OutputFormat::Template),
        }
    }

    /// All concrete formats of this type.
    pub fn formats(self) -> impl Iterator<Item = OutputFormat> {
        OutputFormat::ALL
            .into_iter()
            .filter(move |f| f.output_type() == self)
    }
}

/// Concrete serialization or rendering choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// YAML
    Yaml,
    /// One compact JSON document per line
    Ndjson,
    /// Human-readable summary
    Short,
    /// Rendered through a handlebars template
    Template,
}

impl OutputFormat {
    /// Every format, in the order they are listed to users.
    pub const ALL: [Self; 5] = [Self::Json, Self::Yaml, Self::Ndjson, Self::Short, Self::Template];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Ndjson => "ndjson",
            Self::Short => "short",
            Self::Template => "template",
        }
    }

    pub const fn output_type(self) -> OutputType {
        match self {
            Self::Json | Self::Yaml | Self::Ndjson => OutputType::Data,
            Self::Short => OutputType::Short,
            Self::Template => OutputType::Template,
        }
    }

    /// Exact tag match; no aliases, so every tag names one format.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == tag)
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| FormatError::invalid(s))
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command's output declaration: one default type and the supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outputs {
    pub default: OutputType,
    pub supported: &'static [OutputType],
}

impl Outputs {
    pub const fn new(default: OutputType, supported: &'static [OutputType]) -> Self {
        Self { default, supported }
    }

    /// Data only; used for command groups that never render anything themselves.
    pub const DATA_ONLY: Self = Self::new(OutputType::Data, &[OutputType::Data]);

    /// Default Data, everything supported.
    pub const ANY: Self = Self::new(
        OutputType::Data,
        &[OutputType::Data, OutputType::Short, OutputType::Template],
    );

    pub fn supports(&self, ty: OutputType) -> bool {
        self.supported.contains(&ty)
    }
}
