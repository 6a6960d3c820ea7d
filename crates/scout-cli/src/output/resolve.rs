//! Output format negotiation.

use super::{OutputFormat, OutputType};
use thiserror::Error;

/// Why a requested output format cannot be used.
///
/// Both variants ask the caller to print the command's usage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Not a format at all.
    #[error("'{requested}' is not an output format (available: {})", .available.join(", "))]
    Invalid {
        requested: String,
        available: Vec<&'static str>,
    },

    /// A real format that this command cannot render.
    #[error("this command cannot output '{requested}' (available: {})", .available.join(", "))]
    Unsupported {
        requested: String,
        available: Vec<&'static str>,
    },
}

impl FormatError {
    pub(crate) fn invalid(requested: &str) -> Self {
        Self::Invalid {
            requested: requested.to_string(),
            available: OutputFormat::ALL.iter().map(|f| f.as_str()).collect(),
        }
    }

    fn unsupported(requested: &str, supported: &[OutputType]) -> Self {
        Self::Unsupported {
            requested: requested.to_string(),
            available: OutputFormat::ALL
                .into_iter()
                .filter(|f| supported.contains(&f.output_type()))
                .map(OutputFormat::as_str)
                .collect(),
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            Self::Invalid { .. } => "Invalid output format",
            Self::Unsupported { .. } => "Unsupported output format",
        }
    }

    pub const fn prints_usage(&self) -> bool {
        true
    }

    /// Formats the user may pick from instead.
    pub fn available(&self) -> &[&'static str] {
        match self {
            Self::Invalid { available, .. } | Self::Unsupported { available, .. } => available,
        }
    }
}

/// Decide which format string an invocation renders with.
///
/// `explicit` is `Some` exactly when the user passed the flag on this
/// invocation, whatever its value; it then wins verbatim. Otherwise a `Data`
/// default keeps the persisted preference and the other types use their
/// fixed format.
pub fn resolve(persisted: &str, default: OutputType, explicit: Option<&str>) -> String {
    if let Some(value) = explicit {
        return value.to_string();
    }
    match default.fixed_format() {
        Some(fixed) => fixed.as_str().to_string(),
        None => persisted.to_string(),
    }
}

/// Check a resolved format against what a command supports.
pub fn validate(requested: &str, supported: &[OutputType]) -> Result<OutputFormat, FormatError> {
    let format: OutputFormat = requested.parse()?;
    if supported.contains(&format.output_type()) {
        Ok(format)
    } else {
        Err(FormatError::unsupported(requested, supported))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OutputType::{Data, Short, Template};

    const TYPES: [OutputType; 3] = [Data, Short, Template];

    #[test]
    fn test_explicit_flag_always_wins() {
        for default in TYPES {
            for value in ["json", "short", "template", "nonsense", ""] {
                assert_eq!(resolve("yaml", default, Some(value)), value);
            }
        }
    }

    #[test]
    fn test_explicit_flag_equal_to_default_still_counts() {
        // Short default, persisted yaml: passing -O short is still "explicit short"
        assert_eq!(resolve("yaml", Short, Some("short")), "short");
        // Data default: passing the persisted value explicitly returns it as well
        assert_eq!(resolve("yaml", Data, Some("yaml")), "yaml");
    }

    #[test]
    fn test_data_default_keeps_persisted() {
        for persisted in ["json", "yaml", "ndjson"] {
            assert_eq!(resolve(persisted, Data, None), persisted);
        }
    }

    #[test]
    fn test_fixed_defaults_ignore_persisted() {
        for persisted in ["json", "yaml", "ndjson", "template"] {
            assert_eq!(resolve(persisted, Short, None), "short");
        }
        assert_eq!(resolve("json", Template, None), "template");
    }

    #[test]
    fn test_resolve_is_idempotent() {
        for default in TYPES {
            for explicit in [None, Some("yaml")] {
                let first = resolve("json", default, explicit);
                let second = resolve("json", default, explicit);
                assert_eq!(first, second);
            }
        }
    }

    #[test]
    fn test_search_scenario() {
        let supported = &[Data, Short, Template];
        let format = resolve("yaml", Data, None);
        assert_eq!(validate(&format, supported).unwrap(), OutputFormat::Yaml);

        let format = resolve("yaml", Data, Some("json"));
        assert_eq!(validate(&format, supported).unwrap(), OutputFormat::Json);
    }

    #[test]
    fn test_completion_scenario_lists_only_short() {
        let format = resolve("json", Short, Some("json"));
        let err = validate(&format, &[Short]).unwrap_err();
        assert!(matches!(err, FormatError::Unsupported { .. }));
        assert_eq!(err.available(), ["short"]);
        assert_eq!(err.title(), "Unsupported output format");
        assert!(err.prints_usage());
    }

    #[test]
    fn test_unsupported_expands_data_family() {
        let err = validate("short", &[Data, Template]).unwrap_err();
        assert_eq!(err.available(), ["json", "yaml", "ndjson", "template"]);
    }

    #[test]
    fn test_invalid_lists_everything() {
        // unknown wins over unsupported, even for a command that supports little
        let err = validate("xml", &[Short]).unwrap_err();
        assert!(matches!(err, FormatError::Invalid { .. }));
        assert_eq!(err.available(), ["json", "yaml", "ndjson", "short", "template"]);
        assert_eq!(
            err.to_string(),
            "'xml' is not an output format (available: json, yaml, ndjson, short, template)"
        );
    }

    #[test]
    fn test_supported_format_never_errors() {
        for format in OutputFormat::ALL {
            let supported = [format.output_type()];
            assert_eq!(validate(format.as_str(), &supported), Ok(format));
        }
    }

    #[test]
    fn test_validate_never_coerces() {
        for format in OutputFormat::ALL {
            for ty in TYPES {
                if format.output_type() != ty {
                    assert!(validate(format.as_str(), &[ty]).is_err());
                }
            }
        }
    }
}
