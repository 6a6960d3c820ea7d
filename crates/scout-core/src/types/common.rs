use serde::{Deserialize, Serialize};

/// Where an address is located, as far as the API knows
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    /// ISO 3166-1 alpha-2 country code
    #[serde(default)]
    pub country_code: Option<String>,

    /// Full country name
    #[serde(default)]
    pub country_name: Option<String>,

    /// City name
    #[serde(default)]
    pub city: Option<String>,

    /// Region or state code
    #[serde(default)]
    pub region_code: Option<String>,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Location {
    /// "City, Region, Country" with the missing parts left out
    #[must_use]
    pub fn label(&self) -> String {
        [
            self.city.as_deref(),
            self.region_code.as_deref(),
            self.country_name.as_deref().or(self.country_code.as_deref()),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Transport protocol of a service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Tcp,
    Udp,
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tcp => write!(f, "tcp"),
            Self::Udp => write!(f, "udp"),
        }
    }
}
