use serde::{Deserialize, Serialize};

/// Plan and credit balance from `/api-info`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub query_credits: i64,

    #[serde(default)]
    pub scan_credits: i64,

    #[serde(default)]
    pub plan: Option<String>,

    #[serde(default)]
    pub usage_limits: Option<UsageLimits>,
}

/// Monthly limits attached to the plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageLimits {
    #[serde(default)]
    pub query_credits: Option<i64>,

    #[serde(default)]
    pub scan_credits: Option<i64>,

    #[serde(default)]
    pub monitored_ips: Option<i64>,
}

impl Credits {
    /// Fraction of the monthly query allowance still available, if the plan has a limit
    #[must_use]
    pub fn query_ratio(&self) -> Option<f64> {
        let limit = self.usage_limits.as_ref()?.query_credits?;
        (limit > 0).then(|| self.query_credits as f64 / limit as f64)
    }
}

/// Organization details from `/org`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub created: Option<String>,

    #[serde(default)]
    pub admins: Vec<Member>,

    #[serde(default)]
    pub members: Vec<Member>,

    #[serde(default)]
    pub upgrade_type: Option<String>,

    #[serde(default)]
    pub domains: Vec<String>,
}

/// An organization member or admin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub username: String,

    #[serde(default)]
    pub email: Option<String>,
}

impl Organization {
    /// Members plus admins
    #[must_use]
    pub fn headcount(&self) -> usize {
        self.members.len() + self.admins.len()
    }
}
