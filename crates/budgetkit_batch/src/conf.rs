//! Batch constants, endpoint paths and deployment configuration.

use serde::{Deserialize, Serialize};

/// Environment variable carrying the deployment base URL.
pub const C_ENV_BASE_URL: &str = "BUDGETKIT_BASE_URL";

pub const C_ENDPOINT_OPTIONS: &str = "api/options";
pub const C_ENDPOINT_CALCULATE_BENEFITS: &str = "api/allocation/calculate-benefits";
pub const C_ENDPOINT_SAVE_BATCH: &str = "api/allocation/save-batch";
pub const C_ENDPOINT_SAVE_CONFIGURATION: &str = "api/allocation/save-configuration";

/// Required sum of allocation percentages.
pub const N_ALLOCATION_TOTAL_PCT: f64 = 100.0;
/// Absolute tolerance on the allocation sum.
pub const N_ALLOCATION_TOLERANCE_PCT: f64 = 0.01;

/// Raw field carrying the company id on the master row.
pub const C_FIELD_COMPANY_ID: &str = "company_id";
/// Record field written with the row's cost-center code.
pub const C_FIELD_COST_CENTER_CODE: &str = "cost_center_code";
/// Record field written with the row's allocation percentage.
pub const C_FIELD_ALLOCATION_PCT: &str = "allocation_pct";
/// Record field written with the row id.
pub const C_FIELD_ROW_ID: &str = "row_id";

/// Employee-level raw fields the master row shares with its children.
pub const TUP_MASTER_SHARED_FIELDS: [&str; 8] = [
    C_FIELD_COMPANY_ID,
    "employee_type",
    "job_band",
    "position_code",
    "executive",
    "le_of_month",
    "no_of_month",
    "join_date",
];

/// Raw fields also written onto save records under their own key, with
/// sniffed values. The summary months and the default export layout read
/// these keys.
pub const TUP_RECORD_SOURCE_FIELDS: [&str; 7] = [
    "employee_type",
    "job_band",
    "position_code",
    "executive",
    "le_of_month",
    "no_of_month",
    "join_date",
];

/// Deployment configuration: one base URL for subpath hosting.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpecBudgetkitConfig {
    /// Prefix prepended to every endpoint path (`""`, `"/budget"`, ...).
    #[serde(default)]
    pub base_url: String,
}

impl SpecBudgetkitConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Load from [`C_ENV_BASE_URL`]; unset means an empty base URL.
    pub fn from_env() -> Self {
        Self::new(std::env::var(C_ENV_BASE_URL).unwrap_or_default())
    }

    /// Join the base URL and `endpoint` with exactly one `/`.
    pub fn derive_endpoint_url(&self, endpoint: &str) -> String {
        let c_base = self.base_url.trim_end_matches('/');
        let c_path = endpoint.trim_start_matches('/');
        format!("{c_base}/{c_path}")
    }
}

#[cfg(test)]
mod tests {
    use super::{C_ENDPOINT_SAVE_BATCH, SpecBudgetkitConfig};

    #[test]
    fn endpoint_urls_join_with_single_slash() {
        assert_eq!(
            SpecBudgetkitConfig::default().derive_endpoint_url(C_ENDPOINT_SAVE_BATCH),
            "/api/allocation/save-batch"
        );
        assert_eq!(
            SpecBudgetkitConfig::new("/budget/").derive_endpoint_url("/api/options"),
            "/budget/api/options"
        );
        assert_eq!(
            SpecBudgetkitConfig::new("https://host/app").derive_endpoint_url("api/options"),
            "https://host/app/api/options"
        );
    }

    #[test]
    fn config_loads_from_json_with_defaults() {
        let cfg: SpecBudgetkitConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(cfg.base_url, "");
        let cfg: SpecBudgetkitConfig =
            serde_json::from_str(r#"{"base_url":"/hc"}"#).expect("parse");
        assert_eq!(cfg.derive_endpoint_url("api/options"), "/hc/api/options");
    }
}
