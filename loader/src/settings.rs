//!
//! Loader configuration.
//!
//! Every field has a default matching the stock Chart.js v4 bootstrap, so a
//! partial JSON (or, in the browser, JS) object only needs to name what it
//! overrides:
//!
//! ```ignore
//! let settings: Settings = serde_json::from_str(r#"{ "usabilityChecks": 3 }"#)?;
//! ```
//!

use crate::imports::*;

pub const GLOBAL_NAME: &str = "Chart";
pub const EVENT_NAME: &str = "chartjs:ready";
pub const PROMISE_NAME: &str = "ChartReadyPromise";
pub const PRIMARY_URL: &str = "https://cdn.jsdelivr.net/npm/chart.js@4/dist/chart.umd.min.js";
pub const FALLBACK_URL: &str = "https://unpkg.com/chart.js@4/dist/chart.umd.min.js";
pub const MARKER_ATTRIBUTE: &str = "data-chartjs-loader";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Name of the library global
    pub global_name: String,
    /// Name of the readiness event dispatched on the notification bus
    pub event_name: String,
    /// Name of the global property exposing the readiness promise
    pub promise_name: String,
    pub primary_url: String,
    pub fallback_url: String,
    /// Attribute tagging the primary fetch directive
    pub marker_attribute: String,
    /// Number of yield-then-check rounds after a successful transfer
    /// before the source is declared unusable
    pub usability_checks: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            global_name: GLOBAL_NAME.to_string(),
            event_name: EVENT_NAME.to_string(),
            promise_name: PROMISE_NAME.to_string(),
            primary_url: PRIMARY_URL.to_string(),
            fallback_url: FALLBACK_URL.to_string(),
            marker_attribute: MARKER_ATTRIBUTE.to_string(),
            usability_checks: 1,
        }
    }
}

impl Settings {
    pub fn with_global_name(mut self, name: impl Into<String>) -> Self {
        self.global_name = name.into();
        self
    }

    pub fn with_event_name(mut self, name: impl Into<String>) -> Self {
        self.event_name = name.into();
        self
    }

    pub fn with_sources(mut self, primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        self.primary_url = primary.into();
        self.fallback_url = fallback.into();
        self
    }

    pub fn with_marker_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.marker_attribute = attribute.into();
        self
    }

    pub fn with_usability_checks(mut self, checks: usize) -> Self {
        self.usability_checks = checks;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("globalName", &self.global_name),
            ("eventName", &self.event_name),
            ("promiseName", &self.promise_name),
            ("primaryUrl", &self.primary_url),
            ("fallbackUrl", &self.fallback_url),
            ("markerAttribute", &self.marker_attribute),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(Error::InvalidSettings(format!("`{name}` must not be empty")));
        }
        if self.usability_checks == 0 {
            return Err(Error::InvalidSettings(
                "`usabilityChecks` must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Fetch directive for the primary source, tagged with the marker attribute
    pub fn primary(&self) -> FetchDirective {
        FetchDirective::new(&self.primary_url).with_marker(&self.marker_attribute)
    }

    /// Fetch directive for the fallback source (never tagged)
    pub fn fallback(&self) -> FetchDirective {
        FetchDirective::new(&self.fallback_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_chartjs_bootstrap() {
        let settings = Settings::default();
        assert_eq!(settings.global_name, "Chart");
        assert_eq!(settings.event_name, "chartjs:ready");
        assert_eq!(settings.usability_checks, 1);
        assert!(settings.validate().is_ok());

        let primary = settings.primary();
        assert_eq!(primary.url, PRIMARY_URL);
        assert_eq!(primary.marker.as_deref(), Some("data-chartjs-loader"));
        assert!(primary.is_async);
        assert_eq!(settings.fallback().marker, None);
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let settings: Settings = serde_json::from_str(
            r#"{ "primaryUrl": "https://cdn.example.org/chart.js", "usabilityChecks": 3 }"#,
        )
        .unwrap();
        assert_eq!(settings.primary_url, "https://cdn.example.org/chart.js");
        assert_eq!(settings.usability_checks, 3);
        assert_eq!(settings.fallback_url, FALLBACK_URL);
        assert_eq!(settings.marker_attribute, MARKER_ATTRIBUTE);
    }

    #[test]
    fn validation_rejects_empty_fields_and_zero_checks() {
        let err = Settings::default()
            .with_sources("", FALLBACK_URL)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("primaryUrl"));

        let err = Settings::default()
            .with_usability_checks(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(_)));
    }
}
