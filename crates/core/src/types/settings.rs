//! Per-user preference flags.

use serde::{Deserialize, Serialize};

/// Flat record of preference flags, one instance per authenticated user.
///
/// `dark_mode` is tri-state: `Some(true)`/`Some(false)` force the theme,
/// `None` defers to the OS-level preference at apply time.
///
/// Field names follow the backend's camelCase wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub login_alerts: bool,
    pub trusted_devices: bool,
    pub analytics_tracking: bool,
    pub personalized_recommendations: bool,
    pub dark_mode: Option<bool>,
    pub compact_product_layout: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            login_alerts: true,
            trusted_devices: true,
            analytics_tracking: false,
            personalized_recommendations: false,
            dark_mode: None,
            compact_product_layout: false,
        }
    }
}

/// A single preference change, keyed the way the wire format keys it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    LoginAlerts(bool),
    TrustedDevices(bool),
    AnalyticsTracking(bool),
    PersonalizedRecommendations(bool),
    DarkMode(Option<bool>),
    CompactProductLayout(bool),
}

impl Setting {
    /// The wire-format key for this setting.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::LoginAlerts(_) => "loginAlerts",
            Self::TrustedDevices(_) => "trustedDevices",
            Self::AnalyticsTracking(_) => "analyticsTracking",
            Self::PersonalizedRecommendations(_) => "personalizedRecommendations",
            Self::DarkMode(_) => "darkMode",
            Self::CompactProductLayout(_) => "compactProductLayout",
        }
    }
}

impl UserSettings {
    /// Apply a single change to this record.
    pub const fn apply(&mut self, setting: Setting) {
        match setting {
            Setting::LoginAlerts(v) => self.login_alerts = v,
            Setting::TrustedDevices(v) => self.trusted_devices = v,
            Setting::AnalyticsTracking(v) => self.analytics_tracking = v,
            Setting::PersonalizedRecommendations(v) => self.personalized_recommendations = v,
            Setting::DarkMode(v) => self.dark_mode = v,
            Setting::CompactProductLayout(v) => self.compact_product_layout = v,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = UserSettings::default();
        assert!(settings.login_alerts);
        assert!(settings.trusted_devices);
        assert!(!settings.analytics_tracking);
        assert!(!settings.personalized_recommendations);
        assert_eq!(settings.dark_mode, None);
        assert!(!settings.compact_product_layout);
    }

    #[test]
    fn test_apply() {
        let mut settings = UserSettings::default();
        settings.apply(Setting::DarkMode(Some(true)));
        settings.apply(Setting::LoginAlerts(false));
        assert_eq!(settings.dark_mode, Some(true));
        assert!(!settings.login_alerts);
    }

    #[test]
    fn test_camel_case_wire_format() {
        let json = serde_json::to_value(UserSettings::default()).unwrap();
        assert_eq!(json["loginAlerts"], true);
        assert_eq!(json["darkMode"], serde_json::Value::Null);
    }

    #[test]
    fn test_partial_record_fills_defaults() {
        let settings: UserSettings =
            serde_json::from_str(r#"{"analyticsTracking":true}"#).unwrap();
        assert!(settings.analytics_tracking);
        assert!(settings.login_alerts);
    }
}
