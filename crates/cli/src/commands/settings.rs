//! Preference commands.

use clap::Subcommand;

use avento_core::Setting;

use super::{App, CliError};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show current settings
    Show,
    /// Pull the authoritative record from the backend
    Refresh,
    /// Change one setting
    Set {
        /// Setting name: login-alerts, trusted-devices, analytics-tracking,
        /// personalized-recommendations, dark-mode, compact-product-layout
        key: String,
        /// true/false; dark-mode also accepts "system"
        value: String,
    },
}

pub async fn run(app: &App, action: SettingsAction) -> Result<(), CliError> {
    match action {
        SettingsAction::Show => {
            render(app);
            Ok(())
        }
        SettingsAction::Refresh => {
            app.settings.load_settings().await?;
            render(app);
            Ok(())
        }
        SettingsAction::Set { key, value } => {
            let setting = parse_setting(&key, &value)?;
            app.settings.update_setting(setting).await?;
            render(app);
            Ok(())
        }
    }
}

fn render(app: &App) {
    let settings = app.settings.settings();
    println!("login-alerts:                 {}", settings.login_alerts);
    println!("trusted-devices:              {}", settings.trusted_devices);
    println!("analytics-tracking:           {}", settings.analytics_tracking);
    println!(
        "personalized-recommendations: {}",
        settings.personalized_recommendations
    );
    let dark_mode = settings
        .dark_mode
        .map_or_else(|| "system".to_owned(), |v| v.to_string());
    println!("dark-mode:                    {dark_mode}");
    println!(
        "compact-product-layout:       {}",
        settings.compact_product_layout
    );
}

fn parse_setting(key: &str, value: &str) -> Result<Setting, CliError> {
    let flag = || parse_bool(value);
    match key {
        "login-alerts" => Ok(Setting::LoginAlerts(flag()?)),
        "trusted-devices" => Ok(Setting::TrustedDevices(flag()?)),
        "analytics-tracking" => Ok(Setting::AnalyticsTracking(flag()?)),
        "personalized-recommendations" => Ok(Setting::PersonalizedRecommendations(flag()?)),
        "compact-product-layout" => Ok(Setting::CompactProductLayout(flag()?)),
        "dark-mode" => {
            if value.eq_ignore_ascii_case("system") {
                Ok(Setting::DarkMode(None))
            } else {
                Ok(Setting::DarkMode(Some(parse_bool(value)?)))
            }
        }
        other => Err(CliError::InvalidArgument(format!(
            "unknown setting: {other}"
        ))),
    }
}

fn parse_bool(value: &str) -> Result<bool, CliError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        other => Err(CliError::InvalidArgument(format!(
            "expected true or false, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_settings() {
        assert!(matches!(
            parse_setting("login-alerts", "false"),
            Ok(Setting::LoginAlerts(false))
        ));
        assert!(matches!(
            parse_setting("analytics-tracking", "on"),
            Ok(Setting::AnalyticsTracking(true))
        ));
    }

    #[test]
    fn test_parse_dark_mode_tristate() {
        assert!(matches!(
            parse_setting("dark-mode", "true"),
            Ok(Setting::DarkMode(Some(true)))
        ));
        assert!(matches!(
            parse_setting("dark-mode", "system"),
            Ok(Setting::DarkMode(None))
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_key() {
        assert!(parse_setting("font-size", "12").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_value() {
        assert!(parse_setting("login-alerts", "maybe").is_err());
    }
}
