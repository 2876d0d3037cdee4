use super::LedgerSettings;
use crate::errors::Result;
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Loads settings from a JSON file. A missing file yields the defaults;
/// keys absent from the file keep their default values.
pub fn load_settings(path: &Path) -> Result<LedgerSettings> {
    if !path.exists() {
        warn!(
            "Settings file {} not found, using defaults",
            path.display()
        );
        return Ok(LedgerSettings::default());
    }

    let raw = fs::read_to_string(path)?;
    let settings: LedgerSettings = serde_json::from_str(&raw)?;
    settings.validate()?;
    debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &LedgerSettings) -> Result<()> {
    settings.validate()?;
    let raw = serde_json::to_string_pretty(settings)?;
    fs::write(path, raw)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::fx::{FxSource, RateKind};
    use rust_decimal_macros::dec;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("app_config.json")).unwrap();

        assert_eq!(settings, LedgerSettings::default());
        assert_eq!(settings.canonical_source(RateKind::Official), FxSource::Bcra);
        assert_eq!(settings.canonical_source(RateKind::Ccl), FxSource::Ambito);
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app_config.json");
        fs::write(
            &path,
            r#"{ "defaultFxRate": 1200, "tierThresholds": { "middle": 10, "top": 20 } }"#,
        )
        .unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.default_fx_rate, dec!(1200));
        assert_eq!(settings.tier_thresholds.top, dec!(20));
        assert_eq!(settings.vat_rate, dec!(0.21));
        assert_eq!(settings.fallback_fx_source, FxSource::DolarHoy);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app_config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_settings(&path), Err(Error::ConfigIO(_))));
    }

    #[test]
    fn test_descending_thresholds_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app_config.json");
        fs::write(
            &path,
            r#"{ "tierThresholds": { "middle": 100, "top": 10 } }"#,
        )
        .unwrap();

        assert!(matches!(
            load_settings(&path),
            Err(Error::InvalidConfigValue(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app_config.json");
        let settings = LedgerSettings {
            include_liquidity_in_totals: false,
            ..LedgerSettings::default()
        };

        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path).unwrap(), settings);
    }
}
