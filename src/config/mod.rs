use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    currency::{CurrencyCode, CurrencyDisplay, LocaleConfig, MoneyFormatter},
    errors::{Result, SimulatorError},
    utils::{
        paths::{ensure_dir, PathResolver},
        persistence,
    },
};

const BACKUP_PREFIX: &str = "config";

/// Keys accepted by [`Config::set`].
pub const CONFIG_KEYS: [&str; 6] = [
    "locale",
    "currency",
    "currency_display",
    "ui_color_enabled",
    "content_path",
    "whatsapp_phone",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    pub currency_display: CurrencyDisplay,
    pub ui_color_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_phone: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "id-ID".into(),
            currency: "IDR".into(),
            currency_display: CurrencyDisplay::Symbol,
            ui_color_enabled: true,
            content_path: None,
            whatsapp_phone: None,
        }
    }
}

impl Config {
    /// Formatter for estimates. Unknown locales fall back to `id-ID`.
    pub fn money_formatter(&self) -> MoneyFormatter {
        let locale = LocaleConfig::for_tag(&self.locale).unwrap_or_else(|| {
            warn!(locale = %self.locale, "unknown locale, using id-ID");
            LocaleConfig::indonesian()
        });
        MoneyFormatter::new(
            CurrencyCode::new(self.currency.clone()),
            locale,
            self.currency_display,
        )
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "locale" => {
                if LocaleConfig::for_tag(value).is_none() {
                    return Err(SimulatorError::InvalidInput(format!(
                        "unsupported locale `{value}` (use id-ID or en-US)"
                    )));
                }
                self.locale = value.to_string();
            }
            "currency" => {
                if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(SimulatorError::InvalidInput(format!(
                        "`{value}` is not an ISO 4217 code"
                    )));
                }
                self.currency = value.to_ascii_uppercase();
            }
            "currency_display" => {
                self.currency_display = match value.to_ascii_lowercase().as_str() {
                    "symbol" => CurrencyDisplay::Symbol,
                    "code" => CurrencyDisplay::Code,
                    other => {
                        return Err(SimulatorError::InvalidInput(format!(
                            "currency_display must be `symbol` or `code`, got `{other}`"
                        )))
                    }
                };
            }
            "ui_color_enabled" => {
                self.ui_color_enabled = parse_flag(value)?;
            }
            "content_path" => {
                self.content_path = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "whatsapp_phone" => {
                self.whatsapp_phone = (!value.is_empty()).then(|| value.to_string());
            }
            other => {
                return Err(SimulatorError::InvalidInput(format!(
                    "unknown configuration key `{other}` (expected one of: {})",
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Key/value pairs for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("locale", self.locale.clone()),
            ("currency", self.currency.clone()),
            (
                "currency_display",
                match self.currency_display {
                    CurrencyDisplay::Symbol => "symbol".into(),
                    CurrencyDisplay::Code => "code".into(),
                },
            ),
            ("ui_color_enabled", self.ui_color_enabled.to_string()),
            (
                "content_path",
                self.content_path
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "(default)".into()),
            ),
            (
                "whatsapp_phone",
                self.whatsapp_phone
                    .clone()
                    .unwrap_or_else(|| "(from content)".into()),
            ),
        ]
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        other => Err(SimulatorError::InvalidInput(format!(
            "`{other}` is not a boolean"
        ))),
    }
}

/// Loads and persists [`Config`] under `<home>/config`.
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        let backups_dir = PathResolver::config_backup_dir_in(&base);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
            backups_dir,
        })
    }

    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&raw).map_err(|err| {
            SimulatorError::ConfigError(format!("{}: {err}", self.path.display()))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        persistence::save_json_atomic(config, &self.path)?;
        info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String> {
        let name =
            persistence::unique_backup_name(&self.backups_dir, BACKUP_PREFIX, note, Utc::now())?;
        let json = serde_json::to_string_pretty(config)?;
        persistence::write_file(&self.backups_dir.join(&name), &json)?;
        info!(backup = %name, "configuration backup created");
        Ok(name)
    }

    /// Reads a backup. The caller decides whether to save it as active.
    pub fn restore(&self, backup_name: &str) -> Result<Config> {
        let path = persistence::backup_path(&self.backups_dir, backup_name).map_err(|_| {
            SimulatorError::StorageError(format!(
                "configuration backup `{backup_name}` not found"
            ))
        })?;
        persistence::load_json(&path)
    }

    pub fn list_backups(&self) -> Result<Vec<String>> {
        persistence::list_backups(&self.backups_dir, BACKUP_PREFIX)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager() -> (ConfigManager, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("manager");
        (manager, temp)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let (manager, _guard) = manager();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.locale, "id-ID");
        assert_eq!(config.currency, "IDR");
    }

    #[test]
    fn set_validates_values() {
        let mut config = Config::default();
        config.set("currency_display", "Code").unwrap();
        assert_eq!(config.currency_display, CurrencyDisplay::Code);
        config.set("whatsapp_phone", "+62 811-000").unwrap();
        assert_eq!(config.whatsapp_phone.as_deref(), Some("+62 811-000"));
        config.set("whatsapp_phone", "").unwrap();
        assert!(config.whatsapp_phone.is_none());
        assert!(config.set("locale", "fr-FR").is_err());
        assert!(config.set("currency", "RUPIAH").is_err());
        assert!(config.set("theme", "dark").is_err());
        assert!(config.set("ui_color_enabled", "maybe").is_err());
    }

    #[test]
    fn save_then_restore_backup() {
        let (manager, _guard) = manager();
        let mut config = Config::default();
        config.set("ui_color_enabled", "off").unwrap();
        manager.save(&config).unwrap();
        let name = manager.backup(&config, Some("no colour")).unwrap();
        assert!(name.starts_with("config_") && name.ends_with("_no-colour.json"));

        manager.save(&Config::default()).unwrap();
        let restored = manager.restore(&name).unwrap();
        assert!(!restored.ui_color_enabled);
        assert_eq!(manager.list_backups().unwrap(), vec![name]);
        assert!(manager.restore("config_19990101_0000.json").is_err());
    }

    #[test]
    fn formatter_follows_config() {
        let mut config = Config::default();
        assert_eq!(config.money_formatter().format(1500.0), "Rp\u{a0}1.500");
        config.set("currency_display", "code").unwrap();
        assert_eq!(config.money_formatter().format(1500.0), "IDR\u{a0}1.500");
    }

    #[test]
    fn corrupted_file_is_a_config_error() {
        let (manager, _guard) = manager();
        std::fs::write(manager.path(), "{ locale: ").unwrap();
        assert!(matches!(
            manager.load(),
            Err(SimulatorError::ConfigError(_))
        ));
    }
}
