use crate::error::{MatcherError, Result};
use itemcode_core::{Rgb, SheetScope, StylingFidelity, DEFAULT_FUZZY_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// ログイン情報（パスワードはSHA-256のhex）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password_sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fuzzy_threshold: u8,
    pub styling_fidelity: StylingFidelity,
    pub sheet_scope: SheetScope,
    /// 未解決セルの塗りつぶし色（RRGGBB）
    pub highlight_color: String,
    pub auth: Option<AuthConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MatcherError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("itemcode-matcher").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            styling_fidelity: StylingFidelity::PreserveAll,
            sheet_scope: SheetScope::AllSheets,
            highlight_color: Rgb::YELLOW.to_hex(),
            auth: None,
        }
    }

    /// 値の範囲チェック
    pub fn validate(&self) -> Result<()> {
        if self.fuzzy_threshold > 100 {
            return Err(MatcherError::Config(format!(
                "fuzzy_threshold は0〜100で指定してください: {}",
                self.fuzzy_threshold
            )));
        }
        self.highlight()?;
        Ok(())
    }

    pub fn highlight(&self) -> Result<Rgb> {
        Rgb::from_hex(&self.highlight_color).ok_or_else(|| {
            MatcherError::Config(format!("highlight_color が不正です: {}", self.highlight_color))
        })
    }

    pub fn set_auth(&mut self, auth: Option<AuthConfig>) -> Result<()> {
        self.auth = auth;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.fuzzy_threshold, 90);
        assert_eq!(config.styling_fidelity, StylingFidelity::PreserveAll);
        assert_eq!(config.sheet_scope, SheetScope::AllSheets);
        assert_eq!(config.highlight().unwrap(), Rgb::YELLOW);
        assert!(config.auth.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"sheet_scope":"first"}"#).unwrap();
        assert_eq!(config.sheet_scope, SheetScope::FirstSheetOnly);
        assert_eq!(config.fuzzy_threshold, 90);
    }

    #[test]
    fn test_roundtrip_json() {
        let config = Config {
            styling_fidelity: StylingFidelity::ValuesOnly,
            auth: Some(AuthConfig {
                username: "admin".into(),
                password_sha256: "00".into(),
            }),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"values\""));
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.auth, config.auth);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config { fuzzy_threshold: 150, ..Default::default() };
        assert!(matches!(config.validate(), Err(MatcherError::Config(_))));

        let config = Config { highlight_color: "yellow".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(MatcherError::Config(_))));

        let config = Config { highlight_color: "aéééb".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(MatcherError::Config(_))));
    }
}
