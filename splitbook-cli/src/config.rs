use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use splitbook_core::{DEFAULT_EPSILON, PartyCodes};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 10 MiB, the largest statement accepted by `analyze`.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Short codes in the statement's "Who" column
    pub parties: PartyCodes,
    pub settlement: SettlementSection,
    pub display: DisplaySection,
    pub limits: LimitsSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementSection {
    /// Amounts at or below this count as settled
    pub epsilon: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    pub currency_symbol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsSection {
    pub max_file_bytes: u64,
}

impl Default for SettlementSection {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".to_string(),
        }
    }
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// `~/.splitbook`, created on first use.
fn splitbook_dir() -> Result<PathBuf> {
    let home = std::env::var_os("HOME").context("HOME is not set")?;
    let dir = PathBuf::from(home).join(".splitbook");
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(splitbook_dir()?.join("config.toml"))
}

/// Effective config: the file at [`config_path`] if present, defaults otherwise.
pub fn load_config() -> Result<Config> {
    read_config(&config_path()?)
}

fn read_config(path: &Path) -> Result<Config> {
    match fs::read_to_string(path) {
        Ok(s) => parse_config(&s).with_context(|| format!("parse {}", path.display())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
    }
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

/// Write the default config unless one already exists. Returns whether a file was written.
fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    let s = toml::to_string_pretty(&Config::default()).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(true)
}

pub fn init_config() -> Result<()> {
    let path = config_path()?;
    if write_default_config(&path)? {
        println!("Wrote {}", path.display());
    } else {
        println!("Config already exists: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_file_is_default() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.parties, PartyCodes::default());
        assert_eq!(cfg.settlement.epsilon, dec!(0.01));
        assert_eq!(cfg.display.currency_symbol, "₹");
        assert_eq!(cfg.limits.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
    }

    #[test]
    fn test_partial_sections() {
        let cfg = parse_config(
            r#"
[parties]
party_a = "AL"
party_b = "BO"

[display]
currency_symbol = "$"
"#,
        )
        .unwrap();
        assert_eq!(cfg.parties.party_a, "AL");
        assert_eq!(cfg.parties.shared, "C");
        assert_eq!(cfg.display.currency_symbol, "$");
        assert_eq!(cfg.settlement.epsilon, dec!(0.01));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = read_config(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg.limits.max_file_bytes, DEFAULT_MAX_FILE_BYTES);
    }

    #[test]
    fn test_init_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(write_default_config(&path).unwrap());

        fs::write(&path, "[display]\ncurrency_symbol = \"€\"\n").unwrap();
        assert!(!write_default_config(&path).unwrap());
        assert_eq!(read_config(&path).unwrap().display.currency_symbol, "€");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[settlement]\nepsilon = [1, 2]\n").unwrap();
        let err = read_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }

    #[test]
    fn test_round_trip() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let cfg = parse_config(&s).unwrap();
        assert_eq!(cfg.parties, PartyCodes::default());
        assert_eq!(cfg.settlement.epsilon, DEFAULT_EPSILON);
    }
}
