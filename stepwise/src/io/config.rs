//! Solver configuration stored in `stepwise.toml`.

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::types::{NotationKind, Settings, Tolerance};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "stepwise.toml";

/// Side lengths the cofactor expansion is allowed to run at; 7! leaf products
/// is still instant.
const DETERMINANT_SIZE_RANGE: RangeInclusive<usize> = 1..=7;

const MAX_DECIMAL_PLACES: u32 = 12;

/// Solver configuration (TOML).
///
/// Intended to be edited by humans. Missing fields default to the values the
/// engines were designed around.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Decimals shown in traces and kept in returned values.
    pub decimal_places: u32,

    /// `plain` for terminal text, `latex` for a typesetting frontend.
    pub notation: NotationKind,

    /// Largest matrix side the determinant engine accepts.
    pub max_determinant_size: usize,

    pub tolerance: Tolerance,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            decimal_places: settings.decimal_places,
            notation: settings.notation,
            max_determinant_size: settings.max_determinant_size,
            tolerance: settings.tolerance,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(anyhow!("decimal_places must be <= {}", MAX_DECIMAL_PLACES));
        }
        if !DETERMINANT_SIZE_RANGE.contains(&self.max_determinant_size) {
            return Err(anyhow!(
                "max_determinant_size must be between {} and {}",
                DETERMINANT_SIZE_RANGE.start(),
                DETERMINANT_SIZE_RANGE.end()
            ));
        }
        if !(self.tolerance.absolute.is_finite() && self.tolerance.absolute > 0.0) {
            return Err(anyhow!("tolerance.absolute must be a positive number"));
        }
        if !(self.tolerance.relative.is_finite() && self.tolerance.relative >= 0.0) {
            return Err(anyhow!("tolerance.relative must be >= 0"));
        }
        Ok(())
    }

    pub fn to_settings(&self) -> Settings {
        Settings {
            decimal_places: self.decimal_places,
            notation: self.notation,
            max_determinant_size: self.max_determinant_size,
            tolerance: self.tolerance,
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `EngineConfig::default()`.
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        return Ok(EngineConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: EngineConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &EngineConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.to_settings(), Settings::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("nested").join("stepwise.toml");
        let cfg = EngineConfig {
            decimal_places: 3,
            notation: NotationKind::Latex,
            ..EngineConfig::default()
        };
        write_config(&path, &cfg).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("stepwise.toml");
        let contents = "notation = \"latex\"\n[tolerance]\nabsolute = 0.001\n";
        fs::write(&path, contents).expect("write");
        let cfg = load_config(&path).expect("load");
        assert_eq!(cfg.notation, NotationKind::Latex);
        assert_eq!(cfg.tolerance.absolute, 0.001);
        assert_eq!(cfg.tolerance.relative, Tolerance::default().relative);
        assert_eq!(cfg.decimal_places, 6);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let oversized = EngineConfig {
            max_determinant_size: 9,
            ..EngineConfig::default()
        };
        assert!(oversized.validate().is_err());

        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("stepwise.toml");
        fs::write(&path, "[tolerance]\nabsolute = -1.0\n").expect("write");
        let err = load_config(&path).expect_err("negative tolerance");
        assert!(format!("{:#}", err).contains("tolerance.absolute"));

        fs::write(&path, "notation = \"braille\"\n").expect("write");
        assert!(load_config(&path).is_err());
    }
}
