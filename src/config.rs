use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::fs;
use anyhow::{Context, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub data_csv: PathBuf,
    #[serde(default)]
    pub columns: ColumnConfig,
}

/// Header names of the required columns in the source CSV.
/// Defaults match the Global Terrorism Database export.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ColumnConfig {
    pub region: String,
    pub country: String,
    pub provstate: String,
    pub city: String,
    pub year: String,
    pub latitude: String,
    pub longitude: String,
    pub kill: String,
    pub wound: String,
    pub attack_type: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        ColumnConfig {
            region: "region_txt".to_string(),
            country: "country_txt".to_string(),
            provstate: "provstate".to_string(),
            city: "city".to_string(),
            year: "iyear".to_string(),
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
            kill: "nkill".to_string(),
            wound: "nwound".to_string(),
            attack_type: "attacktype1".to_string(),
        }
    }
}

/// Initial selection shown before the user touches any control.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub default_region: String,
    pub default_year_min: i32,
    pub default_year_max: i32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            default_region: "South Asia".to_string(),
            default_year_min: 2010,
            default_year_max: 2017,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [input]
            data_csv = "incidents.csv"

            [server]
            port = 8050
            "#,
        )
        .unwrap();

        assert_eq!(config.input.columns.region, "region_txt");
        assert_eq!(config.input.columns.attack_type, "attacktype1");
        assert_eq!(config.dashboard.default_region, "South Asia");
        assert_eq!(config.dashboard.default_year_min, 2010);
        assert_eq!(config.server.port, 8050);
    }

    #[test]
    fn column_overrides_apply() {
        let config: AppConfig = toml::from_str(
            r#"
            [input]
            data_csv = "incidents.csv"

            [input.columns]
            region = "Region"
            kill = "fatalities"

            [server]
            port = 8050
            "#,
        )
        .unwrap();

        assert_eq!(config.input.columns.region, "Region");
        assert_eq!(config.input.columns.kill, "fatalities");
        // Untouched columns keep their defaults.
        assert_eq!(config.input.columns.wound, "nwound");
    }
}
