use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::layout::LayoutConfig;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct PndConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub bad_handles_only: bool,
}

impl PndConfig {
    /// 读取 TOML 配置；文件不存在时使用默认值。
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let config = PndConfig::load_from_file("/nonexistent/pnd.toml").unwrap();
        assert_eq!(config, PndConfig::default());
        assert_eq!(config.layout.max_iterations, 1000);
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = PndConfig::from_toml(
            r#"
            [layout]
            node_size = 30.0
            seed = 42
            snap_to_grid = true

            [analysis]
            bad_handles_only = true
            "#,
        )
        .unwrap();
        assert_eq!(config.layout.node_size, 30.0);
        assert_eq!(config.layout.seed, Some(42));
        assert!(config.layout.snap_to_grid);
        assert_eq!(config.layout.stop_count, 15);
        assert_eq!(config.layout.repulsion, 50000.0);
        assert!(config.analysis.bad_handles_only);
    }

    #[test]
    fn unknown_values_are_rejected() {
        assert!(PndConfig::from_toml("[layout]\nnode_size = \"big\"\n").is_err());
    }
}
