//! Optional TOML config file.
//!
//! ```toml
//! [analysis]
//! format = "web_access"
//! timezone = "+03:00"
//! top = 20
//!
//! [analysis.thresholds]
//! error_rate = 0.05
//!
//! [summary]
//! provider = "anthropic"
//! language = "Arabic"
//! ```

use std::path::Path;

use lt_core::RunOptions;
use lt_summary::SummaryConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub analysis: RunOptions,
    #[serde(default)]
    pub summary: SummaryConfig,
}

impl FileConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }
}
