use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// More decimal places than an `f64` can carry is a configuration mistake.
pub const MAX_PRECISION: usize = 17;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CalcConfig {
    pub title: String,
    pub clear_screen: bool,
    pub pause_after_result: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<usize>,
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            clear_screen: true,
            pause_after_result: true,
            precision: None,
        }
    }
}

pub fn default_title() -> String {
    "Simple Calculator".to_string()
}

impl CalcConfig {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            anyhow::bail!("Calculator config validation failed: title must not be empty");
        }
        if let Some(precision) = self.precision {
            if precision > MAX_PRECISION {
                anyhow::bail!(
                    "Calculator config validation failed: precision {} exceeds {}",
                    precision,
                    MAX_PRECISION
                );
            }
        }
        Ok(())
    }

    /// Renders a result the way the session prints it.
    pub fn format_value(&self, value: f64) -> String {
        match self.precision {
            Some(places) => format!("{:.*}", places, value),
            None => value.to_string(),
        }
    }
}

pub async fn load_config(path: &Path) -> Result<CalcConfig> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: CalcConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    config
        .validate()
        .context("Failed to validate loaded calculator config")?;
    Ok(config)
}
