//! Generator configuration.

use anyhow::{bail, Context, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Resource assigned to endpoints without any `@resource` tag.
pub const DEFAULT_RESOURCE: &str = "Unclassified routes";

/// Marker tag that hides an endpoint from the documentation.
pub const DEFAULT_HIDE_TAG: &str = "docsHide";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Wildcard masks matched against the URI and the route name.
    pub masks: Vec<String>,
    /// Fail endpoints whose path placeholders bind untyped parameters.
    pub type_checks: bool,
    pub hide_tag: String,
    pub fallback_resource: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            masks: vec!["*".to_string()],
            type_checks: true,
            hide_tag: DEFAULT_HIDE_TAG.to_string(),
            fallback_resource: DEFAULT_RESOURCE.to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Read a JSON config file; missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config: GeneratorConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.compile_masks().map(drop)
    }

    /// Validate the config and compile its route masks.
    pub fn compile_masks(&self) -> Result<Vec<Pattern>> {
        if self.masks.is_empty() {
            bail!("at least one route mask is required");
        }
        if self.hide_tag.trim().is_empty() {
            bail!("hide_tag must not be empty");
        }
        self.masks
            .iter()
            .map(|mask| {
                Pattern::new(mask).with_context(|| format!("invalid route mask: {}", mask))
            })
            .collect()
    }
}
