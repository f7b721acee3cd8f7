use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// TriagePolicyConfig
// ---------------------------------------------------------------------------

/// Policy knobs read once at the start of each triage run and threaded
/// through the pipeline — never process-global state, so concurrent runs
/// and tests stay independent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriagePolicyConfig {
    #[serde(default = "default_auto_close")]
    pub auto_close_enabled: bool,
    /// 0.0–1.0. A classification at or above this confidence qualifies for
    /// auto-close when the flag is enabled.
    #[serde(default = "default_threshold")]
    pub confidence_threshold: f64,
    #[serde(default = "default_sla_hours")]
    pub sla_hours: u32,
}

fn default_auto_close() -> bool {
    false
}

fn default_threshold() -> f64 {
    0.7
}

fn default_sla_hours() -> u32 {
    24
}

impl Default for TriagePolicyConfig {
    fn default() -> Self {
        Self {
            auto_close_enabled: default_auto_close(),
            confidence_threshold: default_threshold(),
            sla_hours: default_sla_hours(),
        }
    }
}

impl TriagePolicyConfig {
    /// Load the policy file, falling back to the safe default (auto-close
    /// disabled, threshold 0.7) when none has been written yet. A corrupt
    /// file is an error, not a silent fallback.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::policy_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let config: TriagePolicyConfig = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::policy_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_falls_back_to_default() {
        let dir = TempDir::new().unwrap();
        let config = TriagePolicyConfig::load(dir.path()).unwrap();
        assert!(!config.auto_close_enabled);
        assert_eq!(config.confidence_threshold, 0.7);
        assert_eq!(config.sla_hours, 24);
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let config = TriagePolicyConfig {
            auto_close_enabled: true,
            confidence_threshold: 0.8,
            sla_hours: 48,
        };
        config.save(dir.path()).unwrap();

        let loaded = TriagePolicyConfig::load(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_uses_field_defaults() {
        let dir = TempDir::new().unwrap();
        let path = paths::policy_path(dir.path());
        crate::io::atomic_write(&path, b"auto_close_enabled: true\n").unwrap();

        let loaded = TriagePolicyConfig::load(dir.path()).unwrap();
        assert!(loaded.auto_close_enabled);
        assert_eq!(loaded.confidence_threshold, 0.7);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = paths::policy_path(dir.path());
        crate::io::atomic_write(&path, b"{not yaml: [").unwrap();
        assert!(TriagePolicyConfig::load(dir.path()).is_err());
    }
}
