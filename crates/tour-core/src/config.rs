use crate::error::Result;
use crate::keys;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// TourConfig
// ---------------------------------------------------------------------------

/// Timing and presentation knobs. Allow-lists are compiled in and never read
/// from disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourConfig {
    /// Wait after first mount before auto-starting a page tour.
    #[serde(default = "default_autostart_delay")]
    pub autostart_delay_ms: u64,
    /// Wait after a launch signal before probing anchors and resuming.
    #[serde(default = "default_resume_delay")]
    pub resume_delay_ms: u64,
    /// Wait after a navigation before dispatching the launch signal.
    #[serde(default = "default_signal_delay")]
    pub launch_signal_delay_ms: u64,
    #[serde(default = "default_dismissable")]
    pub dismissable: bool,
}

fn default_autostart_delay() -> u64 {
    400
}

fn default_resume_delay() -> u64 {
    300
}

fn default_signal_delay() -> u64 {
    100
}

fn default_dismissable() -> bool {
    true
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            autostart_delay_ms: default_autostart_delay(),
            resume_delay_ms: default_resume_delay(),
            launch_signal_delay_ms: default_signal_delay(),
            dismissable: default_dismissable(),
        }
    }
}

impl TourConfig {
    /// Load `.tour/config.yaml` under `root`; a missing file means defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = keys::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: TourConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = keys::config_path(root);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_yaml::to_string(self)?;
        std::fs::write(&path, data)?;
        Ok(())
    }

    pub fn autostart_delay(&self) -> Duration {
        Duration::from_millis(self.autostart_delay_ms)
    }

    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.resume_delay_ms)
    }

    pub fn launch_signal_delay(&self) -> Duration {
        Duration::from_millis(self.launch_signal_delay_ms)
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        // Anchors need a mount cycle before they can be probed
        if self.resume_delay_ms == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "resume_delay_ms is 0: resumed tours may find no anchors".to_string(),
            });
        }

        for (name, value) in [
            ("autostart_delay_ms", self.autostart_delay_ms),
            ("resume_delay_ms", self.resume_delay_ms),
            ("launch_signal_delay_ms", self.launch_signal_delay_ms),
        ] {
            if value > 60_000 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("{name}={value} exceeds one minute"),
                });
            } else if value > 5_000 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("{name}={value} is unusually long (>5000ms)"),
                });
            }
        }

        if !self.dismissable {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "dismissable is false: users cannot close a running tour".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
