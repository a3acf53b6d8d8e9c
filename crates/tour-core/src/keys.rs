use crate::error::{Result, TourError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Store key constants
// ---------------------------------------------------------------------------

/// Every key this crate writes starts with this prefix.
pub const KEY_PREFIX: &str = "tour:";

pub const QUEUE_KEY: &str = "tour:queue";
pub const MODE_KEY: &str = "tour:mode";
pub const LAUNCH_KEY: &str = "tour:launch";
pub const FULL_SEQUENCE_KEY: &str = "tour:full:sequence";

/// Keys that together form the navigation intent.
pub const INTENT_KEYS: [&str; 3] = [QUEUE_KEY, MODE_KEY, LAUNCH_KEY];

// ---------------------------------------------------------------------------
// Workspace files
// ---------------------------------------------------------------------------

pub const TOUR_DIR: &str = ".tour";
pub const CONFIG_FILE: &str = ".tour/config.yaml";
pub const STORE_FILE: &str = ".tour/store.redb";

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn store_path(root: &Path) -> PathBuf {
    root.join(STORE_FILE)
}

// ---------------------------------------------------------------------------
// Key helpers
// ---------------------------------------------------------------------------

pub fn tour_state_key(tour_id: &str) -> String {
    format!("tour:{tour_id}:state")
}

pub fn autostart_key(feature: &str) -> String {
    format!("tour:{feature}:v1:autostart")
}

// ---------------------------------------------------------------------------
// Id validation
// ---------------------------------------------------------------------------

static ID_RE: OnceLock<Regex> = OnceLock::new();

fn id_re() -> &'static Regex {
    ID_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

/// Tour ids and feature names are embedded in keys, so they must not carry `:`.
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || id.len() > 64 || !id_re().is_match(id) {
        return Err(TourError::InvalidTourId(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_patterns() {
        assert_eq!(tour_state_key("student-dashboard"), "tour:student-dashboard:state");
        assert_eq!(autostart_key("gradebook"), "tour:gradebook:v1:autostart");
        assert!(INTENT_KEYS.iter().all(|k| k.starts_with(KEY_PREFIX)));
    }

    #[test]
    fn valid_ids() {
        for id in ["student-dashboard", "x", "admin-reports-2"] {
            validate_id(id).unwrap_or_else(|_| panic!("expected valid: {id}"));
        }
    }

    #[test]
    fn invalid_ids() {
        for id in ["", "has:colon", "-dash", "dash-", "Upper", "a b"] {
            assert!(validate_id(id).is_err(), "expected invalid: {id}");
        }
    }

    #[test]
    fn file_helpers() {
        let root = Path::new("/tmp/portal");
        assert_eq!(config_path(root), PathBuf::from("/tmp/portal/.tour/config.yaml"));
        assert_eq!(store_path(root), PathBuf::from("/tmp/portal/.tour/store.redb"));
    }
}
