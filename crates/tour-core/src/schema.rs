//! Typed view over the shared store.
//!
//! Every tour key is read and written through `TourStore` so that callers
//! deal in `TourStatus`, `TourMode` and `LaunchTag` instead of raw strings.
//! Reads surface malformed values as errors; deciding how to degrade is left
//! to the caller.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::keys;
use crate::store::KeyValueStore;
use crate::types::{LaunchTag, TourMode, TourStatus};

/// What the orchestrator leaves behind before driving a navigation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NavigationIntent {
    pub mode: TourMode,
    pub queue: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch: Option<LaunchTag>,
}

#[derive(Clone)]
pub struct TourStore {
    kv: Arc<dyn KeyValueStore>,
}

impl TourStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &Arc<dyn KeyValueStore> {
        &self.kv
    }

    // ---------------------------------------------------------------------------
    // Per-tour state
    // ---------------------------------------------------------------------------

    /// An absent key reads as `NotStarted`.
    pub fn tour_status(&self, tour_id: &str) -> Result<TourStatus> {
        match self.kv.get(&keys::tour_state_key(tour_id))? {
            Some(raw) => raw.parse(),
            None => Ok(TourStatus::NotStarted),
        }
    }

    pub fn set_tour_status(&self, tour_id: &str, status: TourStatus) -> Result<()> {
        self.kv
            .set(&keys::tour_state_key(tour_id), status.as_str())
    }

    pub fn autostarted(&self, feature: &str) -> Result<bool> {
        Ok(self.kv.get(&keys::autostart_key(feature))?.is_some())
    }

    /// The marker value is the time of the first automatic showing.
    pub fn mark_autostarted(&self, feature: &str) -> Result<()> {
        self.kv
            .set(&keys::autostart_key(feature), &Utc::now().to_rfc3339())
    }

    // ---------------------------------------------------------------------------
    // Navigation intent
    // ---------------------------------------------------------------------------

    /// An absent mode reads as `Single`.
    pub fn mode(&self) -> Result<TourMode> {
        match self.kv.get(keys::MODE_KEY)? {
            Some(raw) => raw.parse(),
            None => Ok(TourMode::Single),
        }
    }

    pub fn set_mode(&self, mode: TourMode) -> Result<()> {
        self.kv.set(keys::MODE_KEY, mode.as_str())
    }

    /// An absent queue reads as empty; anything that is not a JSON array of
    /// strings is an error.
    pub fn queue(&self) -> Result<Vec<String>> {
        self.read_paths(keys::QUEUE_KEY)
    }

    pub fn set_queue(&self, queue: &[String]) -> Result<()> {
        self.kv.set(keys::QUEUE_KEY, &serde_json::to_string(queue)?)
    }

    pub fn launch_tag(&self) -> Result<Option<LaunchTag>> {
        self.kv
            .get(keys::LAUNCH_KEY)?
            .map(|raw| raw.parse())
            .transpose()
    }

    pub fn set_launch_tag(&self, tag: LaunchTag) -> Result<()> {
        self.kv.set(keys::LAUNCH_KEY, &tag.to_string())
    }

    pub fn clear_launch_tag(&self) -> Result<()> {
        self.kv.remove(keys::LAUNCH_KEY)
    }

    pub fn intent(&self) -> Result<NavigationIntent> {
        Ok(NavigationIntent {
            mode: self.mode()?,
            queue: self.queue()?,
            launch: self.launch_tag()?,
        })
    }

    /// Queue and mode land before the launch tag, since the tag is what a
    /// mounting page reacts to.
    pub fn write_intent(&self, intent: &NavigationIntent) -> Result<()> {
        self.set_queue(&intent.queue)?;
        self.set_mode(intent.mode)?;
        match intent.launch {
            Some(tag) => self.set_launch_tag(tag),
            None => self.clear_launch_tag(),
        }
    }

    /// Whether any intent key is present, parseable or not.
    pub fn has_intent(&self) -> Result<bool> {
        for key in keys::INTENT_KEYS {
            if self.kv.get(key)?.is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Remove queue, mode and launch tag. Removing absent keys is a no-op.
    pub fn clear_intent(&self) -> Result<()> {
        for key in keys::INTENT_KEYS {
            self.kv.remove(key)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------------
    // Full-sequence definition
    // ---------------------------------------------------------------------------

    pub fn full_sequence(&self) -> Result<Vec<String>> {
        self.read_paths(keys::FULL_SEQUENCE_KEY)
    }

    pub fn set_full_sequence(&self, paths: &[String]) -> Result<()> {
        self.kv
            .set(keys::FULL_SEQUENCE_KEY, &serde_json::to_string(paths)?)
    }

    // ---------------------------------------------------------------------------
    // Whole-namespace helpers
    // ---------------------------------------------------------------------------

    pub fn dump(&self) -> Result<BTreeMap<String, String>> {
        let mut out = BTreeMap::new();
        for key in self.kv.keys_with_prefix(keys::KEY_PREFIX)? {
            if let Some(value) = self.kv.get(&key)? {
                out.insert(key, value);
            }
        }
        Ok(out)
    }

    /// Remove every tour key, including per-tour states and autostart markers.
    /// Returns the number of keys removed.
    pub fn clear_all(&self) -> Result<usize> {
        let all = self.kv.keys_with_prefix(keys::KEY_PREFIX)?;
        for key in &all {
            self.kv.remove(key)?;
        }
        Ok(all.len())
    }

    fn read_paths(&self, key: &str) -> Result<Vec<String>> {
        match self.kv.get(key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
