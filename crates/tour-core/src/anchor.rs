//! Target resolution.
//!
//! A page exposes which of its anchors are currently renderable. The
//! orchestrator never probes the page itself; it only receives step lists
//! already filtered through an `AnchorResolver`.

use std::collections::HashSet;
use std::sync::RwLock;

pub trait AnchorResolver: Send + Sync {
    /// Whether `selector` currently resolves to a visible element.
    fn is_present(&self, selector: &str) -> bool;
}

/// Mutable set of mounted anchors. Pages add anchors as their sections render
/// and remove them when sections collapse or feature flags hide them.
#[derive(Debug, Default)]
pub struct AnchorSet {
    present: RwLock<HashSet<String>>,
}

impl AnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<I, S>(anchors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            present: RwLock::new(anchors.into_iter().map(Into::into).collect()),
        }
    }

    pub fn mount(&self, selector: impl Into<String>) {
        self.present
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(selector.into());
    }

    pub fn unmount(&self, selector: &str) {
        self.present
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(selector);
    }

    pub fn len(&self) -> usize {
        self.present.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AnchorResolver for AnchorSet {
    fn is_present(&self, selector: &str) -> bool {
        self.present
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_and_unmount() {
        let anchors = AnchorSet::with(["#course-list"]);
        assert!(anchors.is_present("#course-list"));
        anchors.mount("#grade-table");
        anchors.unmount("#course-list");
        assert!(!anchors.is_present("#course-list"));
        assert!(anchors.is_present("#grade-table"));
        assert_eq!(anchors.len(), 1);
    }
}
