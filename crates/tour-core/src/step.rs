use crate::anchor::AnchorResolver;
use crate::types::Placement;
use serde::{Deserialize, Serialize};

/// One highlighted target in a walkthrough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub target: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub placement: Placement,
    /// Passed through to the walkthrough engine: if the anchor disappears
    /// while the tour is running, the engine moves past the step instead of
    /// pinning an orphaned tooltip.
    #[serde(default = "default_skip_if_missing")]
    pub skip_if_missing: bool,
}

fn default_skip_if_missing() -> bool {
    true
}

impl Step {
    pub fn new(
        target: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            title: title.into(),
            content: content.into(),
            placement: Placement::default(),
            skip_if_missing: default_skip_if_missing(),
        }
    }

    pub fn placed(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }
}

/// Keep the candidates whose target currently resolves, in catalog order.
pub fn filter_renderable(candidates: &[Step], anchors: &dyn AnchorResolver) -> Vec<Step> {
    candidates
        .iter()
        .filter(|s| anchors.is_present(&s.target))
        .cloned()
        .collect()
}
