use serde::Serialize;

use crate::step::Step;
use crate::types::Role;

// ---------------------------------------------------------------------------
// TourSession
// ---------------------------------------------------------------------------

/// The walkthrough currently on screen. Exclusively owned by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TourSession {
    pub tour_id: String,
    pub steps: Vec<Step>,
    pub cursor: usize,
    pub running: bool,
    /// Whether the close (X) affordance is visible.
    pub dismissable: bool,
}

impl TourSession {
    pub fn new(tour_id: impl Into<String>, steps: Vec<Step>, dismissable: bool) -> Self {
        Self {
            tour_id: tour_id.into(),
            steps,
            cursor: 0,
            running: true,
            dismissable,
        }
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.cursor)
    }

    pub fn is_last_step(&self) -> bool {
        self.cursor + 1 >= self.steps.len()
    }

    /// Running sessions show "n / total".
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor + 1, self.steps.len())
    }

    pub(crate) fn halt(&mut self) {
        self.running = false;
        self.dismissable = false;
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Orchestrator state.
///
/// Transitions: `Idle → Running → Completed | Skipped`, with
/// `AwaitingContinuation` between a finished page and the user's answer to
/// the continue prompt. `stop_tour` returns any state to `Idle`; `start_tour`
/// moves any state to `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Running,
    AwaitingContinuation,
    Completed,
    Skipped,
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// Dialog shown after a page's tour ends.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Prompt {
    #[default]
    None,
    /// "Continue to next page?" with Cancel / Next.
    Continue { next: String, remaining: Vec<String> },
    /// Congratulations, with a Restart action.
    TourComplete { role: Option<Role> },
}

impl Prompt {
    pub fn is_none(&self) -> bool {
        matches!(self, Prompt::None)
    }
}
