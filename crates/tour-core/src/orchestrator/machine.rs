use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::allowlist::AllowList;
use crate::bus::LaunchBus;
use crate::config::TourConfig;
use crate::error::Result;
use crate::keys;
use crate::navigation::Navigator;
use crate::schema::{NavigationIntent, TourStore};
use crate::step::Step;
use crate::types::{CompletionStatus, LaunchTag, Role, TourMode, TourStatus};

use super::session::{Phase, Prompt, TourSession};

/// Continuation held in memory until the user answers the prompt. Nothing is
/// written to the store for it before "Next".
#[derive(Debug, Clone)]
struct Pending {
    next: String,
    remaining: Vec<String>,
    role: Option<Role>,
}

pub struct Orchestrator {
    store: TourStore,
    navigator: Arc<dyn Navigator>,
    bus: LaunchBus,
    allow: AllowList,
    signal_delay: Duration,
    /// From config; `false` keeps the X control hidden on every started tour.
    dismissable: bool,
    session: Option<TourSession>,
    phase: Phase,
    /// Terminal outcome of the last session, restored after a prompt closes.
    outcome: Phase,
    prompt: Prompt,
    pending: Option<Pending>,
    /// Step lists of every tour started in this process, for `restart_tour`.
    known: HashMap<String, Vec<Step>>,
}

impl Orchestrator {
    pub fn new(store: TourStore, navigator: Arc<dyn Navigator>, bus: LaunchBus) -> Self {
        let cfg = TourConfig::default();
        Self {
            store,
            navigator,
            bus,
            allow: AllowList::builtin(),
            signal_delay: cfg.launch_signal_delay(),
            dismissable: cfg.dismissable,
            session: None,
            phase: Phase::Idle,
            outcome: Phase::Idle,
            prompt: Prompt::None,
            pending: None,
            known: HashMap::new(),
        }
    }

    pub fn with_config(mut self, cfg: &TourConfig) -> Self {
        self.signal_delay = cfg.launch_signal_delay();
        self.dismissable = cfg.dismissable;
        self
    }

    pub fn with_allow_list(mut self, allow: AllowList) -> Self {
        self.allow = allow;
        self
    }

    // ---------------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------------

    pub fn session(&self) -> Option<&TourSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    pub fn is_running(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.running)
    }

    pub fn dismiss_visible(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.dismissable)
    }

    pub fn store(&self) -> &TourStore {
        &self.store
    }

    // ---------------------------------------------------------------------------
    // Start / stop / restart
    // ---------------------------------------------------------------------------

    /// Start `tour_id` at its first step, replacing whatever was on screen.
    ///
    /// Returns `Ok(false)` without side effects when `steps` is empty.
    pub fn start_tour(&mut self, tour_id: &str, steps: Vec<Step>) -> Result<bool> {
        if steps.is_empty() {
            debug!(tour = %tour_id, "no renderable steps, tour not started");
            return Ok(false);
        }
        keys::validate_id(tour_id)?;

        if let Some(old) = self.session.as_ref().filter(|s| s.running) {
            debug!(old = %old.tour_id, new = %tour_id, "replacing running tour");
        }

        self.known.insert(tour_id.to_string(), steps.clone());
        self.session = Some(TourSession::new(tour_id, steps, self.dismissable));
        self.phase = Phase::Running;
        self.prompt = Prompt::None;
        self.pending = None;

        if let Err(e) = self.store.set_tour_status(tour_id, TourStatus::InProgress) {
            warn!(tour = %tour_id, error = %e, "failed to persist tour state");
        }
        info!(tour = %tour_id, "tour started");
        Ok(true)
    }

    /// Re-enter a tour this orchestrator has already run, with its last step
    /// list. Returns `Ok(false)` for a tour it has never seen.
    pub fn restart_tour(&mut self, tour_id: &str) -> Result<bool> {
        match self.known.get(tour_id).cloned() {
            Some(steps) => self.start_tour(tour_id, steps),
            None => {
                debug!(tour = %tour_id, "restart requested for unknown tour");
                Ok(false)
            }
        }
    }

    /// The user bailed out. Leaves no intent behind that could resume a tour
    /// on some later page. Never writes the per-tour state.
    ///
    /// With nothing running, no prompt open and no intent keys stored, this
    /// touches nothing.
    pub fn stop_tour(&mut self) {
        let stale_intent = match self.store.has_intent() {
            Ok(present) => present,
            Err(e) => {
                warn!(error = %e, "failed to check navigation intent on stop");
                true
            }
        };
        let active = self.is_running() || !self.prompt.is_none() || stale_intent;
        if let Some(session) = self.session.as_mut() {
            session.halt();
        }
        self.pending = None;
        self.prompt = Prompt::None;
        if !active {
            return;
        }
        self.phase = Phase::Idle;
        if let Err(e) = self.store.clear_intent() {
            warn!(error = %e, "failed to clear navigation intent on stop");
        }
        info!("tour stopped by user");
    }

    // ---------------------------------------------------------------------------
    // Walkthrough engine events
    // ---------------------------------------------------------------------------

    /// "Next" in the tooltip. Advancing past the last step finishes the tour.
    pub fn next_step(&mut self) -> Prompt {
        let Some(session) = self.session.as_mut().filter(|s| s.running) else {
            return Prompt::None;
        };
        if session.is_last_step() {
            return self.on_step_engine_completion(CompletionStatus::Finished);
        }
        session.cursor += 1;
        Prompt::None
    }

    /// "Back" in the tooltip.
    pub fn prev_step(&mut self) {
        if let Some(session) = self.session.as_mut().filter(|s| s.running) {
            session.cursor = session.cursor.saturating_sub(1);
        }
    }

    /// "Skip tour" in the tooltip.
    pub fn skip_tour(&mut self) -> Prompt {
        self.on_step_engine_completion(CompletionStatus::Skipped)
    }

    /// The X control.
    pub fn close(&mut self) {
        self.stop_tour();
    }

    // ---------------------------------------------------------------------------
    // Completion handling
    // ---------------------------------------------------------------------------

    /// Decide what follows the end of the current page's tour.
    ///
    /// Non-terminal statuses, and any status arriving while no tour is
    /// running, are ignored. Store failures degrade to clearing the intent
    /// and showing nothing.
    pub fn on_step_engine_completion(&mut self, status: CompletionStatus) -> Prompt {
        if !status.is_terminal() {
            return Prompt::None;
        }
        let Some(session) = self.session.as_mut().filter(|s| s.running) else {
            debug!(?status, "completion event with no running tour ignored");
            return Prompt::None;
        };
        session.halt();
        let tour_id = session.tour_id.clone();

        let (persisted, phase) = match status {
            CompletionStatus::Finished => (TourStatus::Completed, Phase::Completed),
            _ => (TourStatus::Skipped, Phase::Skipped),
        };
        self.phase = phase;
        self.outcome = phase;
        if let Err(e) = self.store.set_tour_status(&tour_id, persisted) {
            warn!(tour = %tour_id, error = %e, "failed to persist tour state");
        }
        info!(tour = %tour_id, status = %persisted, "tour ended");

        let current = self.navigator.current();
        let role = self.allow.infer_role(&current);

        let (mode, queue) = match self.store.mode().and_then(|m| Ok((m, self.store.queue()?))) {
            Ok(read) => read,
            Err(e) => {
                warn!(error = %e, "unreadable navigation intent, finishing silently");
                self.clear_intent();
                return Prompt::None;
            }
        };
        let queue = self.allow.sanitize(role, &queue);

        if mode == TourMode::Full && !queue.is_empty() {
            let mut remaining: Vec<String> = queue.into_iter().filter(|p| *p != current).collect();
            if !remaining.is_empty() {
                let next = remaining.remove(0);
                let role = role.or_else(|| self.allow.infer_role(&next));
                self.pending = Some(Pending {
                    next: next.clone(),
                    remaining: remaining.clone(),
                    role,
                });
                self.phase = Phase::AwaitingContinuation;
                self.prompt = Prompt::Continue { next, remaining };
                return self.prompt.clone();
            }
            debug!(path = %current, "queue held only the current page");
        }

        self.clear_intent();
        self.prompt = match mode {
            TourMode::Full => Prompt::TourComplete { role },
            TourMode::Single => Prompt::None,
        };
        self.prompt.clone()
    }

    /// "Next" on the continue prompt. Persists the remaining queue, then
    /// navigates. Returns `false` when there was nothing pending or the
    /// continuation had to be abandoned.
    pub fn continue_to_next(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        self.close_prompt();

        let Some(role) = pending.role else {
            warn!(path = %pending.next, "cannot resume into a page with no role");
            self.clear_intent();
            return false;
        };

        let intent = NavigationIntent {
            mode: TourMode::Full,
            queue: pending.remaining,
            launch: Some(LaunchTag::resume(role)),
        };
        if let Err(e) = self.store.write_intent(&intent) {
            warn!(error = %e, "failed to persist continuation, abandoning");
            self.clear_intent();
            return false;
        }
        self.navigate(&pending.next)
    }

    /// "Cancel" on the continue prompt.
    pub fn cancel_continuation(&mut self) {
        if self.pending.take().is_some() {
            debug!("continuation cancelled");
        }
        self.close_prompt();
    }

    /// Close the completion prompt without restarting.
    pub fn dismiss_prompt(&mut self) {
        self.cancel_continuation();
    }

    /// "Restart" on the completion prompt: seed a fresh full sequence from the
    /// stored definition and go to its first page.
    pub fn restart_full_sequence(&mut self) -> bool {
        self.pending = None;
        self.close_prompt();

        let definition = match self.store.full_sequence() {
            Ok(d) => d,
            Err(e) => {
                warn!(error = %e, "unreadable full-sequence definition");
                self.clear_intent();
                return false;
            }
        };

        let role = definition
            .first()
            .and_then(|p| self.allow.infer_role(p))
            .or_else(|| self.allow.infer_role(&self.navigator.current()));
        let Some(role) = role else {
            warn!("cannot tell which track to restart");
            return false;
        };

        let mut queue = self.allow.sanitize(Some(role), &definition);
        if queue.is_empty() {
            queue = self.allow.paths_for(role).to_vec();
        }
        let Some(first) = queue.first().cloned() else {
            warn!(%role, "no pages to restart into");
            return false;
        };

        let intent = NavigationIntent {
            mode: TourMode::Full,
            queue,
            launch: Some(LaunchTag::full(role)),
        };
        if let Err(e) = self.store.write_intent(&intent) {
            warn!(error = %e, "failed to persist restart, abandoning");
            self.clear_intent();
            return false;
        }
        info!(%role, path = %first, "restarting full walkthrough");
        self.navigate(&first)
    }

    // ---------------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------------

    fn close_prompt(&mut self) {
        self.prompt = Prompt::None;
        if self.phase == Phase::AwaitingContinuation {
            self.phase = self.outcome;
        }
    }

    fn clear_intent(&self) {
        if let Err(e) = self.store.clear_intent() {
            warn!(error = %e, "failed to clear navigation intent");
        }
    }

    /// Commit the location, then let the launch signal follow once the new
    /// page has had time to mount. A failed navigation drops the intent that
    /// was written for it.
    fn navigate(&self, path: &str) -> bool {
        match self.navigator.push(path) {
            Ok(kind) => {
                debug!(%path, ?kind, "navigated");
                self.bus.dispatch_after(self.signal_delay);
                true
            }
            Err(e) => {
                warn!(%path, error = %e, "navigation failed, continuation abandoned");
                self.clear_intent();
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
