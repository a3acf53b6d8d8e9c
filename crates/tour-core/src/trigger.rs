//! Per-page launch decisions.
//!
//! Each page owns one `LaunchTrigger`. On mount it may auto-start its tour
//! once per browser; on every launch signal it checks whether the store holds
//! a resume instruction addressed to its role and, if so, consumes it.

use tracing::{debug, warn};

use crate::anchor::AnchorResolver;
use crate::catalog::PageTour;
use crate::error::Result;
use crate::keys;
use crate::orchestrator::Orchestrator;
use crate::schema::TourStore;
use crate::step::{filter_renderable, Step};
use crate::types::{LaunchKind, LaunchTag, Role, TourStatus};

/// What a page does right after mounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountDecision {
    /// A launch tag for this page was consumed; resume the walkthrough.
    Resume(LaunchTag),
    /// First visit: show the page tour once.
    AutoStart,
    Idle,
}

#[derive(Debug, Clone)]
pub struct LaunchTrigger {
    page: PageTour,
    role: Role,
}

impl LaunchTrigger {
    /// The page's role comes from its section prefix.
    pub fn new(page: PageTour) -> Option<Self> {
        let role = Role::for_path(&page.path)?;
        Some(Self { page, role })
    }

    pub fn page(&self) -> &PageTour {
        &self.page
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Tags this page answers to: its role with either the resume or the
    /// full-start suffix.
    pub fn recognizes(&self, tag: LaunchTag) -> bool {
        tag.role == self.role && matches!(tag.kind, LaunchKind::Resume | LaunchKind::Full)
    }

    /// Neither the autostart marker nor a terminal state says the tour was
    /// already shown. An unreadable state counts as never started.
    pub fn should_autostart(&self, store: &TourStore) -> Result<bool> {
        if store.autostarted(&self.page.feature)? {
            return Ok(false);
        }
        let status = match store.tour_status(&self.page.tour_id) {
            Ok(status) => status,
            Err(e) => {
                warn!(
                    key = %keys::tour_state_key(&self.page.tour_id),
                    error = %e,
                    "unreadable tour state, treating as not started"
                );
                TourStatus::NotStarted
            }
        };
        Ok(!status.is_terminal())
    }

    pub fn mark_autostarted(&self, store: &TourStore) -> Result<()> {
        store.mark_autostarted(&self.page.feature)
    }

    /// Read-then-clear the launch tag if it is addressed to this page.
    ///
    /// A tag for another role stays in place for the page it belongs to. An
    /// unparseable tag is removed so it cannot linger.
    pub fn consume_launch(&self, store: &TourStore) -> Result<Option<LaunchTag>> {
        let tag = match store.launch_tag() {
            Ok(Some(tag)) => tag,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!(page = %self.page.path, error = %e, "discarding malformed launch tag");
                store.kv().remove(keys::LAUNCH_KEY)?;
                return Ok(None);
            }
        };
        if !self.recognizes(tag) {
            debug!(page = %self.page.path, %tag, "launch tag addressed elsewhere");
            return Ok(None);
        }
        store.clear_launch_tag()?;
        Ok(Some(tag))
    }

    /// Mount-time check. A pending resume wins over the first-visit autostart
    /// so a freshly navigated page never starts its tour twice. Choosing
    /// `AutoStart` sets the marker.
    pub fn on_mount(&self, store: &TourStore) -> Result<MountDecision> {
        if let Some(tag) = self.consume_launch(store)? {
            return Ok(MountDecision::Resume(tag));
        }
        if self.should_autostart(store)? {
            self.mark_autostarted(store)?;
            return Ok(MountDecision::AutoStart);
        }
        Ok(MountDecision::Idle)
    }

    /// Candidate steps whose anchors are mounted right now.
    pub fn build_steps(&self, anchors: &dyn AnchorResolver) -> Vec<Step> {
        filter_renderable(&self.page.steps, anchors)
    }

    /// Build the step list and hand it to the orchestrator. With no anchors
    /// present this is a no-op returning `Ok(false)`.
    pub fn launch(&self, orch: &mut Orchestrator, anchors: &dyn AnchorResolver) -> Result<bool> {
        let steps = self.build_steps(anchors);
        if steps.is_empty() {
            debug!(page = %self.page.path, "no anchors mounted, skipping tour");
            return Ok(false);
        }
        orch.start_tour(&self.page.tour_id, steps)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::AnchorSet;
    use crate::bus::LaunchBus;
    use crate::catalog;
    use crate::navigation::History;
    use crate::store::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    fn setup(path: &str) -> (Arc<MemoryStore>, TourStore, LaunchTrigger) {
        let kv = Arc::new(MemoryStore::new());
        let store = TourStore::new(kv.clone());
        let page = catalog::page(path).unwrap();
        (kv, store, LaunchTrigger::new(page).unwrap())
    }

    #[test]
    fn autostart_once_per_feature() {
        let (_kv, store, trigger) = setup("/student/dashboard");
        assert!(trigger.should_autostart(&store).unwrap());
        trigger.mark_autostarted(&store).unwrap();
        assert!(!trigger.should_autostart(&store).unwrap());
    }

    #[test]
    fn terminal_state_suppresses_autostart() {
        for status in [TourStatus::Completed, TourStatus::Skipped] {
            let (_kv, store, trigger) = setup("/student/dashboard");
            store
                .set_tour_status(&trigger.page().tour_id, status)
                .unwrap();
            assert!(!trigger.should_autostart(&store).unwrap());
        }
    }

    #[test]
    fn in_progress_state_still_autostarts() {
        let (_kv, store, trigger) = setup("/admin/users");
        store
            .set_tour_status(&trigger.page().tour_id, TourStatus::InProgress)
            .unwrap();
        assert!(trigger.should_autostart(&store).unwrap());
    }

    #[test]
    fn in_progress_wire_value_is_read_back() {
        let (kv, store, trigger) = setup("/student/dashboard");
        kv.set("tour:student-dashboard-tour:state", "inProgress").unwrap();
        assert_eq!(
            store.tour_status(&trigger.page().tour_id).unwrap(),
            TourStatus::InProgress
        );
        assert_eq!(trigger.on_mount(&store).unwrap(), MountDecision::AutoStart);
    }

    #[test]
    fn unreadable_state_falls_back_to_not_started() {
        let (kv, store, trigger) = setup("/student/dashboard");
        kv.set("tour:student-dashboard-tour:state", "half-done").unwrap();
        assert!(trigger.should_autostart(&store).unwrap());
        assert_eq!(trigger.on_mount(&store).unwrap(), MountDecision::AutoStart);
    }

    #[test]
    fn consume_is_one_shot() {
        let (kv, store, trigger) = setup("/student/grades");
        kv.set("tour:launch", "student:resume").unwrap();

        assert_eq!(
            trigger.consume_launch(&store).unwrap(),
            Some(LaunchTag::resume(Role::Student))
        );
        assert_eq!(kv.get("tour:launch").unwrap(), None);
        assert_eq!(trigger.consume_launch(&store).unwrap(), None);
    }

    #[test]
    fn tag_for_other_role_is_left_alone() {
        let (kv, store, trigger) = setup("/student/grades");
        kv.set("tour:launch", "admin:full").unwrap();
        assert_eq!(trigger.consume_launch(&store).unwrap(), None);
        assert_eq!(kv.get("tour:launch").unwrap().as_deref(), Some("admin:full"));
    }

    #[test]
    fn malformed_tag_is_dropped() {
        let (kv, store, trigger) = setup("/student/grades");
        kv.set("tour:launch", "student-resume").unwrap();
        assert_eq!(trigger.consume_launch(&store).unwrap(), None);
        assert_eq!(kv.get("tour:launch").unwrap(), None);
    }

    #[test]
    fn mount_prefers_resume_over_autostart() {
        let (kv, store, trigger) = setup("/student/grades");
        kv.set("tour:launch", "student:full").unwrap();
        assert_eq!(
            trigger.on_mount(&store).unwrap(),
            MountDecision::Resume(LaunchTag::full(Role::Student))
        );
        assert!(!store.autostarted(&trigger.page().feature).unwrap());

        assert_eq!(trigger.on_mount(&store).unwrap(), MountDecision::AutoStart);
        assert_eq!(trigger.on_mount(&store).unwrap(), MountDecision::Idle);
    }

    #[test]
    fn launch_without_anchors_does_not_start() {
        let (kv, store, trigger) = setup("/instructor/gradebook");
        let mut orch = Orchestrator::new(
            store,
            Arc::new(History::new("/instructor/gradebook")),
            LaunchBus::new(),
        );
        assert!(!trigger.launch(&mut orch, &AnchorSet::new()).unwrap());
        assert!(!orch.is_running());
        assert!(kv.snapshot().is_empty());
    }

    #[test]
    fn launch_filters_to_mounted_anchors() {
        let (_kv, store, trigger) = setup("/instructor/gradebook");
        let first = trigger.page().steps[0].target.clone();
        let mut orch = Orchestrator::new(
            store,
            Arc::new(History::new("/instructor/gradebook")),
            LaunchBus::new(),
        );
        let anchors = AnchorSet::with([first.clone(), "#unrelated".to_string()]);
        assert!(trigger.launch(&mut orch, &anchors).unwrap());
        let session = orch.session().unwrap();
        assert_eq!(session.steps.len(), 1);
        assert_eq!(session.steps[0].target, first);
    }
}
