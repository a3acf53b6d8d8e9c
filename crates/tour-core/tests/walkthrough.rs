use std::sync::{Arc, Mutex};
use std::time::Duration;

use tour_core::allowlist::AllowList;
use tour_core::anchor::AnchorSet;
use tour_core::bus::LaunchBus;
use tour_core::catalog;
use tour_core::config::TourConfig;
use tour_core::navigation::{History, Navigator};
use tour_core::orchestrator::{Orchestrator, Phase, Prompt};
use tour_core::runtime::{mount, PageContext};
use tour_core::schema::TourStore;
use tour_core::step::Step;
use tour_core::store::{KeyValueStore, MemoryStore};
use tour_core::trigger::{LaunchTrigger, MountDecision};
use tour_core::types::Role;

fn steps(n: usize) -> Vec<Step> {
    (0..n)
        .map(|i| Step::new(format!("#s{i}"), format!("Step {i}"), "..."))
        .collect()
}

fn finish(orch: &mut Orchestrator) -> Prompt {
    loop {
        let prompt = orch.next_step();
        if !orch.is_running() {
            return prompt;
        }
    }
}

// ---------------------------------------------------------------------------
// Continuation prompt, persisted only on "Next"
// ---------------------------------------------------------------------------

#[test]
fn continue_prompt_persists_only_on_next() {
    let kv = Arc::new(MemoryStore::new());
    let history = Arc::new(History::new("/page1"));
    let allow = AllowList::new(&["/page1", "/page2", "/page3"], &[], &[]);
    let mut orch = Orchestrator::new(TourStore::new(kv.clone()), history.clone(), LaunchBus::new())
        .with_allow_list(allow);

    kv.set("tour:mode", "full").unwrap();
    kv.set("tour:queue", r#"["/page2","/page3"]"#).unwrap();
    orch.start_tour("x", steps(3)).unwrap();

    let prompt = finish(&mut orch);
    assert_eq!(
        prompt,
        Prompt::Continue {
            next: "/page2".into(),
            remaining: vec!["/page3".into()],
        }
    );
    assert_eq!(orch.phase(), Phase::AwaitingContinuation);
    // Nothing persisted before the user answers
    assert_eq!(
        kv.get("tour:queue").unwrap().as_deref(),
        Some(r#"["/page2","/page3"]"#)
    );
    assert_eq!(history.current(), "/page1");

    assert!(orch.continue_to_next());
    assert_eq!(kv.get("tour:queue").unwrap().as_deref(), Some(r#"["/page3"]"#));
    assert_eq!(history.current(), "/page2");
    assert_eq!(kv.get("tour:x:state").unwrap().as_deref(), Some("completed"));
}

// ---------------------------------------------------------------------------
// Queue holds only the current page
// ---------------------------------------------------------------------------

#[test]
fn exhausted_sequence_shows_completion() {
    let kv = Arc::new(MemoryStore::new());
    let history = Arc::new(History::new("/student/dashboard"));
    let mut orch = Orchestrator::new(TourStore::new(kv.clone()), history.clone(), LaunchBus::new());

    kv.set("tour:mode", "full").unwrap();
    kv.set("tour:queue", r#"["/student/dashboard"]"#).unwrap();
    kv.set("tour:launch", "student:resume").unwrap();
    orch.start_tour("student-dashboard-tour", steps(2)).unwrap();

    let prompt = finish(&mut orch);
    assert_eq!(
        prompt,
        Prompt::TourComplete {
            role: Some(Role::Student)
        }
    );
    for key in ["tour:queue", "tour:mode", "tour:launch"] {
        assert_eq!(kv.get(key).unwrap(), None, "{key} should be cleared");
    }
    assert_eq!(history.entries().len(), 1);
}

// ---------------------------------------------------------------------------
// Explicit close mid-tour
// ---------------------------------------------------------------------------

#[test]
fn close_mid_tour_clears_intent_only() {
    let kv = Arc::new(MemoryStore::new());
    let history = Arc::new(History::new("/admin/users"));
    let mut orch = Orchestrator::new(TourStore::new(kv.clone()), history, LaunchBus::new());

    kv.set("tour:mode", "full").unwrap();
    kv.set("tour:queue", r#"["/admin/courses","/admin/reports"]"#).unwrap();
    kv.set("tour:launch", "admin:resume").unwrap();
    orch.start_tour("admin-users-tour", steps(3)).unwrap();
    orch.next_step();
    let state_before = kv.get("tour:admin-users-tour:state").unwrap();

    orch.close();

    for key in ["tour:queue", "tour:mode", "tour:launch"] {
        assert_eq!(kv.get(key).unwrap(), None, "{key} should be cleared");
    }
    assert_eq!(kv.get("tour:admin-users-tour:state").unwrap(), state_before);
    assert!(!orch.dismiss_visible());
    assert!(orch.prompt().is_none());
}

// ---------------------------------------------------------------------------
// Resume consumption is one-shot across remounts
// ---------------------------------------------------------------------------

#[test]
fn second_mount_does_not_resume_from_stale_tag() {
    let kv = Arc::new(MemoryStore::new());
    let store = TourStore::new(kv.clone());
    let page = catalog::page("/instructor/courses").unwrap();
    let trigger = LaunchTrigger::new(page.clone()).unwrap();
    store.mark_autostarted(&page.feature).unwrap();
    kv.set("tour:launch", "instructor:resume").unwrap();

    let mut orch = Orchestrator::new(
        store.clone(),
        Arc::new(History::new("/instructor/courses")),
        LaunchBus::new(),
    );
    let anchors = AnchorSet::with(page.steps.iter().map(|s| s.target.clone()));

    let first = trigger.on_mount(&store).unwrap();
    assert!(matches!(first, MountDecision::Resume(_)));
    assert!(trigger.launch(&mut orch, &anchors).unwrap());
    assert_eq!(kv.get("tour:launch").unwrap(), None);

    orch.close();
    assert_eq!(trigger.on_mount(&store).unwrap(), MountDecision::Idle);
}

// ---------------------------------------------------------------------------
// Full walkthrough across pages, driven by the async runtime
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn full_student_walkthrough_visits_every_page() {
    let kv = Arc::new(MemoryStore::new());
    let store = TourStore::new(kv.clone());
    let history = Arc::new(History::new("/student/dashboard"));
    let bus = LaunchBus::new();
    let config = TourConfig::default();
    let orch = Orchestrator::new(store.clone(), history.clone(), bus.clone()).with_config(&config);
    let ctx = PageContext {
        orch: Arc::new(Mutex::new(orch)),
        store: store.clone(),
        bus,
        config,
    };

    let sequence = catalog::full_sequence(Role::Student);
    store.set_full_sequence(&sequence).unwrap();
    assert!(ctx.orch.lock().unwrap().restart_full_sequence());

    let mut visited = Vec::new();
    loop {
        let path = history.current();
        let page = catalog::page(&path).unwrap();
        let anchors = Arc::new(AnchorSet::with(page.steps.iter().map(|s| s.target.clone())));
        let mounted = mount(LaunchTrigger::new(page).unwrap(), anchors, &ctx);
        tokio::time::sleep(Duration::from_millis(500)).await;

        let prompt = {
            let mut orch = ctx.orch.lock().unwrap();
            assert!(orch.is_running(), "tour did not resume on {path}");
            finish(&mut orch)
        };
        visited.push(path);
        mounted.unmount();

        match prompt {
            Prompt::Continue { .. } => {
                assert!(ctx.orch.lock().unwrap().continue_to_next());
            }
            Prompt::TourComplete { role } => {
                assert_eq!(role, Some(Role::Student));
                break;
            }
            Prompt::None => panic!("walkthrough stopped early after {visited:?}"),
        }
    }

    assert_eq!(visited, sequence);
    for key in ["tour:queue", "tour:mode", "tour:launch"] {
        assert_eq!(kv.get(key).unwrap(), None);
    }
    for path in &sequence {
        let page = catalog::page(path).unwrap();
        assert_eq!(
            kv.get(&format!("tour:{}:state", page.tour_id)).unwrap().as_deref(),
            Some("completed")
        );
    }
}
