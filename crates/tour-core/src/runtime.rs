//! Async page lifecycle.
//!
//! `mount` wires a page's `LaunchTrigger` to the clock and to the launch bus:
//! the mount-time decision runs after a short delay so the page's anchors
//! exist when steps are filtered, and every later launch signal is checked
//! against the store. Dropping or unmounting the page aborts both, so nothing
//! fires into a page that is gone.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::anchor::AnchorResolver;
use crate::bus::LaunchBus;
use crate::config::TourConfig;
use crate::orchestrator::Orchestrator;
use crate::schema::TourStore;
use crate::trigger::{LaunchTrigger, MountDecision};

pub type SharedOrchestrator = Arc<Mutex<Orchestrator>>;

/// Everything a page needs from the host to run its trigger.
#[derive(Clone)]
pub struct PageContext {
    pub orch: SharedOrchestrator,
    pub store: TourStore,
    pub bus: LaunchBus,
    pub config: TourConfig,
}

pub struct MountedPage {
    path: String,
    tasks: Vec<JoinHandle<()>>,
}

impl MountedPage {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn unmount(self) {
        debug!(page = %self.path, "page unmounted");
        // Drop aborts the tasks
    }
}

impl Drop for MountedPage {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Mount a page. Must be called from within a Tokio runtime.
pub fn mount(
    trigger: LaunchTrigger,
    anchors: Arc<dyn AnchorResolver>,
    ctx: &PageContext,
) -> MountedPage {
    let trigger = Arc::new(trigger);
    let path = trigger.page().path.clone();
    let mut tasks = Vec::new();

    // Subscribe before anything is spawned so no signal slips past.
    let mut rx = ctx.bus.subscribe();

    match trigger.on_mount(&ctx.store) {
        Ok(MountDecision::Resume(tag)) => {
            debug!(page = %path, %tag, "resuming on mount");
            tasks.push(delayed_launch(
                ctx.config.resume_delay(),
                trigger.clone(),
                anchors.clone(),
                ctx.orch.clone(),
            ));
        }
        Ok(MountDecision::AutoStart) => {
            debug!(page = %path, "auto-starting first-visit tour");
            tasks.push(delayed_launch(
                ctx.config.autostart_delay(),
                trigger.clone(),
                anchors.clone(),
                ctx.orch.clone(),
            ));
        }
        Ok(MountDecision::Idle) => {}
        Err(e) => warn!(page = %path, error = %e, "mount check failed"),
    }

    let listener = {
        let trigger = trigger.clone();
        let ctx = ctx.clone();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(_) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break,
                }
                match trigger.consume_launch(&ctx.store) {
                    Ok(Some(tag)) => {
                        debug!(page = %trigger.page().path, %tag, "launch signal consumed");
                        tokio::time::sleep(ctx.config.resume_delay()).await;
                        launch_now(&trigger, anchors.as_ref(), &ctx.orch);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!(page = %trigger.page().path, error = %e, "launch check failed");
                    }
                }
            }
        })
    };
    tasks.push(listener);

    MountedPage { path, tasks }
}

fn delayed_launch(
    delay: Duration,
    trigger: Arc<LaunchTrigger>,
    anchors: Arc<dyn AnchorResolver>,
    orch: SharedOrchestrator,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        launch_now(&trigger, anchors.as_ref(), &orch);
    })
}

fn launch_now(trigger: &LaunchTrigger, anchors: &dyn AnchorResolver, orch: &SharedOrchestrator) {
    let mut orch = orch.lock().unwrap_or_else(|e| e.into_inner());
    if let Err(e) = trigger.launch(&mut orch, anchors) {
        warn!(page = %trigger.page().path, error = %e, "failed to start page tour");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
