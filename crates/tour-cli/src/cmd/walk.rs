use crate::output::print_json;
use crate::portal::Portal;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tour_core::{
    allowlist::AllowList,
    anchor::AnchorSet,
    catalog,
    orchestrator::{Orchestrator, Prompt},
    runtime::{self, PageContext},
    trigger::LaunchTrigger,
    types::Role,
};

const POLL: Duration = Duration::from_millis(25);

/// Slack on top of the configured delays before a page counts as stuck.
const GRACE: Duration = Duration::from_secs(2);

#[derive(serde::Serialize)]
struct WalkOutput {
    role: Role,
    visited: Vec<String>,
    completed: bool,
}

pub fn run(root: &Path, role: Role, json: bool) -> anyhow::Result<()> {
    let landing = AllowList::builtin()
        .landing(role)
        .with_context(|| format!("role {role} has no pages"))?
        .to_string();
    let portal = Portal::open(root, &landing)?;
    portal
        .store
        .set_full_sequence(&catalog::full_sequence(role))
        .context("failed to write full sequence")?;

    let rt = tokio::runtime::Runtime::new()?;
    let output = rt.block_on(walk(&portal, role))?;

    if json {
        print_json(&output)?;
    } else {
        for path in &output.visited {
            println!("  {path}");
        }
        if output.completed {
            println!("Walkthrough complete: {} page(s).", output.visited.len());
        } else {
            println!("Walkthrough stopped after {} page(s).", output.visited.len());
        }
    }
    Ok(())
}

async fn walk(portal: &Portal, role: Role) -> anyhow::Result<WalkOutput> {
    let ctx = portal.page_context();
    if !lock(&ctx).restart_full_sequence() {
        anyhow::bail!("could not start the {role} walkthrough");
    }

    let deadline = ctx.config.autostart_delay().max(ctx.config.resume_delay()) + GRACE;
    let mut visited = Vec::new();

    loop {
        let path = portal.location();
        let page = catalog::require(&path)?;
        let trigger = LaunchTrigger::new(page.clone())
            .with_context(|| format!("page {path} is outside every role section"))?;
        let anchors = Arc::new(AnchorSet::with(page.steps.iter().map(|s| s.target.clone())));
        let mounted = runtime::mount(trigger, anchors, &ctx);

        wait_until_running(&ctx, deadline)
            .await
            .with_context(|| format!("tour did not start on {path}"))?;

        let prompt = {
            let mut orch = lock(&ctx);
            loop {
                let prompt = orch.next_step();
                if !orch.is_running() {
                    break prompt;
                }
            }
        };
        tracing::info!(page = %mounted.path(), "page tour finished");
        visited.push(path);
        mounted.unmount();

        match prompt {
            Prompt::Continue { .. } => {
                if !lock(&ctx).continue_to_next() {
                    return Ok(WalkOutput { role, visited, completed: false });
                }
            }
            Prompt::TourComplete { .. } => {
                return Ok(WalkOutput { role, visited, completed: true });
            }
            Prompt::None => {
                return Ok(WalkOutput { role, visited, completed: false });
            }
        }
    }
}

async fn wait_until_running(ctx: &PageContext, deadline: Duration) -> anyhow::Result<()> {
    let started = tokio::time::Instant::now();
    while !lock(ctx).is_running() {
        if started.elapsed() > deadline {
            anyhow::bail!("timed out after {}ms", deadline.as_millis());
        }
        tokio::time::sleep(POLL).await;
    }
    Ok(())
}

fn lock(ctx: &PageContext) -> std::sync::MutexGuard<'_, Orchestrator> {
    ctx.orch.lock().unwrap_or_else(|e| e.into_inner())
}
