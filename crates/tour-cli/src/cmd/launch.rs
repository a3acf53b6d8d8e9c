use crate::output::print_json;
use crate::portal::Portal;
use anyhow::Context;
use std::path::Path;
use tour_core::{
    allowlist::AllowList,
    catalog,
    schema::NavigationIntent,
    types::{LaunchTag, Role, TourMode},
};

pub fn run(root: &Path, role: Option<Role>, page: Option<&str>, json: bool) -> anyhow::Result<()> {
    match (role, page) {
        (_, Some(path)) => launch_page(root, path, json),
        (Some(role), None) => launch_full(root, role, json),
        (None, None) => anyhow::bail!("pass --role or --page"),
    }
}

fn launch_full(root: &Path, role: Role, json: bool) -> anyhow::Result<()> {
    let allow = AllowList::builtin();
    let landing = allow
        .landing(role)
        .with_context(|| format!("role {role} has no pages"))?;
    let portal = Portal::open(root, landing)?;

    // A definition left by another role's launch would restart that role
    let definition = portal
        .store
        .full_sequence()
        .context("failed to read full sequence")?;
    let seeded_role = definition.first().and_then(|p| allow.infer_role(p));
    if seeded_role != Some(role) {
        portal
            .store
            .set_full_sequence(&catalog::full_sequence(role))
            .context("failed to write full sequence")?;
    }

    let mut orch = portal.orchestrator();
    if !orch.restart_full_sequence() {
        anyhow::bail!("could not start the {role} walkthrough");
    }
    let destination = portal.location();
    let intent = portal.store.intent().context("failed to read intent")?;

    if json {
        print_json(&serde_json::json!({
            "role": role,
            "navigated_to": destination,
            "intent": intent,
        }))?;
    } else {
        println!("Started {role} walkthrough at {destination}");
        println!("Queue: {}", intent.queue.join(", "));
    }
    Ok(())
}

fn launch_page(root: &Path, path: &str, json: bool) -> anyhow::Result<()> {
    let page = catalog::require(path)?;
    let role = Role::for_path(&page.path)
        .with_context(|| format!("page {path} is outside every role section"))?;
    let portal = Portal::open(root, path)?;

    let intent = NavigationIntent {
        mode: TourMode::Single,
        queue: Vec::new(),
        launch: Some(LaunchTag::resume(role)),
    };
    portal
        .store
        .write_intent(&intent)
        .context("failed to write intent")?;

    if json {
        print_json(&serde_json::json!({
            "page": page.path,
            "tour_id": page.tour_id,
            "intent": intent,
        }))?;
    } else {
        println!("Queued {} for its next visit", page.tour_id);
    }
    Ok(())
}
