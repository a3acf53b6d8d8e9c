use crate::output::{print_json, print_table};
use crate::portal::Portal;
use anyhow::Context;
use std::path::Path;
use tour_core::{
    anchor::AnchorSet,
    catalog,
    step::Step,
    trigger::{LaunchTrigger, MountDecision},
    types::LaunchTag,
};

#[derive(serde::Serialize)]
struct VisitOutput<'a> {
    page: &'a str,
    tour_id: &'a str,
    decision: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    launch: Option<LaunchTag>,
    started: bool,
    steps: &'a [Step],
}

pub fn run(
    root: &Path,
    path: &str,
    anchors: Option<Vec<String>>,
    json: bool,
) -> anyhow::Result<()> {
    let page = catalog::require(path)?;
    let portal = Portal::open(root, &page.path)?;
    let trigger = LaunchTrigger::new(page.clone())
        .with_context(|| format!("page {path} is outside every role section"))?;

    // Without an explicit list every catalog anchor counts as rendered
    let anchors = match anchors {
        Some(list) => AnchorSet::with(list),
        None => AnchorSet::with(page.steps.iter().map(|s| s.target.clone())),
    };

    let decision = trigger
        .on_mount(&portal.store)
        .context("failed to check launch state")?;
    let (label, launch) = match decision {
        MountDecision::Resume(tag) => ("resume", Some(tag)),
        MountDecision::AutoStart => ("autostart", None),
        MountDecision::Idle => ("idle", None),
    };

    let mut orch = portal.orchestrator();
    let started = match decision {
        MountDecision::Idle => false,
        _ => trigger
            .launch(&mut orch, &anchors)
            .context("failed to start page tour")?,
    };
    let steps = orch.session().map(|s| s.steps.as_slice()).unwrap_or(&[]);
    let (at, total) = orch.session().map(|s| s.progress()).unwrap_or((0, 0));

    if json {
        return print_json(&VisitOutput {
            page: &page.path,
            tour_id: &page.tour_id,
            decision: label,
            launch,
            started,
            steps,
        });
    }

    match (decision, started) {
        (MountDecision::Idle, _) => println!("{}: no tour to show", page.path),
        (_, false) => println!("{}: {label}, but no anchors are rendered", page.path),
        (_, true) => {
            println!("{}: {label} {} (step {at} of {total})", page.path, page.tour_id);
            let rows = steps
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    vec![
                        (i + 1).to_string(),
                        s.target.clone(),
                        s.title.clone(),
                        s.placement.to_string(),
                    ]
                })
                .collect();
            print_table(&["#", "ANCHOR", "TITLE", "PLACEMENT"], rows);
        }
    }
    Ok(())
}
