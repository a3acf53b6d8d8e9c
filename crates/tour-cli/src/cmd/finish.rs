use crate::output::print_json;
use crate::portal::Portal;
use clap::ValueEnum;
use std::path::Path;
use tour_core::{
    catalog,
    orchestrator::Prompt,
    types::CompletionStatus,
};

/// Button pressed on the prompt shown after the page's tour ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    /// "Next" on the continue prompt
    Next,
    /// "Cancel" on the continue prompt, or close the completion prompt
    Cancel,
    /// "Restart" on the completion prompt
    Restart,
}

pub fn run(
    root: &Path,
    path: &str,
    skipped: bool,
    answer: Option<Answer>,
    json: bool,
) -> anyhow::Result<()> {
    let page = catalog::require(path)?;
    let portal = Portal::open(root, &page.path)?;
    let mut orch = portal.orchestrator();

    orch.start_tour(&page.tour_id, page.steps.clone())?;
    let status = if skipped {
        CompletionStatus::Skipped
    } else {
        CompletionStatus::Finished
    };
    let prompt = orch.on_step_engine_completion(status);

    let navigated = match answer {
        None => false,
        Some(Answer::Next) => {
            if !matches!(prompt, Prompt::Continue { .. }) {
                anyhow::bail!("no continue prompt to answer after {}", page.path);
            }
            orch.continue_to_next()
        }
        Some(Answer::Cancel) => {
            match prompt {
                Prompt::TourComplete { .. } => orch.dismiss_prompt(),
                _ => orch.cancel_continuation(),
            }
            false
        }
        Some(Answer::Restart) => {
            if !matches!(prompt, Prompt::TourComplete { .. }) {
                anyhow::bail!("restart is only offered once the walkthrough is complete");
            }
            orch.restart_full_sequence()
        }
    };
    let destination = navigated.then(|| portal.location());

    if json {
        return print_json(&serde_json::json!({
            "page": page.path,
            "tour_id": page.tour_id,
            "status": orch.store().tour_status(&page.tour_id)?,
            "prompt": prompt,
            "answer": answer,
            "navigated_to": destination,
        }));
    }

    let verb = if skipped { "Skipped" } else { "Finished" };
    println!("{verb} {}", page.tour_id);
    match &prompt {
        Prompt::None => {}
        Prompt::Continue { next, remaining } => {
            println!("Continue to next page? {next} ({} more after it)", remaining.len());
        }
        Prompt::TourComplete { .. } => println!("Walkthrough complete."),
    }
    if let Some(dest) = destination {
        println!("Navigated to {dest}");
    }
    Ok(())
}
