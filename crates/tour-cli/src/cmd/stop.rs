use crate::output::print_json;
use crate::portal::Portal;
use std::path::Path;
use tour_core::catalog;

pub fn run(root: &Path, path: &str, json: bool) -> anyhow::Result<()> {
    let page = catalog::require(path)?;
    let portal = Portal::open(root, &page.path)?;
    let mut orch = portal.orchestrator();

    if !orch.start_tour(&page.tour_id, page.steps.clone())? {
        anyhow::bail!("{} has no steps", page.tour_id);
    }
    orch.close();

    let status = orch.store().tour_status(&page.tour_id)?;
    if json {
        print_json(&serde_json::json!({
            "page": page.path,
            "tour_id": page.tour_id,
            "status": status,
        }))?;
    } else {
        println!("Closed {} ({status})", page.tour_id);
    }
    Ok(())
}
