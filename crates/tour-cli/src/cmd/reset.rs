use crate::output::print_json;
use crate::portal::Portal;
use anyhow::Context;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let portal = Portal::open(root, "/")?;
    let removed = portal.store.clear_all().context("failed to clear tour keys")?;

    if json {
        print_json(&serde_json::json!({ "removed": removed }))?;
    } else {
        println!("Removed {removed} tour key(s).");
    }
    Ok(())
}
