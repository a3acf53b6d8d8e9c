use crate::output::{print_json, print_table};
use crate::portal::Portal;
use anyhow::Context;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let portal = Portal::open(root, "/")?;
    let entries = portal.store.dump().context("failed to read tour keys")?;

    if json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        println!("No tour state.");
        return Ok(());
    }

    let rows = entries.into_iter().map(|(k, v)| vec![k, v]).collect();
    print_table(&["KEY", "VALUE"], rows);
    Ok(())
}
