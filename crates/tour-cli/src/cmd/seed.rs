use crate::output::print_json;
use crate::portal::Portal;
use anyhow::Context;
use std::path::Path;
use tour_core::{catalog, types::Role};

pub fn run(root: &Path, role: Role, json: bool) -> anyhow::Result<()> {
    let portal = Portal::open(root, "/")?;
    let sequence = catalog::full_sequence(role);
    portal
        .store
        .set_full_sequence(&sequence)
        .context("failed to write full sequence")?;

    if json {
        print_json(&serde_json::json!({
            "role": role,
            "sequence": sequence,
        }))?;
    } else {
        println!("Seeded {role} walkthrough ({} pages):", sequence.len());
        for (i, path) in sequence.iter().enumerate() {
            println!("  {}. {path}", i + 1);
        }
    }
    Ok(())
}
