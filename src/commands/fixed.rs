// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::fixed::generate_for_month;
use crate::store::Store;
use crate::utils::{format_clp, month_key, parse_month, pretty_table, today_local};

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("generate", sub)) => generate(store, sub),
        _ => Ok(()),
    }
}

fn generate(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let month = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m.trim())?,
        None => month_key(&today_local()).to_string(),
    };
    let cfg = store.get_config().context("Fetch config")?;
    if cfg.fixed_charges.is_empty() {
        println!("No fixed charges configured.");
        return Ok(());
    }
    let existing = store
        .list_entries(Some(&month))
        .with_context(|| format!("Fetch entries for {}", month))?;

    let new_entries = generate_for_month(&month, &cfg.fixed_charges, &existing, &cfg.profiles);
    if new_entries.is_empty() {
        println!("Nothing to generate for {} (already up to date).", month);
        return Ok(());
    }

    for entry in &new_entries {
        store
            .add_entry(entry)
            .with_context(|| format!("Save fixed charge '{}' for {}", entry.note, month))?;
    }

    let rows = new_entries
        .iter()
        .map(|e| {
            vec![
                e.note.clone(),
                e.profile.clone(),
                e.category.clone(),
                format!("-${}", format_clp(e.amount)),
                e.date.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Charge", "Profile", "Category", "Amount", "Date"], rows)
    );
    println!("Generated {} fixed entries for {}.", new_entries.len(), month);
    Ok(())
}
