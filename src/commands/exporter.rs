// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::models::Entry;
use crate::store::Store;

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    let fmt = m.get_one::<String>("format").unwrap().to_lowercase();
    let out = m.get_one::<String>("out").unwrap().trim();

    let mut entries = store.list_entries(None).context("Fetch entries")?;
    // Oldest first for exports, stable on creation time.
    entries.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });

    match fmt.as_str() {
        "csv" => write_csv(&entries, out)?,
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&entries)?)
                .with_context(|| format!("Write {}", out))?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} entries to {}", entries.len(), out);
    Ok(())
}

fn write_csv(entries: &[Entry], out: &str) -> Result<()> {
    let mut wtr = csv::Writer::from_path(out).with_context(|| format!("Open CSV {}", out))?;
    wtr.write_record([
        "id",
        "type",
        "nature",
        "amount",
        "category",
        "profile",
        "date",
        "note",
        "scope",
        "account",
        "direction",
        "impactKey",
        "fixedId",
        "createdAt",
    ])?;
    for e in entries {
        wtr.write_record([
            e.id.clone(),
            e.r#type.as_str().to_string(),
            e.nature.map(|n| n.as_str().to_string()).unwrap_or_default(),
            e.amount.to_string(),
            e.category.clone(),
            e.profile.clone(),
            e.date.clone(),
            e.note.clone(),
            e.scope.as_str().to_string(),
            String::from(e.account.clone()),
            e.direction.as_str().to_string(),
            e.impact_key.clone(),
            e.fixed_id.clone(),
            e.created_at.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
