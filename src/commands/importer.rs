// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::normalize::{normalize, resolve_import_items};
use crate::store::Store;

pub fn handle(store: &dyn Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("json", sub)) => import_json(store, sub),
        _ => Ok(()),
    }
}

/// Bulk import: the whole file replaces the remote ledger. A parse or shape
/// error aborts before anything is normalized or written — never a partial
/// import.
fn import_json(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Open JSON {}", path))?;
    let parsed: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path))?;
    let items = resolve_import_items(&parsed)?;

    let cfg = store.get_config().context("Fetch config")?;
    let entries: Vec<_> = items.iter().map(|raw| normalize(raw, &cfg)).collect();

    let count = store
        .replace_all(&entries)
        .context("Replace remote ledger")?;
    println!("Imported {} entries from {} (remote ledger replaced).", count, path);
    Ok(())
}
