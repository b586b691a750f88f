// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use gastos::store::{HttpStore, StoreError};
use gastos::{cli, commands, prefs};

fn connect(prefs: &prefs::UserPreferences) -> Result<HttpStore> {
    let (url, token) = prefs.backend().ok_or(StoreError::Unconfigured)?;
    Ok(HttpStore::new(&url, &token)?)
}

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut prefs = prefs::load()?;

    match matches.subcommand() {
        // Local-only, works without a configured backend.
        Some(("profile", sub)) => commands::profile::handle(&mut prefs, sub)?,
        Some(("entry", sub)) => commands::entry::handle(&connect(&prefs)?, &prefs, sub)?,
        Some(("report", sub)) => commands::report::handle(&connect(&prefs)?, &prefs, sub)?,
        Some(("fixed", sub)) => commands::fixed::handle(&connect(&prefs)?, sub)?,
        Some(("goal", sub)) => commands::goal::handle(&connect(&prefs)?, &prefs, sub)?,
        Some(("import", sub)) => commands::importer::handle(&connect(&prefs)?, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&connect(&prefs)?, sub)?,
        Some(("config", sub)) => commands::config::handle(&connect(&prefs)?, &prefs, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
