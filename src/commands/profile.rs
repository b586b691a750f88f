// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};

use crate::models::Config;
use crate::prefs::{self, UserPreferences};
use crate::utils::pretty_table;

/// Purely local: no store round-trip, works offline.
pub fn handle(prefs: &mut UserPreferences, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => show(prefs),
        Some(("set", sub)) => set(prefs, sub),
        Some(("theme", _)) => toggle_theme(prefs),
        _ => Ok(()),
    }
}

fn show(prefs: &UserPreferences) -> Result<()> {
    let rows = vec![
        vec!["Profile".to_string(), prefs.profile.clone()],
        vec!["Theme".to_string(), prefs.theme.clone()],
        vec!["Device id".to_string(), prefs.device_id.clone()],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}

fn set(prefs: &mut UserPreferences, sub: &clap::ArgMatches) -> Result<()> {
    let profile = sub.get_one::<String>("profile").unwrap().trim();
    // Checked against the built-in roster: this command stays offline.
    if !Config::default().has_profile(profile) {
        bail!("Unknown profile '{}'", profile);
    }
    prefs.profile = profile.to_string();
    prefs::save(prefs)?;
    println!("Active profile is now '{}'.", profile);
    Ok(())
}

fn toggle_theme(prefs: &mut UserPreferences) -> Result<()> {
    prefs.theme = if prefs.theme == "dark" {
        "light".to_string()
    } else {
        "dark".to_string()
    };
    prefs::save(prefs)?;
    println!("Theme set to {}.", prefs.theme);
    Ok(())
}
