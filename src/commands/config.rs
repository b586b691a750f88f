// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Context, Result};

use crate::models::Config;
use crate::prefs::UserPreferences;
use crate::store::Store;

pub fn handle(store: &dyn Store, prefs: &UserPreferences, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(store, sub),
        Some(("replace", sub)) => replace(store, sub),
        Some(("register-device", sub)) => register_device(store, prefs, sub),
        _ => Ok(()),
    }
}

fn show(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let cfg = store.get_config().context("Fetch config")?;
    if sub.get_flag("jsonl") {
        println!("{}", serde_json::to_string(&cfg)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
    }
    Ok(())
}

/// Config is replace-and-refetch only: parse the file strictly, write it
/// through, then read back what the backend now holds.
fn replace(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let text = std::fs::read_to_string(path).with_context(|| format!("Open JSON {}", path))?;
    let cfg: Config =
        serde_json::from_str(&text).with_context(|| format!("Invalid config in {}", path))?;

    store.set_config(&cfg).context("Write config")?;
    let fetched = store.get_config().context("Refetch config")?;
    println!(
        "Config replaced: {} profiles, {} categories, {} goals, {} fixed charges.",
        fetched.profiles.len(),
        fetched.categories.len(),
        fetched.goals.len(),
        fetched.fixed_charges.len()
    );
    Ok(())
}

fn register_device(store: &dyn Store, prefs: &UserPreferences, sub: &clap::ArgMatches) -> Result<()> {
    let profile = sub
        .get_one::<String>("profile")
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| prefs.profile.clone());

    let cfg = store.get_config().context("Fetch config")?;
    if !cfg.has_profile(&profile) {
        bail!("Profile '{}' is not in the configured roster", profile);
    }
    store
        .register_device_profile(&prefs.device_id, &profile)
        .context("Register device")?;
    println!("Device {} registered as '{}'.", prefs.device_id, profile);
    Ok(())
}
