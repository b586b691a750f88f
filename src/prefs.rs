// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Local device preferences. These are not the ledger (the ledger is the
//! remote sheet): just which profile this device acts as, the theme, the
//! minted device id, and how to reach the backend. Loaded once at startup
//! and passed around explicitly.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("cl.gastospareja", "GastosPareja", "gastos"));

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub theme: String,
    pub profile: String,
    pub device_id: String,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        UserPreferences {
            theme: "light".to_string(),
            profile: "pablo".to_string(),
            device_id: uuid::Uuid::new_v4().to_string(),
            api_url: None,
            api_token: None,
        }
    }
}

pub fn prefs_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific config dir")?;
    let dir = proj.config_dir();
    fs::create_dir_all(dir).context("Failed to create config dir")?;
    Ok(dir.join("prefs.json"))
}

/// Loads preferences, minting defaults (and a fresh device id) on first run.
pub fn load() -> Result<UserPreferences> {
    let path = prefs_path()?;
    if !path.exists() {
        let prefs = UserPreferences::default();
        save(&prefs)?;
        return Ok(prefs);
    }
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Read preferences at {}", path.display()))?;
    let prefs = serde_json::from_str(&raw)
        .with_context(|| format!("Parse preferences at {}", path.display()))?;
    Ok(prefs)
}

pub fn save(prefs: &UserPreferences) -> Result<()> {
    let path = prefs_path()?;
    fs::write(&path, serde_json::to_string_pretty(prefs)?)
        .with_context(|| format!("Write preferences at {}", path.display()))?;
    Ok(())
}

impl UserPreferences {
    /// Backend endpoint and token. Environment variables win over the
    /// preferences file so a device can be repointed without editing it.
    pub fn backend(&self) -> Option<(String, String)> {
        let url = std::env::var("GASTOS_API_URL")
            .ok()
            .or_else(|| self.api_url.clone())?;
        let token = std::env::var("GASTOS_API_TOKEN")
            .ok()
            .or_else(|| self.api_token.clone())?;
        Some((url, token))
    }
}
