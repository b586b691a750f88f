// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Storage backend boundary. The ledger lives in a remote sheet behind a
//! tiny webhook API; everything local is a read-mostly cache rebuilt
//! wholesale on refresh. No optimistic concurrency: last write wins, and a
//! full refetch is the only consistency-restoring operation.

use serde::Deserialize;
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use thiserror::Error;

use crate::models::{Config, Entry};
use crate::normalize;

const UA: &str = concat!(
    "gastos/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/gastospareja/gastos)"
);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Backend returned `{ok:false}`; carries its human-readable message.
    #[error("{0}")]
    Backend(String),
    #[error("Malformed backend response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("No backend configured: set GASTOS_API_URL / GASTOS_API_TOKEN or edit the preferences file")]
    Unconfigured,
}

/// The remote ledger. All calls are synchronous network round-trips and may
/// fail; callers keep showing the last fully fetched snapshot on failure.
pub trait Store {
    fn list_entries(&self, month: Option<&str>) -> Result<Vec<Entry>, StoreError>;
    fn list_months(&self) -> Result<Vec<String>, StoreError>;
    fn add_entry(&self, entry: &Entry) -> Result<String, StoreError>;
    fn delete_entry(&self, id: &str) -> Result<(), StoreError>;
    /// Wholesale destructive overwrite; returns the stored count.
    fn replace_all(&self, entries: &[Entry]) -> Result<usize, StoreError>;
    fn get_config(&self) -> Result<Config, StoreError>;
    fn set_config(&self, cfg: &Config) -> Result<(), StoreError>;
    fn register_device_profile(&self, device_id: &str, profile: &str) -> Result<(), StoreError>;
}

/// Response envelope the webhook always answers with.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    items: Option<Vec<Value>>,
    #[serde(default)]
    months: Option<Vec<String>>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    count: Option<usize>,
    #[serde(default)]
    config: Option<Value>,
}

impl Envelope {
    fn into_ok(self) -> Result<Envelope, StoreError> {
        if self.ok {
            Ok(self)
        } else {
            Err(StoreError::Backend(
                self.error.unwrap_or_else(|| "Error API".to_string()),
            ))
        }
    }
}

pub struct HttpStore {
    client: reqwest::blocking::Client,
    base_url: String,
    token: String,
}

impl HttpStore {
    pub fn new(base_url: &str, token: &str) -> Result<Self, StoreError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent(UA)
            .build()?;
        Ok(HttpStore {
            client,
            base_url: base_url.to_string(),
            token: token.to_string(),
        })
    }

    fn get(&self, path: &str, extra: &[(&str, &str)]) -> Result<Envelope, StoreError> {
        let mut req = self
            .client
            .get(&self.base_url)
            .query(&[("path", path), ("token", self.token.as_str())]);
        for (k, v) in extra {
            req = req.query(&[(*k, *v)]);
        }
        let env: Envelope = req.send()?.json()?;
        env.into_ok()
    }

    fn post(&self, path: &str, mut body: Value) -> Result<Envelope, StoreError> {
        body["path"] = json!(path);
        body["token"] = json!(self.token);
        let env: Envelope = self.client.post(&self.base_url).json(&body).send()?.json()?;
        env.into_ok()
    }
}

/// Config used to upgrade stored rows on read: roster mapping only, no
/// category allow-list. Historical entries keep categories that fell out of
/// the active lists.
fn ingest_config() -> Config {
    Config {
        categories: Vec::new(),
        income_categories: Vec::new(),
        ..Config::default()
    }
}

impl Store for HttpStore {
    fn list_entries(&self, month: Option<&str>) -> Result<Vec<Entry>, StoreError> {
        let extra: Vec<(&str, &str)> = month.map(|m| ("month", m)).into_iter().collect();
        let env = self.get("listExpenses", &extra)?;
        let cfg = ingest_config();
        Ok(env
            .items
            .unwrap_or_default()
            .iter()
            .map(|raw| normalize::normalize(raw, &cfg))
            .collect())
    }

    fn list_months(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.get("listMonths", &[])?.months.unwrap_or_default())
    }

    fn add_entry(&self, entry: &Entry) -> Result<String, StoreError> {
        let body = serde_json::to_value(entry)?;
        let env = self.post("addExpense", body)?;
        Ok(env.id.unwrap_or_else(|| entry.id.clone()))
    }

    fn delete_entry(&self, id: &str) -> Result<(), StoreError> {
        self.post("deleteEntry", json!({ "id": id }))?;
        Ok(())
    }

    fn replace_all(&self, entries: &[Entry]) -> Result<usize, StoreError> {
        let env = self.post("replaceAll", json!({ "items": entries }))?;
        Ok(env.count.unwrap_or(entries.len()))
    }

    fn get_config(&self) -> Result<Config, StoreError> {
        let env = self.get("getConfig", &[])?;
        match env.config {
            Some(v) => Ok(serde_json::from_value(v)?),
            // Backend predates remote config; fall back to the samples.
            None => Ok(Config::default()),
        }
    }

    fn set_config(&self, cfg: &Config) -> Result<(), StoreError> {
        self.post("setConfig", json!({ "config": cfg }))?;
        Ok(())
    }

    fn register_device_profile(&self, device_id: &str, profile: &str) -> Result<(), StoreError> {
        self.post(
            "registerDevice",
            json!({ "deviceId": device_id, "profile": profile }),
        )?;
        Ok(())
    }
}

/// In-memory store for tests and offline experiments. Mirrors the backend's
/// behavior, including last-write-wins replace.
#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<Vec<Entry>>,
    config: RefCell<Config>,
    /// When set, the next add_entry fails once. Lets tests exercise the
    /// one-sided transfer window.
    fail_next_add: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            entries: RefCell::new(Vec::new()),
            config: RefCell::new(Config::default()),
            fail_next_add: Cell::new(false),
        }
    }

    pub fn with_config(cfg: Config) -> Self {
        let s = MemoryStore::new();
        *s.config.borrow_mut() = cfg;
        s
    }

    pub fn fail_next_add(&self) {
        self.fail_next_add.set(true);
    }
}

impl Store for MemoryStore {
    fn list_entries(&self, month: Option<&str>) -> Result<Vec<Entry>, StoreError> {
        let entries = self.entries.borrow();
        Ok(entries
            .iter()
            .filter(|e| month.is_none_or(|m| e.month_key() == m))
            .cloned()
            .collect())
    }

    fn list_months(&self) -> Result<Vec<String>, StoreError> {
        let mut months: Vec<String> = self
            .entries
            .borrow()
            .iter()
            .map(|e| e.month_key().to_string())
            .collect();
        months.sort();
        months.dedup();
        Ok(months)
    }

    fn add_entry(&self, entry: &Entry) -> Result<String, StoreError> {
        if self.fail_next_add.replace(false) {
            return Err(StoreError::Backend("simulated write failure".to_string()));
        }
        self.entries.borrow_mut().push(entry.clone());
        Ok(entry.id.clone())
    }

    fn delete_entry(&self, id: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Err(StoreError::Backend(format!("Entry '{}' not found", id)));
        }
        Ok(())
    }

    fn replace_all(&self, new_entries: &[Entry]) -> Result<usize, StoreError> {
        let mut entries = self.entries.borrow_mut();
        *entries = new_entries.to_vec();
        Ok(entries.len())
    }

    fn get_config(&self) -> Result<Config, StoreError> {
        Ok(self.config.borrow().clone())
    }

    fn set_config(&self, cfg: &Config) -> Result<(), StoreError> {
        *self.config.borrow_mut() = cfg.clone();
        Ok(())
    }

    fn register_device_profile(&self, device_id: &str, profile: &str) -> Result<(), StoreError> {
        self.config
            .borrow_mut()
            .devices
            .insert(device_id.to_string(), profile.to_string());
        Ok(())
    }
}
