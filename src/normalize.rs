// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Entry normalization: every record that reaches the store goes through
//! [`normalize`] first, whether it was typed into the CLI, read back from
//! the backend sheet, or bulk-imported from a JSON file. Three generations
//! of entry shapes coexist in old exports (paidBy-era, type-only,
//! scope/account/direction); this is the single place that upgrades them.

use anyhow::{bail, Result};
use serde_json::Value;

use crate::models::{classify, Account, Config, Direction, Entry, EntryType, Flow, Nature, Scope};
use crate::utils;

fn str_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Old exports tagged entries with who paid instead of a profile id.
fn profile_from_legacy(raw: &Value, cfg: &Config) -> String {
    let first = cfg.profiles.first().map(|p| p.id.clone()).unwrap_or_default();
    let second = cfg.profiles.get(1).map(|p| p.id.clone());

    let paid_by = str_field(raw, "paidBy").unwrap_or_default().to_lowercase();
    if paid_by == "yo" {
        return first;
    }
    if let Some(partner) = second {
        if paid_by == "pareja" || paid_by == "ella" || paid_by == partner {
            return partner;
        }
        // "maria" for "maria_ignacia" and similar shorthand
        if !paid_by.is_empty() && partner.starts_with(&paid_by) {
            return partner;
        }
    }
    first
}

fn amount_from(raw: &Value) -> i64 {
    let n = match raw.get("amount") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().replace(',', ".").parse().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() && n > 0.0 {
        n.round() as i64
    } else {
        0
    }
}

/// Coerces an arbitrary JSON value into a structurally valid [`Entry`].
/// Total by design: bad fields get defaults, never errors, so a half-broken
/// legacy record still round-trips instead of wedging a whole import.
pub fn normalize(raw: &Value, cfg: &Config) -> Entry {
    let r#type = match str_field(raw, "type").as_deref() {
        Some("income") => EntryType::Income,
        _ => EntryType::Expense,
    };

    let nature = match str_field(raw, "nature").as_deref() {
        Some("income") => Some(Nature::Income),
        Some("expense") => Some(Nature::Expense),
        Some("fixed") => Some(Nature::Fixed),
        Some("saving") => Some(Nature::Saving),
        _ => None,
    };

    let profile = match str_field(raw, "profile") {
        Some(p) => p,
        None => profile_from_legacy(raw, cfg),
    };

    let category = {
        let candidate = str_field(raw, "category").unwrap_or_default();
        let allowed = cfg.category_list(r#type);
        if allowed.is_empty() {
            // Lenient schema: no allow-list configured.
            if candidate.is_empty() {
                "Otros".to_string()
            } else {
                candidate
            }
        } else if allowed.iter().any(|c| *c == candidate) {
            candidate
        } else {
            "Otros".to_string()
        }
    };

    let date = raw
        .get("date")
        .and_then(Value::as_str)
        .and_then(utils::iso_date_prefix)
        .map(String::from)
        .unwrap_or_else(utils::today_local);

    let scope = match str_field(raw, "scope").as_deref() {
        Some("shared") => Scope::Shared,
        _ => Scope::Personal,
    };

    let account = str_field(raw, "account")
        .map(Account::from)
        .unwrap_or_default();

    let mut direction = match str_field(raw, "direction").as_deref() {
        Some("in") => Direction::In,
        Some("out") => Direction::Out,
        _ => {
            if classify(nature, r#type) == Flow::Income {
                Direction::In
            } else {
                Direction::Out
            }
        }
    };
    // nature=income always means cash coming in
    if nature == Some(Nature::Income) {
        direction = Direction::In;
    }

    let mut impact_key = str_field(raw, "impactKey").unwrap_or_default();
    if scope == Scope::Shared && impact_key.is_empty() {
        impact_key = "Otros".to_string();
    }

    Entry {
        id: str_field(raw, "id").unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        r#type,
        nature,
        amount: amount_from(raw),
        category,
        profile,
        date,
        note: str_field(raw, "note").unwrap_or_default(),
        split: if r#type == EntryType::Expense {
            Some(str_field(raw, "split").unwrap_or_else(|| "50_50".to_string()))
        } else {
            None
        },
        scope,
        account,
        direction,
        impact_key,
        fixed_id: str_field(raw, "fixedId").unwrap_or_default(),
        created_at: str_field(raw, "createdAt").unwrap_or_else(utils::now_timestamp),
    }
}

/// Resolves a parsed bulk-import payload into the array of entry-like
/// objects. Accepts a top-level array or an object wrapping one under
/// items/entries/movements/data; anything else aborts the import whole.
pub fn resolve_import_items(parsed: &Value) -> Result<Vec<Value>> {
    if let Some(arr) = parsed.as_array() {
        return Ok(arr.clone());
    }
    if parsed.is_object() {
        for key in ["items", "entries", "movements", "data"] {
            if let Some(v) = parsed.get(key) {
                if let Some(arr) = v.as_array() {
                    return Ok(arr.clone());
                }
                bail!("Import key '{}' is not an array", key);
            }
        }
    }
    bail!("Import payload must be an array of movements or an object with items/entries/movements/data")
}

/// Local validation for manually created entries. These errors are surfaced
/// to the user before anything is sent to the store.
pub fn validate_new(entry: &Entry, cfg: &Config) -> Result<()> {
    if entry.amount <= 0 {
        bail!("Invalid amount: must be > 0");
    }
    let allowed = cfg.category_list(entry.r#type);
    if !allowed.is_empty() && !allowed.iter().any(|c| *c == entry.category) {
        bail!("Invalid category '{}'", entry.category);
    }
    if entry.scope == Scope::Shared && entry.impact_key.trim().is_empty() {
        bail!("Shared entries need an impact key (e.g. 'Casa')");
    }
    if entry.nature == Some(Nature::Income) && entry.direction != Direction::In {
        bail!("Income entries must have direction 'in'");
    }
    Ok(())
}
