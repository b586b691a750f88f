// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Fixed-charge materialization: turns recurring expense templates into
//! dated entries for a month, exactly once.

use std::collections::HashSet;

use crate::models::{
    AppliesTo, Direction, Entry, EntryType, FixedCharge, Nature, Profile, Scope,
};
use crate::utils;

/// Duplicate-detection key. An entry matching a definition on all of these
/// is considered already generated and is skipped.
fn dedup_key(e: &Entry) -> (String, String, String, i64, String, String, String, String) {
    let scope_profile = match e.scope {
        Scope::Shared => format!("shared:{}", e.profile),
        Scope::Personal => e.profile.clone(),
    };
    (
        scope_profile,
        e.date.clone(),
        e.fixed_id.clone(),
        e.amount,
        e.category.clone(),
        e.nature.map(|n| n.as_str()).unwrap_or("").to_string(),
        String::from(e.account.clone()),
        e.direction.as_str().to_string(),
    )
}

fn target_profiles(def: &FixedCharge, roster: &[Profile]) -> Vec<String> {
    match def.scope {
        // Shared visibility already reaches everyone; one entry is enough,
        // attributed to a canonical representative.
        Scope::Shared => {
            let rep = match &def.applies_to {
                AppliesTo::Profile(p) => p.clone(),
                AppliesTo::Both => roster.first().map(|p| p.id.clone()).unwrap_or_default(),
            };
            vec![rep]
        }
        Scope::Personal => match &def.applies_to {
            AppliesTo::Profile(p) => vec![p.clone()],
            AppliesTo::Both => roster.iter().map(|p| p.id.clone()).collect(),
        },
    }
}

/// Materializes every applicable definition for `month`, skipping anything
/// already present. Returns only newly created entries; an empty result is a
/// normal no-op. Definitions with a non-positive amount are ignored rather
/// than treated as errors.
pub fn generate_for_month(
    month: &str,
    defs: &[FixedCharge],
    existing: &[Entry],
    roster: &[Profile],
) -> Vec<Entry> {
    let mut seen: HashSet<_> = existing
        .iter()
        .filter(|e| e.month_key() == month && !e.fixed_id.is_empty())
        .map(dedup_key)
        .collect();

    let date = utils::month_start(month);
    let mut out = Vec::new();
    for def in defs {
        if def.amount <= 0 {
            continue;
        }
        for profile in target_profiles(def, roster) {
            let entry = Entry {
                id: uuid::Uuid::new_v4().to_string(),
                r#type: EntryType::Expense,
                nature: Some(Nature::Fixed),
                amount: def.amount,
                category: def.category.clone(),
                profile,
                date: date.clone(),
                note: def.name.clone(),
                split: Some("50_50".to_string()),
                scope: def.scope,
                account: def.account.clone(),
                direction: Direction::Out,
                impact_key: def.impact_key.clone(),
                fixed_id: def.id.clone(),
                created_at: utils::now_timestamp(),
            };
            if seen.insert(dedup_key(&entry)) {
                out.push(entry);
            }
        }
    }
    out
}
