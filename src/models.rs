// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Legacy primary classification. Newer entries also carry a `nature`;
/// readers fall back to this when `nature` is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Expense,
    Income,
}

/// Finer classification introduced after `EntryType`. `Saving` entries are
/// excluded from income/expense totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nature {
    Income,
    Expense,
    Fixed,
    Saving,
}

/// Visibility class: shared entries are visible to every profile and take
/// part in shared-impact accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Personal,
    Shared,
}

/// Cash direction, independent of `EntryType`. Used for goal and fixed-charge
/// accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

/// Sub-ledger that absorbed or released the funds. Serialized as "personal",
/// "balance" or "goal:<id>"; unknown strings fold back to Personal so stored
/// legacy rows never fail to load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Account {
    #[default]
    Personal,
    Balance,
    Goal(String),
}

impl From<String> for Account {
    fn from(s: String) -> Self {
        match s.as_str() {
            "balance" => Account::Balance,
            other => match other.strip_prefix("goal:") {
                Some(id) if !id.is_empty() => Account::Goal(id.to_string()),
                _ => Account::Personal,
            },
        }
    }
}

impl From<Account> for String {
    fn from(a: Account) -> Self {
        match a {
            Account::Personal => "personal".to_string(),
            Account::Balance => "balance".to_string(),
            Account::Goal(id) => format!("goal:{}", id),
        }
    }
}

impl EntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Expense => "expense",
            EntryType::Income => "income",
        }
    }
}

impl Nature {
    pub fn as_str(self) -> &'static str {
        match self {
            Nature::Income => "income",
            Nature::Expense => "expense",
            Nature::Fixed => "fixed",
            Nature::Saving => "saving",
        }
    }
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Personal => "personal",
            Scope::Shared => "shared",
        }
    }
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

/// Income/expense bucket an entry lands in after classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Income,
    Expense,
    Neither,
}

/// Classification with back-compat: `nature` wins when present, otherwise
/// fall back to the legacy `type`.
pub fn classify(nature: Option<Nature>, r#type: EntryType) -> Flow {
    match nature {
        Some(Nature::Income) => Flow::Income,
        Some(Nature::Expense) | Some(Nature::Fixed) => Flow::Expense,
        Some(Nature::Saving) => Flow::Neither,
        None => match r#type {
            EntryType::Income => Flow::Income,
            EntryType::Expense => Flow::Expense,
        },
    }
}

/// One ledger record. Immutable once stored; edits are delete + re-add.
/// The wire format is the camelCase JSON the backend sheet has always held.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub r#type: EntryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nature: Option<Nature>,
    pub amount: i64,
    pub category: String,
    pub profile: String,
    pub date: String, // YYYY-MM-DD, creator-local
    #[serde(default)]
    pub note: String,
    /// Legacy cost-sharing tag, superseded by scope/account/impactKey but
    /// kept for old readers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split: Option<String>,
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub account: Account,
    pub direction: Direction,
    #[serde(default)]
    pub impact_key: String,
    #[serde(default)]
    pub fixed_id: String,
    #[serde(default)]
    pub created_at: String,
}

impl Entry {
    /// "YYYY-MM" key of the entry's date.
    pub fn month_key(&self) -> &str {
        crate::utils::month_key(&self.date)
    }

    /// Income/expense bucket for aggregation.
    pub fn flow(&self) -> Flow {
        classify(self.nature, self.r#type)
    }

    /// Display grouping label; historical entries may hold categories no
    /// longer in the active list, so empty ones fold into "Otros".
    pub fn category_label(&self) -> &str {
        if self.category.trim().is_empty() {
            "Otros"
        } else {
            &self.category
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
}

/// Named savings target. Its balance is never stored: it is derived from the
/// entries whose account is `goal:<id>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub scope: Scope,
    /// Owning profile for personal goals; None for shared ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

/// Which profile(s) a fixed charge applies to. Serialized as "both" or a
/// profile id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppliesTo {
    Both,
    Profile(String),
}

impl From<String> for AppliesTo {
    fn from(s: String) -> Self {
        if s == "both" {
            AppliesTo::Both
        } else {
            AppliesTo::Profile(s)
        }
    }
}

impl From<AppliesTo> for String {
    fn from(a: AppliesTo) -> Self {
        match a {
            AppliesTo::Both => "both".to_string(),
            AppliesTo::Profile(p) => p,
        }
    }
}

/// Recurring expense template. Lives in configuration and is materialized
/// into dated entries once per month; never itself a ledger item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedCharge {
    pub id: String,
    pub name: String,
    pub category: String,
    pub amount: i64,
    #[serde(default)]
    pub scope: Scope,
    pub applies_to: AppliesTo,
    #[serde(default)]
    pub account: Account,
    #[serde(default)]
    pub impact_key: String,
}

/// Remote configuration, fetched once per session and cached. Mutated only
/// through an explicit replace-and-refetch write-through.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_profiles")]
    pub profiles: Vec<Profile>,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default = "default_income_categories")]
    pub income_categories: Vec<String>,
    /// profile id -> category -> fraction of that month's income.
    #[serde(default)]
    pub budget_percents: BTreeMap<String, BTreeMap<String, f64>>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub fixed_charges: Vec<FixedCharge>,
    /// Shared-cost bucket vocabulary ("Casa", "Vacaciones", ...).
    #[serde(default)]
    pub impact_keys: Vec<String>,
    /// device id -> profile id assignments.
    #[serde(default)]
    pub devices: BTreeMap<String, String>,
}

fn default_profiles() -> Vec<Profile> {
    vec![
        Profile {
            id: "pablo".to_string(),
            name: "Pablo".to_string(),
        },
        Profile {
            id: "maria_ignacia".to_string(),
            name: "Maria Ignacia".to_string(),
        },
    ]
}

fn default_categories() -> Vec<String> {
    ["Comida", "Transporte", "Casa", "Salud", "Panorama", "Otros"]
        .map(String::from)
        .to_vec()
}

fn default_income_categories() -> Vec<String> {
    ["Sueldo", "Transferencia", "Reembolso", "Regalo", "Venta", "Otros"]
        .map(String::from)
        .to_vec()
}

impl Default for Config {
    fn default() -> Self {
        // Sample budget tuning; the live table comes from remote config.
        let mut budget_percents = BTreeMap::new();
        let pablo: BTreeMap<String, f64> = [
            ("Casa", 0.35),
            ("Comida", 0.18),
            ("Transporte", 0.08),
            ("Panorama", 0.05),
            ("Salud", 0.03),
            ("Otros", 0.06),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        let maria: BTreeMap<String, f64> = [
            ("Casa", 0.30),
            ("Comida", 0.20),
            ("Transporte", 0.08),
            ("Panorama", 0.06),
            ("Salud", 0.03),
            ("Otros", 0.06),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        budget_percents.insert("pablo".to_string(), pablo);
        budget_percents.insert("maria_ignacia".to_string(), maria);

        Config {
            profiles: default_profiles(),
            categories: default_categories(),
            income_categories: default_income_categories(),
            budget_percents,
            goals: Vec::new(),
            fixed_charges: Vec::new(),
            impact_keys: ["Casa", "Vacaciones", "Otros"].map(String::from).to_vec(),
            devices: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Active category allow-list for the given entry type. An empty list
    /// means the lenient legacy schema (any non-empty category passes).
    pub fn category_list(&self, r#type: EntryType) -> &[String] {
        match r#type {
            EntryType::Income => &self.income_categories,
            EntryType::Expense => &self.categories,
        }
    }

    pub fn has_profile(&self, id: &str) -> bool {
        self.profiles.iter().any(|p| p.id == id)
    }

    pub fn profile_name(&self, id: &str) -> &str {
        self.profiles
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
            .unwrap_or("—")
    }

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn budget_table(&self, profile: &str) -> Option<&BTreeMap<String, f64>> {
        self.budget_percents.get(profile)
    }
}
