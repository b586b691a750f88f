// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure derivations over the entry collection. Every function here is
//! deterministic given (entries, config, month); nothing touches the store.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::models::{Account, Config, Direction, Entry, Flow, Nature, Scope};
use crate::utils::is_before_month;

/// The scoping rule: an entry is visible to `profile` for `month` iff it is
/// dated in that month and is either the profile's own or shared. This is
/// the one filter every display aggregation goes through; a divergence here
/// either leaks a private entry or hides a shared cost.
pub fn is_visible(e: &Entry, profile: &str, month: &str) -> bool {
    e.month_key() == month && (e.profile == profile || e.scope == Scope::Shared)
}

pub fn visible<'a>(entries: &'a [Entry], profile: &str, month: &str) -> Vec<&'a Entry> {
    entries
        .iter()
        .filter(|e| is_visible(e, profile, month))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub income: i64,
    pub expense: i64,
    pub net: i64,
}

pub fn month_totals(entries: &[Entry], profile: &str, month: &str) -> MonthTotals {
    let mut t = MonthTotals::default();
    for e in entries.iter().filter(|e| is_visible(e, profile, month)) {
        match e.flow() {
            Flow::Income => t.income += e.amount,
            Flow::Expense => t.expense += e.amount,
            Flow::Neither => {}
        }
    }
    t.net = t.income - t.expense;
    t
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    pub label: String,
    pub value: i64,
}

/// Expense sums grouped by category, largest first. The returned max is the
/// biggest bucket (0 when there are no expenses), used for bar scaling.
pub fn category_breakdown(
    entries: &[Entry],
    profile: &str,
    month: &str,
) -> (Vec<CategoryRow>, i64) {
    let mut by_cat: HashMap<&str, i64> = HashMap::new();
    for e in entries.iter().filter(|e| is_visible(e, profile, month)) {
        if e.flow() == Flow::Expense {
            *by_cat.entry(e.category_label()).or_insert(0) += e.amount;
        }
    }
    let mut rows: Vec<CategoryRow> = by_cat
        .into_iter()
        .map(|(label, value)| CategoryRow {
            label: label.to_string(),
            value,
        })
        .collect();
    rows.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.label.cmp(&b.label)));
    let max = rows.iter().map(|r| r.value).max().unwrap_or(0);
    (rows, max)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetRow {
    pub category: String,
    pub percent: f64,
    pub target: i64,
    pub spent: i64,
    /// spent - target: positive means over budget.
    pub delta: i64,
}

/// Budget-vs-actual per configured category. Target is a percentage of the
/// month's income for this profile, rounded where it is computed so repeated
/// aggregation is stable.
pub fn budget_rows(entries: &[Entry], profile: &str, month: &str, cfg: &Config) -> Vec<BudgetRow> {
    let Some(table) = cfg.budget_table(profile) else {
        return Vec::new();
    };
    let income = month_totals(entries, profile, month).income;

    let mut spent_by_cat: HashMap<&str, i64> = HashMap::new();
    for e in entries.iter().filter(|e| is_visible(e, profile, month)) {
        if e.flow() == Flow::Expense {
            *spent_by_cat.entry(e.category_label()).or_insert(0) += e.amount;
        }
    }

    let mut rows: Vec<BudgetRow> = table
        .iter()
        .map(|(cat, pct)| {
            let target = (income as f64 * pct).round() as i64;
            let spent = *spent_by_cat.get(cat.as_str()).unwrap_or(&0);
            BudgetRow {
                category: cat.clone(),
                percent: *pct,
                target,
                spent,
                delta: spent - target,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.percent
            .total_cmp(&a.percent)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PastNet {
    pub count: usize,
    pub income: i64,
    pub expense: i64,
    pub net: i64,
}

/// Accumulated net strictly before the first day of `month`, for the
/// profile's own entries only. ISO string comparison keeps this independent
/// of the reader's timezone.
pub fn past_net(entries: &[Entry], profile: &str, month: &str) -> PastNet {
    let mut p = PastNet::default();
    for e in entries
        .iter()
        .filter(|e| e.profile == profile && is_before_month(&e.date, month))
    {
        p.count += 1;
        match e.flow() {
            Flow::Income => p.income += e.amount,
            Flow::Expense => p.expense += e.amount,
            Flow::Neither => {}
        }
    }
    p.net = p.income - p.expense;
    p
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthSnapshot {
    pub income: i64,
    pub expense: i64,
}

/// Per-month income/expense previews for the month picker. Months come from
/// the union of the current calendar month, the months reported by the
/// store, and whatever is in the data; the current month always shows even
/// with zero entries. Keys iterate ascending; display usually wants them
/// reversed.
pub fn month_snapshots(
    entries: &[Entry],
    profile: &str,
    current_month: &str,
    known_months: &[String],
) -> BTreeMap<String, MonthSnapshot> {
    let mut months: BTreeSet<String> = known_months
        .iter()
        .filter(|m| !m.is_empty())
        .cloned()
        .collect();
    months.insert(current_month.to_string());
    for e in entries {
        if !e.month_key().is_empty() {
            months.insert(e.month_key().to_string());
        }
    }

    let mut out: BTreeMap<String, MonthSnapshot> = months
        .into_iter()
        .map(|m| (m, MonthSnapshot::default()))
        .collect();
    for e in entries {
        let month = e.month_key().to_string();
        if !is_visible(e, profile, &month) {
            continue;
        }
        let snap = out.entry(month).or_default();
        match e.flow() {
            Flow::Income => snap.income += e.amount,
            Flow::Expense => snap.expense += e.amount,
            Flow::Neither => {}
        }
    }
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GoalFlows {
    pub total_in: i64,
    pub total_out: i64,
}

impl GoalFlows {
    pub fn balance(&self) -> i64 {
        self.total_in - self.total_out
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GoalStats {
    pub lifetime: GoalFlows,
    pub month: GoalFlows,
}

/// Lifetime and selected-month movement of a goal sub-ledger, from the
/// saving entries parked on `goal:<id>` that this profile can see.
pub fn goal_stats(entries: &[Entry], goal_id: &str, profile: &str, month: &str) -> GoalStats {
    let mut stats = GoalStats::default();
    for e in entries {
        if e.nature != Some(Nature::Saving) {
            continue;
        }
        match &e.account {
            Account::Goal(id) if id == goal_id => {}
            _ => continue,
        }
        if e.profile != profile && e.scope != Scope::Shared {
            continue;
        }
        let (lifetime, monthly) = match e.direction {
            Direction::In => (&mut stats.lifetime.total_in, &mut stats.month.total_in),
            Direction::Out => (&mut stats.lifetime.total_out, &mut stats.month.total_out),
        };
        *lifetime += e.amount;
        if e.month_key() == month {
            *monthly += e.amount;
        }
    }
    stats
}

/// History ordering: newest date first, creation time as tiebreaker.
pub fn sorted_history(entries: &[Entry]) -> Vec<&Entry> {
    let mut out: Vec<&Entry> = entries.iter().collect();
    out.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    out
}
