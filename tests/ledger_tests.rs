// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use gastos::ledger::{
    budget_rows, category_breakdown, goal_stats, is_visible, month_snapshots, month_totals,
    past_net, sorted_history,
};
use gastos::models::{Account, Config, Direction, Entry, EntryType, Nature, Scope};

fn entry(profile: &str, date: &str, amount: i64) -> Entry {
    Entry {
        id: format!("{}-{}-{}", profile, date, amount),
        r#type: EntryType::Expense,
        nature: Some(Nature::Expense),
        amount,
        category: "Comida".to_string(),
        profile: profile.to_string(),
        date: date.to_string(),
        note: String::new(),
        split: Some("50_50".to_string()),
        scope: Scope::Personal,
        account: Account::Personal,
        direction: Direction::Out,
        impact_key: String::new(),
        fixed_id: String::new(),
        created_at: format!("{}T12:00:00Z", date),
    }
}

fn income(profile: &str, date: &str, amount: i64) -> Entry {
    Entry {
        r#type: EntryType::Income,
        nature: Some(Nature::Income),
        category: "Sueldo".to_string(),
        split: None,
        direction: Direction::In,
        ..entry(profile, date, amount)
    }
}

fn shared(mut e: Entry, impact: &str) -> Entry {
    e.scope = Scope::Shared;
    e.impact_key = impact.to_string();
    e
}

#[test]
fn visibility_is_month_and_ownership_or_shared() {
    let own = entry("pablo", "2024-03-05", 100);
    let foreign = entry("maria_ignacia", "2024-03-05", 100);
    let foreign_shared = shared(entry("maria_ignacia", "2024-03-05", 100), "Casa");
    let own_other_month = entry("pablo", "2024-02-28", 100);

    assert!(is_visible(&own, "pablo", "2024-03"));
    assert!(!is_visible(&foreign, "pablo", "2024-03"));
    assert!(is_visible(&foreign_shared, "pablo", "2024-03"));
    assert!(!is_visible(&own_other_month, "pablo", "2024-03"));
}

#[test]
fn totals_include_partner_shared_income() {
    // A logs a personal expense; B logs a shared income. A's summary sees both.
    let entries = vec![
        entry("pablo", "2024-03-05", 10_000),
        shared(income("maria_ignacia", "2024-03-10", 50_000), "Casa"),
    ];
    let t = month_totals(&entries, "pablo", "2024-03");
    assert_eq!(t.income, 50_000);
    assert_eq!(t.expense, 10_000);
    assert_eq!(t.net, 40_000);

    // B does not see A's personal expense.
    let t = month_totals(&entries, "maria_ignacia", "2024-03");
    assert_eq!(t.expense, 0);
    assert_eq!(t.income, 50_000);
}

#[test]
fn saving_entries_touch_neither_total() {
    let mut saving = entry("pablo", "2024-03-05", 20_000);
    saving.nature = Some(Nature::Saving);
    saving.account = Account::Goal("viaje".to_string());
    let entries = vec![saving, entry("pablo", "2024-03-06", 5_000)];
    let t = month_totals(&entries, "pablo", "2024-03");
    assert_eq!(t.income, 0);
    assert_eq!(t.expense, 5_000);
}

#[test]
fn legacy_type_classifies_when_nature_absent() {
    let mut spend = entry("pablo", "2024-03-05", 700);
    spend.nature = None;
    let mut salary = income("pablo", "2024-03-01", 9_000);
    salary.nature = None;

    let t = month_totals(&[spend, salary], "pablo", "2024-03");
    assert_eq!(t.expense, 700);
    assert_eq!(t.income, 9_000);
    assert_eq!(t.net, 8_300);
}

#[test]
fn breakdown_sorts_by_value_then_label() {
    let mut snacks = entry("pablo", "2024-03-05", 300);
    snacks.category = "Panorama".to_string();
    let mut rent = entry("pablo", "2024-03-01", 900);
    rent.category = "Casa".to_string();
    let entries = vec![entry("pablo", "2024-03-02", 900), snacks, rent];

    let (rows, max) = category_breakdown(&entries, "pablo", "2024-03");
    assert_eq!(max, 900);
    let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
    // Ties broken alphabetically.
    assert_eq!(labels, vec!["Casa", "Comida", "Panorama"]);
}

#[test]
fn empty_category_folds_into_otros_bucket() {
    let mut e = entry("pablo", "2024-03-05", 400);
    e.category = "  ".to_string();
    let (rows, _) = category_breakdown(&[e], "pablo", "2024-03");
    assert_eq!(rows[0].label, "Otros");
}

#[test]
fn budget_target_is_rounded_share_of_income() {
    let mut cfg = Config::default();
    let mut table = BTreeMap::new();
    table.insert("Comida".to_string(), 0.35);
    cfg.budget_percents.insert("pablo".to_string(), table);

    let entries = vec![
        income("pablo", "2024-03-01", 100_000),
        entry("pablo", "2024-03-10", 40_000),
    ];
    let rows = budget_rows(&entries, "pablo", "2024-03", &cfg);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].target, 35_000);
    assert_eq!(rows[0].spent, 40_000);
    assert_eq!(rows[0].delta, 5_000);
}

#[test]
fn budget_without_table_is_empty() {
    let mut cfg = Config::default();
    cfg.budget_percents.clear();
    let entries = vec![income("pablo", "2024-03-01", 100_000)];
    assert!(budget_rows(&entries, "pablo", "2024-03", &cfg).is_empty());
}

#[test]
fn past_net_is_strictly_before_month_and_profile_only() {
    let entries = vec![
        income("pablo", "2024-01-15", 10_000),
        entry("pablo", "2024-02-29", 3_000),
        // Dated inside the month: excluded.
        entry("pablo", "2024-03-01", 99_999),
        // Someone else's history: excluded even when shared.
        shared(income("maria_ignacia", "2024-01-10", 50_000), "Casa"),
    ];
    let p = past_net(&entries, "pablo", "2024-03");
    assert_eq!(p.count, 2);
    assert_eq!(p.income, 10_000);
    assert_eq!(p.expense, 3_000);
    assert_eq!(p.net, 7_000);
}

#[test]
fn snapshots_union_months_and_apply_visibility() {
    let entries = vec![
        entry("pablo", "2024-02-10", 1_000),
        shared(income("maria_ignacia", "2024-02-20", 9_000), "Casa"),
        entry("maria_ignacia", "2024-01-05", 500),
    ];
    let known = vec!["2023-12".to_string()];
    let snaps = month_snapshots(&entries, "pablo", "2024-03", &known);

    // Union of data months, store months and the current month.
    let months: Vec<&str> = snaps.keys().map(String::as_str).collect();
    assert_eq!(months, vec!["2023-12", "2024-01", "2024-02", "2024-03"]);

    let feb = snaps["2024-02"];
    assert_eq!(feb.expense, 1_000);
    assert_eq!(feb.income, 9_000);
    // Partner's personal january entry is invisible to pablo.
    assert_eq!(snaps["2024-01"].expense, 0);
    // Current month shows even with no entries.
    assert_eq!(snaps["2024-03"].income, 0);
}

#[test]
fn goal_stats_split_lifetime_and_month() {
    let mk = |date: &str, amount: i64, direction: Direction| {
        let mut e = entry("pablo", date, amount);
        e.nature = Some(Nature::Saving);
        e.account = Account::Goal("viaje".to_string());
        e.direction = direction;
        e
    };
    let mut foreign = mk("2024-03-08", 7_777, Direction::In);
    foreign.profile = "maria_ignacia".to_string();
    let mut other_goal = mk("2024-03-09", 5_555, Direction::In);
    other_goal.account = Account::Goal("auto".to_string());

    let entries = vec![
        mk("2024-01-10", 30_000, Direction::In),
        mk("2024-03-05", 10_000, Direction::In),
        mk("2024-03-20", 4_000, Direction::Out),
        foreign,
        other_goal,
    ];
    let s = goal_stats(&entries, "viaje", "pablo", "2024-03");
    assert_eq!(s.lifetime.total_in, 40_000);
    assert_eq!(s.lifetime.total_out, 4_000);
    assert_eq!(s.lifetime.balance(), 36_000);
    assert_eq!(s.month.total_in, 10_000);
    assert_eq!(s.month.total_out, 4_000);
}

#[test]
fn goal_stats_include_shared_contributions() {
    let mut e = entry("maria_ignacia", "2024-03-05", 12_000);
    e.nature = Some(Nature::Saving);
    e.account = Account::Goal("casa_propia".to_string());
    e.direction = Direction::In;
    e.scope = Scope::Shared;
    let s = goal_stats(&[e], "casa_propia", "pablo", "2024-03");
    assert_eq!(s.lifetime.total_in, 12_000);
}

#[test]
fn history_is_newest_first_with_created_at_tiebreak() {
    let mut a = entry("pablo", "2024-03-05", 1);
    a.created_at = "2024-03-05T08:00:00Z".to_string();
    let mut b = entry("pablo", "2024-03-05", 2);
    b.created_at = "2024-03-05T09:00:00Z".to_string();
    let c = entry("pablo", "2024-03-06", 3);

    let entries = vec![a, c, b];
    let sorted = sorted_history(&entries);
    let amounts: Vec<i64> = sorted.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, vec![3, 2, 1]);
}
