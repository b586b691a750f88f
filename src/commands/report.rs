// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::ledger;
use crate::prefs::UserPreferences;
use crate::store::Store;
use crate::utils::{
    format_clp, maybe_print_json, month_key, parse_month, pretty_table, signed_clp, today_local,
};

pub fn handle(store: &dyn Store, prefs: &UserPreferences, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(store, prefs, sub),
        Some(("categories", sub)) => categories(store, prefs, sub),
        Some(("budget", sub)) => budget(store, prefs, sub),
        Some(("months", sub)) => months(store, prefs, sub),
        Some(("past", sub)) => past(store, prefs, sub),
        _ => Ok(()),
    }
}

fn month_or_current(sub: &clap::ArgMatches) -> Result<String> {
    match sub.get_one::<String>("month") {
        Some(m) => parse_month(m.trim()),
        None => Ok(month_key(&today_local()).to_string()),
    }
}

fn summary(store: &dyn Store, prefs: &UserPreferences, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let entries = store.list_entries(None).context("Fetch entries")?;
    let totals = ledger::month_totals(&entries, &prefs.profile, &month);

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &totals)? {
        return Ok(());
    }
    let rows = vec![vec![
        month.clone(),
        format!("+${}", format_clp(totals.income)),
        format!("-${}", format_clp(totals.expense)),
        signed_clp(totals.net),
    ]];
    println!(
        "{}",
        pretty_table(&["Month", "Ingresos", "Gastos", "Neto"], rows)
    );
    Ok(())
}

fn categories(store: &dyn Store, prefs: &UserPreferences, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let entries = store.list_entries(None).context("Fetch entries")?;
    let (rows, max) = ledger::category_breakdown(&entries, &prefs.profile, &month);

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    if rows.is_empty() {
        println!("Sin gastos en {}.", month);
        return Ok(());
    }
    let data = rows
        .iter()
        .map(|r| {
            let pct = if max > 0 {
                ((r.value as f64 / max as f64) * 100.0).round() as i64
            } else {
                0
            };
            let bar = "█".repeat((pct / 5) as usize);
            vec![
                r.label.clone(),
                format!("${}", format_clp(r.value)),
                format!("{:<20} {}%", bar, pct),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Spent", ""], data));
    Ok(())
}

fn budget(store: &dyn Store, prefs: &UserPreferences, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let entries = store.list_entries(None).context("Fetch entries")?;
    let cfg = store.get_config().context("Fetch config")?;
    let rows = ledger::budget_rows(&entries, &prefs.profile, &month, &cfg);

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }
    if rows.is_empty() {
        println!("No budget percentages configured for '{}'.", prefs.profile);
        return Ok(());
    }
    let data = rows
        .iter()
        .map(|r| {
            let verdict = if r.delta > 0 {
                format!("Te pasaste por ${}", format_clp(r.delta))
            } else {
                format!("Te faltan ${}", format_clp(r.delta.abs()))
            };
            vec![
                r.category.clone(),
                format!("{}%", (r.percent * 100.0).round() as i64),
                format!("${}", format_clp(r.target)),
                format!("${}", format_clp(r.spent)),
                verdict,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "%", "Meta", "Gastado", ""], data)
    );
    Ok(())
}

fn months(store: &dyn Store, prefs: &UserPreferences, sub: &clap::ArgMatches) -> Result<()> {
    let entries = store.list_entries(None).context("Fetch entries")?;
    let known = store.list_months().context("Fetch months")?;
    let current = month_key(&today_local()).to_string();
    let snapshots = ledger::month_snapshots(&entries, &prefs.profile, &current, &known);

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &snapshots)? {
        return Ok(());
    }
    // Newest month first, like the month picker.
    let data = snapshots
        .iter()
        .rev()
        .map(|(m, snap)| {
            vec![
                m.clone(),
                format!("+${}", format_clp(snap.income)),
                format!("-${}", format_clp(snap.expense)),
                signed_clp(snap.income - snap.expense),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Ingresos", "Gastos", "Neto"], data)
    );
    Ok(())
}

fn past(store: &dyn Store, prefs: &UserPreferences, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_current(sub)?;
    let entries = store.list_entries(None).context("Fetch entries")?;
    let p = ledger::past_net(&entries, &prefs.profile, &month);

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &p)? {
        return Ok(());
    }
    let rows = vec![vec![
        format!("before {}", month),
        p.count.to_string(),
        format!("+${}", format_clp(p.income)),
        format!("-${}", format_clp(p.expense)),
        signed_clp(p.net),
    ]];
    println!(
        "{}",
        pretty_table(&["Range", "Entries", "Ingresos", "Gastos", "Neto"], rows)
    );
    Ok(())
}
