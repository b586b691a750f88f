// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::ledger;
use crate::models::{Account, Direction, Entry, EntryType, Nature, Scope};
use crate::normalize;
use crate::prefs::UserPreferences;
use crate::store::Store;
use crate::utils::{
    format_clp, maybe_print_json, parse_amount, parse_date, pretty_table, signed_clp, today_local,
};

pub fn handle(store: &dyn Store, prefs: &UserPreferences, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, prefs, sub),
        Some(("rm", sub)) => rm(store, sub),
        Some(("history", sub)) => history(store, sub),
        _ => Ok(()),
    }
}

fn add(store: &dyn Store, prefs: &UserPreferences, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let r#type = match sub.get_one::<String>("type").unwrap().as_str() {
        "income" => EntryType::Income,
        _ => EntryType::Expense,
    };
    let date = match sub.get_one::<String>("date") {
        Some(d) => {
            let d = d.trim();
            parse_date(d)?;
            d.to_string()
        }
        None => today_local(),
    };
    let note = sub
        .get_one::<String>("note")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let shared = sub.get_flag("shared");
    let impact_key = sub
        .get_one::<String>("impact")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let (nature, direction) = match r#type {
        EntryType::Income => (Nature::Income, Direction::In),
        EntryType::Expense => (Nature::Expense, Direction::Out),
    };
    let entry = Entry {
        id: uuid::Uuid::new_v4().to_string(),
        r#type,
        nature: Some(nature),
        amount,
        category,
        profile: prefs.profile.clone(),
        date,
        note,
        split: if r#type == EntryType::Expense {
            Some("50_50".to_string())
        } else {
            None
        },
        scope: if shared { Scope::Shared } else { Scope::Personal },
        account: Account::Personal,
        direction,
        impact_key,
        fixed_id: String::new(),
        created_at: crate::utils::now_timestamp(),
    };

    // Validation errors never reach the store.
    let cfg = store.get_config().context("Fetch config")?;
    normalize::validate_new(&entry, &cfg)?;

    let id = store.add_entry(&entry).context("Save entry")?;

    // Full refresh after every mutation; show the month the entry landed in.
    let month = entry.month_key().to_string();
    let entries = store.list_entries(None).context("Refresh entries")?;
    let totals = ledger::month_totals(&entries, &prefs.profile, &month);
    println!(
        "Saved {} ({}). {} · Ingresos +${} · Gastos -${} · Neto {}",
        id,
        entry.date,
        month,
        format_clp(totals.income),
        format_clp(totals.expense),
        signed_clp(totals.net)
    );
    Ok(())
}

fn rm(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim();
    store
        .delete_entry(id)
        .with_context(|| format!("Delete entry '{}'", id))?;
    println!("Deleted {}", id);
    Ok(())
}

fn history(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let entries = store.list_entries(None).context("Fetch entries")?;
    let sorted = ledger::sorted_history(&entries);

    if maybe_print_json(json_flag, jsonl_flag, &sorted)? {
        return Ok(());
    }
    let rows = sorted
        .iter()
        .map(|e| {
            let sign = match e.direction {
                Direction::In => "+",
                Direction::Out => "-",
            };
            vec![
                e.date.clone(),
                format!("{}${}", sign, format_clp(e.amount)),
                e.category_label().to_string(),
                e.profile.clone(),
                match e.scope {
                    Scope::Shared => format!("shared:{}", e.impact_key),
                    Scope::Personal => "personal".to_string(),
                },
                e.note.clone(),
                e.id.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Date", "Amount", "Category", "Profile", "Scope", "Note", "Id"],
            rows
        )
    );
    Ok(())
}
