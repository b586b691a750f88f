// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, bail, Context, Result};

use crate::goals::{move_balance_to_goal, move_goal_to_balance, reconcile};
use crate::ledger::goal_stats;
use crate::models::{Entry, Goal, Scope};
use crate::prefs::UserPreferences;
use crate::store::Store;
use crate::utils::{
    format_clp, maybe_print_json, month_key, parse_amount, parse_month, pretty_table, signed_clp,
    today_local,
};

pub fn handle(store: &dyn Store, prefs: &UserPreferences, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("status", sub)) => status(store, prefs, sub),
        Some(("deposit", sub)) => deposit(store, prefs, sub),
        Some(("withdraw", sub)) => withdraw(store, prefs, sub),
        Some(("reconcile", sub)) => run_reconcile(store, sub),
        _ => Ok(()),
    }
}

/// Goals the active profile can see: its own plus shared ones.
fn goals_for<'a>(goals: &'a [Goal], profile: &str) -> Vec<&'a Goal> {
    goals
        .iter()
        .filter(|g| match (&g.scope, &g.profile) {
            (Scope::Shared, _) => true,
            (Scope::Personal, Some(owner)) => owner == profile,
            (Scope::Personal, None) => true,
        })
        .collect()
}

fn find_goal<'a>(goals: &'a [Goal], id: &str) -> Result<&'a Goal> {
    goals
        .iter()
        .find(|g| g.id == id)
        .ok_or_else(|| anyhow!("Goal '{}' not found in config", id))
}

fn status(store: &dyn Store, prefs: &UserPreferences, sub: &clap::ArgMatches) -> Result<()> {
    let month = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m.trim())?,
        None => month_key(&today_local()).to_string(),
    };
    let cfg = store.get_config().context("Fetch config")?;
    let entries = store.list_entries(None).context("Fetch entries")?;

    let visible = goals_for(&cfg.goals, &prefs.profile);
    if visible.is_empty() {
        println!("No goals configured for '{}'.", prefs.profile);
        return Ok(());
    }

    let stats: Vec<_> = visible
        .iter()
        .map(|g| {
            (
                g.id.clone(),
                g.name.clone(),
                goal_stats(&entries, &g.id, &prefs.profile, &month),
            )
        })
        .collect();

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &stats)? {
        return Ok(());
    }
    let rows = stats
        .iter()
        .map(|(id, name, s)| {
            vec![
                name.clone(),
                id.clone(),
                format!("${}", format_clp(s.lifetime.balance())),
                format!("+${}", format_clp(s.month.total_in)),
                format!("-${}", format_clp(s.month.total_out)),
                signed_clp(s.month.balance()),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Goal", "Id", "Balance", "In (month)", "Out (month)", "Net (month)"],
            rows
        )
    );
    Ok(())
}

/// Writes a transfer pair with two independent store calls. If the second
/// write fails, the first is NOT rolled back; the one-sided entry is
/// reported for manual correction (see `goal reconcile`).
fn write_pair(store: &dyn Store, pair: [Entry; 2], label: &str) -> Result<()> {
    let [debit, credit] = pair;
    store
        .add_entry(&debit)
        .with_context(|| format!("Write {} debit", label))?;
    if let Err(err) = store.add_entry(&credit) {
        bail!(
            "{} credit failed after the debit was written: {}. \
             The ledger now holds a one-sided entry '{}'; delete it with \
             'gastos entry rm --id {}' or inspect 'gastos goal reconcile'.",
            label,
            err,
            debit.id,
            debit.id
        );
    }
    Ok(())
}

fn deposit(store: &dyn Store, prefs: &UserPreferences, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let goal_id = sub.get_one::<String>("goal").unwrap().trim();
    let source_scope = if sub.get_flag("from-shared") {
        Scope::Shared
    } else {
        Scope::Personal
    };
    let cfg = store.get_config().context("Fetch config")?;
    let goal = find_goal(&cfg.goals, goal_id)?;

    let pair = move_balance_to_goal(goal, &prefs.profile, amount, source_scope)?;
    write_pair(store, pair, "Deposit")?;
    println!("Deposited ${} into '{}'.", format_clp(amount), goal.name);
    Ok(())
}

fn withdraw(store: &dyn Store, prefs: &UserPreferences, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let goal_id = sub.get_one::<String>("goal").unwrap().trim();
    // Crediting a personal goal to the shared balance is an explicit choice.
    let credit_scope = if sub.get_flag("to-shared") {
        Scope::Shared
    } else {
        Scope::Personal
    };
    let cfg = store.get_config().context("Fetch config")?;
    let goal = find_goal(&cfg.goals, goal_id)?;

    let pair = move_goal_to_balance(goal, &prefs.profile, amount, credit_scope)?;
    write_pair(store, pair, "Withdrawal")?;
    println!("Withdrew ${} from '{}'.", format_clp(amount), goal.name);
    Ok(())
}

fn run_reconcile(store: &dyn Store, sub: &clap::ArgMatches) -> Result<()> {
    let entries = store.list_entries(None).context("Fetch entries")?;
    let unmatched = reconcile(&entries);

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &unmatched)? {
        return Ok(());
    }
    if unmatched.is_empty() {
        println!("All goal transfers are balanced.");
        return Ok(());
    }
    let rows = unmatched
        .iter()
        .map(|e| {
            vec![
                e.date.clone(),
                String::from(e.account.clone()),
                e.direction.as_str().to_string(),
                format!("${}", format_clp(e.amount)),
                e.note.clone(),
                e.id.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Date", "Account", "Direction", "Amount", "Note", "Id"],
            rows
        )
    );
    println!(
        "{} one-sided transfer(s); delete the orphan or add its counterpart.",
        unmatched.len()
    );
    Ok(())
}
