// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Goal transfers. A transfer is a matched pair of saving entries: one side
//! on the goal sub-ledger, one on the balance, equal amounts. The pair is
//! written with two independent store calls; if the second write fails the
//! ledger keeps the one-sided entry and [`reconcile`] will flag it.

use anyhow::{bail, Result};

use crate::models::{Account, Direction, Entry, EntryType, Goal, Nature, Scope};
use crate::utils;

const TRANSFER_CATEGORY: &str = "Ahorro";

fn transfer_entry(
    goal: &Goal,
    profile: &str,
    amount: i64,
    account: Account,
    direction: Direction,
    scope: Scope,
    note: String,
) -> Entry {
    let r#type = match direction {
        Direction::In => EntryType::Income,
        Direction::Out => EntryType::Expense,
    };
    Entry {
        id: uuid::Uuid::new_v4().to_string(),
        r#type,
        nature: Some(Nature::Saving),
        amount,
        category: TRANSFER_CATEGORY.to_string(),
        profile: profile.to_string(),
        date: utils::today_local(),
        note,
        split: if r#type == EntryType::Expense {
            Some("50_50".to_string())
        } else {
            None
        },
        scope,
        account,
        direction,
        impact_key: if scope == Scope::Shared {
            goal.name.clone()
        } else {
            String::new()
        },
        fixed_id: String::new(),
        created_at: utils::now_timestamp(),
    }
}

/// Withdraws `amount` from a goal into the general balance. The credit's
/// scope is the caller's explicit choice: crediting a personal goal to the
/// shared balance converts a private saving into a shared contribution, and
/// that must never be inferred.
pub fn move_goal_to_balance(
    goal: &Goal,
    profile: &str,
    amount: i64,
    credit_scope: Scope,
) -> Result<[Entry; 2]> {
    if amount <= 0 {
        bail!("Transfer amount must be > 0");
    }
    let note = format!("Retiro de meta '{}'", goal.name);
    let debit = transfer_entry(
        goal,
        profile,
        amount,
        Account::Goal(goal.id.clone()),
        Direction::Out,
        goal.scope,
        note.clone(),
    );
    let credit = transfer_entry(
        goal,
        profile,
        amount,
        Account::Balance,
        Direction::In,
        credit_scope,
        note,
    );
    debug_assert_eq!(debit.amount, credit.amount);
    Ok([debit, credit])
}

/// Deposits `amount` into a goal from a personal or shared source. Mirror of
/// [`move_goal_to_balance`] with the directions reversed.
pub fn move_balance_to_goal(
    goal: &Goal,
    profile: &str,
    amount: i64,
    source_scope: Scope,
) -> Result<[Entry; 2]> {
    if amount <= 0 {
        bail!("Transfer amount must be > 0");
    }
    let note = format!("Aporte a meta '{}'", goal.name);
    let debit = transfer_entry(
        goal,
        profile,
        amount,
        Account::Balance,
        Direction::Out,
        source_scope,
        note.clone(),
    );
    let credit = transfer_entry(
        goal,
        profile,
        amount,
        Account::Goal(goal.id.clone()),
        Direction::In,
        goal.scope,
        note,
    );
    debug_assert_eq!(debit.amount, credit.amount);
    Ok([debit, credit])
}

/// Diagnostic for the accepted inconsistency window: saving entries whose
/// counterpart never landed. A goal-side entry pairs with a balance-side
/// entry of the same profile, date, amount and note in the opposite cash
/// direction; both sides of a written pair share all four, so two profiles'
/// same-day transfers of the same amount never cross-match.
pub fn reconcile(entries: &[Entry]) -> Vec<&Entry> {
    let mut goal_side: Vec<&Entry> = Vec::new();
    let mut balance_side: Vec<&Entry> = Vec::new();
    for e in entries.iter().filter(|e| e.nature == Some(Nature::Saving)) {
        match e.account {
            Account::Goal(_) => goal_side.push(e),
            Account::Balance => balance_side.push(e),
            Account::Personal => {}
        }
    }

    let mut unmatched: Vec<&Entry> = Vec::new();
    let mut used = vec![false; balance_side.len()];
    for g in goal_side {
        let opposite = match g.direction {
            Direction::In => Direction::Out,
            Direction::Out => Direction::In,
        };
        let found = (0..balance_side.len()).find(|&i| {
            let b = balance_side[i];
            !used[i]
                && b.profile == g.profile
                && b.date == g.date
                && b.amount == g.amount
                && b.note == g.note
                && b.direction == opposite
        });
        match found {
            Some(i) => used[i] = true,
            None => unmatched.push(g),
        }
    }
    for (i, b) in balance_side.into_iter().enumerate() {
        if !used[i] {
            unmatched.push(b);
        }
    }
    unmatched
}
