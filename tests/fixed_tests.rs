// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use gastos::fixed::generate_for_month;
use gastos::models::{
    Account, AppliesTo, Config, Direction, FixedCharge, Nature, Profile, Scope,
};

fn roster() -> Vec<Profile> {
    Config::default().profiles
}

fn charge(id: &str, amount: i64, scope: Scope, applies_to: AppliesTo) -> FixedCharge {
    FixedCharge {
        id: id.to_string(),
        name: format!("Cargo {}", id),
        category: "Casa".to_string(),
        amount,
        scope,
        applies_to,
        account: Account::Personal,
        impact_key: if scope == Scope::Shared {
            "Casa".to_string()
        } else {
            String::new()
        },
    }
}

#[test]
fn generated_entries_carry_the_template_fields() {
    let defs = vec![charge("arriendo", 450_000, Scope::Shared, AppliesTo::Both)];
    let out = generate_for_month("2024-03", &defs, &[], &roster());
    assert_eq!(out.len(), 1);

    let e = &out[0];
    assert_eq!(e.date, "2024-03-01");
    assert_eq!(e.amount, 450_000);
    assert_eq!(e.nature, Some(Nature::Fixed));
    assert_eq!(e.direction, Direction::Out);
    assert_eq!(e.note, "Cargo arriendo");
    assert_eq!(e.fixed_id, "arriendo");
    assert_eq!(e.scope, Scope::Shared);
    assert_eq!(e.impact_key, "Casa");
}

#[test]
fn regenerating_a_month_is_a_no_op() {
    let defs = vec![
        charge("arriendo", 450_000, Scope::Shared, AppliesTo::Both),
        charge("internet", 25_000, Scope::Personal, AppliesTo::Both),
    ];
    let first = generate_for_month("2024-03", &defs, &[], &roster());
    assert_eq!(first.len(), 3);

    let second = generate_for_month("2024-03", &defs, &first, &roster());
    assert!(second.is_empty());
}

#[test]
fn other_months_are_untouched_by_existing_entries() {
    let defs = vec![charge("arriendo", 450_000, Scope::Shared, AppliesTo::Both)];
    let march = generate_for_month("2024-03", &defs, &[], &roster());
    let april = generate_for_month("2024-04", &defs, &march, &roster());
    assert_eq!(april.len(), 1);
    assert_eq!(april[0].date, "2024-04-01");
}

#[test]
fn shared_charge_yields_one_entry_for_a_representative() {
    let defs = vec![charge("luz", 30_000, Scope::Shared, AppliesTo::Both)];
    let out = generate_for_month("2024-03", &defs, &[], &roster());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].profile, "pablo");

    let defs = vec![charge(
        "agua",
        15_000,
        Scope::Shared,
        AppliesTo::Profile("maria_ignacia".to_string()),
    )];
    let out = generate_for_month("2024-03", &defs, &[], &roster());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].profile, "maria_ignacia");
}

#[test]
fn personal_charge_for_both_yields_one_entry_per_profile() {
    let defs = vec![charge("gimnasio", 20_000, Scope::Personal, AppliesTo::Both)];
    let out = generate_for_month("2024-03", &defs, &[], &roster());
    assert_eq!(out.len(), 2);
    let profiles: Vec<&str> = out.iter().map(|e| e.profile.as_str()).collect();
    assert_eq!(profiles, vec!["pablo", "maria_ignacia"]);
}

#[test]
fn non_positive_amounts_are_skipped() {
    let defs = vec![
        charge("gratis", 0, Scope::Personal, AppliesTo::Both),
        charge("negativo", -100, Scope::Personal, AppliesTo::Both),
        charge("internet", 25_000, Scope::Personal, AppliesTo::Profile("pablo".to_string())),
    ];
    let out = generate_for_month("2024-03", &defs, &[], &roster());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].fixed_id, "internet");
}

#[test]
fn manual_entries_without_fixed_id_never_block_generation() {
    let defs = vec![charge("arriendo", 450_000, Scope::Shared, AppliesTo::Both)];
    let mut manual = generate_for_month("2024-03", &defs, &[], &roster());
    // Same shape but not machine-generated.
    manual[0].fixed_id = String::new();

    let out = generate_for_month("2024-03", &defs, &manual, &roster());
    assert_eq!(out.len(), 1);
}
