// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_DATE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap());

/// Today as YYYY-MM-DD in the machine's local timezone. Local on purpose:
/// UTC would show "tomorrow" for entries added late at night in Chile.
pub fn today_local() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Current timestamp, RFC 3339.
pub fn now_timestamp() -> String {
    chrono::Local::now().to_rfc3339()
}

/// "YYYY-MM" prefix of an ISO date; empty input stays empty.
pub fn month_key(iso_date: &str) -> &str {
    if iso_date.len() >= 7 {
        &iso_date[..7]
    } else {
        iso_date
    }
}

pub fn month_start(month: &str) -> String {
    format!("{}-01", month)
}

/// Strict lexicographic comparison on ISO strings; intentional, so the
/// answer never depends on the reader's timezone.
pub fn is_before_month(iso_date: &str, month: &str) -> bool {
    *iso_date < *month_start(month)
}

/// Validates the first 10 chars of `s` as a calendar date and returns them.
pub fn iso_date_prefix(s: &str) -> Option<&str> {
    if s.len() < 10 || !ISO_DATE_PREFIX.is_match(s) {
        return None;
    }
    let prefix = &s[..10];
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()?;
    Some(prefix)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

/// Parses a user-typed CLP amount. Accepts a comma decimal separator, rounds
/// to whole pesos, rejects anything that is not a finite number > 0.
pub fn parse_amount(input: &str) -> Result<i64> {
    let cleaned = input.trim().replace(',', ".");
    let n: f64 = cleaned
        .parse()
        .with_context(|| format!("Invalid amount '{}'", input))?;
    if !n.is_finite() || n <= 0.0 {
        anyhow::bail!("Invalid amount '{}': must be > 0", input);
    }
    Ok(n.round() as i64)
}

/// es-CL thousands grouping: 1234567 -> "1.234.567".
pub fn format_clp(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// "+$1.000" / "-$1.000" label for net amounts.
pub fn signed_clp(n: i64) -> String {
    if n >= 0 {
        format!("+${}", format_clp(n))
    } else {
        format!("-${}", format_clp(n.abs()))
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
