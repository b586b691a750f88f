// Copyright (c) 2025 Pablo Soto.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn with_output_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .help("Month to analyze (defaults to the current month)")
}

pub fn build_cli() -> Command {
    Command::new("gastos")
        .about("Couple expense/income ledger: shared costs, budgets, goals and fixed charges")
        .version(clap::crate_version!())
        .subcommand(
            Command::new("entry")
                .about("Add, delete and browse ledger entries")
                .subcommand(
                    Command::new("add")
                        .about("Add one expense or income")
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .help("Amount in CLP (whole pesos)"),
                        )
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["expense", "income"])
                                .default_value("expense"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .value_name("YYYY-MM-DD")
                                .help("Defaults to today (local)"),
                        )
                        .arg(Arg::new("note").long("note"))
                        .arg(
                            Arg::new("shared")
                                .long("shared")
                                .action(ArgAction::SetTrue)
                                .help("Visible to both profiles; requires --impact"),
                        )
                        .arg(
                            Arg::new("impact")
                                .long("impact")
                                .value_name("KEY")
                                .help("Shared-cost bucket, e.g. 'Casa'"),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete an entry by id")
                        .arg(Arg::new("id").long("id").required(true)),
                )
                .subcommand(with_output_flags(
                    Command::new("history").about("Everything in the ledger, newest first"),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Derived monthly views for the active profile")
                .subcommand(with_output_flags(
                    Command::new("summary")
                        .about("Income / expense / net for a month")
                        .arg(month_arg()),
                ))
                .subcommand(with_output_flags(
                    Command::new("categories")
                        .about("Expense breakdown by category")
                        .arg(month_arg()),
                ))
                .subcommand(with_output_flags(
                    Command::new("budget")
                        .about("Budget targets vs actual spend")
                        .arg(month_arg()),
                ))
                .subcommand(with_output_flags(
                    Command::new("months").about("Per-month income/expense previews"),
                ))
                .subcommand(with_output_flags(
                    Command::new("past")
                        .about("Accumulated net before a month")
                        .arg(month_arg()),
                )),
        )
        .subcommand(
            Command::new("fixed")
                .about("Recurring fixed charges")
                .subcommand(
                    Command::new("generate")
                        .about("Materialize fixed charges for a month (idempotent)")
                        .arg(month_arg()),
                ),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals and transfers")
                .subcommand(with_output_flags(
                    Command::new("status")
                        .about("Balances and monthly movement per goal")
                        .arg(month_arg()),
                ))
                .subcommand(
                    Command::new("deposit")
                        .about("Move funds from the balance into a goal")
                        .arg(Arg::new("goal").long("goal").required(true).value_name("ID"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("from-shared")
                                .long("from-shared")
                                .action(ArgAction::SetTrue)
                                .help("Take the funds from the shared balance"),
                        ),
                )
                .subcommand(
                    Command::new("withdraw")
                        .about("Move funds from a goal back to the balance")
                        .arg(Arg::new("goal").long("goal").required(true).value_name("ID"))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("to-shared")
                                .long("to-shared")
                                .action(ArgAction::SetTrue)
                                .help("Credit the shared balance instead of the personal one"),
                        ),
                )
                .subcommand(with_output_flags(
                    Command::new("reconcile")
                        .about("List one-sided transfers (missing counterpart)"),
                )),
        )
        .subcommand(
            Command::new("import")
                .about("Bulk import")
                .subcommand(
                    Command::new("json")
                        .about("Replace the whole remote ledger with a JSON file")
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export the full ledger")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["json", "csv"])
                        .default_value("json"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("config")
                .about("Remote configuration")
                .subcommand(with_output_flags(
                    Command::new("show").about("Fetch and display the remote config"),
                ))
                .subcommand(
                    Command::new("replace")
                        .about("Write-through replace from a JSON file, then refetch")
                        .arg(Arg::new("path").long("path").required(true)),
                )
                .subcommand(
                    Command::new("register-device")
                        .about("Assign this device to a profile in the remote config")
                        .arg(
                            Arg::new("profile")
                                .long("profile")
                                .help("Defaults to the active profile"),
                        ),
                ),
        )
        .subcommand(
            Command::new("profile")
                .about("Local device preferences")
                .subcommand(Command::new("show").about("Active profile, theme, device id"))
                .subcommand(
                    Command::new("set")
                        .about("Switch the active profile")
                        .arg(Arg::new("profile").long("profile").required(true)),
                )
                .subcommand(Command::new("theme").about("Toggle light/dark theme")),
        )
}
