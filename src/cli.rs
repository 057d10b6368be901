// Copyright (c) Strategix.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print output as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print output as JSON lines"),
    )
}

fn business_arg() -> Arg {
    Arg::new("business")
        .long("business")
        .short('b')
        .help("Business name (defaults to the one set via 'business use')")
}

fn period_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("year")
            .long("year")
            .value_parser(value_parser!(i32))
            .help("Restrict to a calendar year"),
    )
    .arg(
        Arg::new("month")
            .long("month")
            .value_parser(value_parser!(u32))
            .help("Restrict to a month (1-12, requires --year)"),
    )
}

pub fn build_cli() -> Command {
    Command::new("strategix")
        .about("Business-plan financials: simulations, cash-flow summaries, scenario projections, and report assembly")
        .version(clap::crate_version!())
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("business")
                .about("Manage businesses")
                .subcommand(
                    Command::new("add")
                        .about("Register a business")
                        .arg(Arg::new("name").required(true))
                        .arg(
                            Arg::new("initial-capital")
                                .long("initial-capital")
                                .default_value("0")
                                .allow_negative_numbers(true)
                                .help("Declared starting capital"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List businesses")))
                .subcommand(
                    Command::new("use")
                        .about("Set the default business")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a business and all its data")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage financial categories")
                .subcommand(
                    Command::new("add")
                        .about("Add a category")
                        .arg(Arg::new("name").required(true))
                        .arg(business_arg())
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .help("income|expense"),
                        )
                        .arg(
                            Arg::new("subtype")
                                .long("subtype")
                                .default_value("other")
                                .help("operating_revenue|non_operating_revenue|cogs|operating_expense|interest_expense|tax_expense|other"),
                        )
                        .arg(Arg::new("color").long("color").help("Display color"))
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .default_value("actual")
                                .help("actual|plan"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List categories").arg(business_arg()),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a category")
                        .arg(Arg::new("name").required(true))
                        .arg(business_arg()),
                ),
        )
        .subcommand(
            Command::new("sim")
                .about("Record and inspect financial simulations")
                .subcommand(
                    Command::new("add")
                        .about("Record a simulation entry")
                        .arg(business_arg())
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .help("Category name; the entry takes its type"),
                        )
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .help("income|expense; must match the category when given"),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_negative_numbers(true),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .required(true)
                                .help("YYYY-MM-DD"),
                        )
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .default_value("completed")
                                .help("planned|completed|cancelled"),
                        )
                        .arg(
                            Arg::new("recur")
                                .long("recur")
                                .help("Recurrence frequency (e.g. monthly)"),
                        )
                        .arg(
                            Arg::new("recur-until")
                                .long("recur-until")
                                .help("Recurrence end date, YYYY-MM-DD"),
                        )
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(period_args(json_flags(
                    Command::new("list")
                        .about("List simulations")
                        .arg(business_arg())
                        .arg(Arg::new("status").long("status").help("Filter by status")),
                )))
                .subcommand(
                    Command::new("set-status")
                        .about("Move a simulation to a new status")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .required(true)
                                .help("completed|cancelled"),
                        ),
                )
                .subcommand(
                    Command::new("rm").about("Delete a simulation").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated summaries and the report data bag")
                .subcommand(period_args(json_flags(
                    Command::new("cash-flow")
                        .about("Period totals, cash balance, and category breakdown")
                        .arg(business_arg()),
                )))
                .subcommand(json_flags(
                    Command::new("monthly")
                        .about("Twelve-month breakdown for a year")
                        .arg(business_arg())
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .required(true)
                                .value_parser(value_parser!(i32)),
                        ),
                ))
                .subcommand(period_args(
                    Command::new("bag")
                        .about("Assemble the full report data bag as JSON")
                        .arg(business_arg())
                        .arg(Arg::new("out").long("out").help("Write to a file instead of stdout")),
                )),
        )
        .subcommand(
            Command::new("projection")
                .about("Five-year scenario projections")
                .subcommand(
                    Command::new("create")
                        .about("Create the optimistic/realistic/pessimistic batch from a baseline year")
                        .arg(business_arg())
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("base-year")
                                .long("base-year")
                                .required(true)
                                .value_parser(value_parser!(i32)),
                        )
                        .arg(Arg::new("growth").long("growth").required(true).allow_negative_numbers(true).help("Realistic growth rate, percent"))
                        .arg(Arg::new("inflation").long("inflation").required(true).allow_negative_numbers(true).help("Realistic inflation rate, percent"))
                        .arg(Arg::new("discount").long("discount").required(true).allow_negative_numbers(true).help("Discount rate, percent"))
                        .arg(Arg::new("investment").long("investment").required(true).allow_negative_numbers(true).help("Initial investment")),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List projections").arg(business_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("show")
                        .about("Show one projection with metrics")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                )),
        )
        .subcommand(
            Command::new("forecast")
                .about("Imported forecast rows and their statistics")
                .subcommand(
                    Command::new("import")
                        .about("Import externally produced forecast rows from CSV")
                        .arg(business_arg())
                        .arg(Arg::new("path").long("path").required(true))
                        .arg(
                            Arg::new("method")
                                .long("method")
                                .default_value("ARIMA")
                                .help("Forecasting method label"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("stats")
                        .about("Descriptive statistics over forecast rows")
                        .arg(business_arg()),
                ))
                .subcommand(
                    Command::new("summary")
                        .about("Executive summary text")
                        .arg(business_arg())
                        .arg(Arg::new("period").long("period").help("Period label for the prose")),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export recorded data")
                .subcommand(
                    Command::new("sims")
                        .about("Export simulations")
                        .arg(business_arg())
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Report data integrity issues"))
}
