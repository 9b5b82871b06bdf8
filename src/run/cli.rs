use anyhow::Result;
use chrono::{Datelike, Local};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::db::Database;
use crate::models::{Bill, Category, Profile};
use crate::stats;
use crate::ui::util::format_amount;

pub(crate) fn as_cli(args: &[String], db: &mut Database, profile: Profile) -> Result<()> {
    match args[1].as_str() {
        "summary" | "s" => cli_summary(&args[2..], db, &profile),
        "list" | "ls" => cli_list(&args[2..], db, &profile),
        "add" => cli_add(&args[2..], db, &profile),
        "pay" => cli_set_paid(&args[2..], db, true),
        "unpay" => cli_set_paid(&args[2..], db, false),
        "income" => cli_income(&args[2..], db, &profile),
        "export" => cli_export(&args[2..], db, &profile),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("fincontrol {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("FinControl — local-only monthly bill and income tracker");
    println!();
    println!("Usage: fincontrol [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  summary [YYYY-MM]             Print the month's balance and breakdown");
    println!("  list [YYYY-MM]                List the month's bills");
    println!("  add <name> <value> [options]  Add a bill or installment purchase");
    println!("    x<N>                        Split into N monthly installments");
    println!("    @<day>                      Due day of month (1-31, default 10)");
    println!("    <category>                  Fixed, Leisure, Food, Health,");
    println!("                                Transport, Education or Other");
    println!("    credit                      Mark as a credit card charge");
    println!("  pay <id> | unpay <id>         Toggle a bill's settlement");
    println!("  income <salary> [vale]        Save the month's income");
    println!("    --limit <amount>            Set the month's spending limit");
    println!("    --only-salary               Disable the vale stream");
    println!("    --salary-day <d>            Day the salary arrives (default 5)");
    println!("    --vale-day <d>              Day the vale arrives (default 20)");
    println!("    --month <YYYY-MM>           Month to save (default: current)");
    println!("  export [path]                 Export the month's bills to CSV");
    println!("    --month <YYYY-MM>           Month to export (default: current)");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn current_period() -> (i32, u32) {
    let now = Local::now().date_naive();
    (now.year(), now.month())
}

/// First positional argument parsed as "YYYY-MM", or the current month.
fn period_from_args(args: &[String]) -> Result<(i32, u32)> {
    match args.first().filter(|a| !a.starts_with('-')) {
        Some(raw) => crate::run::parse_period(raw)
            .ok_or_else(|| anyhow::anyhow!("Invalid month: {raw} (expected YYYY-MM)")),
        None => Ok(current_period()),
    }
}

/// `--flag value` lookup.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn cli_summary(args: &[String], db: &mut Database, profile: &Profile) -> Result<()> {
    let (year, month) = period_from_args(args)?;
    let profile_id = profile.id.unwrap_or(0);

    let bills = db.get_bills(profile_id, year, month, None)?;
    let income = db.resolve_income(profile_id, year, month)?;
    let stats = stats::compute(&bills, &income);

    println!("FinControl — {year}-{month:02} ({})", profile.name);
    println!("{}", "─".repeat(44));
    println!("  Income:     {}", format_amount(stats.total_income));
    println!("  Expenses:   {}", format_amount(stats.total_expense));
    println!("  Paid:       {}", format_amount(stats.total_paid));
    println!("  Balance:    {}", format_amount(stats.balance));
    println!("  Usage:      {:.0}% of income", stats.usage_percentage);
    if income.has_limit() {
        println!(
            "  Limit:      {} configured",
            format_amount(income.spending_limit)
        );
    }

    if !stats.category_totals.is_empty() {
        println!();
        println!("Spending by Category:");
        for (category, total) in &stats.category_totals {
            println!("  {:<12} {}", category.as_str(), format_amount(*total));
        }
    }

    Ok(())
}

fn cli_list(args: &[String], db: &mut Database, profile: &Profile) -> Result<()> {
    let (year, month) = period_from_args(args)?;
    let profile_id = profile.id.unwrap_or(0);

    let bills = db.get_bills(profile_id, year, month, None)?;
    if bills.is_empty() {
        println!("No bills for {year}-{month:02}");
        return Ok(());
    }

    println!(
        "{:<5} {:<4} {:<28} {:<10} {:<12} {:<6} Value",
        "ID", "Due", "Name", "Category", "Installment", "Paid"
    );
    println!("{}", "─".repeat(82));
    for bill in &bills {
        let installment = if bill.is_installment() {
            format!("{}/{}", bill.installment_number, bill.total_installments)
        } else {
            "—".into()
        };
        println!(
            "{:<5} {:<4} {:<28} {:<10} {:<12} {:<6} {}",
            bill.id.unwrap_or(0),
            bill.effective_due_day(),
            bill.name,
            bill.category,
            installment,
            if bill.is_paid { "yes" } else { "no" },
            format_amount(bill.value),
        );
    }
    Ok(())
}

fn cli_add(args: &[String], db: &mut Database, profile: &Profile) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: fincontrol add <name> <value> [x<N>] [<category>] [@<day>] [credit]");
    }

    let profile_id = profile.id.unwrap_or(0);
    let (year, month) = current_period();

    let mut tokens: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    let mut installments = 1u32;
    let mut category = Category::Fixed;
    let mut due_day = None;
    let mut is_credit_card = false;

    while let Some(&last) = tokens.last() {
        if last.eq_ignore_ascii_case("credit") {
            is_credit_card = true;
        } else if let Some(rest) = last.strip_prefix('x') {
            match rest.parse::<u32>() {
                Ok(n) if n >= 1 => installments = n,
                _ => anyhow::bail!("Invalid installment count: {last}"),
            }
        } else if let Some(rest) = last.strip_prefix('@') {
            match rest.parse::<u32>() {
                Ok(d) if (1..=31).contains(&d) => due_day = Some(d),
                _ => anyhow::bail!("Invalid due day: {last} (expected 1-31)"),
            }
        } else if let Some(cat) = Category::parse_strict(last) {
            category = cat;
        } else {
            break;
        }
        tokens.pop();
    }

    let value_token = tokens
        .pop()
        .ok_or_else(|| anyhow::anyhow!("Missing bill value"))?;
    let total_value = Decimal::from_str(value_token)
        .map_err(|_| anyhow::anyhow!("Invalid value: {value_token}"))?;
    let name = tokens.join(" ");
    if name.is_empty() {
        anyhow::bail!("Missing bill name");
    }

    // Advisory limit check before the write, against the month as it stands.
    let existing = db.get_bills(profile_id, year, month, None)?;
    let income = db.resolve_income(profile_id, year, month)?;
    let before = stats::compute(&existing, &income);
    let alert = stats::limit_alert(before.total_expense + total_value, income.spending_limit);

    let bills = Bill::installment_plan(
        profile_id,
        &name,
        total_value,
        installments,
        category,
        is_credit_card,
        due_day,
        year,
        month,
    );
    if bills.len() == 1 {
        db.insert_bill(&bills[0])?;
    } else {
        db.insert_bills_batch(&bills)?;
    }

    if installments > 1 {
        println!(
            "Added {name}: {installments} installments of {} starting {year}-{month:02}",
            format_amount(bills[0].value)
        );
    } else {
        println!("Added {name}: {}", format_amount(total_value));
    }
    if let Some(pct) = alert {
        println!("Warning: {pct:.0}% of the month's spending limit reached!");
    }
    Ok(())
}

fn cli_set_paid(args: &[String], db: &mut Database, is_paid: bool) -> Result<()> {
    let raw = args
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: fincontrol pay|unpay <id>"))?;
    let id: i64 = raw
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid bill id: {raw}"))?;

    let bill = db
        .get_bill_by_id(id)?
        .ok_or_else(|| anyhow::anyhow!("No bill with id {id}"))?;
    db.update_bill_paid(id, is_paid)?;
    println!(
        "{}: {} ({})",
        if is_paid { "Paid" } else { "Back to pending" },
        bill.name,
        format_amount(bill.value)
    );
    Ok(())
}

fn cli_income(args: &[String], db: &mut Database, profile: &Profile) -> Result<()> {
    let positional: Vec<&String> = {
        // Skip flag values when collecting positionals.
        let mut out = Vec::new();
        let mut skip = false;
        for arg in args {
            if skip {
                skip = false;
                continue;
            }
            if arg.starts_with("--") {
                skip = arg != "--only-salary";
                continue;
            }
            out.push(arg);
        }
        out
    };

    let salary_raw = positional
        .first()
        .ok_or_else(|| anyhow::anyhow!("Usage: fincontrol income <salary> [vale] [flags]"))?;
    let salary = Decimal::from_str(salary_raw)
        .map_err(|_| anyhow::anyhow!("Invalid salary: {salary_raw}"))?;
    let vale = match positional.get(1) {
        Some(raw) => {
            Some(Decimal::from_str(raw).map_err(|_| anyhow::anyhow!("Invalid vale: {raw}"))?)
        }
        None => None,
    };

    let (year, month) = match flag_value(args, "--month") {
        Some(raw) => crate::run::parse_period(raw)
            .ok_or_else(|| anyhow::anyhow!("Invalid month: {raw} (expected YYYY-MM)"))?,
        None => current_period(),
    };

    let profile_id = profile.id.unwrap_or(0);
    let mut income = db.resolve_income(profile_id, year, month)?;
    income.salary = salary;
    if let Some(v) = vale {
        income.vale = v;
        income.only_salary = false;
    }
    if args.iter().any(|a| a == "--only-salary") {
        income.only_salary = true;
    }
    if let Some(raw) = flag_value(args, "--limit") {
        income.spending_limit =
            Decimal::from_str(raw).map_err(|_| anyhow::anyhow!("Invalid limit: {raw}"))?;
    }
    if let Some(raw) = flag_value(args, "--salary-day") {
        income.salary_day = parse_day(raw)?;
    }
    if let Some(raw) = flag_value(args, "--vale-day") {
        income.vale_day = parse_day(raw)?;
    }

    db.upsert_income(&income)?;
    println!(
        "Income for {year}-{month:02} saved: {} total",
        format_amount(income.total())
    );
    Ok(())
}

fn parse_day(raw: &str) -> Result<u32> {
    match raw.parse::<u32>() {
        Ok(d) if (1..=31).contains(&d) => Ok(d),
        _ => anyhow::bail!("Invalid day: {raw} (expected 1-31)"),
    }
}

fn cli_export(args: &[String], db: &mut Database, profile: &Profile) -> Result<()> {
    let (year, month) = match flag_value(args, "--month") {
        Some(raw) => crate::run::parse_period(raw)
            .ok_or_else(|| anyhow::anyhow!("Invalid month: {raw} (expected YYYY-MM)"))?,
        None => current_period(),
    };

    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| crate::run::shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/fincontrol-{year}-{month:02}.csv")
        });

    let count = db.export_to_csv(&output_path, profile.id.unwrap_or(0), year, month)?;
    if count == 0 {
        println!("No bills for {year}-{month:02}");
    } else {
        println!("Exported {count} bills to {output_path}");
    }
    Ok(())
}
