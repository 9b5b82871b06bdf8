use std::collections::HashMap;
use std::sync::LazyLock;

use rust_decimal::Decimal;
use std::str::FromStr;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::db::Database;
use crate::models::{Bill, Category, Profile};
use crate::stats;
use crate::ui::util::format_amount;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit FinControl", cmd_quit, r);
    register_command!("quit", "Quit FinControl", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("b", "Go to Bills", cmd_bills, r);
    register_command!("bills", "Go to Bills", cmd_bills, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add a bill (e.g. :add Notebook 3000 x10 @15 credit)",
        cmd_add,
        r
    );
    register_command!("a", "Add a bill", cmd_add, r);
    register_command!("pay", "Mark selected bill as paid", cmd_pay, r);
    register_command!("unpay", "Mark selected bill as pending", cmd_unpay, r);
    register_command!("delete", "Delete selected bill", cmd_delete, r);
    register_command!("rename", "Rename selected bill", cmd_rename, r);
    register_command!(
        "set-value",
        "Change selected bill's value (e.g. :set-value 120.50)",
        cmd_set_value,
        r
    );
    register_command!(
        "set-due",
        "Change selected bill's due day (e.g. :set-due 15)",
        cmd_set_due,
        r
    );
    register_command!(
        "recat",
        "Re-categorize selected bill (e.g. :recat Food)",
        cmd_recat,
        r
    );
    register_command!(
        "income",
        "Set month income (e.g. :income 2000 500)",
        cmd_income,
        r
    );
    register_command!(
        "limit",
        "Set month spending limit (e.g. :limit 1800, 0 clears)",
        cmd_limit,
        r
    );
    register_command!(
        "only-salary",
        "Toggle the secondary income stream on/off",
        cmd_only_salary,
        r
    );
    register_command!(
        "pay-days",
        "Set salary and vale arrival days (e.g. :pay-days 5 20)",
        cmd_pay_days,
        r
    );
    register_command!("month", "Set month (e.g. :month 2024-06)", cmd_month, r);
    register_command!("m", "Set month (e.g. :m 2024-06)", cmd_month, r);
    register_command!("next-month", "Go to next month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous month", cmd_prev_month, r);
    register_command!("search", "Search bills (e.g. :search gym)", cmd_search, r);
    register_command!("s", "Search bills (e.g. :s gym)", cmd_search, r);
    register_command!(
        "export",
        "Export month's bills to CSV (e.g. :export ~/june.csv)",
        cmd_export,
        r
    );
    register_command!(
        "profile",
        "Switch or create a profile (e.g. :profile Ana)",
        cmd_profile,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        // Try fuzzy match
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    app.refresh(db)?;
    Ok(())
}

fn cmd_bills(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Bills;
    app.refresh(db)?;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

const ADD_USAGE: &str =
    "Usage: :add <name> <value> [x<installments>] [<category>] [@<due day>] [credit]";

/// Options parsed off the tail of an `:add` invocation.
struct AddOptions {
    installments: u32,
    category: Category,
    due_day: Option<u32>,
    is_credit_card: bool,
}

/// Parse `:add` arguments: trailing tokens are options in any order, the
/// last remaining token is the value, everything before it is the name.
fn parse_add_args(args: &str) -> Result<(String, Decimal, AddOptions), String> {
    let mut tokens: Vec<&str> = args.split_whitespace().collect();
    let mut opts = AddOptions {
        installments: 1,
        category: Category::Fixed,
        due_day: None,
        is_credit_card: false,
    };

    while let Some(&last) = tokens.last() {
        if last.eq_ignore_ascii_case("credit") {
            opts.is_credit_card = true;
        } else if let Some(rest) = last.strip_prefix('x') {
            match rest.parse::<u32>() {
                Ok(n) if n >= 1 => opts.installments = n,
                _ => return Err(format!("Invalid installment count: {last}")),
            }
        } else if let Some(rest) = last.strip_prefix('@') {
            match rest.parse::<u32>() {
                Ok(d) if (1..=31).contains(&d) => opts.due_day = Some(d),
                _ => return Err(format!("Invalid due day: {last} (expected 1-31)")),
            }
        } else if let Some(cat) = Category::parse_strict(last) {
            opts.category = cat;
        } else {
            break;
        }
        tokens.pop();
    }

    let value_token = match tokens.pop() {
        Some(t) => t,
        None => return Err(ADD_USAGE.into()),
    };
    let value = Decimal::from_str(value_token)
        .map_err(|_| format!("Invalid value: {value_token}"))?;

    let name = tokens.join(" ");
    if name.is_empty() {
        return Err(ADD_USAGE.into());
    }

    Ok((name, value, opts))
}

fn cmd_add(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status(ADD_USAGE);
        return Ok(());
    }

    let (name, total_value, opts) = match parse_add_args(args) {
        Ok(parsed) => parsed,
        Err(msg) => {
            app.set_status(msg);
            return Ok(());
        }
    };

    let bills = Bill::installment_plan(
        app.profile_id(),
        &name,
        total_value,
        opts.installments,
        opts.category,
        opts.is_credit_card,
        opts.due_day,
        app.year,
        app.month,
    );

    // Advisory limit check against the month as it was before this purchase.
    let new_total = app.stats.total_expense + total_value;
    let alert = stats::limit_alert(new_total, app.income.spending_limit);

    if bills.len() == 1 {
        db.insert_bill(&bills[0])?;
    } else {
        db.insert_bills_batch(&bills)?;
    }
    app.refresh(db)?;

    match alert {
        Some(pct) => app.set_status(format!(
            "Warning: {pct:.0}% of the month's spending limit reached!"
        )),
        None if opts.installments > 1 => app.set_status(format!(
            "Added {name}: {} installments of {}",
            opts.installments,
            format_amount(bills[0].value)
        )),
        None => app.set_status(format!("Added {name}")),
    }
    Ok(())
}

fn set_paid(app: &mut App, db: &mut Database, is_paid: bool) -> anyhow::Result<()> {
    if app.screen != Screen::Bills || app.bills.is_empty() {
        app.set_status("Navigate to Bills and select one first");
        return Ok(());
    }

    if let Some(bill) = app.selected_bill() {
        if let Some(id) = bill.id {
            let name = bill.name.clone();
            db.update_bill_paid(id, is_paid)?;
            app.refresh(db)?;
            let verb = if is_paid { "Paid" } else { "Back to pending" };
            app.set_status(format!("{verb}: {name}"));
        }
    }
    Ok(())
}

fn cmd_pay(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    set_paid(app, db, true)
}

fn cmd_unpay(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    set_paid(app, db, false)
}

fn cmd_delete(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Bills || app.bills.is_empty() {
        app.set_status("Navigate to Bills and select one first");
        return Ok(());
    }

    if let Some(bill) = app.selected_bill() {
        if let Some(id) = bill.id {
            let name = bill.name.clone();
            app.confirm_message = format!("Delete '{name}'?");
            app.pending_action = Some(PendingAction::DeleteBill { id, name });
            app.input_mode = InputMode::Confirm;
        }
    }
    Ok(())
}

fn cmd_rename(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Bills || app.bills.is_empty() {
        app.set_status("Navigate to Bills and select one first");
        return Ok(());
    }

    if args.is_empty() {
        // Enter editing mode for inline rename
        if let Some(bill) = app.selected_bill() {
            app.command_input = bill.name.clone();
            app.input_mode = InputMode::Editing;
            app.set_status("Type new name, press Enter to confirm");
        }
        return Ok(());
    }

    if let Some(bill) = app.selected_bill() {
        let mut updated = bill.clone();
        updated.name = args.to_string();
        db.update_bill(&updated)?;
        app.refresh(db)?;
        app.set_status(format!("Renamed bill to: {args}"));
    }
    Ok(())
}

fn cmd_set_value(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Bills || app.bills.is_empty() {
        app.set_status("Navigate to Bills and select one first");
        return Ok(());
    }
    if args.is_empty() {
        app.set_status("Usage: :set-value <amount>");
        return Ok(());
    }

    let value = match Decimal::from_str(args) {
        Ok(v) => v,
        Err(_) => {
            app.set_status(format!("Invalid amount: {args}"));
            return Ok(());
        }
    };

    if let Some(bill) = app.selected_bill() {
        let mut updated = bill.clone();
        updated.value = value;
        db.update_bill(&updated)?;
        app.refresh(db)?;
        app.set_status(format!("Value set to {}", format_amount(value)));
    }
    Ok(())
}

fn cmd_set_due(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Bills || app.bills.is_empty() {
        app.set_status("Navigate to Bills and select one first");
        return Ok(());
    }

    let day = match args.parse::<u32>() {
        Ok(d) if (1..=31).contains(&d) => d,
        _ => {
            app.set_status("Usage: :set-due <day> (1-31)");
            return Ok(());
        }
    };

    if let Some(bill) = app.selected_bill() {
        let mut updated = bill.clone();
        updated.due_day = Some(day);
        db.update_bill(&updated)?;
        app.refresh(db)?;
        app.set_status(format!("Due day set to {day}"));
    }
    Ok(())
}

fn cmd_recat(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Bills || app.bills.is_empty() {
        app.set_status("Navigate to Bills and select one first");
        return Ok(());
    }
    if args.is_empty() {
        let names: Vec<&str> = Category::all().iter().map(|c| c.as_str()).collect();
        app.set_status(format!(
            "Usage: :recat <category>. Categories: {}",
            names.join(", ")
        ));
        return Ok(());
    }

    let category = match Category::parse_strict(args) {
        Some(c) => c,
        None => {
            app.set_status(format!("Category '{args}' not found"));
            return Ok(());
        }
    };

    if let Some(bill) = app.selected_bill() {
        let mut updated = bill.clone();
        updated.category = category;
        db.update_bill(&updated)?;
        app.refresh(db)?;
        app.set_status(format!("Categorized as: {category}"));
    }
    Ok(())
}

fn cmd_income(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :income <salary> [vale]");
        return Ok(());
    }

    let parts: Vec<&str> = args.split_whitespace().collect();
    let salary = match Decimal::from_str(parts[0]) {
        Ok(v) => v,
        Err(_) => {
            app.set_status(format!("Invalid salary: {}", parts[0]));
            return Ok(());
        }
    };
    let vale = match parts.get(1) {
        Some(raw) => match Decimal::from_str(raw) {
            Ok(v) => Some(v),
            Err(_) => {
                app.set_status(format!("Invalid vale: {raw}"));
                return Ok(());
            }
        },
        None => None,
    };

    // Merge over the stored record so limit and pay days survive the save.
    let mut income = db.resolve_income(app.profile_id(), app.year, app.month)?;
    income.salary = salary;
    if let Some(v) = vale {
        income.vale = v;
        income.only_salary = false;
    }
    db.upsert_income(&income)?;
    app.refresh(db)?;
    app.set_status(format!(
        "Income for {}-{:02} saved: {}",
        app.year,
        app.month,
        format_amount(app.income.total())
    ));
    Ok(())
}

fn cmd_limit(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let limit = match Decimal::from_str(args) {
        Ok(v) if v >= Decimal::ZERO => v,
        _ => {
            app.set_status("Usage: :limit <amount> (0 clears the limit)");
            return Ok(());
        }
    };

    let mut income = db.resolve_income(app.profile_id(), app.year, app.month)?;
    income.spending_limit = limit;
    db.upsert_income(&income)?;
    app.refresh(db)?;

    if limit == Decimal::ZERO {
        app.set_status("Spending limit cleared");
    } else {
        app.set_status(format!("Spending limit set to {}", format_amount(limit)));
    }
    Ok(())
}

fn cmd_only_salary(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let mut income = db.resolve_income(app.profile_id(), app.year, app.month)?;
    income.only_salary = !income.only_salary;
    db.upsert_income(&income)?;
    app.refresh(db)?;

    if app.income.only_salary {
        app.set_status("Vale disabled: salary is the only income stream");
    } else {
        app.set_status("Vale enabled");
    }
    Ok(())
}

fn cmd_pay_days(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    let days: Vec<u32> = parts
        .iter()
        .filter_map(|p| p.parse::<u32>().ok())
        .filter(|d| (1..=31).contains(d))
        .collect();
    if days.len() != 2 {
        app.set_status("Usage: :pay-days <salary day> <vale day> (1-31)");
        return Ok(());
    }

    let mut income = db.resolve_income(app.profile_id(), app.year, app.month)?;
    income.salary_day = days[0];
    income.vale_day = days[1];
    db.upsert_income(&income)?;
    app.refresh(db)?;
    app.set_status(format!(
        "Salary arrives on day {}, vale on day {}",
        days[0], days[1]
    ));
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :month <YYYY-MM> (e.g. :month 2024-06)");
        return Ok(());
    }

    match crate::run::parse_period(args) {
        Some((year, month)) => {
            app.set_period(db, year, month)?;
            app.set_status(format!("Switched to {year}-{month:02}"));
        }
        None => app.set_status("Invalid month format. Use YYYY-MM (e.g. 2024-06)"),
    }
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.shift_month(db, 1)?;
    app.set_status(format!("Month: {}-{:02}", app.year, app.month));
    Ok(())
}

fn cmd_prev_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.shift_month(db, -1)?;
    app.set_status(format!("Month: {}-{:02}", app.year, app.month));
    Ok(())
}

fn cmd_search(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    app.search_input = args.to_string();
    app.screen = Screen::Bills;
    app.refresh(db)?;

    if args.is_empty() {
        app.set_status("Search cleared");
    } else {
        app.set_status(format!("Searching: {args}"));
    }
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/fincontrol-{}-{:02}.csv", app.year, app.month)
    } else {
        crate::run::shellexpand(args)
    };

    let count = db.export_to_csv(&path, app.profile_id(), app.year, app.month)?;
    if count == 0 {
        app.set_status("No bills to export");
    } else {
        app.set_status(format!("Exported {count} bills to {path}"));
    }
    Ok(())
}

fn cmd_profile(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        let profiles = db.get_profiles()?;
        let names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
        app.set_status(format!(
            "Active profile: {}. Available: {}",
            app.profile.name,
            names.join(", ")
        ));
        return Ok(());
    }

    let (profile, created) = match db.get_profile_by_name(args)? {
        Some(p) => (p, false),
        None => {
            let p = Profile::new(args.to_string());
            let id = db.insert_profile(&p)?;
            (Profile { id: Some(id), ..p }, true)
        }
    };

    let name = profile.name.clone();
    app.profile = profile;
    app.bill_index = 0;
    app.bill_scroll = 0;
    app.refresh(db)?;
    if created {
        app.set_status(format!("Created profile: {name}"));
    } else {
        app.set_status(format!("Switched to profile: {name}"));
    }
    Ok(())
}
