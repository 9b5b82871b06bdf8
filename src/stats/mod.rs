use chrono::{Datelike, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::{Bill, Category, Income};

/// Everything the dashboard derives from one month's bills and income.
/// Recomputed from scratch on every refresh; nothing here is persisted.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MonthlyStats {
    /// Sum of every bill's value, paid or not.
    pub total_expense: Decimal,
    /// Sum of paid bills only.
    pub total_paid: Decimal,
    /// Salary plus vale (vale zeroed when only_salary).
    pub total_income: Decimal,
    /// What remains of the salary pool after paid deductions.
    pub available_salary: Decimal,
    /// What remains of the vale pool; floors at zero, never negative.
    pub available_vale: Decimal,
    /// available_salary + available_vale; may go negative.
    pub balance: Decimal,
    /// total_expense / total_income, as a percentage; 0 when no income.
    pub usage_percentage: f64,
    /// Per-category expense totals, highest first.
    pub category_totals: Vec<(Category, Decimal)>,
}

impl MonthlyStats {
    pub(crate) fn empty() -> Self {
        Self {
            total_expense: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            total_income: Decimal::ZERO,
            available_salary: Decimal::ZERO,
            available_vale: Decimal::ZERO,
            balance: Decimal::ZERO,
            usage_percentage: 0.0,
            category_totals: Vec::new(),
        }
    }

    /// Share of total_expense a category's total represents, in 0.0..=1.0.
    /// Guarded so an empty month never divides by zero.
    pub(crate) fn category_share(&self, amount: Decimal) -> f64 {
        if self.total_expense > Decimal::ZERO {
            (amount / self.total_expense).to_f64().unwrap_or(0.0)
        } else {
            0.0
        }
    }
}

/// Compute a month's balance and breakdown from its bills and income.
///
/// Salary and vale are modeled as two pools that become available on
/// different days of the month. Each paid bill draws from a pool chosen by
/// its own due day:
///
/// - due in [salary_day, vale_day)  -> salary pool
/// - due >= vale_day                -> vale pool, shortfall spills to salary
/// - due < salary_day               -> salary pool
///
/// Unpaid bills count toward totals but never touch a pool. Bills are walked
/// in due-day order; only the vale-shortfall spillover actually depends on
/// that order, and the walk keeps it reproducible.
pub(crate) fn compute(bills: &[Bill], income: &Income) -> MonthlyStats {
    let mut sorted: Vec<&Bill> = bills.iter().collect();
    sorted.sort_by_key(|b| b.effective_due_day());

    let mut available_salary = income.salary;
    let mut available_vale = income.effective_vale();

    let mut total_expense = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;

    for bill in &sorted {
        total_expense += bill.value;
        if !bill.is_paid {
            continue;
        }
        total_paid += bill.value;

        let due = bill.effective_due_day();
        if due >= income.salary_day && due < income.vale_day {
            available_salary -= bill.value;
        } else if due >= income.vale_day {
            if available_vale >= bill.value {
                available_vale -= bill.value;
            } else {
                let shortfall = bill.value - available_vale;
                available_vale = Decimal::ZERO;
                available_salary -= shortfall;
            }
        } else {
            // Due before the salary arrives; assume it came out of salary.
            available_salary -= bill.value;
        }
    }

    let total_income = income.total();
    let usage_percentage = if total_income > Decimal::ZERO {
        (total_expense / total_income * Decimal::from(100))
            .to_f64()
            .unwrap_or(0.0)
    } else {
        0.0
    };

    let mut category_totals: Vec<(Category, Decimal)> = Vec::new();
    for bill in &sorted {
        match category_totals.iter_mut().find(|(c, _)| *c == bill.category) {
            Some((_, total)) => *total += bill.value,
            None => category_totals.push((bill.category, bill.value)),
        }
    }
    category_totals.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    MonthlyStats {
        total_expense,
        total_paid,
        total_income,
        available_salary,
        available_vale,
        balance: available_salary + available_vale,
        usage_percentage,
        category_totals,
    }
}

/// Settlement state of one bill as shown in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BillStatus {
    Paid,
    /// Unpaid and past its due day, in the real current month.
    Late,
    /// Unpaid, due in the salary window, salary not arrived yet.
    AwaitingSalary,
    /// Unpaid, due in the vale window, vale not arrived yet.
    AwaitingVale,
    Pending,
}

impl BillStatus {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Late => "LATE",
            Self::AwaitingSalary => "awaiting salary",
            Self::AwaitingVale => "awaiting vale",
            Self::Pending => "pending",
        }
    }
}

/// Classify a bill for the viewed (year, month). Late and the awaiting
/// states only apply when the viewed month is `today`'s month; other months
/// show plain pending. `today` is injected so callers and tests control the
/// clock.
pub(crate) fn status_of(bill: &Bill, income: &Income, today: NaiveDate) -> BillStatus {
    if bill.is_paid {
        return BillStatus::Paid;
    }

    let is_current_month = bill.year == today.year() && bill.month == today.month();
    if !is_current_month {
        return BillStatus::Pending;
    }

    let due = bill.effective_due_day();
    let day = today.day();

    if day > due {
        return BillStatus::Late;
    }
    if due >= income.salary_day && due < income.vale_day && day < income.salary_day {
        return BillStatus::AwaitingSalary;
    }
    if due >= income.vale_day && day < income.vale_day {
        return BillStatus::AwaitingVale;
    }
    BillStatus::Pending
}

/// Advisory spending-limit check, evaluated when a purchase is added.
/// Fires above 80% of a configured limit; returns the percentage of the
/// limit that `new_total` represents. Never fires without a limit.
pub(crate) fn limit_alert(new_total: Decimal, spending_limit: Decimal) -> Option<f64> {
    if spending_limit > Decimal::ZERO && new_total > spending_limit * Decimal::new(8, 1) {
        (new_total / spending_limit * Decimal::from(100)).to_f64()
    } else {
        None
    }
}

#[cfg(test)]
mod tests;
