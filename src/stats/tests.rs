#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{Bill, Category, Income};

fn make_bill(value: Decimal, due_day: Option<u32>, is_paid: bool) -> Bill {
    Bill {
        id: None,
        profile_id: 1,
        name: "Test".into(),
        total_value: value,
        value,
        year: 2024,
        month: 6,
        installment_number: 1,
        total_installments: 1,
        purchase_id: "p-1".into(),
        is_paid,
        category: Category::Fixed,
        is_credit_card: false,
        due_day,
        created_at: String::new(),
        updated_at: String::new(),
    }
}

fn make_income(salary: Decimal, vale: Decimal, only_salary: bool) -> Income {
    Income {
        id: None,
        profile_id: 1,
        year: 2024,
        month: 6,
        salary,
        vale,
        only_salary,
        spending_limit: Decimal::ZERO,
        salary_day: 5,
        vale_day: 20,
        updated_at: String::new(),
    }
}

// ── Pools and balance ─────────────────────────────────────────

#[test]
fn test_unpaid_bills_never_touch_pools() {
    let bills = vec![
        make_bill(dec!(800), Some(10), false),
        make_bill(dec!(300), Some(25), false),
    ];
    let income = make_income(dec!(2000), dec!(500), false);
    let stats = compute(&bills, &income);

    assert_eq!(stats.available_salary, dec!(2000));
    assert_eq!(stats.available_vale, dec!(500));
    assert_eq!(stats.balance, stats.total_income);
}

#[test]
fn test_totals_count_paid_and_unpaid() {
    let bills = vec![
        make_bill(dec!(100), Some(10), true),
        make_bill(dec!(250), Some(15), false),
        make_bill(dec!(50), Some(22), true),
    ];
    let income = make_income(dec!(1000), dec!(200), false);
    let stats = compute(&bills, &income);

    assert_eq!(stats.total_expense, dec!(400));
    assert_eq!(stats.total_paid, dec!(150));
    assert!(stats.total_paid <= stats.total_expense);
}

#[test]
fn test_only_salary_zeroes_the_vale_pool() {
    let bills = vec![make_bill(dec!(100), Some(25), true)];
    let income = make_income(dec!(1000), dec!(500), true);
    let stats = compute(&bills, &income);

    // Vale is configured but disabled: it contributes nothing, and the
    // vale-window bill spills straight into salary.
    assert_eq!(stats.total_income, dec!(1000));
    assert_eq!(stats.available_vale, Decimal::ZERO);
    assert_eq!(stats.available_salary, dec!(900));
    assert_eq!(stats.balance, dec!(900));
}

#[test]
fn test_vale_shortfall_spills_into_salary() {
    // Vale pool is 500; a 700 bill in the vale window floors it at zero and
    // takes the remaining 200 from salary.
    let bills = vec![make_bill(dec!(700), Some(22), true)];
    let income = make_income(dec!(2000), dec!(500), false);
    let stats = compute(&bills, &income);

    assert_eq!(stats.available_vale, Decimal::ZERO);
    assert_eq!(stats.available_salary, dec!(1800));
    assert_eq!(stats.balance, dec!(1800));
}

#[test]
fn test_due_before_salary_day_draws_from_salary() {
    let bills = vec![make_bill(dec!(150), Some(2), true)];
    let income = make_income(dec!(1000), dec!(300), false);
    let stats = compute(&bills, &income);

    assert_eq!(stats.available_salary, dec!(850));
    assert_eq!(stats.available_vale, dec!(300));
}

#[test]
fn test_missing_due_day_defaults_into_salary_window() {
    let bills = vec![make_bill(dec!(100), None, true)];
    let income = make_income(dec!(1000), dec!(300), false);
    let stats = compute(&bills, &income);

    // Default due day 10 sits in [5, 20).
    assert_eq!(stats.available_salary, dec!(900));
    assert_eq!(stats.available_vale, dec!(300));
}

#[test]
fn test_balance_may_go_negative() {
    let bills = vec![make_bill(dec!(1500), Some(10), true)];
    let income = make_income(dec!(1000), Decimal::ZERO, true);
    let stats = compute(&bills, &income);

    assert_eq!(stats.balance, dec!(-500));
}

#[test]
fn test_spillover_consumes_vale_in_due_day_order() {
    // Two vale-window bills: the earlier due day drains the pool first, so
    // the later one spills. Order is fixed by the due-day sort.
    let bills = vec![
        make_bill(dec!(300), Some(28), true),
        make_bill(dec!(400), Some(21), true),
    ];
    let income = make_income(dec!(1000), dec!(500), false);
    let stats = compute(&bills, &income);

    // 400 @21 leaves vale at 100; 300 @28 takes 100 + 200 from salary.
    assert_eq!(stats.available_vale, Decimal::ZERO);
    assert_eq!(stats.available_salary, dec!(800));
}

// ── Worked scenarios ──────────────────────────────────────────

#[test]
fn test_mixed_month_scenario() {
    let bills = vec![
        make_bill(dec!(800), Some(10), true),
        make_bill(dec!(300), Some(25), true),
        make_bill(dec!(150), Some(28), false),
    ];
    let income = make_income(dec!(2000), dec!(500), false);
    let stats = compute(&bills, &income);

    assert_eq!(stats.total_expense, dec!(1250));
    assert_eq!(stats.total_paid, dec!(1100));
    assert_eq!(stats.available_salary, dec!(1200));
    assert_eq!(stats.available_vale, dec!(200));
    assert_eq!(stats.balance, dec!(1400));
    assert_eq!(stats.total_income, dec!(2500));
    assert!((stats.usage_percentage - 50.0).abs() < 1e-9);
}

// ── Usage percentage ──────────────────────────────────────────

#[test]
fn test_usage_is_zero_without_income() {
    let bills = vec![make_bill(dec!(999), Some(10), true)];
    let income = make_income(Decimal::ZERO, Decimal::ZERO, true);
    let stats = compute(&bills, &income);

    assert_eq!(stats.usage_percentage, 0.0);
}

#[test]
fn test_usage_can_exceed_hundred() {
    let bills = vec![make_bill(dec!(1500), Some(10), false)];
    let income = make_income(dec!(1000), Decimal::ZERO, true);
    let stats = compute(&bills, &income);

    assert!((stats.usage_percentage - 150.0).abs() < 1e-9);
}

// ── Category totals ───────────────────────────────────────────

#[test]
fn test_category_totals_grouped_and_sorted() {
    let mut food = make_bill(dec!(200), Some(10), false);
    food.category = Category::Food;
    let mut food2 = make_bill(dec!(150), Some(12), false);
    food2.category = Category::Food;
    let fixed = make_bill(dec!(300), Some(5), false);

    let income = make_income(dec!(1000), Decimal::ZERO, true);
    let stats = compute(&[food, food2, fixed], &income);

    assert_eq!(
        stats.category_totals,
        vec![(Category::Food, dec!(350)), (Category::Fixed, dec!(300))]
    );
}

#[test]
fn test_category_share_guards_zero_expense() {
    let income = make_income(dec!(1000), Decimal::ZERO, true);
    let stats = compute(&[], &income);
    assert_eq!(stats.category_share(dec!(100)), 0.0);

    let stats = compute(&[make_bill(dec!(200), Some(10), false)], &income);
    assert!((stats.category_share(dec!(100)) - 0.5).abs() < 1e-9);
}

#[test]
fn test_empty_month() {
    let income = make_income(dec!(2000), dec!(500), false);
    let stats = compute(&[], &income);

    assert_eq!(stats.total_expense, Decimal::ZERO);
    assert_eq!(stats.total_paid, Decimal::ZERO);
    assert_eq!(stats.balance, dec!(2500));
    assert!(stats.category_totals.is_empty());
}

// ── Bill status ───────────────────────────────────────────────

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
}

#[test]
fn test_status_paid_wins() {
    let bill = make_bill(dec!(100), Some(10), true);
    let income = make_income(dec!(1000), dec!(300), false);
    assert_eq!(status_of(&bill, &income, june(15)), BillStatus::Paid);
}

#[test]
fn test_status_late_in_current_month() {
    let bill = make_bill(dec!(100), Some(10), false);
    let income = make_income(dec!(1000), dec!(300), false);
    assert_eq!(status_of(&bill, &income, june(11)), BillStatus::Late);
}

#[test]
fn test_status_never_late_outside_current_month() {
    let mut bill = make_bill(dec!(100), Some(10), false);
    bill.month = 5;
    let income = make_income(dec!(1000), dec!(300), false);
    assert_eq!(status_of(&bill, &income, june(25)), BillStatus::Pending);
}

#[test]
fn test_status_awaiting_salary() {
    let bill = make_bill(dec!(100), Some(10), false);
    let income = make_income(dec!(1000), dec!(300), false);
    // Salary arrives on the 5th; on the 3rd the bill is waiting for it.
    assert_eq!(
        status_of(&bill, &income, june(3)),
        BillStatus::AwaitingSalary
    );
}

#[test]
fn test_status_awaiting_vale() {
    let bill = make_bill(dec!(100), Some(25), false);
    let income = make_income(dec!(1000), dec!(300), false);
    assert_eq!(status_of(&bill, &income, june(12)), BillStatus::AwaitingVale);
}

#[test]
fn test_status_pending_once_income_arrived() {
    let bill = make_bill(dec!(100), Some(10), false);
    let income = make_income(dec!(1000), dec!(300), false);
    // Salary arrived on the 5th, due on the 10th: just pending.
    assert_eq!(status_of(&bill, &income, june(7)), BillStatus::Pending);
}

// ── Limit alert ───────────────────────────────────────────────

#[test]
fn test_limit_alert_fires_above_eighty_percent() {
    let pct = limit_alert(dec!(850), dec!(1000)).unwrap();
    assert!((pct - 85.0).abs() < 1e-9);
}

#[test]
fn test_limit_alert_quiet_at_or_below_threshold() {
    assert!(limit_alert(dec!(800), dec!(1000)).is_none());
    assert!(limit_alert(dec!(100), dec!(1000)).is_none());
}

#[test]
fn test_limit_alert_never_fires_without_limit() {
    assert!(limit_alert(dec!(99999), Decimal::ZERO).is_none());
}
