#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn setup() -> (Database, i64) {
    let db = Database::open_in_memory().unwrap();
    let profile_id = db.insert_profile(&Profile::new("Default".into())).unwrap();
    (db, profile_id)
}

fn make_bill(profile_id: i64, name: &str, value: Decimal, due_day: Option<u32>) -> Bill {
    Bill {
        id: None,
        profile_id,
        name: name.into(),
        total_value: value,
        value,
        year: 2024,
        month: 6,
        installment_number: 1,
        total_installments: 1,
        purchase_id: format!("purchase-{name}"),
        is_paid: false,
        category: Category::Fixed,
        is_credit_card: false,
        due_day,
        created_at: "2024-06-01T00:00:00Z".into(),
        updated_at: "2024-06-01T00:00:00Z".into(),
    }
}

// ── Profiles ──────────────────────────────────────────────────

#[test]
fn test_profile_crud() {
    let (db, _) = setup();
    let found = db.get_profile_by_name("default").unwrap();
    assert!(found.is_some());
    assert_eq!(found.unwrap().name, "Default");

    assert!(db.get_profile_by_name("nobody").unwrap().is_none());

    db.insert_profile(&Profile::new("Ana".into())).unwrap();
    let all = db.get_profiles().unwrap();
    assert_eq!(all.len(), 2);
    // Sorted by name
    assert_eq!(all[0].name, "Ana");
}

// ── Bill CRUD ─────────────────────────────────────────────────

#[test]
fn test_bill_roundtrip() {
    let (db, profile_id) = setup();
    let mut bill = make_bill(profile_id, "Rent", dec!(1200.50), Some(5));
    bill.category = Category::Fixed;
    bill.is_credit_card = true;
    let id = db.insert_bill(&bill).unwrap();

    let fetched = db.get_bill_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.name, "Rent");
    assert_eq!(fetched.value, dec!(1200.50));
    assert_eq!(fetched.category, Category::Fixed);
    assert!(fetched.is_credit_card);
    assert_eq!(fetched.due_day, Some(5));
    assert!(!fetched.is_paid);
}

#[test]
fn test_bill_by_id_not_found() {
    let (db, _) = setup();
    assert!(db.get_bill_by_id(99999).unwrap().is_none());
}

#[test]
fn test_bills_scoped_by_profile_and_period() {
    let (db, profile_id) = setup();
    let other_profile = db.insert_profile(&Profile::new("Ana".into())).unwrap();

    db.insert_bill(&make_bill(profile_id, "Mine", dec!(10), None))
        .unwrap();
    db.insert_bill(&make_bill(other_profile, "Hers", dec!(20), None))
        .unwrap();
    let mut next_month = make_bill(profile_id, "Later", dec!(30), None);
    next_month.month = 7;
    db.insert_bill(&next_month).unwrap();

    let bills = db.get_bills(profile_id, 2024, 6, None).unwrap();
    assert_eq!(bills.len(), 1);
    assert_eq!(bills[0].name, "Mine");
}

#[test]
fn test_bills_ordered_unpaid_first_then_due_day() {
    let (db, profile_id) = setup();
    let mut paid_early = make_bill(profile_id, "Paid early", dec!(10), Some(2));
    paid_early.is_paid = true;
    db.insert_bill(&paid_early).unwrap();
    db.insert_bill(&make_bill(profile_id, "Unpaid late", dec!(10), Some(25)))
        .unwrap();
    db.insert_bill(&make_bill(profile_id, "Unpaid early", dec!(10), Some(3)))
        .unwrap();

    let names: Vec<String> = db
        .get_bills(profile_id, 2024, 6, None)
        .unwrap()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert_eq!(names, vec!["Unpaid early", "Unpaid late", "Paid early"]);
}

#[test]
fn test_search_is_case_insensitive_substring() {
    let (db, profile_id) = setup();
    db.insert_bill(&make_bill(profile_id, "Supermarket", dec!(10), None))
        .unwrap();
    db.insert_bill(&make_bill(profile_id, "Gym", dec!(10), None))
        .unwrap();

    let hits = db.get_bills(profile_id, 2024, 6, Some("market")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Supermarket");

    let hits = db.get_bills(profile_id, 2024, 6, Some("SUPER")).unwrap();
    assert_eq!(hits.len(), 1);

    let hits = db.get_bills(profile_id, 2024, 6, Some("zzz")).unwrap();
    assert!(hits.is_empty());
}

#[test]
fn test_toggle_paid_both_directions() {
    let (db, profile_id) = setup();
    let id = db
        .insert_bill(&make_bill(profile_id, "Internet", dec!(90), None))
        .unwrap();

    db.update_bill_paid(id, true).unwrap();
    assert!(db.get_bill_by_id(id).unwrap().unwrap().is_paid);

    db.update_bill_paid(id, false).unwrap();
    assert!(!db.get_bill_by_id(id).unwrap().unwrap().is_paid);
}

#[test]
fn test_update_bill_fields() {
    let (db, profile_id) = setup();
    let id = db
        .insert_bill(&make_bill(profile_id, "Course", dec!(100), None))
        .unwrap();

    let mut bill = db.get_bill_by_id(id).unwrap().unwrap();
    bill.name = "Rust course".into();
    bill.value = dec!(150);
    bill.due_day = Some(7);
    bill.category = Category::Education;
    bill.is_credit_card = true;
    db.update_bill(&bill).unwrap();

    let fetched = db.get_bill_by_id(id).unwrap().unwrap();
    assert_eq!(fetched.name, "Rust course");
    assert_eq!(fetched.value, dec!(150));
    assert_eq!(fetched.due_day, Some(7));
    assert_eq!(fetched.category, Category::Education);
    assert!(fetched.is_credit_card);
}

#[test]
fn test_update_bill_without_id_is_an_error() {
    let (db, profile_id) = setup();
    let bill = make_bill(profile_id, "No id", dec!(10), None);
    assert!(db.update_bill(&bill).is_err());
}

// ── Installment batches ───────────────────────────────────────

#[test]
fn test_batch_insert_creates_all_installments() {
    let (mut db, profile_id) = setup();
    let plan = Bill::installment_plan(
        profile_id,
        "Notebook",
        dec!(300),
        3,
        Category::Other,
        true,
        Some(15),
        2024,
        6,
    );
    let count = db.insert_bills_batch(&plan).unwrap();
    assert_eq!(count, 3);

    assert_eq!(db.get_bills(profile_id, 2024, 6, None).unwrap().len(), 1);
    assert_eq!(db.get_bills(profile_id, 2024, 7, None).unwrap().len(), 1);
    assert_eq!(db.get_bills(profile_id, 2024, 8, None).unwrap().len(), 1);
}

#[test]
fn test_deleting_one_installment_keeps_siblings() {
    let (mut db, profile_id) = setup();
    let plan = Bill::installment_plan(
        profile_id,
        "Phone",
        dec!(900),
        3,
        Category::Other,
        false,
        None,
        2024,
        6,
    );
    let purchase_id = plan[0].purchase_id.clone();
    db.insert_bills_batch(&plan).unwrap();

    let june = db.get_bills(profile_id, 2024, 6, None).unwrap();
    db.delete_bill(june[0].id.unwrap()).unwrap();

    let (_, total) = db.get_purchase_progress(&purchase_id).unwrap();
    assert_eq!(total, 2);
    assert_eq!(db.get_bills(profile_id, 2024, 7, None).unwrap().len(), 1);
}

#[test]
fn test_purchase_progress_counts_paid() {
    let (mut db, profile_id) = setup();
    let plan = Bill::installment_plan(
        profile_id,
        "Sofa",
        dec!(600),
        3,
        Category::Fixed,
        false,
        None,
        2024,
        6,
    );
    let purchase_id = plan[0].purchase_id.clone();
    db.insert_bills_batch(&plan).unwrap();

    let june = db.get_bills(profile_id, 2024, 6, None).unwrap();
    db.update_bill_paid(june[0].id.unwrap(), true).unwrap();

    let (paid, total) = db.get_purchase_progress(&purchase_id).unwrap();
    assert_eq!((paid, total), (1, 3));
}

// ── Incomes ───────────────────────────────────────────────────

#[test]
fn test_income_missing_resolves_to_empty_default() {
    let (db, profile_id) = setup();
    assert!(db.get_income(profile_id, 2024, 6).unwrap().is_none());

    let income = db.resolve_income(profile_id, 2024, 6).unwrap();
    assert_eq!(income.salary, Decimal::ZERO);
    assert!(income.only_salary);
    assert_eq!(income.salary_day, 5);
    assert_eq!(income.vale_day, 20);
}

#[test]
fn test_income_upsert_never_duplicates() {
    let (db, profile_id) = setup();
    let mut income = Income::empty(profile_id, 2024, 6);
    income.salary = dec!(2000);
    income.vale = dec!(500);
    income.only_salary = false;
    db.upsert_income(&income).unwrap();

    income.salary = dec!(2500);
    income.spending_limit = dec!(1800);
    income.salary_day = 1;
    db.upsert_income(&income).unwrap();

    let count: i64 = db
        .conn
        .query_row("SELECT COUNT(*) FROM incomes", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);

    let fetched = db.get_income(profile_id, 2024, 6).unwrap().unwrap();
    assert_eq!(fetched.salary, dec!(2500));
    assert_eq!(fetched.vale, dec!(500));
    assert_eq!(fetched.spending_limit, dec!(1800));
    assert_eq!(fetched.salary_day, 1);
    assert!(!fetched.only_salary);
}

#[test]
fn test_income_is_per_month() {
    let (db, profile_id) = setup();
    let mut june = Income::empty(profile_id, 2024, 6);
    june.salary = dec!(2000);
    db.upsert_income(&june).unwrap();

    let mut july = Income::empty(profile_id, 2024, 7);
    july.salary = dec!(2100);
    db.upsert_income(&july).unwrap();

    assert_eq!(
        db.resolve_income(profile_id, 2024, 6).unwrap().salary,
        dec!(2000)
    );
    assert_eq!(
        db.resolve_income(profile_id, 2024, 7).unwrap().salary,
        dec!(2100)
    );
}

// ── Export ────────────────────────────────────────────────────

#[test]
fn test_export_to_csv() {
    let (db, profile_id) = setup();
    let mut bill = make_bill(profile_id, "Rent", dec!(1200), Some(5));
    bill.is_paid = true;
    db.insert_bill(&bill).unwrap();
    db.insert_bill(&make_bill(profile_id, "Gym", dec!(80), None))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("june.csv");
    let count = db
        .export_to_csv(path.to_str().unwrap(), profile_id, 2024, 6)
        .unwrap();
    assert_eq!(count, 2);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("name,value"));
    assert!(contents.contains("Rent,1200"));
    assert!(contents.contains("Gym,80"));
}

#[test]
fn test_export_empty_month() {
    let (db, profile_id) = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    let count = db
        .export_to_csv(path.to_str().unwrap(), profile_id, 2024, 6)
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn test_bill_count() {
    let (db, profile_id) = setup();
    assert_eq!(db.get_bill_count(profile_id).unwrap(), 0);
    db.insert_bill(&make_bill(profile_id, "A", dec!(1), None))
        .unwrap();
    db.insert_bill(&make_bill(profile_id, "B", dec!(2), None))
        .unwrap();
    assert_eq!(db.get_bill_count(profile_id).unwrap(), 2);
}
