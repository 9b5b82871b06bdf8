pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS profiles (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS bills (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    profile_id          INTEGER NOT NULL REFERENCES profiles(id),
    name                TEXT NOT NULL,
    total_value         TEXT NOT NULL,
    value               TEXT NOT NULL,
    year                INTEGER NOT NULL,
    month               INTEGER NOT NULL,
    installment_number  INTEGER NOT NULL DEFAULT 1,
    total_installments  INTEGER NOT NULL DEFAULT 1,
    purchase_id         TEXT NOT NULL,
    is_paid             BOOLEAN NOT NULL DEFAULT 0,
    category            TEXT NOT NULL DEFAULT 'Other',
    is_credit_card      BOOLEAN NOT NULL DEFAULT 0,
    due_day             INTEGER,
    created_at          TEXT NOT NULL,
    updated_at          TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_bills_owner_period ON bills(profile_id, year, month);
CREATE INDEX IF NOT EXISTS idx_bills_purchase ON bills(purchase_id);

CREATE TABLE IF NOT EXISTS incomes (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    profile_id      INTEGER NOT NULL REFERENCES profiles(id),
    year            INTEGER NOT NULL,
    month           INTEGER NOT NULL,
    salary          TEXT NOT NULL DEFAULT '0',
    vale            TEXT NOT NULL DEFAULT '0',
    only_salary     BOOLEAN NOT NULL DEFAULT 1,
    spending_limit  TEXT NOT NULL DEFAULT '0',
    salary_day      INTEGER NOT NULL DEFAULT 5,
    vale_day        INTEGER NOT NULL DEFAULT 20,
    updated_at      TEXT NOT NULL,
    UNIQUE(profile_id, year, month)
);

"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];
