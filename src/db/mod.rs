mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Profiles ──────────────────────────────────────────────

    pub(crate) fn insert_profile(&self, profile: &Profile) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO profiles (name, created_at) VALUES (?1, ?2)",
            params![profile.name, profile.created_at],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn get_profiles(&self) -> Result<Vec<Profile>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM profiles ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(Profile {
                id: Some(row.get(0)?),
                name: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_profile_by_name(&self, name: &str) -> Result<Option<Profile>> {
        let result = self.conn.query_row(
            "SELECT id, name, created_at FROM profiles WHERE name = ?1 COLLATE NOCASE",
            params![name],
            |row| {
                Ok(Profile {
                    id: Some(row.get(0)?),
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        );
        match result {
            Ok(p) => Ok(Some(p)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // ── Bills ─────────────────────────────────────────────────

    pub(crate) fn insert_bill(&self, bill: &Bill) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO bills (profile_id, name, total_value, value, year, month,
                                installment_number, total_installments, purchase_id,
                                is_paid, category, is_credit_card, due_day, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                bill.profile_id,
                bill.name,
                bill.total_value.to_string(),
                bill.value.to_string(),
                bill.year,
                bill.month,
                bill.installment_number,
                bill.total_installments,
                bill.purchase_id,
                bill.is_paid,
                bill.category.as_str(),
                bill.is_credit_card,
                bill.due_day,
                bill.created_at,
                bill.updated_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert a whole installment plan in one transaction: either every
    /// record lands or none does.
    pub(crate) fn insert_bills_batch(&mut self, bills: &[Bill]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for bill in bills {
            tx.execute(
                "INSERT INTO bills (profile_id, name, total_value, value, year, month,
                                    installment_number, total_installments, purchase_id,
                                    is_paid, category, is_credit_card, due_day, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    bill.profile_id,
                    bill.name,
                    bill.total_value.to_string(),
                    bill.value.to_string(),
                    bill.year,
                    bill.month,
                    bill.installment_number,
                    bill.total_installments,
                    bill.purchase_id,
                    bill.is_paid,
                    bill.category.as_str(),
                    bill.is_credit_card,
                    bill.due_day,
                    bill.created_at,
                    bill.updated_at,
                ],
            )?;
        }
        tx.commit()?;
        Ok(bills.len())
    }

    /// A month's bills for one profile, unpaid first, then due day. `search`
    /// narrows by case-insensitive substring on the name.
    pub(crate) fn get_bills(
        &self,
        profile_id: i64,
        year: i32,
        month: u32,
        search: Option<&str>,
    ) -> Result<Vec<Bill>> {
        let mut sql = String::from(
            "SELECT id, profile_id, name, total_value, value, year, month,
                    installment_number, total_installments, purchase_id,
                    is_paid, category, is_credit_card, due_day, created_at, updated_at
             FROM bills WHERE profile_id = ?1 AND year = ?2 AND month = ?3",
        );
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = vec![
            Box::new(profile_id),
            Box::new(year),
            Box::new(month),
        ];

        if let Some(s) = search {
            sql.push_str(&format!(" AND name LIKE ?{}", param_values.len() + 1));
            param_values.push(Box::new(format!("%{s}%")));
        }

        sql.push_str(" ORDER BY is_paid ASC, COALESCE(due_day, 10) ASC, id ASC");

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), bill_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_bill_by_id(&self, id: i64) -> Result<Option<Bill>> {
        let result = self.conn.query_row(
            "SELECT id, profile_id, name, total_value, value, year, month,
                    installment_number, total_installments, purchase_id,
                    is_paid, category, is_credit_card, due_day, created_at, updated_at
             FROM bills WHERE id = ?1",
            params![id],
            bill_from_row,
        );
        match result {
            Ok(b) => Ok(Some(b)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_bill_count(&self, profile_id: i64) -> Result<i64> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM bills WHERE profile_id = ?1",
            params![profile_id],
            |row| row.get(0),
        )?)
    }

    pub(crate) fn update_bill_paid(&self, id: i64, is_paid: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE bills SET is_paid = ?1, updated_at = ?2 WHERE id = ?3",
            params![is_paid, chrono::Utc::now().to_rfc3339(), id],
        )?;
        Ok(())
    }

    /// Edit the user-adjustable fields of a single bill. Does not touch its
    /// siblings in the same purchase.
    pub(crate) fn update_bill(&self, bill: &Bill) -> Result<()> {
        let id = bill
            .id
            .ok_or_else(|| anyhow::anyhow!("Cannot update a bill without an id"))?;
        self.conn.execute(
            "UPDATE bills SET name = ?1, value = ?2, due_day = ?3, category = ?4,
                              is_credit_card = ?5, total_installments = ?6, updated_at = ?7
             WHERE id = ?8",
            params![
                bill.name,
                bill.value.to_string(),
                bill.due_day,
                bill.category.as_str(),
                bill.is_credit_card,
                bill.total_installments,
                chrono::Utc::now().to_rfc3339(),
                id,
            ],
        )?;
        Ok(())
    }

    /// Delete one bill. Siblings sharing its purchase id are left alone.
    pub(crate) fn delete_bill(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM bills WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// (paid, total) installment counts for a purchase group.
    pub(crate) fn get_purchase_progress(&self, purchase_id: &str) -> Result<(i64, i64)> {
        Ok(self.conn.query_row(
            "SELECT COALESCE(SUM(is_paid), 0), COUNT(*) FROM bills WHERE purchase_id = ?1",
            params![purchase_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?)
    }

    // ── Incomes ───────────────────────────────────────────────

    pub(crate) fn get_income(
        &self,
        profile_id: i64,
        year: i32,
        month: u32,
    ) -> Result<Option<Income>> {
        let result = self.conn.query_row(
            "SELECT id, profile_id, year, month, salary, vale, only_salary,
                    spending_limit, salary_day, vale_day, updated_at
             FROM incomes WHERE profile_id = ?1 AND year = ?2 AND month = ?3",
            params![profile_id, year, month],
            |row| {
                Ok(Income {
                    id: Some(row.get(0)?),
                    profile_id: row.get(1)?,
                    year: row.get(2)?,
                    month: row.get(3)?,
                    salary: decimal_column(row, 4)?,
                    vale: decimal_column(row, 5)?,
                    only_salary: row.get(6)?,
                    spending_limit: decimal_column(row, 7)?,
                    salary_day: row.get(8)?,
                    vale_day: row.get(9)?,
                    updated_at: row.get(10)?,
                })
            },
        );
        match result {
            Ok(i) => Ok(Some(i)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The income used for a month's calculations: the stored record, or the
    /// all-zero default when none was saved yet.
    pub(crate) fn resolve_income(&self, profile_id: i64, year: i32, month: u32) -> Result<Income> {
        Ok(self
            .get_income(profile_id, year, month)?
            .unwrap_or_else(|| Income::empty(profile_id, year, month)))
    }

    /// Save a month's income. (profile, year, month) identifies the record,
    /// so repeated saves overwrite instead of duplicating.
    pub(crate) fn upsert_income(&self, income: &Income) -> Result<()> {
        self.conn.execute(
            "INSERT INTO incomes (profile_id, year, month, salary, vale, only_salary,
                                  spending_limit, salary_day, vale_day, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(profile_id, year, month) DO UPDATE SET
                 salary = ?4, vale = ?5, only_salary = ?6, spending_limit = ?7,
                 salary_day = ?8, vale_day = ?9, updated_at = ?10",
            params![
                income.profile_id,
                income.year,
                income.month,
                income.salary.to_string(),
                income.vale.to_string(),
                income.only_salary,
                income.spending_limit.to_string(),
                income.salary_day,
                income.vale_day,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    // ── Export ────────────────────────────────────────────────

    /// Write a month's bills to CSV. Returns the number of rows written.
    pub(crate) fn export_to_csv(
        &self,
        path: &str,
        profile_id: i64,
        year: i32,
        month: u32,
    ) -> Result<usize> {
        let bills = self.get_bills(profile_id, year, month, None)?;

        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create export file: {path}"))?;
        writer.write_record([
            "name",
            "value",
            "total_value",
            "installment",
            "category",
            "due_day",
            "credit_card",
            "paid",
        ])?;
        for bill in &bills {
            let value = bill.value.to_string();
            let total_value = bill.total_value.to_string();
            let installment =
                format!("{}/{}", bill.installment_number, bill.total_installments);
            let due_day = bill.effective_due_day().to_string();
            writer.write_record([
                bill.name.as_str(),
                value.as_str(),
                total_value.as_str(),
                installment.as_str(),
                bill.category.as_str(),
                due_day.as_str(),
                if bill.is_credit_card { "yes" } else { "no" },
                if bill.is_paid { "yes" } else { "no" },
            ])?;
        }
        writer.flush()?;
        Ok(bills.len())
    }
}

fn bill_from_row(row: &Row<'_>) -> rusqlite::Result<Bill> {
    Ok(Bill {
        id: Some(row.get(0)?),
        profile_id: row.get(1)?,
        name: row.get(2)?,
        total_value: decimal_column(row, 3)?,
        value: decimal_column(row, 4)?,
        year: row.get(5)?,
        month: row.get(6)?,
        installment_number: row.get(7)?,
        total_installments: row.get(8)?,
        purchase_id: row.get(9)?,
        is_paid: row.get(10)?,
        category: Category::parse(&row.get::<_, String>(11)?),
        is_credit_card: row.get(12)?,
        due_day: row.get(13)?,
        created_at: row.get(14)?,
        updated_at: row.get(15)?,
    })
}

fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Ok(Decimal::from_str(&raw).unwrap_or_default())
}

#[cfg(test)]
mod tests;
