use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use std::collections::HashMap;

use crate::db::Database;
use crate::models::*;
use crate::stats::{self, MonthlyStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Bills,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Bills]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Bills => write!(f, "Bills"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteBill { id: i64, name: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    /// Active owner; every query is scoped to it.
    pub(crate) profile: Profile,
    /// Viewed period.
    pub(crate) year: i32,
    /// 1-12
    pub(crate) month: u32,
    pub(crate) today: NaiveDate,

    // Month snapshot, re-read from the database after every mutation.
    pub(crate) bills: Vec<Bill>,
    pub(crate) income: Income,
    pub(crate) stats: MonthlyStats,
    /// purchase_id → (paid, total) for installment groups in view.
    pub(crate) purchase_progress: HashMap<String, (i64, i64)>,
    pub(crate) bill_count: i64,

    pub(crate) bill_index: usize,
    pub(crate) bill_scroll: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(profile: Profile) -> Self {
        let today = Local::now().date_naive();

        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,

            year: today.year(),
            month: today.month(),
            today,

            bills: Vec::new(),
            income: Income::empty(profile.id.unwrap_or(0), today.year(), today.month()),
            stats: MonthlyStats::empty(),
            purchase_progress: HashMap::new(),
            bill_count: 0,

            profile,

            bill_index: 0,
            bill_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn profile_id(&self) -> i64 {
        self.profile.id.unwrap_or(0)
    }

    /// Re-read the viewed month from the database and recompute every
    /// derived figure from scratch. Called after each mutation; nothing is
    /// cached between refreshes.
    pub(crate) fn refresh(&mut self, db: &Database) -> Result<()> {
        let search = if self.search_input.is_empty() {
            None
        } else {
            Some(self.search_input.as_str())
        };

        self.bills = db.get_bills(self.profile_id(), self.year, self.month, search)?;
        self.income = db.resolve_income(self.profile_id(), self.year, self.month)?;
        // Stats ignore the search filter: the balance is about the whole
        // month, not the rows currently listed.
        if search.is_some() {
            let all = db.get_bills(self.profile_id(), self.year, self.month, None)?;
            self.stats = stats::compute(&all, &self.income);
        } else {
            self.stats = stats::compute(&self.bills, &self.income);
        }

        self.purchase_progress.clear();
        for bill in &self.bills {
            if bill.is_installment() && !self.purchase_progress.contains_key(&bill.purchase_id) {
                let progress = db.get_purchase_progress(&bill.purchase_id)?;
                self.purchase_progress.insert(bill.purchase_id.clone(), progress);
            }
        }

        self.bill_count = db.get_bill_count(self.profile_id())?;
        if self.bill_index >= self.bills.len() && !self.bills.is_empty() {
            self.bill_index = self.bills.len() - 1;
        }
        Ok(())
    }

    /// Move the viewed period by whole months and refresh.
    pub(crate) fn shift_month(&mut self, db: &Database, delta: i32) -> Result<()> {
        if delta >= 0 {
            let (y, m) = add_months(self.year, self.month, delta as u32);
            self.year = y;
            self.month = m;
        } else {
            let back = (-delta) as u32;
            let total = self.year as i64 * 12 + (self.month as i64 - 1) - back as i64;
            self.year = (total.div_euclid(12)) as i32;
            self.month = (total.rem_euclid(12) + 1) as u32;
        }
        self.bill_index = 0;
        self.bill_scroll = 0;
        self.refresh(db)
    }

    pub(crate) fn set_period(&mut self, db: &Database, year: i32, month: u32) -> Result<()> {
        self.year = year;
        self.month = month;
        self.bill_index = 0;
        self.bill_scroll = 0;
        self.refresh(db)
    }

    pub(crate) fn selected_bill(&self) -> Option<&Bill> {
        self.bills.get(self.bill_index)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
