use rust_decimal::Decimal;

pub(crate) const DEFAULT_SALARY_DAY: u32 = 5;
pub(crate) const DEFAULT_VALE_DAY: u32 = 20;

/// One profile's income configuration for one calendar month. Exactly one
/// record exists per (profile, year, month); saves are upserts.
#[derive(Debug, Clone)]
pub(crate) struct Income {
    pub id: Option<i64>,
    pub profile_id: i64,
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub salary: Decimal,
    /// Secondary income stream; ignored when `only_salary` is set.
    pub vale: Decimal,
    pub only_salary: bool,
    /// Soft budget ceiling; zero means no limit configured.
    pub spending_limit: Decimal,
    /// Day of month (1-31) the salary becomes available.
    pub salary_day: u32,
    /// Day of month (1-31) the vale becomes available.
    pub vale_day: u32,
    pub updated_at: String,
}

impl Income {
    /// The income used when no record exists for the month yet.
    pub(crate) fn empty(profile_id: i64, year: i32, month: u32) -> Self {
        Self {
            id: None,
            profile_id,
            year,
            month,
            salary: Decimal::ZERO,
            vale: Decimal::ZERO,
            only_salary: true,
            spending_limit: Decimal::ZERO,
            salary_day: DEFAULT_SALARY_DAY,
            vale_day: DEFAULT_VALE_DAY,
            updated_at: String::new(),
        }
    }

    pub(crate) fn effective_vale(&self) -> Decimal {
        if self.only_salary {
            Decimal::ZERO
        } else {
            self.vale
        }
    }

    pub(crate) fn total(&self) -> Decimal {
        self.salary + self.effective_vale()
    }

    pub(crate) fn has_limit(&self) -> bool {
        self.spending_limit > Decimal::ZERO
    }
}
