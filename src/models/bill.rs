use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

pub(crate) const DEFAULT_DUE_DAY: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Category {
    Fixed,
    Leisure,
    Food,
    Health,
    Transport,
    Education,
    Other,
}

impl Category {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "Fixed",
            Self::Leisure => "Leisure",
            Self::Food => "Food",
            Self::Health => "Health",
            Self::Transport => "Transport",
            Self::Education => "Education",
            Self::Other => "Other",
        }
    }

    /// Unknown names fall back to `Other` so stored data never fails to load.
    pub(crate) fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "fixed" => Self::Fixed,
            "leisure" => Self::Leisure,
            "food" => Self::Food,
            "health" => Self::Health,
            "transport" => Self::Transport,
            "education" => Self::Education,
            _ => Self::Other,
        }
    }

    /// Strict variant for user input: `None` instead of the `Other` fallback.
    pub(crate) fn parse_strict(s: &str) -> Option<Self> {
        let parsed = Self::parse(s);
        if parsed == Self::Other && !s.eq_ignore_ascii_case("other") {
            None
        } else {
            Some(parsed)
        }
    }

    pub(crate) fn all() -> &'static [Category] {
        &[
            Self::Fixed,
            Self::Leisure,
            Self::Food,
            Self::Health,
            Self::Transport,
            Self::Education,
            Self::Other,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One calendar-month payment obligation. Installment purchases produce a
/// group of these sharing a `purchase_id`, one per consecutive month.
#[derive(Debug, Clone)]
pub(crate) struct Bill {
    pub id: Option<i64>,
    pub profile_id: i64,
    pub name: String,
    /// Full price of the purchase; equals `value` when not an installment.
    pub total_value: Decimal,
    /// Amount attributed to this month's installment.
    pub value: Decimal,
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub installment_number: u32,
    pub total_installments: u32,
    pub purchase_id: String,
    pub is_paid: bool,
    pub category: Category,
    pub is_credit_card: bool,
    /// Day of month (1-31) the payment is due.
    pub due_day: Option<u32>,
    pub created_at: String,
    pub updated_at: String,
}

impl Bill {
    pub(crate) fn effective_due_day(&self) -> u32 {
        self.due_day.unwrap_or(DEFAULT_DUE_DAY)
    }

    pub(crate) fn is_installment(&self) -> bool {
        self.total_installments > 1
    }

    /// Expand a purchase into its installment bills: `count` records over
    /// consecutive months starting at (`year`, `month`), evenly split and
    /// numbered `1..=count`, all sharing one generated purchase id.
    ///
    /// The split is `total_value / count` rounded to cents; the remainder is
    /// not redistributed, so the installments may sum to slightly less or
    /// more than `total_value`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn installment_plan(
        profile_id: i64,
        name: &str,
        total_value: Decimal,
        count: u32,
        category: Category,
        is_credit_card: bool,
        due_day: Option<u32>,
        year: i32,
        month: u32,
    ) -> Vec<Bill> {
        let count = count.max(1);
        let value = (total_value / Decimal::from(count)).round_dp(2);
        let purchase_id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        (0..count)
            .map(|i| {
                let (y, m) = add_months(year, month, i);
                Bill {
                    id: None,
                    profile_id,
                    name: name.to_string(),
                    total_value,
                    value,
                    year: y,
                    month: m,
                    installment_number: i + 1,
                    total_installments: count,
                    purchase_id: purchase_id.clone(),
                    is_paid: false,
                    category,
                    is_credit_card,
                    due_day,
                    created_at: now.clone(),
                    updated_at: now.clone(),
                }
            })
            .collect()
    }
}

/// Advance a (year, 1-12 month) pair by `delta` months.
pub(crate) fn add_months(year: i32, month: u32, delta: u32) -> (i32, u32) {
    let total = (month - 1) + delta;
    (year + (total / 12) as i32, total % 12 + 1)
}
