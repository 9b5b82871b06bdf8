mod cli;
mod tui;

pub(crate) use cli::as_cli;
pub(crate) use tui::as_tui;

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

/// Parse a "YYYY-MM" period into (year, 1-12 month).
pub(crate) fn parse_period(s: &str) -> Option<(i32, u32)> {
    let (year_raw, month_raw) = s.split_once('-')?;
    let year: i32 = year_raw.parse().ok()?;
    let month: u32 = month_raw.parse().ok()?;
    if (1..=12).contains(&month) {
        Some((year, month))
    } else {
        None
    }
}

#[cfg(test)]
mod tests;
