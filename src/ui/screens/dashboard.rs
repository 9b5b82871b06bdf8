use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, progress_bar, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Length(3), // Spending limit
            Constraint::Min(8),    // Categories + insights
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_limit_bar(f, chunks[1], app);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[2]);
    render_categories(f, columns[0], app);
    render_insights(f, columns[1], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let stats = &app.stats;
    let paid_count = app.bills.iter().filter(|b| b.is_paid).count();
    let pending_count = app.bills.len() - paid_count;

    render_card(
        f,
        cards[0],
        "Balance",
        stats.balance,
        if stats.balance >= Decimal::ZERO {
            theme::GREEN
        } else {
            theme::RED
        },
        Some(format!("{:.0}% of income used", stats.usage_percentage)),
    );
    render_card(
        f,
        cards[1],
        "Income",
        stats.total_income,
        theme::GREEN,
        Some(if app.income.only_salary {
            "salary only".into()
        } else {
            format!(
                "salary {} + vale {}",
                format_amount(app.income.salary),
                format_amount(app.income.vale)
            )
        }),
    );
    render_card(
        f,
        cards[2],
        "Expenses",
        stats.total_expense,
        theme::RED,
        Some(format!("{pending_count} pending")),
    );
    render_card(
        f,
        cards[3],
        "Paid",
        stats.total_paid,
        theme::ACCENT,
        Some(format!("{paid_count} bills")),
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    amount: Decimal,
    color: ratatui::style::Color,
    subtitle: Option<String>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    let sub_text = subtitle.unwrap_or_default();

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_amount(amount),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(sub_text, theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_limit_bar(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            " Spending Limit ",
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    if !app.income.has_limit() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No limit configured. Set one with :limit <amount>",
            theme::dim_style(),
        )))
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let limit = app.income.spending_limit;
    let used = app.stats.total_expense;
    let pct = (used / limit).to_f64().unwrap_or(0.0);

    let color = if used > limit {
        theme::RED
    } else if pct > 0.8 {
        theme::YELLOW
    } else {
        theme::GREEN
    };

    let bar_width = area.width.saturating_sub(30).max(10) as usize;
    let line = Line::from(vec![
        Span::styled(progress_bar(pct, bar_width), Style::default().fg(color)),
        Span::styled(
            format!(" {:.1}% of {}", pct * 100.0, format_amount(limit)),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_categories(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            " Spending by Category ",
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    if app.stats.category_totals.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No bills for this month. Add one with :add",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let bar_width = area.width.saturating_sub(34).max(8) as usize;
    let lines: Vec<Line> = app
        .stats
        .category_totals
        .iter()
        .map(|(category, total)| {
            let share = app.stats.category_share(*total);
            Line::from(vec![
                Span::styled(
                    format!(" {:<10}", truncate(category.as_str(), 10)),
                    theme::normal_style(),
                ),
                Span::styled(
                    progress_bar(share, bar_width),
                    Style::default().fg(theme::MAUVE),
                ),
                Span::styled(
                    format!(" {:>12}", format_amount(*total)),
                    Style::default()
                        .fg(theme::TEXT)
                        .add_modifier(Modifier::BOLD),
                ),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_insights(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            " Insights ",
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    let stats = &app.stats;
    let mut lines: Vec<Line> = Vec::new();

    if stats.usage_percentage > 80.0 {
        lines.push(Line::from(Span::styled(
            " Watch the budget!",
            Style::default().fg(theme::RED).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!(
                " {:.0}% of this month's income is already committed.",
                stats.usage_percentage
            ),
            theme::dim_style(),
        )));
        lines.push(Line::from(""));
    }

    if stats.balance > Decimal::ZERO && stats.usage_percentage < 50.0 {
        lines.push(Line::from(Span::styled(
            " Good month!",
            Style::default()
                .fg(theme::GREEN)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            " Positive balance with less than half the income spent.",
            theme::dim_style(),
        )));
        lines.push(Line::from(""));
    }

    let daily = (stats.total_expense / Decimal::from(30)).round_dp(2);
    lines.push(Line::from(Span::styled(
        " Daily average",
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        format!(" Projected spend of {} per day this month.", format_amount(daily)),
        theme::dim_style(),
    )));

    f.render_widget(Paragraph::new(lines).block(block), area);
}
