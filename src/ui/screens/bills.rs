use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::stats::{self, BillStatus};
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.bills.is_empty() {
        let msg = if !app.search_input.is_empty() {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("No bills matching '{}'", app.search_input),
                    theme::dim_style(),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press Esc to clear the search",
                    theme::dim_style(),
                )),
            ]
        } else {
            vec![
                Line::from(""),
                Line::from(Span::styled("No bills for this month", theme::dim_style())),
                Line::from(""),
                Line::from(Span::styled(
                    "Add one with :add <name> <value> [x<installments>]",
                    theme::dim_style(),
                )),
            ]
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                " Bills (0) ",
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            ));
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["Due", "Name", "Category", "Installment", "Status", "Value"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .bills
        .iter()
        .enumerate()
        .skip(app.bill_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, bill)| {
            let is_cursor = i == app.bill_index;

            let status = stats::status_of(bill, &app.income, app.today);
            let status_style = match status {
                BillStatus::Paid => theme::income_style(),
                BillStatus::Late => Style::default()
                    .fg(theme::RED)
                    .add_modifier(Modifier::BOLD),
                BillStatus::AwaitingSalary => Style::default().fg(theme::YELLOW),
                BillStatus::AwaitingVale => Style::default().fg(theme::MAUVE),
                BillStatus::Pending => theme::dim_style(),
            };

            let installment = if bill.is_installment() {
                let progress = app
                    .purchase_progress
                    .get(&bill.purchase_id)
                    .map(|(paid, total)| format!(" ({paid}/{total} paid)"))
                    .unwrap_or_default();
                format!(
                    "{}/{}{}",
                    bill.installment_number, bill.total_installments, progress
                )
            } else {
                "—".into()
            };

            let name = if bill.is_credit_card {
                format!("{} [credit]", bill.name)
            } else {
                bill.name.clone()
            };

            let value_style = if bill.is_paid {
                theme::dim_style()
            } else {
                theme::expense_style()
            };

            let style = if is_cursor {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(format!("  {:>2}", bill.effective_due_day())),
                Cell::from(truncate(&name, 32)),
                Cell::from(bill.category.as_str()),
                Cell::from(installment),
                Cell::from(Span::styled(status.label(), status_style)),
                Cell::from(Span::styled(format_amount(bill.value), value_style)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(14),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(
                    " Bills ({}) {}",
                    app.bills.len(),
                    if !app.search_input.is_empty() {
                        format!("search: '{}' ", app.search_input)
                    } else {
                        String::new()
                    }
                ),
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::BOLD),
            )),
    );

    f.render_widget(table, area);
}
