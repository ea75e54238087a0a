use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::api::ExpenseApi;
use super::form::{ExpenseForm, Field};
use super::state::{App, Modal, View};
use super::util;

pub fn draw<A: ExpenseApi>(f: &mut Frame, app: &mut App<A>) {
    let size = f.size();

    // header | optional error banner | main content
    let constraints = if app.load_error.is_some() {
        vec![
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(10),
        ]
    } else {
        vec![Constraint::Length(3), Constraint::Min(10)]
    };
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(size);

    let header = Paragraph::new("Expense Tracker")
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, root[0]);

    let main = if let Some(err) = &app.load_error {
        let banner = Paragraph::new(format!("{err}\nPress r to retry the load."))
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Error"));
        f.render_widget(banner, root[1]);
        root[2]
    } else {
        root[1]
    };

    match &app.view {
        View::List => draw_list(f, main, app),
        View::Form(form) => draw_form(f, main, form),
    }

    if let Some(modal) = app.modal.clone() {
        let area = center_rect(main, 56, 7);
        f.render_widget(Clear, area);
        draw_modal(f, area, app, &modal);
    }
}

// List view

fn draw_list<A: ExpenseApi>(f: &mut Frame, area: Rect, app: &mut App<A>) {
    let title = if app.loading {
        "My Expenses (loading…)"
    } else {
        "My Expenses  (a=add, e=edit, d=delete, r=reload, q=quit)"
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if app.expenses.is_empty() {
        let placeholder = if app.loading {
            "Loading..."
        } else {
            "No expenses found. Add one to get started!"
        };
        let p = Paragraph::new(placeholder).block(block);
        f.render_widget(p, area);
        return;
    }

    let header = Row::new(vec!["Date", "Title", "Category", "Amount"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .height(1);

    let body: Vec<Row> = app
        .expenses
        .iter()
        .map(|e| {
            Row::new(vec![
                Cell::from(util::fmt_date(&e.expense_date)),
                Cell::from(e.title.clone()),
                Cell::from(e.category.clone().unwrap_or_else(|| "-".into())),
                Cell::from(util::fmt_currency(&e.amount)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Percentage(45),
        Constraint::Length(16),
        Constraint::Length(14),
    ];

    let table = Table::new(body, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(table, area, &mut app.table);
}

// Form view

fn draw_form(f: &mut Frame, area: Rect, form: &ExpenseForm) {
    let title = if form.editing.is_some() {
        "Edit Expense"
    } else {
        "Add New Expense"
    };

    let mut lines = Vec::new();
    for field in Field::ALL {
        let marker = if form.focus == field { "  <editing>" } else { "" };
        let hint = match field {
            Field::Category => "  (optional)",
            Field::Date => "  (YYYY-MM-DD)",
            _ => "",
        };
        lines.push(format!(
            "{:<9}: {}{}{}",
            field.label(),
            form.field(field).value,
            marker,
            hint
        ));
    }
    lines.push(String::new());
    lines.push("Tab: switch field | Enter: save | Esc: cancel".into());
    if form.submitting {
        lines.push("Saving...".into());
    } else if let Some(err) = &form.error {
        lines.push(format!("Error: {err}"));
    }

    let p = Paragraph::new(lines.join("\n"))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(p, area);
}

// Modals

fn draw_modal<A: ExpenseApi>(f: &mut Frame, area: Rect, app: &App<A>, modal: &Modal) {
    let (title, text) = match modal {
        Modal::ConfirmDelete(id) => {
            let name = app
                .expenses
                .iter()
                .find(|e| e.id == *id)
                .map(|e| e.title.clone())
                .unwrap_or_default();
            (
                "Confirm",
                format!("Are you sure you want to delete this expense?\n\n  {name}\n\ny = delete, n = cancel"),
            )
        }
        Modal::Notice(msg) => ("Notice", format!("{msg}\n\nPress any key to continue.")),
    };

    let p = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(p, area);
}

fn center_rect(rect: Rect, w: u16, h: u16) -> Rect {
    let x = rect.x + rect.width.saturating_sub(w) / 2;
    let y = rect.y + rect.height.saturating_sub(h) / 2;
    Rect {
        x,
        y,
        width: w.min(rect.width),
        height: h.min(rect.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::api::Client;
    use crate::cli::state::Expense;
    use chrono::NaiveDate;
    use ratatui::{backend::TestBackend, Terminal};
    use rust_decimal::Decimal;

    fn app() -> App<Client> {
        let mut app = App::new(Client::new("http://localhost:0/api"));
        app.loading = false;
        app
    }

    fn render(app: &mut App<Client>) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    fn expense(id: i64, title: &str, amount: &str) -> Expense {
        Expense {
            id,
            title: title.into(),
            amount: Decimal::from_str_exact(amount).unwrap(),
            category: None,
            expense_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn empty_list_renders_placeholder_not_table() {
        let mut app = app();
        let screen = render(&mut app);
        assert!(screen.contains("No expenses found. Add one to get started!"));
        assert!(!screen.contains("Amount"));
    }

    #[test]
    fn rows_render_us_currency_and_dash_category() {
        let mut app = app();
        app.expenses = vec![expense(1, "Laptop", "1234.5")];
        let screen = render(&mut app);
        assert!(screen.contains("$1,234.50"));
        assert!(screen.contains("Laptop"));
        assert!(screen.contains("1/15/2024"));
    }

    #[test]
    fn load_error_renders_banner_with_retry_hint() {
        let mut app = app();
        app.load_error = Some("Failed to fetch expenses (HTTP 502 Bad Gateway)".into());
        let screen = render(&mut app);
        assert!(screen.contains("Failed to fetch expenses"));
        assert!(screen.contains("Press r to retry"));
    }

    #[test]
    fn form_shows_saving_label_while_submitting() {
        let mut app = app();
        let mut form = crate::cli::form::ExpenseForm::new();
        form.submitting = true;
        app.view = View::Form(form);
        let screen = render(&mut app);
        assert!(screen.contains("Add New Expense"));
        assert!(screen.contains("Saving..."));
    }

    #[test]
    fn confirm_modal_names_the_expense() {
        let mut app = app();
        app.expenses = vec![expense(4, "Concert tickets", "80")];
        app.modal = Some(Modal::ConfirmDelete(4));
        let screen = render(&mut app);
        assert!(screen.contains("Are you sure you want to delete"));
        assert!(screen.contains("Concert tickets"));
    }
}
