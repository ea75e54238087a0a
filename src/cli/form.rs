//! Expense form: one draft being created or edited, plus focus and
//! submission state. Persistence belongs to the controller; the form only
//! validates and hands over a draft.

use crossterm::event::{KeyCode, KeyEvent};

use super::input::LineEdit;
use super::state::{Expense, ExpenseDraft};
use super::util;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Amount,
    Category,
    Date,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Title, Field::Amount, Field::Category, Field::Date];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Amount => "Amount",
            Field::Category => "Category",
            Field::Date => "Date",
        }
    }

    fn next(self) -> Field {
        use Field::*;
        match self {
            Title => Amount,
            Amount => Category,
            Category => Date,
            Date => Title,
        }
    }

    fn prev(self) -> Field {
        use Field::*;
        match self {
            Title => Date,
            Amount => Title,
            Category => Amount,
            Date => Category,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExpenseForm {
    /// Id of the record being edited; `None` in create mode.
    pub editing: Option<i64>,
    pub title: LineEdit,
    pub amount: LineEdit,
    pub category: LineEdit,
    pub date: LineEdit,
    pub focus: Field,
    pub submitting: bool,
    pub error: Option<String>,
}

impl ExpenseForm {
    /// Create mode: empty fields, date defaulted to today.
    pub fn new() -> Self {
        Self {
            editing: None,
            title: LineEdit::default(),
            amount: LineEdit::default(),
            category: LineEdit::default(),
            date: LineEdit::new(util::iso(&util::today())),
            focus: Field::Title,
            submitting: false,
            error: None,
        }
    }

    /// Edit mode: fields pre-filled from the record, a missing category
    /// becoming empty text.
    pub fn edit(expense: &Expense) -> Self {
        Self {
            editing: Some(expense.id),
            title: LineEdit::new(expense.title.clone()),
            amount: LineEdit::new(expense.amount.to_string()),
            category: LineEdit::new(expense.category.clone().unwrap_or_default()),
            date: LineEdit::new(util::iso(&expense.expense_date)),
            focus: Field::Title,
            submitting: false,
            error: None,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut LineEdit {
        match field {
            Field::Title => &mut self.title,
            Field::Amount => &mut self.amount,
            Field::Category => &mut self.category,
            Field::Date => &mut self.date,
        }
    }

    pub fn field(&self, field: Field) -> &LineEdit {
        match field {
            Field::Title => &self.title,
            Field::Amount => &self.amount,
            Field::Category => &self.category,
            Field::Date => &self.date,
        }
    }

    /// Per-keystroke editing; exactly one field changes per key.
    pub fn handle_key(&mut self, k: KeyEvent) {
        let focus = self.focus;
        match k.code {
            KeyCode::Tab | KeyCode::Down => self.focus = focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = focus.prev(),
            KeyCode::Char(c) => self.field_mut(focus).push(c),
            KeyCode::Backspace => self.field_mut(focus).backspace(),
            KeyCode::Left => self.field_mut(focus).left(),
            KeyCode::Right => self.field_mut(focus).right(),
            _ => {}
        }
    }

    /// Validate and produce the draft, or set the inline error and return
    /// `None`. Title, amount, and date are required; category is optional.
    /// Amount text is coerced, so non-numeric input becomes zero.
    pub fn take_draft(&mut self) -> Option<ExpenseDraft> {
        if self.title.is_blank() {
            self.error = Some("Title is required".into());
            return None;
        }
        if self.amount.is_blank() {
            self.error = Some("Amount is required".into());
            return None;
        }
        if self.date.is_blank() {
            self.error = Some("Date is required".into());
            return None;
        }
        let Some(expense_date) = util::parse_iso(self.date.trimmed()) else {
            self.error = Some("Date must be YYYY-MM-DD".into());
            return None;
        };
        let amount = util::coerce_amount(&self.amount.value);
        if amount.is_sign_negative() {
            self.error = Some("Amount must not be negative".into());
            return None;
        }
        let category = if self.category.is_blank() {
            None
        } else {
            Some(self.category.trimmed().to_string())
        };
        self.error = None;
        Some(ExpenseDraft {
            title: self.title.trimmed().to_string(),
            amount,
            category,
            expense_date,
        })
    }
}

impl Default for ExpenseForm {
    fn default() -> Self {
        Self::new()
    }
}
