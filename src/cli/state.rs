//! Application state: the cached expense list, the active view, and the
//! transitions between them. All API calls are sequenced from here; the
//! rendering layer never mutates state on its own.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::widgets::TableState;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::api::ExpenseApi;
use super::form::ExpenseForm;

/// A single remote expense record. The id and timestamps are
/// server-assigned and never fabricated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub title: String,
    pub amount: Decimal,
    pub category: Option<String>,
    pub expense_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// The not-yet-persisted field set sent on create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub title: String,
    pub amount: Decimal,
    pub category: Option<String>,
    pub expense_date: NaiveDate,
}

/// Exactly one view is active at a time.
#[derive(Debug)]
pub enum View {
    List,
    Form(ExpenseForm),
}

/// Pending interaction the presentation layer must resolve before normal
/// input resumes. Keeps the controller free of blocking platform dialogs.
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    ConfirmDelete(i64),
    Notice(String),
}

pub struct App<A: ExpenseApi> {
    pub api: A,
    /// Cache of the remote collection; refreshed wholesale after create and
    /// update, pruned locally after delete.
    pub expenses: Vec<Expense>,
    pub view: View,
    pub modal: Option<Modal>,
    /// Failure of the last full fetch, rendered as a banner with a retry hint.
    pub load_error: Option<String>,
    pub loading: bool,
    pub table: TableState,
    pub quit: bool,
}

impl<A: ExpenseApi> App<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            expenses: Vec::new(),
            view: View::List,
            modal: None,
            load_error: None,
            loading: true,
            table: TableState::default(),
            quit: false,
        }
    }

    /// Full reload of the collection. On failure the current cache (empty or
    /// stale) stays in place beneath the error banner.
    pub async fn load_expenses(&mut self) {
        self.loading = true;
        match self.api.list_expenses().await {
            Ok(list) => {
                info!(count = list.len(), "expenses loaded");
                self.expenses = list;
                self.load_error = None;
            }
            Err(err) => {
                warn!(%err, "failed to load expenses");
                self.load_error = Some(err.to_string());
            }
        }
        self.clamp_selection();
        self.loading = false;
    }

    pub fn selected_expense(&self) -> Option<&Expense> {
        let idx = self.table.selected()?;
        self.expenses.get(idx)
    }

    fn move_selection(&mut self, delta: isize) {
        let n = self.expenses.len();
        if n == 0 {
            self.table.select(None);
            return;
        }
        let cur = self.table.selected().unwrap_or(0) as isize;
        let next = (cur + delta).rem_euclid(n as isize) as usize;
        self.table.select(Some(next));
    }

    fn clamp_selection(&mut self) {
        let len = self.expenses.len();
        match (len, self.table.selected()) {
            (0, _) => self.table.select(None),
            (n, Some(i)) if i >= n => self.table.select(Some(n - 1)),
            (_, None) => self.table.select(Some(0)),
            _ => {}
        }
    }

    pub async fn handle_key(&mut self, k: KeyEvent) {
        if k.kind != KeyEventKind::Press {
            return;
        }

        // A pending modal swallows all input until resolved.
        if let Some(modal) = self.modal.take() {
            match modal {
                Modal::ConfirmDelete(id) => match k.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                        self.delete_expense(id).await;
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        info!(id, "delete declined");
                    }
                    _ => self.modal = Some(Modal::ConfirmDelete(id)),
                },
                // Any key dismisses a notice.
                Modal::Notice(_) => {}
            }
            return;
        }

        match &mut self.view {
            View::List => match k.code {
                KeyCode::Char('q') => self.quit = true,
                KeyCode::Up => self.move_selection(-1),
                KeyCode::Down => self.move_selection(1),
                KeyCode::Char('r') => self.load_expenses().await,
                KeyCode::Char('a') => {
                    self.view = View::Form(ExpenseForm::new());
                }
                KeyCode::Char('e') | KeyCode::Enter => {
                    if let Some(expense) = self.selected_expense().cloned() {
                        self.view = View::Form(ExpenseForm::edit(&expense));
                    }
                }
                KeyCode::Char('d') | KeyCode::Delete => {
                    if let Some(id) = self.selected_expense().map(|e| e.id) {
                        self.modal = Some(Modal::ConfirmDelete(id));
                    }
                }
                _ => {}
            },
            View::Form(form) => {
                // Submit and cancel are disabled while a save is in flight.
                if form.submitting {
                    return;
                }
                match k.code {
                    KeyCode::Esc => {
                        info!("form cancelled");
                        self.view = View::List;
                    }
                    KeyCode::Enter => self.submit_form().await,
                    _ => form.handle_key(k),
                }
            }
        }
    }

    /// Validate the draft and persist it: POST in create mode, PUT (full
    /// replacement) in edit mode. Success reloads the collection and returns
    /// to the list; failure keeps the form open with an inline error.
    async fn submit_form(&mut self) {
        let (editing, draft) = match &mut self.view {
            View::Form(form) => {
                let Some(draft) = form.take_draft() else {
                    return;
                };
                form.submitting = true;
                form.error = None;
                (form.editing, draft)
            }
            View::List => return,
        };

        let result = match editing {
            Some(id) => self.api.update_expense(id, &draft).await,
            None => self.api.create_expense(&draft).await,
        };

        match result {
            Ok(saved) => {
                info!(id = saved.id, editing = editing.is_some(), "expense saved");
                self.load_expenses().await;
                self.view = View::List;
            }
            Err(err) => {
                warn!(%err, "failed to save expense");
                if let View::Form(form) = &mut self.view {
                    form.submitting = false;
                    form.error = Some(err.to_string());
                }
            }
        }
    }

    /// Confirmed delete: on success prune the cache locally, no refetch; on
    /// failure surface a notice and leave the cache alone.
    async fn delete_expense(&mut self, id: i64) {
        match self.api.delete_expense(id).await {
            Ok(()) => {
                info!(id, "expense deleted");
                self.expenses.retain(|e| e.id != id);
                self.clamp_selection();
            }
            Err(err) => {
                warn!(%err, id, "failed to delete expense");
                self.modal = Some(Modal::Notice(format!("Failed to delete expense: {err}")));
            }
        }
    }
}
