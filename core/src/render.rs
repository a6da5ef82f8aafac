//! View model and its HTML / plain-text renderings.
//!
//! Every render rebuilds the view from the current [`TodoList`]; nothing is
//! diffed or patched.

use std::borrow::Cow;
use std::fmt::Write as _;

use maud::{html, Escaper, Markup};

use crate::state::TodoList;
use crate::types::TodoId;

/// Placeholder shown instead of rows when the list is empty.
pub const EMPTY_STATE: &str = "No todos yet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
}

/// Everything the list view and the counters display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub rows: Vec<Row>,
    pub total: usize,
    pub completed: usize,
}

impl View {
    pub fn from_list(list: &TodoList) -> Self {
        Self {
            rows: list
                .items()
                .iter()
                .map(|todo| Row {
                    id: todo.id,
                    text: todo.text.clone(),
                    completed: todo.completed,
                })
                .collect(),
            total: list.len(),
            completed: list.completed_count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total_label(&self) -> String {
        format!("Total: {}", self.total)
    }

    pub fn completed_label(&self) -> String {
        format!("Completed: {}", self.completed)
    }

    /// Id of the row at a 1-based position, as the user sees it numbered.
    pub fn id_at(&self, position: usize) -> Option<TodoId> {
        position
            .checked_sub(1)
            .and_then(|index| self.rows.get(index))
            .map(|row| row.id)
    }
}

/// HTML-escape `text` the same way spliced values in [`to_markup`] are.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Writing into a String cannot fail.
    let _ = Escaper::new(&mut out).write_str(text);
    out
}

/// Make `text` safe to print as one terminal line: control characters
/// (newlines, ESC, ...) are shown as escapes instead of being emitted.
pub fn terminal_safe(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if c.is_control() {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// The list container plus both counters.
pub fn to_markup(view: &View) -> Markup {
    html! {
        div #todoList {
            @if view.is_empty() {
                div.empty-state { (EMPTY_STATE) }
            } @else {
                @for row in &view.rows {
                    div.todo-item.completed[row.completed] data-id=(row.id.get()) {
                        input type="checkbox" data-action="toggle" checked[row.completed];
                        span { (row.text) }
                        button data-action="edit" { "Edit" }
                        button data-action="delete" { "Delete" }
                    }
                }
            }
        }
        div.stats {
            span #totalCount { (view.total_label()) }
            span #completedCount { (view.completed_label()) }
        }
    }
}

pub fn to_html(view: &View) -> String {
    to_markup(view).into_string()
}

/// Numbered rows for terminals, e.g. `  2. [x] Buy milk`. Item text goes
/// through [`terminal_safe`], so it always stays on its own row.
pub fn to_text(view: &View) -> String {
    let mut out = String::new();
    if view.is_empty() {
        out.push_str(EMPTY_STATE);
        out.push('\n');
    }
    for (index, row) in view.rows.iter().enumerate() {
        let mark = if row.completed { 'x' } else { ' ' };
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{:>3}. [{mark}] {}", index + 1, terminal_safe(&row.text));
    }
    let _ = writeln!(out, "{}  {}", view.total_label(), view.completed_label());
    out
}
