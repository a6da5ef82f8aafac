//! The todo controller: user actions in, effects out.
//!
//! # Design
//! `TodoApp` owns the list state, the input field and the edit dialog, but
//! never performs I/O. Every action returns a `Vec<Effect>`; the host carries
//! out `Send` effects and reports each outcome back through
//! [`TodoApp::handle_response`] with the ticket it was given. A successful
//! mutation always answers with exactly one reload, and the list is only
//! ever replaced from a list response, so it mirrors the server.
//!
//! Overlapping requests are not coordinated. Whichever list response is
//! delivered last is what the user sees.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, error, warn};

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, TransportError};
use crate::policy::{Failure, FailurePolicy, Operation};
use crate::render::View;
use crate::state::TodoList;
use crate::types::{CreateTodo, EditTodo, TodoId};

pub const EMPTY_INPUT_NOTICE: &str = "Please enter a todo";
pub const EMPTY_EDIT_NOTICE: &str = "Todo cannot be empty";

/// Correlates a `Send` effect with the response the host reports for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Instruction for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Execute `request` and hand the outcome back with `ticket`.
    Send { ticket: Ticket, request: HttpRequest },
    /// Show a message to the user.
    Notify(String),
    /// Replace whatever is on screen with this view.
    Render(View),
}

/// Modal replacement for a blocking "edit text" prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditDialog {
    Idle,
    Editing { id: TodoId, draft: String },
    Submitting { id: TodoId, ticket: Ticket },
}

#[derive(Debug)]
pub struct TodoApp {
    client: TodoClient,
    policy: FailurePolicy,
    list: TodoList,
    input: String,
    dialog: EditDialog,
    next_ticket: u64,
    pending: HashMap<Ticket, Operation>,
}

impl TodoApp {
    pub fn new(client: TodoClient, policy: FailurePolicy) -> Self {
        Self {
            client,
            policy,
            list: TodoList::new(),
            input: String::new(),
            dialog: EditDialog::Idle,
            next_ticket: 1,
            pending: HashMap::new(),
        }
    }

    pub fn list(&self) -> &TodoList {
        &self.list
    }

    pub fn view(&self) -> View {
        View::from_list(&self.list)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn dialog(&self) -> &EditDialog {
        &self.dialog
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Number of requests sent whose outcome has not been reported yet.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn load(&mut self) -> Vec<Effect> {
        let request = self.client.build_list_todos();
        vec![self.issue(Operation::Load, request)]
    }

    /// Create an item from the input field (add button or Enter).
    pub fn submit(&mut self) -> Vec<Effect> {
        let text = self.input.trim();
        if text.is_empty() {
            return vec![Effect::Notify(EMPTY_INPUT_NOTICE.to_string())];
        }
        let input = CreateTodo {
            text: text.to_string(),
        };
        match self.client.build_create_todo(&input) {
            Ok(request) => vec![self.issue(Operation::Create, request)],
            Err(err) => self.fail(Operation::Create, Failure::Api(err)),
        }
    }

    pub fn toggle(&mut self, id: TodoId) -> Vec<Effect> {
        let request = self.client.build_toggle_todo(id);
        vec![self.issue(Operation::Toggle, request)]
    }

    pub fn delete(&mut self, id: TodoId) -> Vec<Effect> {
        let request = self.client.build_delete_todo(id);
        vec![self.issue(Operation::Delete, request)]
    }

    /// Open the edit dialog on `id`, prefilled with its current text.
    ///
    /// Ignored while another edit is open or when `id` is not in the list.
    pub fn begin_edit(&mut self, id: TodoId) -> Vec<Effect> {
        if self.dialog != EditDialog::Idle {
            debug!(%id, "edit dialog busy, ignoring");
            return Vec::new();
        }
        if let Some(todo) = self.list.get(id) {
            self.dialog = EditDialog::Editing {
                id,
                draft: todo.text.clone(),
            };
        }
        Vec::new()
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let EditDialog::Editing { draft, .. } = &mut self.dialog {
            *draft = text.into();
        }
    }

    pub fn cancel_edit(&mut self) -> Vec<Effect> {
        if matches!(self.dialog, EditDialog::Editing { .. }) {
            self.dialog = EditDialog::Idle;
        }
        Vec::new()
    }

    pub fn confirm_edit(&mut self) -> Vec<Effect> {
        let (id, draft) = match &self.dialog {
            EditDialog::Editing { id, draft } => (*id, draft.clone()),
            _ => return Vec::new(),
        };
        self.dialog = EditDialog::Idle;
        if draft.trim().is_empty() {
            return vec![Effect::Notify(EMPTY_EDIT_NOTICE.to_string())];
        }
        let input = EditTodo { text: draft };
        match self.client.build_edit_todo(id, &input) {
            Ok(request) => {
                let effect = self.issue(Operation::Edit, request);
                if let Effect::Send { ticket, .. } = &effect {
                    self.dialog = EditDialog::Submitting { id, ticket: *ticket };
                }
                vec![effect]
            }
            Err(err) => self.fail(Operation::Edit, Failure::Api(err)),
        }
    }

    /// Feed back the outcome of a `Send` effect.
    pub fn handle_response(
        &mut self,
        ticket: Ticket,
        outcome: Result<HttpResponse, TransportError>,
    ) -> Vec<Effect> {
        let Some(operation) = self.pending.remove(&ticket) else {
            warn!(%ticket, "response for unknown ticket ignored");
            return Vec::new();
        };
        if matches!(self.dialog, EditDialog::Submitting { ticket: t, .. } if t == ticket) {
            self.dialog = EditDialog::Idle;
        }
        let response = match outcome {
            Ok(response) => response,
            Err(err) => return self.fail(operation, Failure::Transport(err)),
        };

        if operation == Operation::Load {
            return match self.client.parse_list_todos(response) {
                Ok(items) => {
                    self.list.replace(items);
                    let view = self.view();
                    debug!(total = view.total, completed = view.completed, "rendering");
                    vec![Effect::Render(view)]
                }
                Err(err) => self.fail(operation, Failure::Api(err)),
            };
        }

        match self.parse_mutation(operation, response) {
            Ok(()) => {
                if operation == Operation::Create {
                    self.input.clear();
                }
                self.load()
            }
            Err(err) => self.fail(operation, Failure::Api(err)),
        }
    }

    fn parse_mutation(&self, operation: Operation, response: HttpResponse) -> Result<(), ApiError> {
        match operation {
            Operation::Create => self.client.parse_create_todo(response),
            Operation::Toggle => self.client.parse_toggle_todo(response),
            Operation::Edit => self.client.parse_edit_todo(response),
            Operation::Delete => self.client.parse_delete_todo(response),
            Operation::Load => self.client.parse_list_todos(response).map(drop),
        }
    }

    fn issue(&mut self, operation: Operation, request: HttpRequest) -> Effect {
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.pending.insert(ticket, operation);
        debug!(%ticket, %operation, method = %request.method, path = %request.path, "sending");
        Effect::Send { ticket, request }
    }

    fn fail(&mut self, operation: Operation, failure: Failure) -> Vec<Effect> {
        match &failure {
            Failure::Transport(err) => error!(%operation, %err, "request failed"),
            Failure::Api(err) => warn!(%operation, %err, "request rejected"),
        }
        self.policy
            .notice(operation, &failure)
            .map(|message| Effect::Notify(message.to_string()))
            .into_iter()
            .collect()
    }
}
