//! Line-oriented host for `TodoApp`.
//!
//! Requests are executed one at a time as effects come out of the app, so
//! from the user's point of view every command finishes (including its
//! reload) before the next prompt.

use std::io::Write;

use anyhow::Result;
use todo_core::{render, EditDialog, Effect, TodoApp, TodoId};
use tracing::debug;

use crate::command::{self, Command, HELP};
use crate::transport::Transport;

/// Shown when a command is typed while the edit prompt is open.
pub const EDITING_NOTICE: &str = "finish editing first: type the new text, or /cancel";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell<T, W> {
    app: TodoApp,
    transport: T,
    out: W,
}

impl<T: Transport, W: Write> Shell<T, W> {
    pub fn new(app: TodoApp, transport: T, out: W) -> Self {
        Self { app, transport, out }
    }

    pub fn app(&self) -> &TodoApp {
        &self.app
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Initial load.
    pub fn start(&mut self) -> Result<()> {
        let effects = self.app.load();
        self.apply(effects)
    }

    pub fn handle_line(&mut self, line: &str) -> Result<Flow> {
        if matches!(self.app.dialog(), EditDialog::Editing { .. }) {
            let command = line.trim();
            let effects = if command == "/cancel" {
                writeln!(self.out, "edit cancelled")?;
                self.app.cancel_edit()
            } else if command.starts_with('/') {
                writeln!(self.out, "! {EDITING_NOTICE}")?;
                return Ok(Flow::Continue);
            } else {
                self.app.set_draft(line);
                self.app.confirm_edit()
            };
            self.apply(effects)?;
            return Ok(Flow::Continue);
        }

        let command = match command::parse(line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(self.out, "! {err}")?;
                return Ok(Flow::Continue);
            }
        };
        debug!(?command, "command");

        let effects = match command {
            Command::Add(text) => {
                self.app.set_input(text);
                self.app.submit()
            }
            Command::Toggle(row) => match self.row(row)? {
                Some(id) => self.app.toggle(id),
                None => return Ok(Flow::Continue),
            },
            Command::Delete(row) => match self.row(row)? {
                Some(id) => self.app.delete(id),
                None => return Ok(Flow::Continue),
            },
            Command::Edit(row) => {
                let Some(id) = self.row(row)? else {
                    return Ok(Flow::Continue);
                };
                let effects = self.app.begin_edit(id);
                if let EditDialog::Editing { draft, .. } = self.app.dialog() {
                    let draft = render::terminal_safe(draft);
                    writeln!(self.out, "editing row {row}: {draft}")?;
                    writeln!(self.out, "type the new text, or /cancel")?;
                }
                effects
            }
            Command::Reload => self.app.load(),
            Command::Html => {
                writeln!(self.out, "{}", render::to_html(&self.app.view()))?;
                Vec::new()
            }
            Command::Help => {
                writeln!(self.out, "{HELP}")?;
                Vec::new()
            }
            Command::Quit => return Ok(Flow::Quit),
        };
        self.apply(effects)?;
        Ok(Flow::Continue)
    }

    /// Id behind a 1-based row number, reporting unknown rows to the user.
    fn row(&mut self, row: usize) -> Result<Option<TodoId>> {
        let id = self.app.view().id_at(row);
        if id.is_none() {
            writeln!(self.out, "! No item {row}")?;
        }
        Ok(id)
    }

    /// Carry out effects, feeding responses back, until nothing is in flight.
    fn apply(&mut self, effects: Vec<Effect>) -> Result<()> {
        let mut queue = effects;
        while !queue.is_empty() {
            let mut next = Vec::new();
            for effect in queue {
                match effect {
                    Effect::Send { ticket, request } => {
                        let outcome = self.transport.execute(&request);
                        next.extend(self.app.handle_response(ticket, outcome));
                    }
                    Effect::Notify(message) => writeln!(self.out, "! {message}")?,
                    Effect::Render(view) => write!(self.out, "{}", render::to_text(&view))?,
                }
            }
            queue = next;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use todo_core::{
        FailurePolicy, HttpMethod, HttpRequest, HttpResponse, TodoClient, TransportError,
    };

    use super::*;

    /// Answers requests from a script and records what was sent.
    #[derive(Default)]
    struct Scripted {
        replies: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
        sent: RefCell<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn reply(self, status: u16, body: &str) -> Self {
            self.replies.borrow_mut().push_back(Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }));
            self
        }
    }

    impl Transport for &Scripted {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.sent.borrow_mut().push(request.clone());
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::new("no scripted reply")))
        }
    }

    const ONE_ITEM: &str = r#"[{"id":1,"text":"Buy milk","completed":false}]"#;

    fn shell(script: &Scripted) -> Shell<&Scripted, Vec<u8>> {
        let app = TodoApp::new(TodoClient::new("http://api.test"), FailurePolicy::Legacy);
        Shell::new(app, script, Vec::new())
    }

    fn output(shell: Shell<&Scripted, Vec<u8>>) -> String {
        String::from_utf8(shell.into_output()).unwrap()
    }

    #[test]
    fn start_renders_empty_state() {
        let script = Scripted::default().reply(200, "[]");
        let mut sh = shell(&script);
        sh.start().unwrap();
        assert_eq!(output(sh), "No todos yet\nTotal: 0  Completed: 0\n");
    }

    #[test]
    fn typed_line_creates_then_reloads() {
        let script = Scripted::default()
            .reply(200, "[]")
            .reply(201, "{}")
            .reply(200, ONE_ITEM);
        let mut sh = shell(&script);
        sh.start().unwrap();
        assert_eq!(sh.handle_line("Buy milk").unwrap(), Flow::Continue);

        let sent = script.sent.borrow();
        let methods: Vec<HttpMethod> = sent.iter().map(|r| r.method).collect();
        assert_eq!(methods, [HttpMethod::Get, HttpMethod::Post, HttpMethod::Get]);
        drop(sent);
        assert!(output(sh).ends_with("  1. [ ] Buy milk\nTotal: 1  Completed: 0\n"));
    }

    #[test]
    fn blank_line_is_rejected_locally() {
        let script = Scripted::default().reply(200, "[]");
        let mut sh = shell(&script);
        sh.start().unwrap();
        sh.handle_line("   ").unwrap();
        assert_eq!(script.sent.borrow().len(), 1);
        assert!(output(sh).ends_with("! Please enter a todo\n"));
    }

    #[test]
    fn delete_not_found_is_silent() {
        let script = Scripted::default().reply(200, ONE_ITEM).reply(404, "");
        let mut sh = shell(&script);
        sh.start().unwrap();
        sh.handle_line("/delete 1").unwrap();
        assert_eq!(script.sent.borrow()[1].path, "http://api.test/api/todos/1");
        assert_eq!(sh.app().list().len(), 1);
        assert!(!output(sh).contains('!'));
    }

    #[test]
    fn edit_prompt_then_cancel_sends_nothing() {
        let script = Scripted::default().reply(200, ONE_ITEM);
        let mut sh = shell(&script);
        sh.start().unwrap();
        sh.handle_line("/edit 1").unwrap();
        sh.handle_line("/cancel").unwrap();
        assert_eq!(script.sent.borrow().len(), 1);
        assert_eq!(sh.app().dialog(), &EditDialog::Idle);
        let out = output(sh);
        assert!(out.contains("editing row 1: Buy milk"));
        assert!(out.contains("edit cancelled"));
    }

    #[test]
    fn edit_prompt_submits_next_line() {
        let script = Scripted::default()
            .reply(200, ONE_ITEM)
            .reply(200, "")
            .reply(200, r#"[{"id":1,"text":"Buy bread","completed":false}]"#);
        let mut sh = shell(&script);
        sh.start().unwrap();
        sh.handle_line("/edit 1").unwrap();
        sh.handle_line("Buy bread").unwrap();

        let sent = script.sent.borrow();
        assert_eq!(sent[1].method, HttpMethod::Put);
        assert_eq!(sent[1].body.as_deref(), Some(r#"{"text":"Buy bread"}"#));
        drop(sent);
        assert!(output(sh).contains("  1. [ ] Buy bread\n"));
    }

    #[test]
    fn commands_are_refused_while_editing() {
        let script = Scripted::default()
            .reply(200, ONE_ITEM)
            .reply(200, "")
            .reply(200, r#"[{"id":1,"text":"Buy bread","completed":false}]"#);
        let mut sh = shell(&script);
        sh.start().unwrap();
        sh.handle_line("/edit 1").unwrap();
        assert_eq!(sh.handle_line("/quit").unwrap(), Flow::Continue);
        sh.handle_line(" /delete 1").unwrap();
        assert_eq!(script.sent.borrow().len(), 1);
        assert!(matches!(sh.app().dialog(), EditDialog::Editing { .. }));

        sh.handle_line("Buy bread").unwrap();
        let sent = script.sent.borrow();
        assert_eq!(sent[1].body.as_deref(), Some(r#"{"text":"Buy bread"}"#));
        drop(sent);
        let out = output(sh);
        assert_eq!(out.matches(EDITING_NOTICE).count(), 2);
        assert!(out.contains("  1. [ ] Buy bread\n"));
    }

    #[test]
    fn control_characters_in_text_stay_on_one_line() {
        let script = Scripted::default()
            .reply(200, r#"[{"id":1,"text":"real\n  2. [x] forged\u001b[2J","completed":false}]"#);
        let mut sh = shell(&script);
        sh.start().unwrap();
        sh.handle_line("/edit 1").unwrap();
        let out = output(sh);
        assert!(!out.contains('\x1b'));
        assert!(!out.lines().any(|line| line.starts_with("  2.")));
        assert!(out.contains("  1. [ ] real\\n  2. [x] forged\\u{1b}[2J\n"));
        assert!(out.contains("editing row 1: real\\n  2. [x] forged\\u{1b}[2J\n"));
    }

    #[test]
    fn unknown_row_and_bad_command_are_reported() {
        let script = Scripted::default().reply(200, "[]");
        let mut sh = shell(&script);
        sh.start().unwrap();
        sh.handle_line("/toggle 3").unwrap();
        sh.handle_line("/nope").unwrap();
        assert_eq!(sh.handle_line("/quit").unwrap(), Flow::Quit);
        assert_eq!(script.sent.borrow().len(), 1);
        let out = output(sh);
        assert!(out.contains("! No item 3"));
        assert!(out.contains("! unknown command /nope"));
    }

    #[test]
    fn html_command_escapes_text() {
        let script =
            Scripted::default().reply(200, r#"[{"id":1,"text":"<b>hi</b>","completed":true}]"#);
        let mut sh = shell(&script);
        sh.start().unwrap();
        sh.handle_line("/html").unwrap();
        let out = output(sh);
        assert!(out.contains("&lt;b&gt;hi&lt;/b&gt;"));
        assert!(out.contains("Completed: 1"));
    }
}
