//! Client core for the todo list service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). On top of that sits
//! `TodoApp`, the controller that owns the client-side list, turns user
//! actions into requests and tells the host what to show.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `TodoApp` never patches its list locally. Every successful mutation is
//!   followed by a full reload and the list is replaced wholesale.
//! - Rendering goes through a `View` model; `render::to_html` escapes all
//!   item text.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod app;
pub mod client;
pub mod error;
pub mod http;
pub mod policy;
pub mod render;
pub mod state;
pub mod types;

pub use app::{EditDialog, Effect, Ticket, TodoApp};
pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, TransportError};
pub use policy::{FailurePolicy, Operation};
pub use render::View;
pub use state::TodoList;
pub use types::{CreateTodo, EditTodo, Todo, TodoId};
