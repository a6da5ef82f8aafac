//! Which failures the user gets told about.
//!
//! Historically load, create and edit alerted on a bad status while toggle and
//! delete stayed silent, and transport errors were only logged except on
//! load. That table is kept as [`FailurePolicy::Legacy`] so existing behavior
//! does not shift under users; [`FailurePolicy::Uniform`] is the consistent
//! alternative. Every failure is logged regardless of policy.

use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;
use crate::http::TransportError;

/// A request the controller can have in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Create,
    Toggle,
    Edit,
    Delete,
}

impl Operation {
    fn failure_message(self) -> &'static str {
        match self {
            Operation::Load => "Failed to load todos",
            Operation::Create => "Failed to add todo",
            Operation::Toggle => "Failed to update todo",
            Operation::Edit => "Failed to edit todo",
            Operation::Delete => "Failed to delete todo",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Load => "load",
            Operation::Create => "create",
            Operation::Toggle => "toggle",
            Operation::Edit => "edit",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// How a request failed.
#[derive(Debug)]
pub enum Failure {
    /// No response at all.
    Transport(TransportError),
    /// A response arrived but was not a usable success.
    Api(ApiError),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Transport(err) => fmt::Display::fmt(err, f),
            Failure::Api(err) => fmt::Display::fmt(err, f),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    #[default]
    Legacy,
    Uniform,
}

impl FailurePolicy {
    /// Message to show the user, or `None` when the failure is only logged.
    pub fn notice(self, operation: Operation, failure: &Failure) -> Option<&'static str> {
        let notify = match self {
            FailurePolicy::Uniform => true,
            FailurePolicy::Legacy => match (operation, failure) {
                (Operation::Load, _) => true,
                (Operation::Create | Operation::Edit, Failure::Api(_)) => true,
                (Operation::Create | Operation::Edit, Failure::Transport(_)) => false,
                (Operation::Toggle | Operation::Delete, _) => false,
            },
        };
        notify.then(|| operation.failure_message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPolicy(pub String);

impl fmt::Display for UnknownPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown failure policy {:?} (expected \"legacy\" or \"uniform\")", self.0)
    }
}

impl std::error::Error for UnknownPolicy {}

impl FromStr for FailurePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(FailurePolicy::Legacy),
            "uniform" => Ok(FailurePolicy::Uniform),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> Failure {
        Failure::Transport(TransportError::new("connection refused"))
    }

    fn not_found() -> Failure {
        Failure::Api(ApiError::NotFound)
    }

    #[test]
    fn legacy_table() {
        let p = FailurePolicy::Legacy;
        assert_eq!(p.notice(Operation::Load, &transport()), Some("Failed to load todos"));
        assert_eq!(p.notice(Operation::Load, &not_found()), Some("Failed to load todos"));
        assert_eq!(p.notice(Operation::Create, &not_found()), Some("Failed to add todo"));
        assert_eq!(p.notice(Operation::Create, &transport()), None);
        assert_eq!(p.notice(Operation::Edit, &not_found()), Some("Failed to edit todo"));
        assert_eq!(p.notice(Operation::Edit, &transport()), None);
        assert_eq!(p.notice(Operation::Toggle, &not_found()), None);
        assert_eq!(p.notice(Operation::Toggle, &transport()), None);
        assert_eq!(p.notice(Operation::Delete, &not_found()), None);
        assert_eq!(p.notice(Operation::Delete, &transport()), None);
    }

    #[test]
    fn uniform_always_notifies() {
        let p = FailurePolicy::Uniform;
        assert_eq!(p.notice(Operation::Delete, &not_found()), Some("Failed to delete todo"));
        assert_eq!(p.notice(Operation::Toggle, &transport()), Some("Failed to update todo"));
        assert_eq!(p.notice(Operation::Create, &transport()), Some("Failed to add todo"));
    }

    #[test]
    fn parses_from_config_strings() {
        assert_eq!("legacy".parse::<FailurePolicy>(), Ok(FailurePolicy::Legacy));
        assert_eq!(" Uniform ".parse::<FailurePolicy>(), Ok(FailurePolicy::Uniform));
        assert!("loud".parse::<FailurePolicy>().is_err());
    }
}
