//! Error types shared across the protocol model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to parse a protocol address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The input was empty.
    #[error("empty address")]
    Empty,

    /// The input had no domain part.
    #[error("address is missing a domain")]
    MissingDomain,
}

/// A protocol-level error element attached to a stanza.
///
/// Carried verbatim from the server. The session core only inspects presence
/// or absence of this element and renders its fields into user-facing
/// messages; it never acts on individual conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{condition}: {}", .text.as_deref().unwrap_or("no detail"))]
pub struct StanzaError {
    /// Defined error condition, e.g. `item-not-found` or `forbidden`.
    pub condition: String,

    /// Optional human-readable text from the server.
    pub text: Option<String>,

    /// Legacy numeric error code, if the server sent one.
    pub code: Option<u16>,
}

impl StanzaError {
    /// Build an error from its condition alone.
    pub fn new(condition: &str) -> Self {
        Self { condition: condition.to_owned(), text: None, code: None }
    }

    /// Attach human-readable text.
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_owned());
        self
    }
}
