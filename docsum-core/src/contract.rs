//! # contract: the seam between the pipeline and the completion backend
//!
//! The summarisation pipeline only ever talks to a [`Completer`]. The real
//! implementation is [`crate::completion::CompletionClient`]; tests plug in
//! the `mockall`-generated `MockCompleter` (exported under the
//! `test-export-mocks` feature so integration tests and the CLI crate can use
//! it too).
//!
//! ## Errors
//! Every failure is one of the [`CompletionError`] kinds. None of them is
//! retried by the client; the caller decides what a failure means for the run.

use async_trait::async_trait;

#[allow(unused_imports)]
use mockall::{automock, predicate::*};

use crate::conversation::Conversation;

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// Connection, DNS, TLS or other network-level failure.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("HTTP error! status: {status}, body: {body}")]
    Http { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("unexpected completion response: {0}")]
    Parse(String),
}

/// Turns a conversation into generated text.
///
/// Implementations hold no per-call state; the same value can serve any
/// number of sequential calls.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Completer: Send + Sync {
    /// Send `conversation` and return the first completion choice's text.
    async fn complete(&self, conversation: &Conversation) -> Result<String, CompletionError>;
}
