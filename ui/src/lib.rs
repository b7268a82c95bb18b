//! Terminal client for the RAG service.
//!
//! The interactive surface is a line-oriented terminal session rather than a
//! browser form. The contract with the service is unchanged: the question is
//! trimmed, an empty one only produces a warning, each question is a single
//! `POST /ask` bounded by [`client::REQUEST_TIMEOUT`], and failures are shown
//! inline without a retry.

pub mod client;
pub mod session;

pub use client::{AnswerResponse, ApiClient, AskApi, UiConfig};
pub use session::{render, submit, Outcome};
