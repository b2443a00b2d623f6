// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! CRPT Document Client
//!
//! This crate submits marking documents to the CRPT document-creation
//! endpoint while enforcing a client-side rate limit:
//!
//! - Sliding-window admission control (at most `permit_count` submissions
//!   inside any trailing `window_ms` interval)
//! - Blocking semantics: excess callers are suspended until admission is
//!   possible, never rejected
//! - One POST per submission, detached signature passed as a header
//! - Cooperative interruption of waiting callers via [`RateLimiter::close`]
//!
//! The rate budget is spent on the submission *attempt*: a failed POST still
//! consumes an admission. Retry policy is the caller's responsibility.

pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod limiter;

pub use client::DocumentClient;
pub use config::{Config, ConfigError, RateLimitConfig};
pub use document::{Description, Document, Product};
pub use error::{SubmitError, SubmitFailure};
pub use limiter::{AcquireError, RateLimiter};
