// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Error types for document submission.

use crate::limiter::AcquireError;
use thiserror::Error;

/// Why a submission attempt failed after its admission was granted.
#[derive(Debug, Error)]
pub enum SubmitFailure {
    #[error("document could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("request could not be delivered: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Error surfaced by `DocumentClient::submit`.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The admission wait was interrupted; no request was attempted.
    #[error("submission cancelled: {0}")]
    Cancelled(#[from] AcquireError),

    /// The submission attempt failed after the rate-limit admission was
    /// already spent. Inspect the wrapped [`SubmitFailure`] to tell an
    /// encoding failure from a transport one.
    #[error("submission failed: {0}")]
    Failed(#[from] SubmitFailure),
}
