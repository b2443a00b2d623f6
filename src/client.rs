// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Rate-limited document submission client.
//!
//! Every submission funnels through the sliding-window limiter before
//! touching the network, so the rate budget is spent on the attempt, not on
//! the outcome.

use crate::config::{Config, ConfigError};
use crate::error::{SubmitError, SubmitFailure};
use crate::limiter::RateLimiter;
use reqwest::header;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

/// Header carrying the caller-supplied detached signature.
const SIGNATURE_HEADER: &str = "Signature";

/// Client for submitting documents to a single configured endpoint under a
/// sliding-window rate limit.
pub struct DocumentClient {
    http: reqwest::Client,
    endpoint: Url,
    limiter: RateLimiter,
}

impl DocumentClient {
    /// Create a new client with the given configuration.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let endpoint =
            Url::parse(&config.endpoint_url).map_err(|source| ConfigError::InvalidEndpointUrl {
                url: config.endpoint_url.clone(),
                source,
            })?;
        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            limiter: RateLimiter::new(config.rate_limit)?,
        })
    }

    /// The client's rate limiter. Call [`RateLimiter::close`] on it to
    /// interrupt submissions waiting for admission, e.g. on shutdown.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Submit one document with its detached signature.
    ///
    /// Suspends until the limiter grants admission, then performs exactly
    /// one POST: `Content-Type: application/json`, signature in the
    /// `Signature` header, JSON-encoded document as the body. Encoding and
    /// delivery failures both surface as [`SubmitError::Failed`] with the
    /// admission already consumed; an interrupted wait surfaces as
    /// [`SubmitError::Cancelled`]. Nothing is retried here.
    pub async fn submit<T>(&self, document: &T, signature: &str) -> Result<(), SubmitError>
    where
        T: Serialize + ?Sized,
    {
        self.limiter.acquire().await?;

        let body = serde_json::to_vec(document).map_err(SubmitFailure::from)?;
        debug!(endpoint = %self.endpoint, bytes = body.len(), "submitting document");

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, signature)
            .body(body)
            .send()
            .await
            .map_err(SubmitFailure::from)?;

        match response.error_for_status() {
            Ok(response) => {
                debug!(status = %response.status(), "document accepted");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "endpoint rejected document");
                Err(SubmitError::Failed(SubmitFailure::Transport(err)))
            }
        }
    }
}
