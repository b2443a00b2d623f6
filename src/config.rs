// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the document submission client.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Construction-time configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("permit count must be positive")]
    ZeroPermitCount,

    #[error("window duration must be positive")]
    ZeroWindow,

    #[error("invalid endpoint URL {url:?}: {source}")]
    InvalidEndpointUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Configuration for the document submission client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Document-creation endpoint URL
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Sliding-window rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum admissions inside any trailing window (default: 10)
    #[serde(default = "default_permit_count")]
    pub permit_count: u32,

    /// Window length in milliseconds (default: 1000)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

// Default value functions
fn default_endpoint_url() -> String {
    "https://ismp.crpt.ru/api/v3/lk/documents/create".to_string()
}

fn default_permit_count() -> u32 {
    10
}

fn default_window_ms() -> u64 {
    1000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            permit_count: default_permit_count(),
            window_ms: default_window_ms(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            endpoint_url: std::env::var("DOCUMENT_ENDPOINT_URL")
                .unwrap_or_else(|_| default_endpoint_url()),
            rate_limit: RateLimitConfig {
                permit_count: std::env::var("RATE_PERMIT_COUNT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
                window_ms: std::env::var("RATE_WINDOW_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1000),
            },
        }
    }
}

impl RateLimitConfig {
    /// Get the sliding window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Check the construction-time constraints: both the window and the
    /// permit count must be positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.permit_count == 0 {
            return Err(ConfigError::ZeroPermitCount);
        }
        if self.window_ms == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(())
    }
}
