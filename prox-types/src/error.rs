//! Error types for collision queries.

use thiserror::Error;

/// Errors that can occur while configuring or dispatching a query.
///
/// Geometric outcomes are not errors: a separated pair yields an empty
/// manifold, and degenerate numerics degrade to fewer contact points inside
/// the solvers. These variants cover caller mistakes only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProxError {
    /// The request combination (solver / motion / geometry) is invalid.
    #[error("invalid request: {reason}")]
    InvalidRequest {
        /// Description of the mismatch.
        reason: String,
    },

    /// The geometry pair has no narrow-phase entry.
    #[error("unsupported shape pair: {kind1}/{kind2}")]
    UnsupportedPair {
        /// Kind of the first geometry.
        kind1: &'static str,
        /// Kind of the second geometry.
        kind2: &'static str,
    },

    /// A geometry fails its construction-time validity rules.
    #[error("invalid geometry: {reason}")]
    InvalidGeometry {
        /// Description of what's wrong.
        reason: String,
    },
}

impl ProxError {
    /// Create an invalid-request error.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Create an unsupported-pair error.
    #[must_use]
    pub fn unsupported_pair(kind1: &'static str, kind2: &'static str) -> Self {
        Self::UnsupportedPair { kind1, kind2 }
    }

    /// Create an invalid-geometry error.
    #[must_use]
    pub fn invalid_geometry(reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            reason: reason.into(),
        }
    }

    /// Check if this is an invalid-request error.
    #[must_use]
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidRequest { .. })
    }

    /// Check if this is an unsupported-pair error.
    #[must_use]
    pub fn is_unsupported_pair(&self) -> bool {
        matches!(self, Self::UnsupportedPair { .. })
    }
}
