// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Access Control Evaluator
//!
//! Deny-by-default authorization over the static permission matrix:
//! 1. Action permission bit - missing bit denies with `ActionNotPermitted`
//! 2. Classification ceiling - resource above ceiling denies with
//!    `ClassificationExceeded`
//! 3. Otherwise allow
//!
//! The evaluator is a pure function of its inputs and the injected matrix:
//! no interior state, thread-safe by construction. It never writes the
//! audit ledger itself - the calling layer is contractually required to
//! append every decision it receives, allow or deny.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::classification::Classification;
use super::matrix::PermissionMatrix;
use super::role::{Action, Role};

// =============================================================================
// Access Context
// =============================================================================

/// Identity and request metadata for an access attempt.
///
/// The API layer owns token validation; this core receives only the
/// resolved actor, role, and origin metadata carried into audit entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessContext {
    /// Actor identifier
    pub actor: String,

    /// Role at the time of the action
    pub role: Role,

    /// Origin network address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// Client identifier (user agent or application id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    /// Request ID for tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl AccessContext {
    /// Create a new access context.
    pub fn new(actor: impl Into<String>, role: Role) -> Self {
        Self {
            actor: actor.into(),
            role,
            origin: None,
            client: None,
            request_id: None,
        }
    }

    /// Add the origin network address.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Add the client identifier.
    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    /// Add a request ID for tracing.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

// =============================================================================
// Decision
// =============================================================================

/// Why an access attempt was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DenyReason {
    /// The role's permission bit for the action is not set
    ActionNotPermitted,
    /// The resource classification exceeds the role's ceiling
    ClassificationExceeded,
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenyReason::ActionNotPermitted => write!(f, "ACTION_NOT_PERMITTED"),
            DenyReason::ClassificationExceeded => write!(f, "CLASSIFICATION_EXCEEDED"),
        }
    }
}

/// Outcome of an authorization check.
///
/// Deny is a first-class value, not an error: callers branch on it and
/// append it to the audit ledger exactly like an allow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum Decision {
    /// Access is allowed
    Allow {
        /// Role the decision was made for
        role: Role,
        /// Classification of the target resource
        classification: Classification,
        /// Requested action
        action: Action,
    },

    /// Access is denied
    Deny {
        /// Role the decision was made for
        role: Role,
        /// Classification of the target resource
        classification: Classification,
        /// Requested action
        action: Action,
        /// Why the attempt was denied
        reason: DenyReason,
    },
}

impl Decision {
    /// Check if this is an Allow decision.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }

    /// The denial reason, if denied.
    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Decision::Allow { .. } => None,
            Decision::Deny { reason, .. } => Some(*reason),
        }
    }
}

// =============================================================================
// Access Evaluator
// =============================================================================

/// Evaluates access decisions against an injected permission matrix.
#[derive(Debug, Clone)]
pub struct AccessEvaluator {
    matrix: PermissionMatrix,
}

impl AccessEvaluator {
    /// Create an evaluator over the given matrix.
    ///
    /// Matrix totality is a startup concern: assemble through
    /// [`crate::config::SecurityCore`] to get the fatal-on-incomplete
    /// check, or call [`PermissionMatrix::validate`] yourself.
    pub fn new(matrix: PermissionMatrix) -> Self {
        Self { matrix }
    }

    /// Authorize an access attempt.
    ///
    /// Pure with respect to the evaluator: the same inputs always produce
    /// the same decision. Every returned decision must be appended to the
    /// audit ledger by the caller, whatever the outcome.
    pub fn authorize(
        &self,
        ctx: &AccessContext,
        classification: Classification,
        action: Action,
    ) -> Decision {
        debug!(
            actor = %ctx.actor,
            role = %ctx.role,
            classification = %classification,
            action = %action,
            "Evaluating access"
        );

        if !self.matrix.permits(ctx.role, action) {
            warn!(
                actor = %ctx.actor,
                role = %ctx.role,
                action = %action,
                "Access denied: action not permitted"
            );
            return Decision::Deny {
                role: ctx.role,
                classification,
                action,
                reason: DenyReason::ActionNotPermitted,
            };
        }

        let within_ceiling = self
            .matrix
            .ceiling(ctx.role)
            .map(|ceiling| classification <= ceiling)
            .unwrap_or(false);
        if !within_ceiling {
            warn!(
                actor = %ctx.actor,
                role = %ctx.role,
                classification = %classification,
                "Access denied: classification exceeds role ceiling"
            );
            return Decision::Deny {
                role: ctx.role,
                classification,
                action,
                reason: DenyReason::ClassificationExceeded,
            };
        }

        Decision::Allow {
            role: ctx.role,
            classification,
            action,
        }
    }

    /// Quick boolean check (decision is still subject to the caller's
    /// audit obligation if acted upon).
    pub fn can(&self, ctx: &AccessContext, classification: Classification, action: Action) -> bool {
        self.authorize(ctx, classification, action).is_allowed()
    }

    /// The matrix this evaluator decides against.
    pub fn matrix(&self) -> &PermissionMatrix {
        &self.matrix
    }
}

// =============================================================================
// Tests
// =============================================================================
