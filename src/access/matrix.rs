// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Permission Matrix
//!
//! The static authorization table: per-role action grants plus a per-role
//! classification ceiling. The matrix is an immutable configuration value
//! built once at process start and injected into the evaluator - changing
//! it is a deployment, not a runtime operation. Tests substitute alternate
//! matrices without process-wide side effects.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::classification::Classification;
use super::role::{Action, Role};
use crate::error::{SecurityError, SecurityResult};

// =============================================================================
// Permission Matrix
// =============================================================================

/// Immutable (Role × Action) grant table combined with per-role
/// classification ceilings.
///
/// Lookups on combinations absent from the table answer `false` - the
/// evaluator turns that into a deny. A matrix with missing role entries is
/// a configuration bug: [`PermissionMatrix::validate`] rejects it at
/// startup rather than leaving ambiguity for request time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionMatrix {
    grants: HashMap<Role, HashSet<Action>>,
    ceilings: HashMap<Role, Classification>,
}

impl PermissionMatrix {
    /// Start building a matrix.
    pub fn builder() -> PermissionMatrixBuilder {
        PermissionMatrixBuilder::default()
    }

    /// The board's production matrix.
    ///
    /// Grants follow the investigation workflow: investigators own case
    /// material end to end, panel members and auditors read and export,
    /// reviewers and read-only accounts read within lower ceilings.
    pub fn board_default() -> Self {
        Self::builder()
            .allow(
                Role::Admin,
                &[
                    Action::Create,
                    Action::Read,
                    Action::Update,
                    Action::Delete,
                    Action::Export,
                ],
            )
            .ceiling(Role::Admin, Classification::Cfr2)
            .allow(
                Role::Investigator,
                &[Action::Create, Action::Read, Action::Update, Action::Export],
            )
            .ceiling(Role::Investigator, Classification::Cfr2)
            .allow(Role::PanelMember, &[Action::Read, Action::Export])
            .ceiling(Role::PanelMember, Classification::Cfr2)
            .allow(Role::Reviewer, &[Action::Read])
            .ceiling(Role::Reviewer, Classification::Restricted)
            .allow(Role::Auditor, &[Action::Read, Action::Export])
            .ceiling(Role::Auditor, Classification::Cfr2)
            .allow(Role::ReadOnly, &[Action::Read])
            .ceiling(Role::ReadOnly, Classification::Confidential)
            .build()
    }

    /// Whether the role holds the permission bit for this action.
    ///
    /// Absent entries answer `false` (deny-by-default).
    pub fn permits(&self, role: Role, action: Action) -> bool {
        self.grants
            .get(&role)
            .map(|actions| actions.contains(&action))
            .unwrap_or(false)
    }

    /// The highest classification this role may touch, if configured.
    pub fn ceiling(&self, role: Role) -> Option<Classification> {
        self.ceilings.get(&role).copied()
    }

    /// Verify the matrix is total: every role has a grant entry (possibly
    /// empty) and a ceiling. Called once at startup; a failure here is
    /// fatal configuration, not a runtime ambiguity.
    pub fn validate(&self) -> SecurityResult<()> {
        for role in Role::all() {
            if !self.grants.contains_key(&role) {
                return Err(SecurityError::Configuration(format!(
                    "permission matrix has no action entry for role '{}'",
                    role
                )));
            }
            if !self.ceilings.contains_key(&role) {
                return Err(SecurityError::Configuration(format!(
                    "permission matrix has no classification ceiling for role '{}'",
                    role
                )));
            }
        }
        Ok(())
    }

    /// Classifications accessible to a role under its ceiling.
    pub fn accessible_classifications(&self, role: Role) -> Vec<Classification> {
        match self.ceiling(role) {
            Some(ceiling) => Classification::all()
                .into_iter()
                .filter(|c| *c <= ceiling)
                .collect(),
            None => vec![],
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`PermissionMatrix`].
#[derive(Debug, Default)]
pub struct PermissionMatrixBuilder {
    grants: HashMap<Role, HashSet<Action>>,
    ceilings: HashMap<Role, Classification>,
}

impl PermissionMatrixBuilder {
    /// Grant actions to a role (merged with earlier grants for the role).
    pub fn allow(mut self, role: Role, actions: &[Action]) -> Self {
        self.grants
            .entry(role)
            .or_default()
            .extend(actions.iter().copied());
        self
    }

    /// Set the classification ceiling for a role.
    pub fn ceiling(mut self, role: Role, classification: Classification) -> Self {
        self.ceilings.insert(role, classification);
        self
    }

    /// Finish building. Totality is NOT checked here - call
    /// [`PermissionMatrix::validate`] at startup.
    pub fn build(self) -> PermissionMatrix {
        PermissionMatrix {
            grants: self.grants,
            ceilings: self.ceilings,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
