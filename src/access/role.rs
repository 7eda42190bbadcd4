// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Roles, Actions, and Resource Kinds
//!
//! The access-control vocabulary. Each authenticated actor carries exactly
//! one role per session context; the API layer resolves it from the
//! session token before handing requests to this core.

use serde::{Deserialize, Serialize};

// =============================================================================
// Roles
// =============================================================================

/// Actor roles in the complaint-intake platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Assigned case investigator
    Investigator,
    /// Review-panel member
    PanelMember,
    /// Case reviewer
    Reviewer,
    /// Audit-trail oversight
    Auditor,
    /// Read-only account
    ReadOnly,
}

impl Role {
    /// Parse a role from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "investigator" => Some(Role::Investigator),
            "panel_member" | "panel-member" => Some(Role::PanelMember),
            "reviewer" => Some(Role::Reviewer),
            "auditor" => Some(Role::Auditor),
            "read_only" | "read-only" => Some(Role::ReadOnly),
            _ => None,
        }
    }

    /// String form used in audit entries and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Investigator => "investigator",
            Role::PanelMember => "panel_member",
            Role::Reviewer => "reviewer",
            Role::Auditor => "auditor",
            Role::ReadOnly => "read_only",
        }
    }

    /// All roles.
    pub fn all() -> [Role; 6] {
        [
            Role::Admin,
            Role::Investigator,
            Role::PanelMember,
            Role::Reviewer,
            Role::Auditor,
            Role::ReadOnly,
        ]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Actions
// =============================================================================

/// Actions that can be performed on a protected resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create a new resource
    Create,
    /// Read an existing resource
    Read,
    /// Update an existing resource
    Update,
    /// Delete a resource
    Delete,
    /// Export a resource outside the platform
    Export,
}

impl Action {
    /// String form used in audit entries and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Export => "export",
        }
    }

    /// All actions.
    pub fn all() -> [Action; 5] {
        [
            Action::Create,
            Action::Read,
            Action::Update,
            Action::Delete,
            Action::Export,
        ]
    }

    /// Whether this action mutates the resource.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Action::Create | Action::Update | Action::Delete)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Resource Kinds
// =============================================================================

/// Types of protected resources in the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Licensee complaint record
    Complaint,
    /// Uploaded document (evidence, correspondence, response)
    Document,
    /// AI analysis result
    Analysis,
    /// Investigation report
    Report,
    /// Audit-trail excerpt
    AuditLog,
}

impl ResourceKind {
    /// String form used in audit entries and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Complaint => "complaint",
            ResourceKind::Document => "document",
            ResourceKind::Analysis => "analysis",
            ResourceKind::Report => "report",
            ResourceKind::AuditLog => "audit_log",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================
