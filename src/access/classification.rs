// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Security Classifications
//!
//! Classification levels attached to every protected resource:
//! - PUBLIC: releasable records
//! - CONFIDENTIAL: default for complaint material
//! - RESTRICTED: investigator-level material
//! - PHI: protected health information (HIPAA)
//! - CFR2: substance-use-disorder records (42 CFR Part 2)
//!
//! The classification is assigned at resource creation and never changes;
//! there is deliberately no reclassification API.

use serde::{Deserialize, Serialize};

// =============================================================================
// Classification Enum
// =============================================================================

/// Sensitivity tier of a protected resource.
///
/// Variant order is the sensitivity order: `Public < Confidential <
/// Restricted < Phi < Cfr2`. Ceiling checks rely on the derived `Ord`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    /// Releasable under open-records requests
    Public,
    /// Standard complaint material
    Confidential,
    /// Investigation material with need-to-know access
    Restricted,
    /// Protected health information
    Phi,
    /// 42 CFR Part 2 substance-use-disorder records
    Cfr2,
}

impl Classification {
    /// Parse a classification from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PUBLIC" => Some(Classification::Public),
            "CONFIDENTIAL" => Some(Classification::Confidential),
            "RESTRICTED" => Some(Classification::Restricted),
            "PHI" => Some(Classification::Phi),
            "CFR2" => Some(Classification::Cfr2),
            _ => None,
        }
    }

    /// Whether this classification requires dense audit coverage.
    ///
    /// PHI and CFR2 accesses must all be present in the ledger - every
    /// read, not just mutations - and their entries carry the
    /// `sensitive_access` marker used by retention reporting.
    pub fn is_specially_tracked(&self) -> bool {
        matches!(self, Classification::Phi | Classification::Cfr2)
    }

    /// All classifications, in ascending sensitivity order.
    pub fn all() -> [Classification; 5] {
        [
            Classification::Public,
            Classification::Confidential,
            Classification::Restricted,
            Classification::Phi,
            Classification::Cfr2,
        ]
    }

    /// Human-readable description of this classification.
    pub fn description(&self) -> &'static str {
        match self {
            Classification::Public => "Public - releasable records",
            Classification::Confidential => "Confidential - standard complaint material",
            Classification::Restricted => "Restricted - need-to-know investigation material",
            Classification::Phi => "PHI - protected health information (HIPAA)",
            Classification::Cfr2 => "CFR2 - substance-use-disorder records (42 CFR Part 2)",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Public => write!(f, "PUBLIC"),
            Classification::Confidential => write!(f, "CONFIDENTIAL"),
            Classification::Restricted => write!(f, "RESTRICTED"),
            Classification::Phi => write!(f, "PHI"),
            Classification::Cfr2 => write!(f, "CFR2"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
