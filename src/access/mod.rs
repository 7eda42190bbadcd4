// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Role- and classification-based access control.

pub mod classification;
pub mod evaluator;
pub mod matrix;
pub mod role;

pub use classification::Classification;
pub use evaluator::{AccessContext, AccessEvaluator, Decision, DenyReason};
pub use matrix::{PermissionMatrix, PermissionMatrixBuilder};
pub use role::{Action, ResourceKind, Role};
