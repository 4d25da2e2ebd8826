// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for mutations of a principal's own record.
//!
//! Checks run before the store is touched, so a denied request has no side
//! effect.

use uuid::Uuid;

use super::{AuthContext, AuthError};

/// The authenticated principal must be the targeted resource.
///
/// # Errors
/// Returns `AuthError::OwnershipDenied` on any mismatch.
pub fn check_ownership(ctx: &AuthContext, resource_id: Uuid) -> Result<(), AuthError> {
    if ctx.principal == resource_id {
        Ok(())
    } else {
        tracing::debug!(
            principal = %ctx.principal,
            resource = %resource_id,
            "Ownership check failed"
        );
        Err(AuthError::OwnershipDenied)
    }
}
