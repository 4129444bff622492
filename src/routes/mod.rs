//! Operation Tier Index
//!
//! The operation table is split by access tier so that the admission rule for
//! every operation is visible in one place per tier:
//!
//! - `public`: no credential needed.
//! - `authenticated`: any verified identity.
//! - `admin`: verified identity with the `admin` role.

pub mod admin;
pub mod authenticated;
pub mod public;

use crate::operations::OperationDescriptor;

/// Every operation the API exposes, across all tiers.
pub fn operation_table() -> Vec<OperationDescriptor> {
    let mut table = public::public_operations();
    table.extend(authenticated::authenticated_operations());
    table.extend(admin::admin_operations());
    table
}
