//! Repository implementations backed by sqlx.

pub mod staff;

pub use staff::{SqlxStaffRepository, StaffRepository};
