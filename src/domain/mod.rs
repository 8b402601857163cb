//! Domain layer
//!
//! Staff identities and their shift/leave sub-records, independent of HTTP
//! and storage concerns.

pub mod id;
pub mod staff;

pub use id::{LeaveId, ShiftId, StaffId};
pub use staff::{
    EnumParseError, LeaveRequest, LeaveStatus, NewStaff, Shift, ShiftStatus, Staff, StaffChanges,
    StaffRole, StaffStatus,
};
