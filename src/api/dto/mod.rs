//! Data Transfer Objects (DTOs) for API layer
//!
//! DTOs define the external JSON contract. They carry `validator` rules and
//! `utoipa` schemas, and convert to and from the domain types.

pub mod auth;
pub mod staff;

pub use auth::{LoginRequest, LoginResponse};
pub use staff::{
    CreateLeaveRequest, CreateShiftRequest, CreateStaffRequest, CreatedStaffResponse,
    MessageResponse, StaffResponse, UpdateStaffRequest,
};
