//! Business logic services
//!
//! Service layer components that encapsulate business logic, separated from
//! HTTP concerns.

pub mod staff_directory;

pub use staff_directory::StaffDirectory;
