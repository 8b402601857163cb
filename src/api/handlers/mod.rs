//! HTTP request handlers organized by resource type

pub mod auth;
pub mod health;
pub mod staff;

pub use auth::login_handler;
pub use health::{api_test_handler, health_handler, patients_handler};
pub use staff::{
    append_leave_handler, append_shift_handler, create_staff_handler, delete_staff_handler,
    get_staff_handler, list_staff_handler, update_staff_handler,
};
