//! Staff identity domain model.
//!
//! A [`Staff`] record never carries its password hash; the hash only travels
//! between the credential store and the hashing module as a plain string on
//! [`NewStaff`] and [`StaffChanges`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

use crate::domain::{LeaveId, ShiftId, StaffId};

/// Error returned when one of the staff enumerations fails to parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct EnumParseError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = EnumParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(EnumParseError { kind: $kind, value: other.to_string() }),
                }
            }
        }
    };
}

text_enum!(
    /// Fixed set of staff roles.
    StaffRole, "staff role", {
        Doctor => "doctor",
        Nurse => "nurse",
        Admin => "admin",
        Receptionist => "receptionist",
    }
);

text_enum!(
    /// Employment status. Any value may follow any other.
    StaffStatus, "staff status", {
        Active => "active",
        Inactive => "inactive",
        OnLeave => "on_leave",
    }
);

text_enum!(
    ShiftStatus, "shift status", {
        Scheduled => "scheduled",
        Completed => "completed",
        Absent => "absent",
    }
);

text_enum!(
    LeaveStatus, "leave status", {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
);

impl Default for StaffStatus {
    fn default() -> Self {
        StaffStatus::Active
    }
}

impl Default for ShiftStatus {
    fn default() -> Self {
        ShiftStatus::Scheduled
    }
}

impl Default for LeaveStatus {
    fn default() -> Self {
        LeaveStatus::Pending
    }
}

/// A scheduled work shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: ShiftId,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: ShiftStatus,
}

/// A leave request covering an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: LeaveId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
}

/// Stored representation of a staff member, without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: StaffId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: StaffRole,
    pub department: String,
    pub specialization: Option<String>,
    pub contact_number: String,
    pub status: StaffStatus,
    pub shifts: Vec<Shift>,
    pub leaves: Vec<LeaveRequest>,
    pub created_at: DateTime<Utc>,
}

impl Staff {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Normalize email to lowercase for consistent storage and comparison.
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

/// Insert payload for the credential store. `password_hash` is already derived.
#[derive(Debug, Clone)]
pub struct NewStaff {
    pub id: StaffId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: StaffRole,
    pub department: String,
    pub specialization: Option<String>,
    pub contact_number: String,
    pub status: StaffStatus,
}

/// Allow-listed field changes for an existing staff member.
///
/// `None` leaves the stored value untouched. `password_hash` must be freshly
/// derived by the caller whenever a new password was supplied.
#[derive(Debug, Clone, Default)]
pub struct StaffChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<StaffRole>,
    pub department: Option<String>,
    /// `Some(None)` clears the stored value.
    pub specialization: Option<Option<String>>,
    pub contact_number: Option<String>,
    pub status: Option<StaffStatus>,
}

impl StaffChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.role.is_none()
            && self.department.is_none()
            && self.specialization.is_none()
            && self.contact_number.is_none()
            && self.status.is_none()
    }
}

/// Doctors must name a specialization; every other role may omit it.
pub fn specialization_satisfied(role: StaffRole, specialization: Option<&str>) -> bool {
    match role {
        StaffRole::Doctor => specialization.map(|s| !s.trim().is_empty()).unwrap_or(false),
        _ => true,
    }
}

/// Accept either a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp
/// (browsers send `Date#toISOString()` output) and keep the calendar date.
pub fn deserialize_flexible_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flexible_date(&raw).map_err(serde::de::Error::custom)
}

pub fn parse_flexible_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| format!("invalid date '{}', expected YYYY-MM-DD", raw))
}
