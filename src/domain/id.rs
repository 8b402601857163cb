//! Domain ID types with the newtype pattern.
//!
//! Each ID is a UUID string wrapper so staff ids cannot be mixed up with the
//! ids of their shift and leave entries. The wrappers encode to and decode
//! from SQLite TEXT columns directly.

use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::{Decode, Encode, Sqlite, Type};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

macro_rules! domain_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Wrap an existing string (database rows, path parameters)
            pub fn from_string(s: String) -> Self {
                Self(s)
            }

            pub fn from_str_unchecked(s: &str) -> Self {
                Self(s.to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Parse and validate a UUID string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Uuid::parse_str(s)?;
                Ok(Self(s.to_string()))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Type<Sqlite> for $name {
            fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
                <String as Type<Sqlite>>::type_info()
            }
        }

        impl<'q> Encode<'q, Sqlite> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
            ) -> Result<IsNull, BoxDynError> {
                <String as Encode<'q, Sqlite>>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> Decode<'r, Sqlite> for $name {
            fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
                let s = <String as Decode<'r, Sqlite>>::decode(value)?;
                Ok(Self(s))
            }
        }
    };
}

domain_id!(
    /// Unique identifier for a staff member
    StaffId
);

domain_id!(
    /// Unique identifier for a scheduled shift
    ShiftId
);

domain_id!(
    /// Unique identifier for a leave request
    LeaveId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_id_is_a_uuid() {
        let id = StaffId::new();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn staff_id_rejects_non_uuid() {
        assert!(StaffId::parse("507f1f77bcf86cd799439011").is_err());
        assert!("not-a-uuid".parse::<ShiftId>().is_err());
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = LeaveId::from_str_unchecked("6f1c2a52-3d8e-4f4e-9a2b-1c2d3e4f5a6b");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"6f1c2a52-3d8e-4f4e-9a2b-1c2d3e4f5a6b\"");
        let back: LeaveId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
