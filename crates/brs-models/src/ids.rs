//! Strongly-typed ID newtypes for domain entities.
//!
//! Every table uses a `BIGSERIAL` key. Wrapping it per entity keeps a
//! `DepartmentId` from being passed where an `EducationDepartmentId` is
//! expected, which is an easy mistake with two department tables.

use serde::{Deserialize, Serialize};
use sqlx::{
    Database, Decode, Encode, Type,
    postgres::{PgHasArrayType, PgTypeInfo},
};
use std::fmt;
use utoipa::ToSchema;

macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, ToSchema)]
        #[serde(transparent)]
        #[schema(value_type = i64)]
        pub struct $name(pub i64);

        impl $name {
            #[inline]
            pub const fn new(v: i64) -> Self {
                Self(v)
            }

            #[inline]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            #[inline]
            fn from(v: i64) -> Self {
                Self(v)
            }
        }

        impl From<$name> for i64 {
            #[inline]
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>().map(Self)
            }
        }

        impl Type<sqlx::Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <i64 as Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <i64 as Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <sqlx::Postgres as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <i64 as Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: <sqlx::Postgres as Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                <i64 as Decode<'r, sqlx::Postgres>>::decode(value).map(Self)
            }
        }

        impl PgHasArrayType for $name {
            fn array_type_info() -> PgTypeInfo {
                <i64 as PgHasArrayType>::array_type_info()
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                i64::deserialize(deserializer).map(Self)
            }
        }
    };
}

define_id!(
    /// Strongly-typed ID for users.
    UserId
);

define_id!(
    /// Strongly-typed ID for institutes.
    InstituteId
);

define_id!(
    /// Strongly-typed ID for divisions.
    DivisionId
);

define_id!(
    /// Strongly-typed ID for (work) departments.
    DepartmentId
);

define_id!(
    /// Strongly-typed ID for education departments (academic chairs).
    EducationDepartmentId
);

define_id!(
    /// Strongly-typed ID for academic groups.
    GroupId
);

define_id!(
    /// Strongly-typed ID for disciplines.
    DisciplineId
);

define_id!(
    /// Strongly-typed ID for academic degrees.
    AcademicDegreeId
);

define_id!(
    /// Strongly-typed ID for academic titles.
    AcademicTitleId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_debug() {
        let id = UserId::new(42);
        assert_eq!(format!("{}", id), "42");
        assert_eq!(format!("{:?}", id), "UserId(42)");
    }

    #[test]
    fn test_id_from_str() {
        let id: GroupId = "17".parse().unwrap();
        assert_eq!(id.into_inner(), 17);
        assert!("seventeen".parse::<GroupId>().is_err());
    }

    #[test]
    fn test_id_serializes_as_plain_number() {
        let id = InstituteId::new(3);
        assert_eq!(serde_json::to_string(&id).unwrap(), "3");
        let back: InstituteId = serde_json::from_str("3").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_ordering() {
        assert!(DepartmentId::new(1) < DepartmentId::new(2));
    }
}
