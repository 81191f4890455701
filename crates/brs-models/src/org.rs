//! Organizational tree: institutes, divisions, departments and education
//! departments.
//!
//! Foreign keys are exposed under the relation name (`institute`,
//! `division`) holding the referenced id.

use crate::ids::{DepartmentId, DivisionId, EducationDepartmentId, InstituteId};
use brs_core::serde::deserialize_nullable;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    sqlx::Type,
)]
#[repr(i16)]
#[serde(rename_all = "lowercase")]
pub enum InstituteUnit {
    #[default]
    Inst = 1,
    Admin = 2,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Institute {
    pub id: InstituteId,
    pub name: String,
    pub unit: InstituteUnit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Division {
    pub id: DivisionId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    #[serde(rename = "institute")]
    pub institute_id: Option<InstituteId>,
    #[serde(rename = "division")]
    pub division_id: Option<DivisionId>,
    pub allow_application: bool,
}

/// An academic chair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EducationDepartment {
    pub id: EducationDepartmentId,
    pub name: String,
    #[serde(rename = "institute")]
    pub institute_id: Option<InstituteId>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateInstituteDto {
    #[validate(length(min = 1, max = 250))]
    pub name: String,
    #[serde(default)]
    pub unit: InstituteUnit,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateInstituteDto {
    #[validate(length(min = 1, max = 250))]
    pub name: Option<String>,
    pub unit: Option<InstituteUnit>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateDivisionDto {
    #[validate(length(min = 1, max = 250))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateDivisionDto {
    #[validate(length(min = 1, max = 250))]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateDepartmentDto {
    #[validate(length(min = 1, max = 250))]
    pub name: String,
    pub institute_id: Option<InstituteId>,
    pub division_id: Option<DivisionId>,
    #[serde(default)]
    pub allow_application: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateDepartmentDto {
    #[validate(length(min = 1, max = 250))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i64>)]
    pub institute_id: Option<Option<InstituteId>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i64>)]
    pub division_id: Option<Option<DivisionId>>,
    pub allow_application: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateEducationDepartmentDto {
    #[validate(length(min = 1, max = 250))]
    pub name: String,
    pub institute_id: Option<InstituteId>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEducationDepartmentDto {
    #[validate(length(min = 1, max = 250))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i64>)]
    pub institute_id: Option<Option<InstituteId>>,
}
