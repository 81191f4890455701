//! Per-role profile records.
//!
//! A user owns at most one row of each [`ProfileVariant`], and owns it
//! exactly when its role set satisfies the variant's predicate. The
//! predicates live here; the synchronisation itself runs in the server's
//! profile sync service.

use crate::ids::{DepartmentId, DivisionId, EducationDepartmentId, GroupId, InstituteId, UserId};
use crate::org::{Department, EducationDepartment};
use crate::roles::RoleSet;
use crate::users::full_name;
use brs_core::serde::{deserialize_nullable, deserialize_optional_i64, deserialize_optional_string};
use brs_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProfileVariant {
    UserProfile,
    StudentProfile,
    BrsAdminProfile,
}

impl ProfileVariant {
    pub const ALL: [ProfileVariant; 3] = [
        ProfileVariant::UserProfile,
        ProfileVariant::StudentProfile,
        ProfileVariant::BrsAdminProfile,
    ];

    pub const fn table_name(self) -> &'static str {
        match self {
            ProfileVariant::UserProfile => "user_profiles",
            ProfileVariant::StudentProfile => "student_profiles",
            ProfileVariant::BrsAdminProfile => "brs_admin_profiles",
        }
    }

    /// Whether a user holding `roles` must own a row of this variant.
    pub fn is_required_by(self, roles: &RoleSet) -> bool {
        match self {
            ProfileVariant::UserProfile => roles.is_employee() || roles.is_teacher(),
            ProfileVariant::StudentProfile => roles.is_student(),
            ProfileVariant::BrsAdminProfile => roles.is_brs_admin() || roles.is_deccan(),
        }
    }
}

/// Partition of the profile variants for one role set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePlan {
    pub ensure: Vec<ProfileVariant>,
    pub remove: Vec<ProfileVariant>,
}

impl ProfilePlan {
    pub fn for_roles(roles: &RoleSet) -> Self {
        let (ensure, remove) = ProfileVariant::ALL
            .into_iter()
            .partition(|variant| variant.is_required_by(roles));
        Self { ensure, remove }
    }
}

/// The employee/teacher profile row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct UserProfile {
    pub id: i64,
    pub user_id: UserId,
    pub division_id: Option<DivisionId>,
    pub work_department_id: Option<DepartmentId>,
    pub institute_id: Option<InstituteId>,
    pub education_department_id: Option<EducationDepartmentId>,
    pub photo: Option<String>,
    pub position: Option<String>,
    pub academic_degree: Option<String>,
    pub academic_title: Option<String>,
    pub short_bio: Option<String>,
    pub awards_achievements: Option<String>,
    pub professional_development: Option<String>,
    pub work_experience: Option<String>,
}

/// A [`UserProfile`] joined with its owner's name and the departments it
/// references. Department columns are prefixed `wd_` (work department) and
/// `ed_` (education department).
#[derive(Debug, Clone, FromRow)]
pub struct UserProfileRow {
    pub id: i64,
    pub user_id: UserId,
    pub middle_name: String,
    pub first_name: String,
    pub last_name: String,
    pub institute_id: Option<InstituteId>,
    pub photo: Option<String>,
    pub position: Option<String>,
    pub academic_degree: Option<String>,
    pub academic_title: Option<String>,
    pub short_bio: Option<String>,
    pub awards_achievements: Option<String>,
    pub professional_development: Option<String>,
    pub work_experience: Option<String>,
    pub wd_id: Option<DepartmentId>,
    pub wd_name: Option<String>,
    pub wd_institute_id: Option<InstituteId>,
    pub wd_division_id: Option<DivisionId>,
    pub wd_allow_application: Option<bool>,
    pub ed_id: Option<EducationDepartmentId>,
    pub ed_name: Option<String>,
    pub ed_institute_id: Option<InstituteId>,
}

impl UserProfileRow {
    /// Builds the API representation. `photo_url` turns the stored photo
    /// path into an absolute URL.
    pub fn into_response<F>(self, photo_url: F) -> UserProfileResponse
    where
        F: Fn(&str) -> String,
    {
        let work_department = match (self.wd_id, self.wd_name) {
            (Some(id), Some(name)) => Some(Department {
                id,
                name,
                institute_id: self.wd_institute_id,
                division_id: self.wd_division_id,
                allow_application: self.wd_allow_application.unwrap_or(false),
            }),
            _ => None,
        };
        let education_department = match (self.ed_id, self.ed_name) {
            (Some(id), Some(name)) => Some(EducationDepartment {
                id,
                name,
                institute_id: self.ed_institute_id,
            }),
            _ => None,
        };

        UserProfileResponse {
            id: self.id,
            user: self.user_id,
            fullname: full_name(&self.middle_name, &self.first_name, &self.last_name),
            institute: self.institute_id,
            work_department,
            education_department,
            position: self.position,
            academic_degree: self.academic_degree,
            academic_title: self.academic_title,
            short_bio: self.short_bio,
            awards_achievements: self.awards_achievements,
            professional_development: self.professional_development,
            work_experience: self.work_experience,
            photo: self
                .photo
                .filter(|path| !path.is_empty())
                .map(|path| photo_url(&path)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfileResponse {
    pub id: i64,
    pub user: UserId,
    pub fullname: String,
    pub institute: Option<InstituteId>,
    pub work_department: Option<Department>,
    pub education_department: Option<EducationDepartment>,
    pub position: Option<String>,
    pub academic_degree: Option<String>,
    pub academic_title: Option<String>,
    pub short_bio: Option<String>,
    pub awards_achievements: Option<String>,
    pub professional_development: Option<String>,
    pub work_experience: Option<String>,
    /// Absolute https URL of the photo
    pub photo: Option<String>,
}

/// Partial update of the requester's own profile. Omitted fields keep their
/// value, `null` clears them.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserProfileDto {
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i64>)]
    pub institute: Option<Option<InstituteId>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i64>)]
    pub work_department: Option<Option<DepartmentId>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i64>)]
    pub education_department: Option<Option<EducationDepartmentId>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    pub position: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    pub academic_degree: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    pub academic_title: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    pub short_bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    pub awards_achievements: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    pub professional_development: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<String>)]
    pub work_experience: Option<Option<String>>,
}

impl UpdateUserProfileDto {
    /// Length limits of the bounded text columns.
    pub fn check_lengths(&self) -> Result<(), String> {
        let bounded = [
            ("position", &self.position, 255),
            ("academic_degree", &self.academic_degree, 250),
            ("academic_title", &self.academic_title, 250),
        ];
        for (field, value, max) in bounded {
            if let Some(Some(text)) = value
                && text.chars().count() > max
            {
                return Err(format!("{} must be at most {} characters", field, max));
            }
        }
        Ok(())
    }
}

/// Profile completeness counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProfileStats {
    pub users_count: i64,
    pub empty_any: i64,
    pub empty_academic_degree: i64,
    pub empty_academic_title: i64,
    pub empty_short_bio: i64,
    pub empty_awards_achievements: i64,
    pub empty_professional_development: i64,
    pub empty_work_experience: i64,
}

/// Query parameters for the profile listing.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProfileFilterParams {
    /// Institute of the profile's education department
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub institute: Option<i64>,
    /// Education department id
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub department: Option<i64>,
    /// Case-insensitive substring of the full name
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl ProfileFilterParams {
    /// The institute filter only applies when no department is given.
    pub fn institute_filter(&self) -> Option<InstituteId> {
        match self.department {
            Some(_) => None,
            None => self.institute.map(InstituteId::new),
        }
    }

    pub fn department_filter(&self) -> Option<EducationDepartmentId> {
        self.department.map(EducationDepartmentId::new)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedProfilesResponse {
    pub data: Vec<UserProfileResponse>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentProfile {
    pub id: i64,
    #[serde(rename = "user")]
    pub user_id: UserId,
    pub number_id: String,
    #[serde(rename = "group")]
    pub group_id: Option<GroupId>,
    pub allowed: Option<bool>,
    pub distance_education: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentProfileDto {
    #[validate(length(max = 150))]
    pub number_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i64>)]
    pub group_id: Option<Option<GroupId>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<bool>)]
    pub allowed: Option<Option<bool>>,
    pub distance_education: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BrsAdminProfile {
    pub id: i64,
    #[serde(rename = "user")]
    pub user_id: UserId,
    #[serde(rename = "institute")]
    pub institute_id: Option<InstituteId>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateBrsAdminProfileDto {
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i64>)]
    pub institute_id: Option<Option<InstituteId>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::RoleKind;

    fn roles(list: &[RoleKind]) -> RoleSet {
        RoleSet::new(list.iter().copied())
    }

    #[test]
    fn test_user_profile_predicate() {
        let v = ProfileVariant::UserProfile;
        assert!(v.is_required_by(&roles(&[RoleKind::Employee])));
        assert!(v.is_required_by(&roles(&[RoleKind::Teacher])));
        assert!(!v.is_required_by(&roles(&[RoleKind::Admin])));
        assert!(!v.is_required_by(&roles(&[])));
    }

    #[test]
    fn test_student_profile_predicate() {
        let v = ProfileVariant::StudentProfile;
        assert!(v.is_required_by(&roles(&[RoleKind::Student])));
        assert!(!v.is_required_by(&roles(&[RoleKind::Teacher, RoleKind::Employee])));
    }

    #[test]
    fn test_brs_admin_profile_predicate() {
        let v = ProfileVariant::BrsAdminProfile;
        assert!(v.is_required_by(&roles(&[RoleKind::BrsAdmin])));
        assert!(v.is_required_by(&roles(&[RoleKind::Deccan])));
        assert!(!v.is_required_by(&roles(&[RoleKind::Super, RoleKind::Finance])));
    }

    #[test]
    fn test_plan_partitions_all_variants() {
        let plan = ProfilePlan::for_roles(&roles(&[RoleKind::Teacher, RoleKind::Deccan]));
        assert_eq!(
            plan.ensure,
            vec![ProfileVariant::UserProfile, ProfileVariant::BrsAdminProfile]
        );
        assert_eq!(plan.remove, vec![ProfileVariant::StudentProfile]);

        let empty = ProfilePlan::for_roles(&RoleSet::default());
        assert!(empty.ensure.is_empty());
        assert_eq!(empty.remove.len(), 3);
    }

    fn sample_row() -> UserProfileRow {
        UserProfileRow {
            id: 10,
            user_id: UserId::new(3),
            middle_name: "Sidorov".to_string(),
            first_name: "Petr".to_string(),
            last_name: "Ilyich".to_string(),
            institute_id: Some(InstituteId::new(1)),
            photo: Some("user_photo/p.jpg".to_string()),
            position: Some("Docent".to_string()),
            academic_degree: None,
            academic_title: None,
            short_bio: None,
            awards_achievements: None,
            professional_development: None,
            work_experience: None,
            wd_id: Some(DepartmentId::new(5)),
            wd_name: Some("HR".to_string()),
            wd_institute_id: None,
            wd_division_id: Some(DivisionId::new(2)),
            wd_allow_application: Some(true),
            ed_id: None,
            ed_name: None,
            ed_institute_id: None,
        }
    }

    #[test]
    fn test_row_into_response_nests_departments() {
        let response = sample_row().into_response(|p| format!("https://media.test/{}", p));
        assert_eq!(response.fullname, "Sidorov Petr Ilyich");
        assert_eq!(response.work_department.as_ref().map(|d| d.name.as_str()), Some("HR"));
        assert!(response.education_department.is_none());
        assert_eq!(
            response.photo.as_deref(),
            Some("https://media.test/user_photo/p.jpg")
        );
    }

    #[test]
    fn test_row_into_response_without_photo() {
        let mut row = sample_row();
        row.photo = Some(String::new());
        assert!(row.into_response(|p| p.to_string()).photo.is_none());
    }

    #[test]
    fn test_institute_filter_ignored_with_department() {
        let params = ProfileFilterParams {
            institute: Some(1),
            department: Some(4),
            ..Default::default()
        };
        assert_eq!(params.institute_filter(), None);
        assert_eq!(params.department_filter(), Some(EducationDepartmentId::new(4)));

        let params = ProfileFilterParams {
            institute: Some(1),
            ..Default::default()
        };
        assert_eq!(params.institute_filter(), Some(InstituteId::new(1)));
    }

    #[test]
    fn test_update_dto_lengths() {
        let dto = UpdateUserProfileDto {
            position: Some(Some("x".repeat(256))),
            ..Default::default()
        };
        assert!(dto.check_lengths().is_err());

        let dto = UpdateUserProfileDto {
            position: Some(None),
            academic_degree: Some(Some("PhD".to_string())),
            ..Default::default()
        };
        assert!(dto.check_lengths().is_ok());
    }
}
