use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use brs_core::{PaginationMeta, PaginationParams};
use brs_models::auth::{LoginRequest, MessageResponse, RefreshTokenRequest, TokenResponse};
use brs_models::org::{
    CreateDepartmentDto, CreateDivisionDto, CreateEducationDepartmentDto, CreateInstituteDto,
    Department, Division, EducationDepartment, Institute, InstituteUnit, UpdateDepartmentDto,
    UpdateDivisionDto, UpdateEducationDepartmentDto, UpdateInstituteDto,
};
use brs_models::profiles::{
    BrsAdminProfile, PaginatedProfilesResponse, ProfileStats, StudentProfile,
    UpdateBrsAdminProfileDto, UpdateStudentProfileDto, UpdateUserProfileDto, UserProfileResponse,
};
use brs_models::reference::{AcademicDegree, AcademicTitle, CatalogEntryDto, SetAliasDto, UserAlias};
use brs_models::roles::{AdminDepartment, Role, RoleKind};
use brs_models::telegram::{TelegramCodeRequest, TelegramCodeResponse};
use brs_models::users::{
    CreateUserDto, PaginatedUsersResponse, ProfileFlags, RolesDto, UpdateUserDto, User,
    UserSummary, UserWithRoles,
};

use crate::middleware::api_key::API_KEY_HEADER;
use crate::modules::auth::controller::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::obtain_token,
        crate::modules::auth::controller::refresh_token,
        crate::modules::org::controller::get_institutes,
        crate::modules::org::controller::get_institute,
        crate::modules::org::controller::get_institute_departments,
        crate::modules::org::controller::get_institute_education_departments,
        crate::modules::org::controller::get_department_users,
        crate::modules::profiles::controller::get_own_profile,
        crate::modules::profiles::controller::update_own_profile,
        crate::modules::profiles::controller::get_profiles,
        crate::modules::profiles::controller::get_user_profile,
        crate::modules::profiles::controller::get_profile_stats,
        crate::modules::roles::controller::get_own_roles,
        crate::modules::telegram::controller::telegram_connect,
        crate::modules::telegram::controller::issue_telegram_code,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::replace_user_roles,
        crate::modules::users::controller::add_user_roles,
        crate::modules::users::controller::clear_user_roles,
        crate::modules::users::controller::remove_user_role,
        crate::modules::roles::controller::get_role_catalog,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::brs_admins::controller::get_brs_admin,
        crate::modules::brs_admins::controller::update_brs_admin,
        crate::modules::org::controller::get_divisions,
        crate::modules::org::controller::create_institute,
        crate::modules::org::controller::update_institute,
        crate::modules::org::controller::delete_institute,
        crate::modules::org::controller::create_division,
        crate::modules::org::controller::update_division,
        crate::modules::org::controller::delete_division,
        crate::modules::org::controller::create_department,
        crate::modules::org::controller::update_department,
        crate::modules::org::controller::delete_department,
        crate::modules::org::controller::create_education_department,
        crate::modules::org::controller::update_education_department,
        crate::modules::org::controller::delete_education_department,
        crate::modules::catalogs::controller::get_academic_degrees,
        crate::modules::catalogs::controller::create_academic_degree,
        crate::modules::catalogs::controller::update_academic_degree,
        crate::modules::catalogs::controller::delete_academic_degree,
        crate::modules::catalogs::controller::get_academic_titles,
        crate::modules::catalogs::controller::create_academic_title,
        crate::modules::catalogs::controller::update_academic_title,
        crate::modules::catalogs::controller::delete_academic_title,
        crate::modules::aliases::controller::get_aliases,
        crate::modules::aliases::controller::get_user_alias,
        crate::modules::aliases::controller::set_user_alias,
        crate::modules::aliases::controller::delete_user_alias,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            LoginRequest,
            RefreshTokenRequest,
            TokenResponse,
            RoleKind,
            Role,
            AdminDepartment,
            User,
            UserWithRoles,
            UserSummary,
            ProfileFlags,
            CreateUserDto,
            UpdateUserDto,
            RolesDto,
            PaginatedUsersResponse,
            Institute,
            InstituteUnit,
            Division,
            Department,
            EducationDepartment,
            CreateInstituteDto,
            UpdateInstituteDto,
            CreateDivisionDto,
            UpdateDivisionDto,
            CreateDepartmentDto,
            UpdateDepartmentDto,
            CreateEducationDepartmentDto,
            UpdateEducationDepartmentDto,
            UserProfileResponse,
            UpdateUserProfileDto,
            PaginatedProfilesResponse,
            ProfileStats,
            StudentProfile,
            UpdateStudentProfileDto,
            BrsAdminProfile,
            UpdateBrsAdminProfileDto,
            TelegramCodeRequest,
            TelegramCodeResponse,
            AcademicDegree,
            AcademicTitle,
            CatalogEntryDto,
            UserAlias,
            SetAliasDto,
            PaginationMeta,
            PaginationParams,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Token issuance and refresh"),
        (name = "Institutes", description = "Institutes and their departments"),
        (name = "Departments", description = "Department staff listings"),
        (name = "Profiles", description = "Employee and teacher profiles"),
        (name = "Roles", description = "Role names of the requester"),
        (name = "Telegram", description = "Telegram account linking"),
        (name = "Admin: Users", description = "User and role administration"),
        (name = "Admin: Profiles", description = "Student and BRS admin profile administration"),
        (name = "Admin: Organization", description = "Institutes, divisions and departments administration"),
        (name = "Admin: Reference data", description = "Academic degree and title catalogs")
    ),
    info(
        title = "BRS Identity API",
        version = "0.1.0",
        description = "Users, roles, profiles and the organizational tree of the BRS grading system.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(API_KEY_HEADER))),
            );
        }
    }
}
