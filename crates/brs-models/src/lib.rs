//! # BRS Models
//!
//! Domain models and DTOs for the BRS identity service.
//!
//! # Modules
//!
//! - [`ids`]: Typed ids for every table
//! - [`roles`]: The fixed role catalog, role sets and admin departments
//! - [`users`]: User accounts and admin DTOs
//! - [`org`]: Institutes, divisions, departments, education departments
//! - [`reference`]: Academic degree and title catalogs, user aliases
//! - [`profiles`]: Per-role profile rows and their role predicates
//! - [`tracking`]: Grade-tracking rows moved on group transfer
//! - [`auth`]: Token issuance DTOs
//! - [`telegram`]: Telegram link flow DTOs
//!
//! # Example
//!
//! ```ignore
//! use brs_models::profiles::{ProfilePlan, ProfileVariant};
//! use brs_models::roles::{RoleKind, RoleSet};
//!
//! let roles = RoleSet::new([RoleKind::Teacher]);
//! let plan = ProfilePlan::for_roles(&roles);
//! assert_eq!(plan.ensure, vec![ProfileVariant::UserProfile]);
//! ```

pub mod auth;
pub mod ids;
pub mod org;
pub mod profiles;
pub mod reference;
pub mod roles;
pub mod telegram;
pub mod tracking;
pub mod users;

pub use auth::{LoginRequest, MessageResponse, RefreshTokenRequest, TokenResponse};

pub use org::{
    CreateDepartmentDto, CreateDivisionDto, CreateEducationDepartmentDto, CreateInstituteDto,
    Department, Division, EducationDepartment, Institute, InstituteUnit, UpdateDepartmentDto,
    UpdateDivisionDto, UpdateEducationDepartmentDto, UpdateInstituteDto,
};

pub use profiles::{
    BrsAdminProfile, PaginatedProfilesResponse, ProfileFilterParams, ProfilePlan, ProfileStats,
    ProfileVariant, StudentProfile, UpdateBrsAdminProfileDto, UpdateStudentProfileDto,
    UpdateUserProfileDto, UserProfile, UserProfileResponse, UserProfileRow,
};

pub use reference::{
    AcademicDegree, AcademicTitle, CatalogEntryDto, SetAliasDto, UserAlias,
};

pub use roles::{AdminDepartment, Role, RoleKind, RoleSet};

pub use telegram::{TelegramCodeRequest, TelegramCodeResponse, TelegramConnectParams};

pub use tracking::{GroupTransferSummary, needs_group_transfer};

pub use users::{
    CreateUserDto, PaginatedUsersResponse, ProfileFlags, RolesDto, UpdateUserDto, User,
    UserCredentials, UserFilterParams, UserSummary, UserWithRoles,
};
