//! The fixed role catalog and admin departments.
//!
//! Role rows are seeded by migration and never change; the numeric ids are
//! part of the stored data and must stay stable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    sqlx::Type,
)]
#[repr(i16)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    Employee = 1,
    Admin = 2,
    Finance = 3,
    Super = 4,
    Teacher = 5,
    Student = 6,
    BrsAdmin = 7,
    Deccan = 8,
}

impl RoleKind {
    pub const ALL: [RoleKind; 8] = [
        RoleKind::Employee,
        RoleKind::Admin,
        RoleKind::Finance,
        RoleKind::Super,
        RoleKind::Teacher,
        RoleKind::Student,
        RoleKind::BrsAdmin,
        RoleKind::Deccan,
    ];

    pub const fn id(self) -> i16 {
        self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.id() == id)
    }

    pub const fn name(self) -> &'static str {
        match self {
            RoleKind::Employee => "employee",
            RoleKind::Admin => "admin",
            RoleKind::Finance => "finance",
            RoleKind::Super => "super",
            RoleKind::Teacher => "teacher",
            RoleKind::Student => "student",
            RoleKind::BrsAdmin => "brs_admin",
            RoleKind::Deccan => "deccan",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.name() == s)
            .ok_or_else(|| format!("{:?} is not a valid role", s))
    }
}

/// A role row as exposed by the catalog endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Role {
    pub id: i16,
    pub name: RoleKind,
}

impl From<RoleKind> for Role {
    fn from(kind: RoleKind) -> Self {
        Self {
            id: kind.id(),
            name: kind,
        }
    }
}

/// Administrative department a staff member belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
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
pub enum AdminDepartment {
    Dumr = 1,
    Unir = 2,
    Uvr = 3,
    Ok = 4,
    Su = 5,
    Cdeo = 6,
}

impl AdminDepartment {
    pub const fn code(self) -> i16 {
        self as i16
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(AdminDepartment::Dumr),
            2 => Some(AdminDepartment::Unir),
            3 => Some(AdminDepartment::Uvr),
            4 => Some(AdminDepartment::Ok),
            5 => Some(AdminDepartment::Su),
            6 => Some(AdminDepartment::Cdeo),
            _ => None,
        }
    }
}

/// Extra marker appended to the role list of DUMR staff.
pub const DUMR_MARKER: &str = "dumr";

/// The set of roles a user currently holds, ordered by role id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet(BTreeSet<RoleKind>);

impl RoleSet {
    pub fn new<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = RoleKind>,
    {
        Self(roles.into_iter().collect())
    }

    /// Builds a set from role names, ignoring anything that is not a role
    /// (such as the `dumr` marker).
    pub fn from_names<S>(names: &[S]) -> Self
    where
        S: AsRef<str>,
    {
        Self::new(names.iter().filter_map(|n| n.as_ref().parse().ok()))
    }

    pub fn contains(&self, role: RoleKind) -> bool {
        self.0.contains(&role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = RoleKind> + '_ {
        self.0.iter().copied()
    }

    pub fn is_employee(&self) -> bool {
        self.contains(RoleKind::Employee)
    }

    pub fn is_admin(&self) -> bool {
        self.contains(RoleKind::Admin)
    }

    pub fn is_finance(&self) -> bool {
        self.contains(RoleKind::Finance)
    }

    pub fn is_super(&self) -> bool {
        self.contains(RoleKind::Super)
    }

    pub fn is_teacher(&self) -> bool {
        self.contains(RoleKind::Teacher)
    }

    pub fn is_student(&self) -> bool {
        self.contains(RoleKind::Student)
    }

    pub fn is_brs_admin(&self) -> bool {
        self.contains(RoleKind::BrsAdmin)
    }

    pub fn is_deccan(&self) -> bool {
        self.contains(RoleKind::Deccan)
    }

    pub fn to_vec(&self) -> Vec<RoleKind> {
        self.iter().collect()
    }

    /// Role names as reported to clients: every role name, plus `dumr` for
    /// members of that admin department.
    pub fn display_names(&self, admin_dep: Option<AdminDepartment>) -> Vec<String> {
        let mut names: Vec<String> = self.iter().map(|r| r.name().to_string()).collect();
        if admin_dep == Some(AdminDepartment::Dumr) {
            names.push(DUMR_MARKER.to_string());
        }
        names
    }
}

impl FromIterator<RoleKind> for RoleSet {
    fn from_iter<T: IntoIterator<Item = RoleKind>>(iter: T) -> Self {
        Self::new(iter)
    }
}
