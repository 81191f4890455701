pub mod aliases;
pub mod auth;
pub mod brs_admins;
pub mod catalogs;
pub mod org;
pub mod profiles;
pub mod roles;
pub mod students;
pub mod telegram;
pub mod users;
