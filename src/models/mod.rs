pub mod inventory;
pub mod product;
pub mod rbac;
pub mod user;
