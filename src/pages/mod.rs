pub mod entity;
pub mod hierarchy;
pub mod home;
pub mod not_found;
