//! API request handlers

pub mod admin;
pub mod occupation;
pub mod projects;
pub mod resources;
