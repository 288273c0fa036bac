//! HTTP handlers

pub mod auth;
pub mod health;
pub mod organizations;
pub mod tenants;
pub mod users;
