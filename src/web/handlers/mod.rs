//! # Web API Request Handlers

pub mod checks;
pub mod health;
