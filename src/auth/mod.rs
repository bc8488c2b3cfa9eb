//! # Auth Module
//!
//! This module handles authentication for the API:
//! - Google ID token login
//! - JWT token generation and validation
//! - AuthedUser extractor for protected routes
//!
//! New users receive a sequential numeric id from the `userId` sequence.

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;


pub use routes::auth_routes;
