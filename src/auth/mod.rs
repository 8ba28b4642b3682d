//! Password hashing, bearer tokens, and the gate that guards the resource routes.

mod error;
mod log_in;
mod middleware;
mod password;
mod register_user;
mod token;
mod user;

pub use error::AuthError;
pub use log_in::{AuthResponse, post_log_in};
pub use middleware::{AuthRejection, AuthState, AuthenticatedUser, auth_guard};
pub use password::PasswordHash;
pub use register_user::register_user;
pub use token::{Claims, DEFAULT_TOKEN_LIFETIME, TokenService};
pub use user::{
    User, UserID, UserProfile, create_user, create_user_table, get_profile, get_user_by_email,
    update_password,
};
