//! Student and admin login, Argon2 password checks, and Redis-backed sessions.

pub mod handlers;
pub mod login;
pub mod password;
pub mod session;
