//! HTTP entry points of the sign-in flow
//!
//! All routes live under `/api/auth`, which the gate classifies as public.

pub mod handlers;
pub mod routes;

pub use handlers::UserInfo;
pub use routes::routes;
