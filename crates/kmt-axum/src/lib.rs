#![doc = include_str!("../README.md")]

mod application;
mod middleware;
mod request;
mod response;

pub use application::Cluster;
pub use request::{HeaderMapExt, new_cookie};
pub use response::Rejection;

/// A specialized `Result` type.
pub type Result<T = axum::response::Response> = std::result::Result<T, Rejection>;
