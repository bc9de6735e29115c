pub mod directory_service;
pub mod user_api;
#[cfg(test)]
pub mod fake_user_api;

pub use directory_service::*;
pub use user_api::*;
