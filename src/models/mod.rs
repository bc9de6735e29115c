pub mod user;
pub mod directory_view;

pub use user::*;
pub use directory_view::*;
