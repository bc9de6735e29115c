pub mod directory;
pub mod health;
pub mod metrics;
pub mod swagger;
