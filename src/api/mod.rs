pub mod coverage;
pub mod error;
pub mod health;
pub mod openapi;
