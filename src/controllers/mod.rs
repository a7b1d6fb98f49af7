pub mod batch;
pub mod health;
pub mod voices;
