pub mod cars;
pub mod health;
pub mod metrics;
pub mod users;
