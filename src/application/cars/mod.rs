//! Car management: license-plate uniqueness and single-car persistence

pub mod service;

pub use service::{save_car, CarService};
