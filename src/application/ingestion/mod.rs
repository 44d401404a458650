//! Live feed control.

mod controller;

pub use controller::IngestionController;
