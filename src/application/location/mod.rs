//! Location classification service.

mod classifier;

pub use classifier::LocationClassifier;
