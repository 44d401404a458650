//! Infrastructure configuration modules.

pub mod cutover;
pub mod feed;
pub mod location;
pub mod logging;
pub mod settings;
pub mod validation;
