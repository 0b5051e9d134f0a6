//! Command implementations

pub mod install;
pub mod render_unit;
pub mod status;
pub mod version;
