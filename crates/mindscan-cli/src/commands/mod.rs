//! Command handlers, one module per area.

pub mod accounts;
pub mod entries;
pub mod maintenance;
pub mod misc;
