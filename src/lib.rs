//! Desktop client for queueing images into a photo gallery and following
//! each one until the server has stored it.

pub mod app;
pub mod backup;
pub mod config;
pub mod thumb;
pub mod upload;
pub mod utils;
