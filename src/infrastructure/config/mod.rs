//! Infrastructure configuration modules.

pub mod auth;
pub mod logging;
pub mod settings;
pub mod storage;
