pub mod common;
pub mod config;
pub mod domain;
pub mod logging;
pub mod policy;
pub mod reviews;
pub mod storage;
pub mod validation;

pub use domain::*;
