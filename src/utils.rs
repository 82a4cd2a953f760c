pub mod config;
pub mod domain_types;
pub mod errors;
pub mod writer_utils;
