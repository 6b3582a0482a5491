// src/infra/mod.rs — Infrastructure: config, errors, logging, paths

pub mod config;
pub mod errors;
pub mod logger;
pub mod paths;
