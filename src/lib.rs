// src/lib.rs

pub mod config;
pub mod fallback;
pub mod fetch;
pub mod records;
pub mod render;
pub mod scholar;
pub mod site;
pub mod tabular;
