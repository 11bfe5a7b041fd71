//! Core library: file categories, MIME rules, the classification pipeline,
//! batch re-tagging, and browsing.

pub mod browse;
pub mod classifier;
pub mod config;
pub mod files;
pub mod mime;
pub mod models;
pub mod objectstore;
pub mod pipeline;
pub mod prompts;
pub mod retag;
pub mod rules;
pub mod store;
