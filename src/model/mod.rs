pub mod backend;
pub mod classifiers;
pub mod config;
pub mod labels;
pub mod metrics;
