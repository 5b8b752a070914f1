pub mod app;
pub mod assemble;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;
pub mod output;
pub mod store;
pub mod tsv;
