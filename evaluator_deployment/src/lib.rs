pub mod artifacts;
pub mod backend;
pub mod config;
pub mod contracts;
pub mod deployment;
pub mod seed;
