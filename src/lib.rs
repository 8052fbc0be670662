pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod hosting;
pub mod manifest;
pub mod package;
pub mod prerequisites;
pub mod process;
pub mod ui;

pub use error::{PublishError, Result};
