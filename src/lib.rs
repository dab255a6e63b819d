//! checkoff - Task and Checklist Library
//!
//! This library provides the core functionality for the checkoff CLI tool:
//! tasks and lists whose completion can delete them or reset them later.
//!
//! # Core Concepts
//!
//! - **Tasks**: A title and a completion flag, optionally inside one list
//! - **Lists**: Groups of tasks; a list is complete iff it has tasks and all are completed
//! - **Completion Policy**: Delete on complete, or reset on complete after an interval
//! - **Lazy Sweeping**: Scheduled resets are applied on the next read, not by a timer
//!
//! # Module Organization
//!
//! - `model`: Records, ids, intervals, patches and mutation outcomes
//! - `policy`: Validation and completion side effects
//! - `aggregate`: List completion derived from members
//! - `sweep`: Applying due resets
//! - `store`: Record store trait with in-memory and file-backed stores
//! - `checklist`: The façade every caller goes through
//! - `clock`: Injectable time source
//! - `config`: Configuration loading from `config.toml`
//! - `cli`: Command-line interface using clap
//! - `output`: JSON envelope and human output for the CLI
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes for the store file

pub mod aggregate;
pub mod checklist;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod lock;
pub mod model;
pub mod output;
pub mod policy;
pub mod store;
pub mod sweep;

pub use checklist::{Checklist, Overview};
pub use error::{Error, Result};
