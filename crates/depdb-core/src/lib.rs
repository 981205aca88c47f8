#![forbid(unsafe_code)]
//! depdb-core library.
//!
//! Builds a database of frameworks (modules) from the per-framework
//! dependency graphs CMake writes with `--graphviz`, and answers questions
//! spanning frameworks: who owns a target, which dependencies are external,
//! and which frameworks a given framework needs.
//!
//! ## Pipeline
//!
//! ```text
//! <tier>/<framework>/<framework>.dot
//!        ↓  dot::DotGraph::read()
//! DotGraph (generated node ids)
//!        ↓  normalize::Normalizer::normalize() + write_scratch()
//! NormalizedGraph (one node per label, aliases folded)
//!        ↓  parser::FrameworkParser::ingest() + extras::apply_companion()
//! Framework
//!        ↓  db::FrameworkDatabase
//! external targets, owner lookup, remove_unused_frameworks()
//! ```
//!
//! # Conventions
//!
//! - **Errors**: library functions return [`Result`] with [`Error`].
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod db;
pub mod dot;
pub mod error;
pub mod extras;
pub mod filter;
pub mod framework;
pub mod normalize;
pub mod parser;
pub mod shape;

pub use config::DepDbConfig;
pub use db::FrameworkDatabase;
pub use error::{Error, ErrorCode, Result};
pub use framework::Framework;
pub use normalize::{NormalizedGraph, Normalizer};
pub use shape::Shape;
