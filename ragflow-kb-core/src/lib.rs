#![doc = "ragflow-kb-core: core logic library for ragflow-kb."]

//! This crate contains the data model, configuration layering, knowledge-base lookup,
//! document pagination and output rendering used by the `ragflow-kb` CLI.
//! Network transport lives in the CLI crate behind the [`contract::KnowledgeBaseApi`] trait.
//!
//! # Usage
//! Depend on this crate for anything that does not need to talk HTTP or parse arguments.

pub mod config;
pub mod contract;
pub mod error;
pub mod format;
pub mod lister;
pub mod resolve;

pub use error::{KbError, KbResult};
