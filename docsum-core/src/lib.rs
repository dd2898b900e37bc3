#![doc = "docsum-core: core logic library for docsum."]

//! This crate holds every pipeline docsum runs; the `docsum` binary only parses
//! arguments, loads configuration and calls in here.
//!
//! # Modules
//! - [`walker`]: depth-first file enumeration with directory/file exclusions
//! - [`conversation`]: role-tagged turns and the summarisation template
//! - [`contract`]: the [`contract::Completer`] seam and its error kinds
//! - [`completion`]: the HTTPS chat-completion client
//! - [`summarise`]: the sequential, resumable summarisation pipeline
//! - [`aggregate`]: concatenation of a summary tree into combined text files
//! - [`cleaner`]: regex removal of page boilerplate
//! - [`config`]: the explicit configuration values the above take

pub mod aggregate;
pub mod cleaner;
pub mod completion;
pub mod config;
pub mod contract;
pub mod conversation;
pub mod summarise;
pub mod walker;
