//! Core infrastructure for tugstyle.
//!
//! This crate provides the pieces around the rewrite engine:
//! - Error types for configuration loading
//! - Rule option bags with Checkstyle's parsing rules
//! - Checkstyle XML configuration loading and caching
//! - Suppression filters
//! - Java source file discovery

pub mod cache;
pub mod config;
pub mod discovery;
pub mod error;
pub mod options;
pub mod suppress;

pub use cache::ConfigCache;
pub use config::{CheckstyleConfig, ModuleConfig, Properties};
pub use discovery::{discover_java_files, DiscoveryOptions};
pub use error::ConfigError;
pub use options::RuleOptions;
pub use suppress::Suppressions;
