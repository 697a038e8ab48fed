#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`ComposerSbomError`)
//! - [`config`]: Analyzer configuration (`ComposerSbomConfig`, builder)
//! - [`parser`]: `composer.json` / `composer.lock` decoding (`Manifest`, `Lockfile`, `LicenseField`)
//! - [`locator`]: Project discovery (`ProjectLocator`, `Project`, `Workspace`)
//! - [`framework`]: Framework classification (`detect_framework`)
//! - [`graph`]: Dependency map and direct lists (`build_workspace`, `compute_statistics`)
//! - [`phar`]: PHAR metadata summaries
//! - [`analyzer`]: Main orchestrator (`ComposerSbomAnalyzer`, `ComposerSbomAnalyzerBuilder`)
//! - [`plugin`]: Request dispatch and persistence (`PluginDispatcher`)
//!
//! # Architecture
//!
//! ```text
//! root dir --> ProjectLocator --> Manifest / Lockfile (per workspace)
//!                                        |
//!                   +--------------------+--------------------+
//!                   |                                         |
//!           detect_framework                           build_workspace
//!                   |                                         |
//!                   +------------> assemble <-----------------+
//!                                     |
//!                                   Output --> ResultSink (PluginDispatcher)
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod framework;
pub mod graph;
pub mod locator;
pub mod parser;
pub mod phar;
pub mod plugin;

// --- Public API Re-exports ---

// Analyzer (main orchestrator)
pub use analyzer::{ComposerSbomAnalyzer, ComposerSbomAnalyzerBuilder, PACKAGE_MANAGER};

// Configuration
pub use config::{ComposerSbomConfig, ComposerSbomConfigBuilder};

// Error
pub use error::ComposerSbomError;

// Parser
pub use parser::license::LicenseField;
pub use parser::lockfile::{LockedPackage, Lockfile};
pub use parser::manifest::{Manifest, PackageAuthor};
pub use parser::{ComposerDocument, ComposerFileDetector, ComposerFileKind};

// Discovery
pub use locator::{Project, ProjectLocator, Workspace};

// Classification and graph
pub use framework::{GENERIC_PHP, detect_framework};
pub use graph::{build_workspace, compute_statistics};

// Dispatch
pub use plugin::{AnalysisRequest, AnalysisSummary, PluginDispatcher};
