//! # release-badge
//!
//! Resolves the release a project download page should advertise.
//!
//! ## Overview
//!
//! `release-badge` queries the GitHub releases of a repository, picks the
//! best release and its Windows installer, and hands the result to a
//! presenter that fills in the badge, version label and download links.
//! The selected release is cached locally for a few hours so repeated
//! page builds do not hit the API.
//!
//! ## Selection rules
//!
//! - Drafts are never selected
//! - Stable releases are preferred; prereleases are used only when no stable release exists
//! - The highest `major.minor.patch` found in the tag wins, ties go to the later publish time
//! - Releases without a parseable tag are used only when nothing else parses
//! - The installer is the first `.exe` naming the product and an installer role,
//!   then the first naming the product, then the first `.exe`
//!
//! ## Usage
//!
//! ```bash
//! # Print badge values for a repository
//! release-badge opendrop/opendrop
//!
//! # Emit JSON and bypass the on-disk cache
//! release-badge opendrop/opendrop --format json --no-cache
//! ```
//!
//! ## Configuration
//!
//! Configuration can be specified in `<config dir>/release-badge.toml` or
//! passed with `--config`.

/// Installer asset selection by file name
pub mod asset;

/// Time-boxed single-entry release cache and its storage backends
pub mod cache;

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Configuration file handling and defaults
pub mod config;

/// Error types and error handling utilities
pub mod error;

/// GitHub API client for listing releases
pub mod github;

/// Cache-then-fetch flow feeding the presenter
pub mod orchestrator;

/// Page element values and presenters
pub mod presentation;

/// Release records and best-release selection
pub mod release;

/// Version extraction from tags and ordering
pub mod version;
