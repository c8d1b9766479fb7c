//! Release histories and staleness deltas
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌─────────────────┐
//! │  Registry   │────▶│ RegistryHistory │────▶│  CachedHistory  │
//! │ (raw dates) │     │  (normalized)   │     │ (one file/day)  │
//! └─────────────┘     └─────────────────┘     └─────────────────┘
//!                                                      │
//!                                                      ▼
//!                                             ┌─────────────────┐
//!                                             │    DaysDelta    │
//!                                             │ (+ decorators)  │
//!                                             └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`normalizer`]: PEP 440 / SemVer version normalization and ordering
//! - [`types`]: `Release` and the sorted, deduplicated `ReleaseHistory`
//! - [`registry`]: Registry traits and the normalizing history pipeline
//! - [`registries`]: Concrete registry implementations (PyPI, npm, Go proxy, Hex)
//! - [`cache`]: Day-partitioned file cache of release histories
//! - [`clock`]: Injectable source of today's date
//! - [`delta`]: Delta calculator and its decorators
//! - [`error`]: Error types

pub mod cache;
pub mod clock;
pub mod delta;
pub mod error;
pub mod normalizer;
pub mod registries;
pub mod registry;
pub mod types;
