//! # drugbank-types
//!
//! Type definitions for FDA-approved small-molecule drug records.
//!
//! This crate provides the in-memory shape of a drug parsed from a delimited
//! drug dataset, the identifiers used to link drugs to each other, and the
//! bounded-width text rendering used to inspect them.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!   Disable this feature for zero-dependency usage.
//!
//! ## Usage
//!
//! ```rust
//! use drugbank_types::{Drug, DrugIndex, wrap_text};
//!
//! let drug = Drug::new("DB00005", "Etanercept")
//!     .with_synonyms(["Etanercept-szzs", "Etanercept-ykro"])
//!     .with_pending_interaction("DB00026", "The risk of infection can be increased.");
//!
//! assert_eq!(drug.pending_interaction_count(), 1);
//! assert!(drug.render(80).starts_with("DrugBank ID: DB00005"));
//!
//! assert_eq!(wrap_text("alpha beta gamma", 10), vec!["alpha beta", "gamma"]);
//! ```
//!
//! ## Without Serde
//!
//! ```toml
//! [dependencies]
//! drugbank-types = { version = "0.1", default-features = false }
//! ```

#![warn(missing_docs)]

mod drug;
mod drug_id;
mod wrap;

// Re-export all public types at crate root
pub use drug::{Drug, DEFAULT_LINE_WIDTH};
pub use drug_id::{DrugId, DrugIndex};
pub use wrap::{wrap_joined, wrap_text};
