//! # drugbank-loader
//!
//! Two-pass loader for delimited FDA small-molecule drug datasets.
//!
//! The first pass parses every line into a [`Drug`](drugbank_types::Drug),
//! keeping drug-drug interactions as references by identifier. The second
//! pass, run once every drug is loaded, links those references to the loaded
//! drugs.
//!
//! ```no_run
//! use drugbank_loader::{locate_dataset, DrugStore, LoadConfig};
//!
//! # fn main() -> Result<(), drugbank_loader::DrugLoadError> {
//! let dataset = locate_dataset("data")?;
//! let mut store = DrugStore::new();
//! let stats = store.load(&dataset.path, LoadConfig::default())?;
//! println!("{stats}");
//!
//! if let Some(index) = store.find_by_name("Abacavir") {
//!     println!("{}", store.get(index).unwrap().render(120));
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod loader;
mod parser;
pub mod record;
mod store;
mod types;

pub use loader::{format_bytes, locate_dataset};
pub use parser::{read_lines_skip_header, DrugParser, ParsedRecord};
pub use record::parse_drug_line;
pub use store::DrugStore;
pub use types::{
    DatasetFile, DrugLoadError, DrugResult, DuplicatePolicy, LoadConfig, LoadStats,
    MalformedPolicy, MalformedRecord, ResolveStats,
};

// Re-export drugbank-types for convenience
pub use drugbank_types;
