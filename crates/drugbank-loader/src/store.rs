//! In-memory drug collection.
//!
//! The store owns every loaded [`Drug`] and links them to each other. Loading
//! happens in two strictly ordered phases:
//!
//! 1. every record is parsed; drug-drug interactions are kept as pending
//!    references keyed by the other drug's identifier;
//! 2. once all drugs exist, [`DrugStore::resolve_interactions`] builds each
//!    drug's resolved map, keyed by [`DrugIndex`], through an
//!    identifier index.
//!
//! ```ignore
//! let mut store = DrugStore::new();
//! let stats = store.load("20191031_FDASMDrugs_2546.txt", LoadConfig::default())?;
//!
//! let abacavir = store.find_by_name("Abacavir").unwrap();
//! for (other, description) in store.interacting_drugs(abacavir) {
//!     println!("{}: {}", other.name, description);
//! }
//! ```

use std::collections::{HashMap, HashSet};
use std::io::BufRead;
use std::path::Path;
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use drugbank_types::{Drug, DrugId, DrugIndex};

use crate::parser::{DrugParser, ParsedRecord};
use crate::types::{
    DrugLoadError, DrugResult, DuplicatePolicy, LoadConfig, LoadStats, ResolveStats,
};

/// In-memory store for drug records.
///
/// Drugs are kept in file order; a [`DrugIndex`] is a position in that
/// order and stays valid for the lifetime of the store.
#[derive(Default)]
pub struct DrugStore {
    /// Drugs in insertion order.
    drugs: Vec<Drug>,
    /// First drug loaded with each identifier.
    index_by_id: HashMap<DrugId, DrugIndex>,
    /// First drug loaded with each name.
    index_by_name: HashMap<String, DrugIndex>,
}

impl std::fmt::Debug for DrugStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrugStore")
            .field("drugs", &self.drugs.len())
            .field("index_by_id", &self.index_by_id.len())
            .field("index_by_name", &self.index_by_name.len())
            .finish()
    }
}

impl DrugStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with pre-allocated capacity.
    pub fn with_capacity(drug_count: usize) -> Self {
        Self {
            drugs: Vec::with_capacity(drug_count),
            index_by_id: HashMap::with_capacity(drug_count),
            index_by_name: HashMap::with_capacity(drug_count),
        }
    }

    /// Loads a dataset file and resolves drug-drug interactions.
    ///
    /// # Errors
    /// Fails with [`DrugLoadError::FileNotFound`] if the file does not
    /// exist; nothing is loaded in that case. Malformed records and repeated
    /// identifiers are handled per `config`.
    pub fn load<P: AsRef<Path>>(&mut self, path: P, config: LoadConfig) -> DrugResult<LoadStats> {
        let path = path.as_ref();
        tracing::info!("Loading drug dataset from {}", path.display());
        let parser = DrugParser::from_path(path, config)?;
        self.load_from_parser(parser)
    }

    /// Loads a dataset from any buffered reader and resolves interactions.
    pub fn load_reader<R: BufRead>(
        &mut self,
        reader: R,
        config: LoadConfig,
    ) -> DrugResult<LoadStats> {
        let parser = DrugParser::from_reader(reader, config)?;
        self.load_from_parser(parser)
    }

    fn load_from_parser<R: BufRead>(&mut self, parser: DrugParser<R>) -> DrugResult<LoadStats> {
        let start = Instant::now();
        let config = *parser.config();

        let (records, malformed) = parser.parse_all()?;
        let mut stats = LoadStats {
            total_records: records.len() + malformed,
            malformed_records: malformed,
            ..Default::default()
        };

        self.insert_records(records, config.duplicates, &mut stats)?;
        tracing::info!(
            "Parsed {} drugs; building drug-drug interactions",
            stats.loaded_records
        );

        stats.resolve = self.resolve_interactions();
        stats.load_time_ms = start.elapsed().as_millis() as u64;
        tracing::info!("{}", stats);

        Ok(stats)
    }

    /// Loads a dataset using parallel parsing.
    ///
    /// All lines are read into memory and parsed with rayon. Drugs are then
    /// inserted in file order and resolved, so the result is identical to
    /// [`DrugStore::load`].
    #[cfg(feature = "parallel")]
    pub fn load_parallel<P: AsRef<Path>>(
        &mut self,
        path: P,
        config: LoadConfig,
    ) -> DrugResult<LoadStats> {
        let start = Instant::now();
        let lines = crate::parser::read_lines_skip_header(path)?;

        let parsed: Vec<DrugResult<ParsedRecord>> = lines
            .into_par_iter()
            .map(|(line, bytes)| crate::parser::parse_record(line, bytes))
            .collect();

        let total_records = parsed.len();
        let (records, malformed) = crate::parser::collect_records(parsed, config.malformed)?;
        let mut stats = LoadStats {
            total_records,
            malformed_records: malformed,
            ..Default::default()
        };

        self.insert_records(records, config.duplicates, &mut stats)?;
        stats.resolve = self.resolve_interactions();
        stats.load_time_ms = start.elapsed().as_millis() as u64;
        tracing::info!("{}", stats);

        Ok(stats)
    }

    fn insert_records(
        &mut self,
        records: Vec<ParsedRecord>,
        policy: DuplicatePolicy,
        stats: &mut LoadStats,
    ) -> DrugResult<()> {
        // Rejection leaves the store untouched
        if policy == DuplicatePolicy::Reject {
            let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
            for record in &records {
                let id = record.drug.id.as_str();
                if self.index_by_id.contains_key(id) || !seen.insert(id) {
                    return Err(DrugLoadError::DuplicateId {
                        id: id.to_string(),
                        line: record.line,
                    });
                }
            }
        }

        self.drugs.reserve(records.len());

        for ParsedRecord { line, drug } in records {
            if self.index_by_id.contains_key(&drug.id) {
                tracing::warn!("Dropping duplicate drug {} on line {}", drug.id, line);
                stats.duplicate_records += 1;
                continue;
            }
            self.push(drug);
            stats.loaded_records += 1;
        }

        Ok(())
    }

    /// Inserts drugs, dropping any whose identifier is already present.
    ///
    /// Returns the number of drugs inserted. Call
    /// [`DrugStore::resolve_interactions`] afterwards to link them.
    pub fn insert_drugs(&mut self, drugs: impl IntoIterator<Item = Drug>) -> usize {
        let mut inserted = 0;
        for drug in drugs {
            if !self.index_by_id.contains_key(&drug.id) {
                self.push(drug);
                inserted += 1;
            }
        }
        inserted
    }

    /// Inserts one drug, failing if its identifier is already present.
    ///
    /// The error's `line` is 0, as the drug did not come from a file.
    pub fn try_insert(&mut self, drug: Drug) -> DrugResult<DrugIndex> {
        if self.index_by_id.contains_key(&drug.id) {
            return Err(DrugLoadError::DuplicateId {
                id: drug.id,
                line: 0,
            });
        }
        Ok(self.push(drug))
    }

    fn push(&mut self, drug: Drug) -> DrugIndex {
        let index = DrugIndex::new(self.drugs.len());
        self.index_by_id.entry(drug.id.clone()).or_insert(index);
        self.index_by_name.entry(drug.name.clone()).or_insert(index);
        self.drugs.push(drug);
        index
    }

    /// Resolves every drug's pending interactions into direct links.
    ///
    /// Each drug's resolved map is rebuilt from its pending references, so
    /// running this again gives the same result. References to identifiers
    /// that are not loaded are dropped.
    pub fn resolve_interactions(&mut self) -> ResolveStats {
        let index_by_id = &self.index_by_id;

        // Each drug only writes its own map, so drugs resolve independently.
        #[cfg(feature = "parallel")]
        let (resolved, dangling) = self
            .drugs
            .par_iter_mut()
            .map(|drug| resolve_drug(drug, index_by_id))
            .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

        #[cfg(not(feature = "parallel"))]
        let (resolved, dangling) = self
            .drugs
            .iter_mut()
            .map(|drug| resolve_drug(drug, index_by_id))
            .fold((0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

        ResolveStats { resolved, dangling }
    }

    // ─── Lookups ───────────────────────────────────────────────────────────

    /// Returns the drug at `index`.
    pub fn get(&self, index: DrugIndex) -> Option<&Drug> {
        self.drugs.get(index.get())
    }

    /// Returns the drug with the given identifier.
    pub fn get_by_id(&self, id: &str) -> Option<&Drug> {
        self.index_of(id).and_then(|index| self.get(index))
    }

    /// Returns the index of the drug with the given identifier.
    pub fn index_of(&self, id: &str) -> Option<DrugIndex> {
        self.index_by_id.get(id).copied()
    }

    /// Finds a drug by exact, case-sensitive name. The first loaded match wins.
    pub fn find_by_name(&self, name: &str) -> Option<DrugIndex> {
        self.index_by_name.get(name).copied()
    }

    /// Returns the resolved interaction map of the drug at `index`.
    pub fn interactions(&self, index: DrugIndex) -> Option<&HashMap<DrugIndex, String>> {
        self.get(index).map(|drug| &drug.interactions)
    }

    /// Iterates over the drugs interacting with the drug at `index`, with
    /// the interaction description.
    pub fn interacting_drugs(&self, index: DrugIndex) -> impl Iterator<Item = (&Drug, &str)> {
        self.interactions(index)
            .into_iter()
            .flatten()
            .filter_map(move |(other, description)| {
                self.get(*other).map(|drug| (drug, description.as_str()))
            })
    }

    /// Returns the description of the interaction from `source` to `target`.
    pub fn interaction_between(&self, source: DrugIndex, target: DrugIndex) -> Option<&str> {
        self.get(source)?.interaction_with(target)
    }

    // ─── Statistics ────────────────────────────────────────────────────────

    /// Returns the number of drugs.
    pub fn len(&self) -> usize {
        self.drugs.len()
    }

    /// Returns true if no drugs are loaded.
    pub fn is_empty(&self) -> bool {
        self.drugs.is_empty()
    }

    /// Returns the total number of resolved drug-drug interactions.
    pub fn interaction_count(&self) -> usize {
        self.drugs.iter().map(Drug::interaction_count).sum()
    }

    /// Returns the total number of interactions read from the dataset.
    pub fn pending_interaction_count(&self) -> usize {
        self.drugs.iter().map(Drug::pending_interaction_count).sum()
    }

    /// Returns an iterator over all drugs in load order.
    pub fn drugs(&self) -> impl Iterator<Item = &Drug> {
        self.drugs.iter()
    }

    /// Returns an iterator over all drugs with their indices.
    pub fn indexed_drugs(&self) -> impl Iterator<Item = (DrugIndex, &Drug)> {
        self.drugs
            .iter()
            .enumerate()
            .map(|(i, drug)| (DrugIndex::new(i), drug))
    }
}

/// Rebuilds one drug's resolved map. Returns (resolved, dangling).
fn resolve_drug(drug: &mut Drug, index_by_id: &HashMap<DrugId, DrugIndex>) -> (usize, usize) {
    let mut interactions = HashMap::with_capacity(drug.pending_interactions.len());
    let mut dangling = 0;

    for (other_id, description) in &drug.pending_interactions {
        match index_by_id.get(other_id) {
            Some(&other) => {
                interactions.insert(other, description.clone());
            }
            None => {
                tracing::debug!(
                    "Drug {} references unknown drug {}",
                    drug.id,
                    other_id
                );
                dangling += 1;
            }
        }
    }

    let resolved = interactions.len();
    drug.interactions = interactions;
    (resolved, dangling)
}
