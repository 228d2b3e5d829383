//! Drug dataset report binary.
//!
//! Loads a dataset, prints one drug and its first interaction partner, and
//! looks up the interaction between that drug and a named drug.

use std::time::Instant;

use drugbank_loader::{format_bytes, locate_dataset, DrugLoadError, DrugStore, LoadConfig};
use drugbank_types::{DrugIndex, DEFAULT_LINE_WIDTH};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DATA_PATH: &str = "20191031_FDASMDrugs_2546.txt";
const DEFAULT_SAMPLE_INDEX: usize = 5;
const DEFAULT_LOOKUP_NAME: &str = "Abacavir";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let started = Instant::now();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Data path from the first argument, then env, then the default file name
    let data_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("DRUGBANK_DATA_PATH").ok())
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());

    let line_width = env_usize("DRUGBANK_LINE_WIDTH", DEFAULT_LINE_WIDTH)?;
    let sample_index = env_usize("DRUGBANK_SAMPLE_INDEX", DEFAULT_SAMPLE_INDEX)?;
    let lookup_name = std::env::var("DRUGBANK_LOOKUP_NAME")
        .unwrap_or_else(|_| DEFAULT_LOOKUP_NAME.to_string());
    let config = match std::env::var("DRUGBANK_STRICT").as_deref() {
        Ok("1") | Ok("true") => LoadConfig::strict(),
        _ => LoadConfig::default(),
    };

    let dataset = locate_dataset(&data_path)?;
    tracing::info!(
        "Loading the database from {} ({})",
        dataset.path.display(),
        format_bytes(dataset.size_bytes)
    );

    let mut store = DrugStore::new();
    let stats = store.load(&dataset.path, config)?;
    if let Some(declared) = dataset.declared_count {
        if declared != store.len() {
            tracing::warn!(
                "File name declares {} drugs but {} were loaded",
                declared,
                store.len()
            );
        }
    }
    tracing::info!(
        "Loaded {} drugs with {} drug-drug interactions ({} dangling references dropped)",
        store.len(),
        store.interaction_count(),
        stats.resolve.dangling
    );

    let sample = DrugIndex::new(sample_index);
    let Some(drug) = store.get(sample) else {
        tracing::warn!(
            "Dataset has {} drugs; no drug at index {}",
            store.len(),
            sample_index
        );
        return Ok(());
    };

    println!("{}", drug.render(line_width));

    // Partner with the smallest identifier
    let partner = store
        .interacting_drugs(sample)
        .min_by_key(|(other, _)| other.id.clone());
    if let Some((other, _)) = partner {
        println!("\n\nOne of its interacting drugs:");
        println!("{}", other.render(line_width));
    }

    println!("\n\nInteraction between {} and {}:", drug.name, lookup_name);
    match store
        .find_by_name(&lookup_name)
        .and_then(|target| store.interaction_between(sample, target))
    {
        Some(description) => println!("{description}"),
        None => println!("No known interaction."),
    }

    tracing::info!(
        "The whole process took {:.3} seconds",
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

fn env_usize(key: &str, default: usize) -> Result<usize, DrugLoadError> {
    match std::env::var(key) {
        Ok(value) => value.parse().map_err(|_| DrugLoadError::Config {
            key: key.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}
