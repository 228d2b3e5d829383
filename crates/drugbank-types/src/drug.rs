//! FDA small-molecule drug record.
//!
//! This module provides the `Drug` struct representing one line of a
//! delimited drug dataset, together with its drug-drug interactions.

use std::collections::HashMap;
use std::fmt;

use crate::wrap::wrap_joined;
use crate::{DrugId, DrugIndex};

/// Line width used by the `Display` implementation.
pub const DEFAULT_LINE_WIDTH: usize = 120;

/// An FDA-approved small-molecule drug.
///
/// Drug-drug interactions live in two maps. `pending_interactions` is filled
/// while parsing and is keyed by the other drug's external identifier, since
/// that drug may not have been loaded yet. `interactions` is filled by the
/// owning collection's resolution pass and is keyed by the other drug's
/// [`DrugIndex`].
///
/// # Examples
///
/// ```
/// use drugbank_types::{Drug, DrugIndex};
///
/// let mut drug = Drug::new("DB00001", "Lepirudin")
///     .with_formula("C287H440N80O110S6")
///     .with_pending_interaction("DB06605", "Apixaban may increase the anticoagulant activities.");
///
/// assert_eq!(drug.pending_interaction_count(), 1);
/// assert_eq!(drug.interaction_count(), 0);
///
/// drug.interactions.insert(DrugIndex::new(1), "Apixaban may increase the anticoagulant activities.".into());
/// assert!(drug.interaction_with(DrugIndex::new(1)).is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Drug {
    /// DrugBank identifier, unique within a dataset.
    pub id: DrugId,
    /// Common name.
    pub name: String,
    /// Other names of the drug, in dataset order.
    pub synonyms: Vec<String>,
    /// Short paragraph describing the drug.
    pub description: String,
    /// Chemical formula.
    pub formula: String,
    /// FDA Unique Ingredient Identifier.
    pub unii: String,
    /// CAS registry number.
    pub cas_number: String,
    /// PubChem compound identifier.
    pub pubchem_compound_id: String,
    /// PubChem substance identifier.
    pub pubchem_substance_id: String,
    /// Toxicity information.
    pub toxicity: String,
    /// Drug-food interaction descriptions.
    pub food_interactions: Vec<String>,
    /// Unresolved drug-drug interactions: other drug's identifier to description.
    pub pending_interactions: HashMap<DrugId, String>,
    /// Resolved drug-drug interactions: other drug's index to description.
    pub interactions: HashMap<DrugIndex, String>,
    /// SMILES structure.
    pub structure: String,
}

impl Drug {
    /// Creates a drug with an identifier and name; every other field is empty.
    pub fn new(id: impl Into<DrugId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the synonyms.
    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms = synonyms.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the chemical formula.
    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = formula.into();
        self
    }

    /// Sets the toxicity text.
    pub fn with_toxicity(mut self, toxicity: impl Into<String>) -> Self {
        self.toxicity = toxicity.into();
        self
    }

    /// Sets the SMILES structure.
    pub fn with_structure(mut self, structure: impl Into<String>) -> Self {
        self.structure = structure.into();
        self
    }

    /// Sets the food interaction descriptions.
    pub fn with_food_interactions<I, S>(mut self, interactions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.food_interactions = interactions.into_iter().map(Into::into).collect();
        self
    }

    /// Adds an unresolved interaction with the drug identified by `other_id`.
    pub fn with_pending_interaction(
        mut self,
        other_id: impl Into<DrugId>,
        description: impl Into<String>,
    ) -> Self {
        self.pending_interactions
            .insert(other_id.into(), description.into());
        self
    }

    /// Returns true if the record carries its only required field, the identifier.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
    }

    /// Number of resolved drug-drug interactions.
    pub fn interaction_count(&self) -> usize {
        self.interactions.len()
    }

    /// Number of drug-drug interactions read from the dataset, resolved or not.
    pub fn pending_interaction_count(&self) -> usize {
        self.pending_interactions.len()
    }

    /// Number of drug-food interaction descriptions.
    pub fn food_interaction_count(&self) -> usize {
        self.food_interactions.len()
    }

    /// Returns true if at least one drug-food interaction is known.
    pub fn has_food_interactions(&self) -> bool {
        !self.food_interactions.is_empty()
    }

    /// Returns the description of the resolved interaction with `other`.
    pub fn interaction_with(&self, other: DrugIndex) -> Option<&str> {
        self.interactions.get(&other).map(String::as_str)
    }

    /// Renders the drug as a human-readable block.
    ///
    /// Name, synonyms, description and toxicity are word-wrapped to
    /// `max_line_width`. Interactions are reported as counts only.
    pub fn render(&self, max_line_width: usize) -> String {
        let synonyms = if self.synonyms.is_empty() {
            "None".to_string()
        } else {
            wrap_joined(&self.synonyms.join(", "), max_line_width)
        };

        let sections = [
            format!("DrugBank ID: {}", self.id),
            format!("Drug Name: {}", wrap_joined(&self.name, max_line_width)),
            format!("Synonyms:\n{synonyms}"),
            format!("Chemical Formula: {}", self.formula),
            format!("Structure:\n{}", self.structure),
            format!("UNII: {}", self.unii),
            format!("CAS Number: {}", self.cas_number),
            format!("PubChem Compound ID: {}", self.pubchem_compound_id),
            format!("PubChem Substance ID: {}", self.pubchem_substance_id),
            format!(
                "Description:\n{}",
                wrap_joined(&self.description, max_line_width)
            ),
            format!("Toxicity:\n{}", wrap_joined(&self.toxicity, max_line_width)),
            format!(
                "Food Interactions: there is/are {} description(s) about food interactions.",
                self.food_interaction_count()
            ),
            format!(
                "Drug Interactions: there is/are {} known drug-drug interaction(s).",
                self.interaction_count()
            ),
        ];

        sections.join("\n")
    }
}

impl fmt::Display for Drug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_LINE_WIDTH))
    }
}
