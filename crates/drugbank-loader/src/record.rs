//! Drug record line parser.
//!
//! A record is one line of fields joined by `>,<`. The line starts and ends
//! with one stray quoting character each, which belong to the first and last
//! fields.

use std::collections::HashMap;

use drugbank_types::{Drug, DrugId};

use crate::types::MalformedRecord;

/// Separator between fields of a record.
pub const FIELD_DELIMITER: &str = ">,<";
/// Separator between entries of a multi-value field.
pub const LIST_SEPARATOR: &str = ";;";
/// Separator between the parts of a drug interaction entry.
pub const INTERACTION_SEPARATOR: &str = "@@";
/// Sentinel for a field without data.
pub const NOT_AVAILABLE: &str = "Not Available";
/// Number of fields in a record.
pub const FIELD_COUNT: usize = 15;

/// Field positions in a record. Positions 1 and 5 are not used.
pub mod field {
    /// DrugBank identifier (leading artifact attached).
    pub const ID: usize = 0;
    /// Common name.
    pub const NAME: usize = 2;
    /// Synonyms, `;;`-separated.
    pub const SYNONYMS: usize = 3;
    /// Description.
    pub const DESCRIPTION: usize = 4;
    /// Chemical formula.
    pub const FORMULA: usize = 6;
    /// UNII.
    pub const UNII: usize = 7;
    /// CAS number.
    pub const CAS_NUMBER: usize = 8;
    /// PubChem compound identifier.
    pub const PUBCHEM_COMPOUND: usize = 9;
    /// PubChem substance identifier.
    pub const PUBCHEM_SUBSTANCE: usize = 10;
    /// Toxicity.
    pub const TOXICITY: usize = 11;
    /// Food interactions, `;;`-separated.
    pub const FOOD_INTERACTIONS: usize = 12;
    /// Drug interactions, `;;`-separated `id@@name@@description` triples.
    pub const DRUG_INTERACTIONS: usize = 13;
    /// SMILES structure (trailing artifact attached).
    pub const STRUCTURE: usize = 14;

    /// Column names, in record order, as they appear in the dataset header.
    pub const NAMES: [&str; super::FIELD_COUNT] = [
        "drugbank_id",
        "type",
        "name",
        "synonyms",
        "description",
        "state",
        "formula",
        "unii",
        "cas_number",
        "pubchem_compound_id",
        "pubchem_substance_id",
        "toxicity",
        "food_interactions",
        "drug_interactions",
        "structure",
    ];

    /// Returns the column name for a field position.
    pub const fn name(position: usize) -> &'static str {
        if position < NAMES.len() {
            NAMES[position]
        } else {
            "unknown"
        }
    }
}

/// Parses one record line into a [`Drug`] with unresolved interactions.
///
/// `line` may carry a trailing `\r`. The returned drug has an empty
/// `interactions` map; its `pending_interactions` hold the raw references.
pub fn parse_drug_line(line: &str) -> Result<Drug, MalformedRecord> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();

    if fields.len() != FIELD_COUNT {
        return Err(MalformedRecord::FieldCount {
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    }

    let id = strip_first_char(fields[field::ID]);
    if id.is_empty() {
        return Err(MalformedRecord::MissingField {
            field: field::name(field::ID),
        });
    }

    let raw_structure = fields[field::STRUCTURE];
    if raw_structure.is_empty() {
        return Err(MalformedRecord::MissingField {
            field: field::name(field::STRUCTURE),
        });
    }

    Ok(Drug {
        id: id.to_string(),
        name: fields[field::NAME].to_string(),
        synonyms: split_list(fields[field::SYNONYMS]),
        description: fields[field::DESCRIPTION].to_string(),
        formula: fields[field::FORMULA].to_string(),
        unii: fields[field::UNII].to_string(),
        cas_number: fields[field::CAS_NUMBER].to_string(),
        pubchem_compound_id: fields[field::PUBCHEM_COMPOUND].to_string(),
        pubchem_substance_id: fields[field::PUBCHEM_SUBSTANCE].to_string(),
        toxicity: fields[field::TOXICITY].to_string(),
        food_interactions: split_list(fields[field::FOOD_INTERACTIONS]),
        pending_interactions: parse_interactions(fields[field::DRUG_INTERACTIONS])?,
        interactions: HashMap::new(),
        structure: strip_last_char(raw_structure).to_string(),
    })
}

/// Returns true if a raw field value means "no data".
pub fn is_not_available(value: &str) -> bool {
    value.is_empty() || value == NOT_AVAILABLE
}

/// Splits a multi-value field, mapping the no-data sentinel to an empty list.
///
/// Empty entries, such as the one after a trailing separator, are dropped.
pub fn split_list(value: &str) -> Vec<String> {
    if is_not_available(value) {
        return Vec::new();
    }
    value
        .split(LIST_SEPARATOR)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a drug interaction block into identifier → description.
///
/// Each entry must be `id@@name@@description`; the name is discarded. When an
/// identifier repeats, the last entry wins.
pub fn parse_interactions(value: &str) -> Result<HashMap<DrugId, String>, MalformedRecord> {
    let mut interactions = HashMap::new();
    if is_not_available(value) {
        return Ok(interactions);
    }

    for entry in value.split(LIST_SEPARATOR).filter(|e| !e.is_empty()) {
        let parts: Vec<&str> = entry.split(INTERACTION_SEPARATOR).collect();
        let [other_id, _other_name, description] = parts[..] else {
            return Err(MalformedRecord::InteractionEntry {
                field: field::name(field::DRUG_INTERACTIONS),
                entry: entry.to_string(),
                parts: parts.len(),
            });
        };

        if other_id.is_empty() {
            return Err(MalformedRecord::MissingInteractionId {
                field: field::name(field::DRUG_INTERACTIONS),
                entry: entry.to_string(),
            });
        }

        interactions.insert(other_id.to_string(), description.to_string());
    }

    Ok(interactions)
}

fn strip_first_char(value: &str) -> &str {
    let mut chars = value.chars();
    chars.next();
    chars.as_str()
}

fn strip_last_char(value: &str) -> &str {
    let mut chars = value.chars();
    chars.next_back();
    chars.as_str()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds a record line from the fifteen raw field values, adding the
    /// leading and trailing artifacts.
    pub(crate) fn make_line(fields: [&str; FIELD_COUNT]) -> String {
        format!("\"{}\"", fields.join(FIELD_DELIMITER))
    }

    pub(crate) fn make_simple_line(id: &str, name: &str, interactions: &str) -> String {
        make_line([
            id,
            "reserved",
            name,
            "Not Available",
            "A test drug.",
            "small molecule",
            "C1H2",
            "UNII0001",
            "50-00-0",
            "123",
            "456",
            "Not Available",
            "Not Available",
            interactions,
            "CCO",
        ])
    }

    #[test]
    fn test_parse_full_record() {
        let line = make_line([
            "DB00014",
            "approved",
            "Goserelin",
            "Goserelina;;Goserelinum",
            "Goserelin is a synthetic hormone.",
            "small molecule",
            "C59H84N18O14",
            "0F65R8P09N",
            "65807-02-5",
            "5311128",
            "46507836",
            "Toxic effects are unlikely.",
            "Avoid alcohol.;;Take with food.",
            "DB00001@@Lepirudin@@Risk of bleeding.;;DB00006@@Bivalirudin@@Increased effect.",
            "CC(C)C[C@H](NC(=O)[C@@H](COC(C)(C)C)NC)",
        ]);

        let drug = parse_drug_line(&line).unwrap();
        assert_eq!(drug.id, "DB00014");
        assert_eq!(drug.name, "Goserelin");
        assert_eq!(drug.synonyms, vec!["Goserelina", "Goserelinum"]);
        assert_eq!(drug.description, "Goserelin is a synthetic hormone.");
        assert_eq!(drug.formula, "C59H84N18O14");
        assert_eq!(drug.unii, "0F65R8P09N");
        assert_eq!(drug.cas_number, "65807-02-5");
        assert_eq!(drug.pubchem_compound_id, "5311128");
        assert_eq!(drug.pubchem_substance_id, "46507836");
        assert_eq!(drug.toxicity, "Toxic effects are unlikely.");
        assert_eq!(drug.food_interactions, vec!["Avoid alcohol.", "Take with food."]);
        assert_eq!(drug.pending_interactions.len(), 2);
        assert_eq!(drug.pending_interactions["DB00001"], "Risk of bleeding.");
        assert_eq!(drug.pending_interactions["DB00006"], "Increased effect.");
        assert!(drug.interactions.is_empty());
        assert_eq!(drug.structure, "CC(C)C[C@H](NC(=O)[C@@H](COC(C)(C)C)NC)");
    }

    #[test]
    fn test_sentinel_fields_are_empty() {
        let drug = parse_drug_line(&make_simple_line("DB00001", "Lepirudin", "")).unwrap();
        assert!(drug.synonyms.is_empty());
        assert!(drug.food_interactions.is_empty());
        assert!(drug.pending_interactions.is_empty());

        assert!(split_list("Not Available").is_empty());
        assert!(split_list("").is_empty());
        assert_eq!(split_list("Not Available;;x"), vec!["Not Available", "x"]);
    }

    #[test]
    fn test_trailing_separator_is_ignored() {
        assert_eq!(split_list("a;;b;;"), vec!["a", "b"]);
        let parsed = parse_interactions("DB1@@One@@desc;;").unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_crlf_line() {
        let line = format!("{}\r", make_simple_line("DB00002", "Cetuximab", "Not Available"));
        let drug = parse_drug_line(&line).unwrap();
        assert_eq!(drug.structure, "CCO");
    }

    #[test]
    fn test_wrong_field_count() {
        let err = parse_drug_line("\"DB00001>,<x>,<Lepirudin\"").unwrap_err();
        assert_eq!(
            err,
            MalformedRecord::FieldCount {
                expected: FIELD_COUNT,
                found: 3
            }
        );
    }

    #[test]
    fn test_missing_identifier() {
        let line = make_simple_line("", "Nameless", "");
        assert_eq!(
            parse_drug_line(&line).unwrap_err(),
            MalformedRecord::MissingField {
                field: "drugbank_id"
            }
        );
    }

    #[test]
    fn test_bad_interaction_entry() {
        let err = parse_interactions("DB00001@@Lepirudin").unwrap_err();
        assert_eq!(
            err,
            MalformedRecord::InteractionEntry {
                field: "drug_interactions",
                entry: "DB00001@@Lepirudin".to_string(),
                parts: 2
            }
        );

        let err = parse_interactions("@@Lepirudin@@desc").unwrap_err();
        assert_eq!(
            err,
            MalformedRecord::MissingInteractionId {
                field: "drug_interactions",
                entry: "@@Lepirudin@@desc".to_string(),
            }
        );
        assert!(err.to_string().contains("drug_interactions"));
    }

    #[test]
    fn test_field_names() {
        assert_eq!(field::name(field::ID), "drugbank_id");
        assert_eq!(field::name(field::DRUG_INTERACTIONS), "drug_interactions");
        assert_eq!(field::name(field::STRUCTURE), "structure");
        assert_eq!(field::name(FIELD_COUNT), "unknown");
    }

    #[test]
    fn test_repeated_interaction_last_wins() {
        let parsed = parse_interactions("DB1@@One@@first;;DB1@@One@@second").unwrap();
        assert_eq!(parsed["DB1"], "second");
    }
}
