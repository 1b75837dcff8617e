//! Resource-to-record mapping: fixed, order-independent field paths.

use serde_json::Value;

use crate::extract::extensions::{extension_manifestations, format_coding, RiskCodes};
use crate::extract::paths::{array_at, str_at, str_field};
use crate::extract::types::FlatRecord;

/// Result of flattening one resource.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub record: FlatRecord,
    /// Risk substance codings dropped because their exposure-risk category
    /// never resolved.
    pub unbucketed_substances: usize,
}

/// Flatten one AllergyIntolerance resource into the fixed record shape.
///
/// Every lookup is defensive: a partially populated resource flattens to
/// empty defaults, never an error.
pub fn flatten_resource(resource: &Value) -> Extraction {
    let reactions = array_at(resource, &["reaction"]);
    let extensions = array_at(resource, &["extension"]);
    let risk_codes = RiskCodes::extract(extensions);
    let unbucketed_substances = risk_codes.unbucketed;

    let record = FlatRecord {
        id: str_at(resource, &["id"]).to_string(),
        meta_last_updated: str_at(resource, &["meta", "lastUpdated"]).to_string(),
        meta_source: str_at(resource, &["meta", "source"]).to_string(),
        identifier_system: first_non_empty(array_at(resource, &["identifier"]), "system"),
        identifier_value: first_non_empty(array_at(resource, &["identifier"]), "value"),
        clinical_status_system: first_non_empty(
            array_at(resource, &["clinicalStatus", "coding"]),
            "system",
        ),
        clinical_status_code: first_non_empty(
            array_at(resource, &["clinicalStatus", "coding"]),
            "code",
        ),
        category: join_strings(array_at(resource, &["category"]), ", "),
        criticality: str_at(resource, &["criticality"]).to_string(),
        patient_reference: str_at(resource, &["patient", "reference"]).to_string(),
        onset_date_time: str_at(resource, &["onsetDateTime"]).to_string(),
        recorded_date: str_at(resource, &["recordedDate"]).to_string(),
        asserter_reference: str_at(resource, &["asserter", "reference"]).to_string(),
        note_text: join_field(array_at(resource, &["note"]), "text", " "),
        reaction_description: join_field(reactions, "description", " "),
        reaction_onset: join_field(reactions, "onset", " "),
        reaction_severity: join_field(reactions, "severity", " "),
        risk_known: risk_codes.known,
        risk_potentially_crossreactive: risk_codes.potentially_crossreactive,
        risk_no_known: risk_codes.no_known,
        manifestations: extension_manifestations(extensions),
        reaction_causality: causality_codes(reactions),
        substance_info: substance_info(reactions),
        reaction_manifestation: reaction_manifestations(reactions),
    };

    Extraction {
        record,
        unbucketed_substances,
    }
}

/// First entry whose `key` is a non-empty string, or `""`.
fn first_non_empty(entries: &[Value], key: &str) -> String {
    entries
        .iter()
        .map(|entry| str_field(entry, key))
        .find(|text| !text.is_empty())
        .unwrap_or("")
        .to_string()
}

/// Join `key` across entries with `separator`, keeping positional empties.
fn join_field(entries: &[Value], key: &str, separator: &str) -> String {
    entries
        .iter()
        .map(|entry| str_field(entry, key))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Join an array of plain strings with `separator`.
fn join_strings(entries: &[Value], separator: &str) -> String {
    entries
        .iter()
        .map(|entry| entry.as_str().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(separator)
}

/// First coding's `code` from every reaction extension carrying a
/// `valueCodeableConcept` with at least one coding entry.
fn causality_codes(reactions: &[Value]) -> Vec<String> {
    let mut codes = Vec::new();
    for reaction in reactions {
        for extension in array_at(reaction, &["extension"]) {
            if let Some(first) = array_at(extension, &["valueCodeableConcept", "coding"]).first() {
                codes.push(str_field(first, "code").to_string());
            }
        }
    }
    codes
}

/// Substance codings across reactions, in reaction order.
fn substance_info(reactions: &[Value]) -> Vec<String> {
    let mut out = Vec::new();
    for reaction in reactions {
        for coding in array_at(reaction, &["substance", "coding"]) {
            out.push(format_coding(coding));
        }
    }
    out
}

/// Reaction-level manifestation codings, reaction order then coding order.
fn reaction_manifestations(reactions: &[Value]) -> Vec<String> {
    let mut out = Vec::new();
    for reaction in reactions {
        for manifestation in array_at(reaction, &["manifestation"]) {
            for coding in array_at(manifestation, &["coding"]) {
                out.push(format_coding(coding));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extensions::{ALLERGY_MANIFESTATION_URL, SUBSTANCE_EXPOSURE_RISK_URL};
    use serde_json::json;

    #[test]
    fn test_full_resource_flattens_every_field() {
        let resource = json!({
            "id": "allergy-1",
            "meta": {"lastUpdated": "2024-05-07T00:00:00Z", "source": "#src"},
            "identifier": [
                {"value": "only-value"},
                {"system": "urn:sys", "value": "12345"}
            ],
            "clinicalStatus": {"coding": [
                {"code": "active"},
                {"system": "http://terminology.hl7.org/CodeSystem/allergyintolerance-clinical"}
            ]},
            "category": ["food", "medication"],
            "criticality": "high",
            "patient": {"reference": "Patient/p1"},
            "onsetDateTime": "2010-01-01",
            "recordedDate": "2024-05-01",
            "asserter": {"reference": "Practitioner/a1"},
            "note": [{"text": "first"}, {"text": "second"}],
            "extension": [
                {
                    "url": SUBSTANCE_EXPOSURE_RISK_URL,
                    "extension": [
                        {"url": "exposureRisk", "valueCodeableConcept": {"coding": [{"code": "known-reaction-risk"}]}},
                        {"url": "substance", "valueCodeableConcept": {"coding": [
                            {"system": "http://www.whocc.no/atc", "code": "B01AC06", "display": "Aspirin"}
                        ]}}
                    ]
                },
                {
                    "url": ALLERGY_MANIFESTATION_URL,
                    "valueCodeableConcept": {"coding": [{"system": "sct", "code": "271807003", "display": "Rash"}]}
                }
            ],
            "reaction": [{
                "description": "hives",
                "onset": "2010-02-01",
                "severity": "moderate",
                "substance": {"coding": [{"system": "http://www.whocc.no/atc", "code": "B01AC06", "display": "Aspirin"}]},
                "manifestation": [{"coding": [{"system": "sct", "code": "247472004", "display": "Hives"}]}],
                "extension": [{"valueCodeableConcept": {"coding": [{"code": "probable"}]}}]
            }]
        });

        let extraction = flatten_resource(&resource);
        let record = extraction.record;

        assert_eq!(record.id, "allergy-1");
        assert_eq!(record.meta_last_updated, "2024-05-07T00:00:00Z");
        assert_eq!(record.meta_source, "#src");
        // system and value are picked independently, from different entries
        assert_eq!(record.identifier_system, "urn:sys");
        assert_eq!(record.identifier_value, "only-value");
        assert_eq!(
            record.clinical_status_system,
            "http://terminology.hl7.org/CodeSystem/allergyintolerance-clinical"
        );
        assert_eq!(record.clinical_status_code, "active");
        assert_eq!(record.category, "food, medication");
        assert_eq!(record.criticality, "high");
        assert_eq!(record.patient_reference, "Patient/p1");
        assert_eq!(record.onset_date_time, "2010-01-01");
        assert_eq!(record.recorded_date, "2024-05-01");
        assert_eq!(record.asserter_reference, "Practitioner/a1");
        assert_eq!(record.note_text, "first second");
        assert_eq!(record.reaction_description, "hives");
        assert_eq!(record.reaction_onset, "2010-02-01");
        assert_eq!(record.reaction_severity, "moderate");
        assert_eq!(record.risk_known, vec!["atc##B01AC06##Aspirin"]);
        assert_eq!(record.manifestations, vec!["sct##271807003##Rash"]);
        assert_eq!(record.reaction_causality, vec!["probable"]);
        assert_eq!(
            record.substance_info,
            vec!["http://www.whocc.no/atc##B01AC06##Aspirin"]
        );
        assert_eq!(
            record.reaction_manifestation,
            vec!["sct##247472004##Hives"]
        );
        assert_eq!(extraction.unbucketed_substances, 0);
    }

    #[test]
    fn test_empty_resource_yields_default_record() {
        assert_eq!(flatten_resource(&json!({})).record, FlatRecord::default());
        assert_eq!(flatten_resource(&Value::Null).record, FlatRecord::default());
    }

    #[test]
    fn test_zero_reactions_yield_empty_sequences() {
        let record = flatten_resource(&json!({"id": "a"})).record;
        assert!(record.substance_info.is_empty());
        assert!(record.reaction_manifestation.is_empty());
        assert!(record.reaction_causality.is_empty());
    }

    #[test]
    fn test_joins_keep_positional_empties() {
        let resource = json!({
            "note": [{"text": ""}, {"text": "b"}],
            "reaction": [{"severity": "mild"}, {"description": "x"}]
        });
        let record = flatten_resource(&resource).record;
        assert_eq!(record.note_text, " b");
        assert_eq!(record.reaction_severity, "mild ");
        assert_eq!(record.reaction_description, " x");
    }

    #[test]
    fn test_causality_requires_a_coding_entry() {
        let resource = json!({"reaction": [{
            "extension": [
                {"valueCodeableConcept": {"coding": [{"code": "probable"}]}},
                {"valueCodeableConcept": {"coding": []}},
                {"valueCodeableConcept": {}},
                {"url": "no-concept"},
                {"valueCodeableConcept": {"coding": [{"display": "code missing"}]}}
            ]
        }]});
        let record = flatten_resource(&resource).record;
        // the codingless extensions contribute nothing; a coding without a
        // code contributes the empty default
        assert_eq!(record.reaction_causality, vec!["probable", ""]);
    }

    #[test]
    fn test_multiple_reactions_keep_traversal_order() {
        let resource = json!({"reaction": [
            {"substance": {"coding": [{"code": "a1"}, {"code": "a2"}]}},
            {"substance": {"coding": [{"code": "b1"}]}}
        ]});
        let record = flatten_resource(&resource).record;
        assert_eq!(record.substance_info, vec!["##a1##", "##a2##", "##b1##"]);
    }

    #[test]
    fn test_unbucketed_substances_are_counted() {
        let resource = json!({"extension": [{
            "url": SUBSTANCE_EXPOSURE_RISK_URL,
            "extension": [
                {"url": "substance", "valueCodeableConcept": {"coding": [{"code": "X"}, {"code": "Y"}]}}
            ]
        }]});
        let extraction = flatten_resource(&resource);
        assert_eq!(extraction.unbucketed_substances, 2);
        assert!(extraction.record.risk_known.is_empty());
        assert!(extraction.record.risk_no_known.is_empty());
    }
}
