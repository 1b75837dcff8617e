use serde::{Deserialize, Serialize};

/// Column names of the six sequence fields that get exploded into long
/// sheets, in workbook sheet order.
pub const EXPLODE_COLUMNS: [&str; 6] = [
    "resource.extension.risk_codes.known-reaction-risk",
    "resource.extension.risk_codes.potentially-crossreactive-risk",
    "resource.extension.risk_codes.no-known-reaction-risk",
    "resource.extension.manifestations",
    "resource.reaction.substance_info",
    "resource.reaction.manifestation",
];

/// One flattened AllergyIntolerance resource.
///
/// Field declaration order is the wide-table column order and the key order
/// of the JSON dump; the serde renames carry the full column names. Every
/// record has the complete field set regardless of which source fields were
/// present: absent data flattens to an empty string or empty sequence,
/// never a missing key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    #[serde(rename = "resource.id")]
    pub id: String,

    #[serde(rename = "resource.meta.lastUpdated")]
    pub meta_last_updated: String,

    #[serde(rename = "resource.meta.source")]
    pub meta_source: String,

    #[serde(rename = "resource.identifier.system")]
    pub identifier_system: String,

    #[serde(rename = "resource.identifier.value")]
    pub identifier_value: String,

    #[serde(rename = "resource.clinicalStatus.coding.system")]
    pub clinical_status_system: String,

    #[serde(rename = "resource.clinicalStatus.coding.code")]
    pub clinical_status_code: String,

    #[serde(rename = "resource.category")]
    pub category: String,

    #[serde(rename = "resource.criticality")]
    pub criticality: String,

    /// Patient reference. The column name is historical; the value comes
    /// from `patient.reference`.
    #[serde(rename = "resource.patient.resource")]
    pub patient_reference: String,

    #[serde(rename = "resource.onsetDateTime")]
    pub onset_date_time: String,

    #[serde(rename = "resource.recordedDate")]
    pub recorded_date: String,

    #[serde(rename = "resource.asserter.reference")]
    pub asserter_reference: String,

    #[serde(rename = "resource.note.text")]
    pub note_text: String,

    #[serde(rename = "resource.reaction.description")]
    pub reaction_description: String,

    #[serde(rename = "resource.reaction.onset")]
    pub reaction_onset: String,

    #[serde(rename = "resource.reaction.severity")]
    pub reaction_severity: String,

    #[serde(rename = "resource.extension.risk_codes.known-reaction-risk")]
    pub risk_known: Vec<String>,

    #[serde(rename = "resource.extension.risk_codes.potentially-crossreactive-risk")]
    pub risk_potentially_crossreactive: Vec<String>,

    #[serde(rename = "resource.extension.risk_codes.no-known-reaction-risk")]
    pub risk_no_known: Vec<String>,

    #[serde(rename = "resource.extension.manifestations")]
    pub manifestations: Vec<String>,

    /// Causality codes are plain code strings, one per qualifying reaction
    /// extension; this column is never exploded.
    #[serde(rename = "resource.reaction.allergy-reaction-causality")]
    pub reaction_causality: Vec<String>,

    #[serde(rename = "resource.reaction.substance_info")]
    pub substance_info: Vec<String>,

    #[serde(rename = "resource.reaction.manifestation")]
    pub reaction_manifestation: Vec<String>,
}

/// A borrowed view of one column's value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    List(&'a [String]),
}

impl FlatRecord {
    /// The full column set, in wide-table order.
    pub const COLUMNS: [&'static str; 24] = [
        "resource.id",
        "resource.meta.lastUpdated",
        "resource.meta.source",
        "resource.identifier.system",
        "resource.identifier.value",
        "resource.clinicalStatus.coding.system",
        "resource.clinicalStatus.coding.code",
        "resource.category",
        "resource.criticality",
        "resource.patient.resource",
        "resource.onsetDateTime",
        "resource.recordedDate",
        "resource.asserter.reference",
        "resource.note.text",
        "resource.reaction.description",
        "resource.reaction.onset",
        "resource.reaction.severity",
        "resource.extension.risk_codes.known-reaction-risk",
        "resource.extension.risk_codes.potentially-crossreactive-risk",
        "resource.extension.risk_codes.no-known-reaction-risk",
        "resource.extension.manifestations",
        "resource.reaction.allergy-reaction-causality",
        "resource.reaction.substance_info",
        "resource.reaction.manifestation",
    ];

    /// Look up a column by its full name.
    pub fn field(&self, column: &str) -> Option<FieldValue<'_>> {
        let value = match column {
            "resource.id" => FieldValue::Text(&self.id),
            "resource.meta.lastUpdated" => FieldValue::Text(&self.meta_last_updated),
            "resource.meta.source" => FieldValue::Text(&self.meta_source),
            "resource.identifier.system" => FieldValue::Text(&self.identifier_system),
            "resource.identifier.value" => FieldValue::Text(&self.identifier_value),
            "resource.clinicalStatus.coding.system" => {
                FieldValue::Text(&self.clinical_status_system)
            }
            "resource.clinicalStatus.coding.code" => FieldValue::Text(&self.clinical_status_code),
            "resource.category" => FieldValue::Text(&self.category),
            "resource.criticality" => FieldValue::Text(&self.criticality),
            "resource.patient.resource" => FieldValue::Text(&self.patient_reference),
            "resource.onsetDateTime" => FieldValue::Text(&self.onset_date_time),
            "resource.recordedDate" => FieldValue::Text(&self.recorded_date),
            "resource.asserter.reference" => FieldValue::Text(&self.asserter_reference),
            "resource.note.text" => FieldValue::Text(&self.note_text),
            "resource.reaction.description" => FieldValue::Text(&self.reaction_description),
            "resource.reaction.onset" => FieldValue::Text(&self.reaction_onset),
            "resource.reaction.severity" => FieldValue::Text(&self.reaction_severity),
            "resource.extension.risk_codes.known-reaction-risk" => {
                FieldValue::List(&self.risk_known)
            }
            "resource.extension.risk_codes.potentially-crossreactive-risk" => {
                FieldValue::List(&self.risk_potentially_crossreactive)
            }
            "resource.extension.risk_codes.no-known-reaction-risk" => {
                FieldValue::List(&self.risk_no_known)
            }
            "resource.extension.manifestations" => FieldValue::List(&self.manifestations),
            "resource.reaction.allergy-reaction-causality" => {
                FieldValue::List(&self.reaction_causality)
            }
            "resource.reaction.substance_info" => FieldValue::List(&self.substance_info),
            "resource.reaction.manifestation" => FieldValue::List(&self.reaction_manifestation),
            _ => return None,
        };
        Some(value)
    }
}
