//! The URL-keyed extension variants this tool recognizes.
//!
//! FHIR extensions are a tagged union keyed by a `url` string. Only two
//! URLs carry data we extract; everything else is ignored.

use serde_json::Value;

use crate::extract::paths::{array_at, str_field};

/// Extension URL for substance exposure risk blocks.
pub const SUBSTANCE_EXPOSURE_RISK_URL: &str =
    "http://hl7.org/fhir/StructureDefinition/allergyintolerance-substanceExposureRisk";

/// Extension URL for MyHealthWay allergy manifestations.
pub const ALLERGY_MANIFESTATION_URL: &str =
    "https://hins.or.kr/fhir/Allergy-MyHealthWay/StructureDefinition/allergy-manifestation";

/// System-URI prefix stripped from codings inside risk blocks.
pub const WHO_ATC_PREFIX: &str = "http://www.whocc.no/";

/// Separator joining the parts of a composite coding string.
pub const CODING_SEPARATOR: &str = "##";

/// A resource-level extension, classified by URL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResourceExtension<'a> {
    /// `substanceExposureRisk`: carries `exposureRisk` and `substance`
    /// sub-extensions.
    SubstanceExposureRisk(&'a [Value]),
    /// `allergy-manifestation`: carries a direct `valueCodeableConcept`.
    Manifestation(&'a Value),
    /// Any other URL.
    Ignored,
}

impl<'a> ResourceExtension<'a> {
    pub fn classify(extension: &'a Value) -> Self {
        match extension.get("url").and_then(Value::as_str) {
            Some(SUBSTANCE_EXPOSURE_RISK_URL) => {
                ResourceExtension::SubstanceExposureRisk(array_at(extension, &["extension"]))
            }
            Some(ALLERGY_MANIFESTATION_URL) => match extension.get("valueCodeableConcept") {
                Some(concept) => ResourceExtension::Manifestation(concept),
                None => ResourceExtension::Ignored,
            },
            _ => ResourceExtension::Ignored,
        }
    }
}

/// Format one coding object as `system##code##display`.
///
/// Missing parts render as empty strings so the separators are preserved.
pub fn format_coding(coding: &Value) -> String {
    [
        str_field(coding, "system"),
        str_field(coding, "code"),
        str_field(coding, "display"),
    ]
    .join(CODING_SEPARATOR)
}

/// [`format_coding`] with the WHO ATC prefix removed from `system`.
pub fn format_coding_who_stripped(coding: &Value) -> String {
    let system = str_field(coding, "system").replace(WHO_ATC_PREFIX, "");
    [
        system.as_str(),
        str_field(coding, "code"),
        str_field(coding, "display"),
    ]
    .join(CODING_SEPARATOR)
}

/// The three recognized exposure-risk categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskCategory {
    Known,
    PotentiallyCrossreactive,
    NoKnown,
}

impl RiskCategory {
    /// Map an `exposureRisk` code onto a category, case-insensitively.
    fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "known-reaction-risk" => Some(RiskCategory::Known),
            "potentially-crossreactive-reaction-risk" => {
                Some(RiskCategory::PotentiallyCrossreactive)
            }
            "no-known-reaction-risk" => Some(RiskCategory::NoKnown),
            _ => None,
        }
    }
}

/// Risk-code buckets collected from `substanceExposureRisk` extensions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskCodes {
    pub known: Vec<String>,
    pub potentially_crossreactive: Vec<String>,
    pub no_known: Vec<String>,
    /// Substance codings found under an extension whose category never
    /// resolved. They reach no bucket; callers surface the count.
    pub unbucketed: usize,
}

impl RiskCodes {
    /// Scan a resource's extension list and fill the buckets.
    ///
    /// Per extension instance the category is resolved first from its
    /// `exposureRisk` sub-extensions (the last recognized code wins,
    /// unrecognized codes leave it untouched), then every `substance`
    /// sub-extension coding is appended to the matching bucket.
    pub fn extract(extensions: &[Value]) -> Self {
        let mut codes = RiskCodes::default();

        for extension in extensions {
            let ResourceExtension::SubstanceExposureRisk(subs) =
                ResourceExtension::classify(extension)
            else {
                continue;
            };

            let mut category = None;
            for sub in subs {
                if str_field(sub, "url") != "exposureRisk" {
                    continue;
                }
                let code = array_at(sub, &["valueCodeableConcept", "coding"])
                    .first()
                    .map(|coding| str_field(coding, "code"))
                    .unwrap_or("");
                if let Some(resolved) = RiskCategory::from_code(code) {
                    category = Some(resolved);
                }
            }

            for sub in subs {
                if str_field(sub, "url") != "substance" {
                    continue;
                }
                for coding in array_at(sub, &["valueCodeableConcept", "coding"]) {
                    let formatted = format_coding_who_stripped(coding);
                    match category {
                        Some(RiskCategory::Known) => codes.known.push(formatted),
                        Some(RiskCategory::PotentiallyCrossreactive) => {
                            codes.potentially_crossreactive.push(formatted)
                        }
                        Some(RiskCategory::NoKnown) => codes.no_known.push(formatted),
                        None => codes.unbucketed += 1,
                    }
                }
            }
        }

        codes
    }
}

/// Composite codings from every `allergy-manifestation` extension on the
/// resource, in traversal order.
pub fn extension_manifestations(extensions: &[Value]) -> Vec<String> {
    let mut out = Vec::new();
    for extension in extensions {
        if let ResourceExtension::Manifestation(concept) = ResourceExtension::classify(extension) {
            for coding in array_at(concept, &["coding"]) {
                out.push(format_coding(coding));
            }
        }
    }
    out
}
