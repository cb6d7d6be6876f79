//! Clinical record types: the single source of truth for field shapes,
//! wire names, numeric bounds, and presentation labels.
//!
//! Every type here derives `Serialize`/`Deserialize` plus
//! `schemars::JsonSchema`, the bridge between strong Rust types and the JSON
//! Schema handed to the reasoning engine (see
//! [`json_schema_for`](crate::json_schema_for)). Doc comments on fields and
//! variants become schema descriptions.
//!
//! Absence is meaningful throughout: an absent [`CoronaryAngiography`] means
//! no angiography was performed, while a present record with an empty artery
//! map means angiography was performed and found no lesions. The validator
//! and the prompt compiler both preserve that distinction.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ValidationError;

// ── Numeric bounds ─────────────────────────────────────────────────

/// Declared domain range for a numeric clinical field.
///
/// An open upper bound (`hi: None`) means "any non-negative value".
/// Out-of-range values are rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lo: f64,
    pub hi: Option<f64>,
}

/// Percentages: lesion severity, ejection fraction, hematocrit, differential.
pub const PERCENT: Bounds = Bounds {
    lo: 0.0,
    hi: Some(100.0),
};

/// Valve stenosis/regurgitation severity, graded 0–4.
pub const GRADE: Bounds = Bounds {
    lo: 0.0,
    hi: Some(4.0),
};

/// Counts and concentrations with no meaningful upper bound.
pub const NON_NEGATIVE: Bounds = Bounds { lo: 0.0, hi: None };

impl Bounds {
    /// Check a value against this range, naming the field on failure.
    pub fn check(&self, field: &str, value: f64) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite {
                field: field.to_string(),
            });
        }
        match self.hi {
            Some(hi) if value < self.lo || value > hi => Err(ValidationError::OutOfRange {
                field: field.to_string(),
                lo: self.lo,
                hi,
                value,
            }),
            None if value < self.lo => Err(ValidationError::Negative {
                field: field.to_string(),
                value,
            }),
            _ => Ok(()),
        }
    }
}

/// A numeric leaf with its wire key, presentation metadata, declared bounds,
/// and current value. Blood panels expose their fields through this shape so
/// the validator and the prompt compiler cannot diverge.
#[derive(Debug, Clone, Copy)]
pub struct Metric {
    /// Wire-format key within the owning panel.
    pub key: &'static str,
    /// Human label used in the compiled prompt.
    pub label: &'static str,
    /// Unit suffix; empty for dimensionless quantities, `"%"` attaches
    /// without a space.
    pub unit: &'static str,
    pub bounds: Bounds,
    pub value: Option<f64>,
}

// ── Coronary angiography ───────────────────────────────────────────

/// Coronary artery segments, in the fixed canonical reporting order: left
/// coronary system first (main trunk, anterior descending, diagonals,
/// circumflex, obtuse marginals), then the right system. `Ord` follows
/// declaration order, so a `BTreeMap` keyed by segment always iterates
/// canonically regardless of how the caller populated it.
#[derive(
    Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum ArterySegment {
    /// Left main trunk
    LM,
    /// Left anterior descending, proximal segment
    LADprox,
    /// Left anterior descending, mid segment
    LADmid,
    /// Left anterior descending, distal segment
    LADdist,
    /// Diagonal branch 1
    D1,
    /// Diagonal branch 2
    D2,
    /// Left circumflex, proximal segment
    LCxprox,
    /// Left circumflex, distal segment
    LCxdist,
    /// Obtuse marginal branch 1
    OM1,
    /// Obtuse marginal branch 2
    OM2,
    /// Right coronary artery, proximal segment
    RCAprox,
    /// Right coronary artery, mid segment
    RCAmid,
    /// Right coronary artery, distal segment
    RCAdist,
    /// Posterior descending artery
    PDA,
    /// Posterolateral branches
    PL,
}

impl ArterySegment {
    /// All segments in canonical order.
    pub const ALL: [ArterySegment; 15] = [
        ArterySegment::LM,
        ArterySegment::LADprox,
        ArterySegment::LADmid,
        ArterySegment::LADdist,
        ArterySegment::D1,
        ArterySegment::D2,
        ArterySegment::LCxprox,
        ArterySegment::LCxdist,
        ArterySegment::OM1,
        ArterySegment::OM2,
        ArterySegment::RCAprox,
        ArterySegment::RCAmid,
        ArterySegment::RCAdist,
        ArterySegment::PDA,
        ArterySegment::PL,
    ];

    /// The wire-format code, also used verbatim in the compiled prompt.
    pub fn code(&self) -> &'static str {
        match self {
            ArterySegment::LM => "LM",
            ArterySegment::LADprox => "LADprox",
            ArterySegment::LADmid => "LADmid",
            ArterySegment::LADdist => "LADdist",
            ArterySegment::D1 => "D1",
            ArterySegment::D2 => "D2",
            ArterySegment::LCxprox => "LCxprox",
            ArterySegment::LCxdist => "LCxdist",
            ArterySegment::OM1 => "OM1",
            ArterySegment::OM2 => "OM2",
            ArterySegment::RCAprox => "RCAprox",
            ArterySegment::RCAmid => "RCAmid",
            ArterySegment::RCAdist => "RCAdist",
            ArterySegment::PDA => "PDA",
            ArterySegment::PL => "PL",
        }
    }
}

/// Coronary angiography findings.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CoronaryAngiography {
    /// Lesion severity percentage per affected artery segment. An empty map
    /// means angiography found no significant lesions.
    #[serde(
        rename = "affectedArteries",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub arteries: BTreeMap<ArterySegment, f64>,

    /// Ejection fraction (EF, %).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ejection_fraction: Option<f64>,
}

// ── Echocardiography ───────────────────────────────────────────────

/// Global contractility assessment.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contractility {
    Impaired,
    #[serde(rename = "Not impaired")]
    NotImpaired,
}

impl std::fmt::Display for Contractility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Contractility::Impaired => write!(f, "Impaired"),
            Contractility::NotImpaired => write!(f, "Not impaired"),
        }
    }
}

/// The four heart valves, in canonical reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Valve {
    Aortic,
    Mitral,
    Tricuspid,
    Pulmonary,
}

impl Valve {
    /// Wire-format key within [`EchoFindings`].
    pub fn code(&self) -> &'static str {
        match self {
            Valve::Aortic => "aortic",
            Valve::Mitral => "mitral",
            Valve::Tricuspid => "tricuspid",
            Valve::Pulmonary => "pulmonary",
        }
    }

    /// Human label used in the compiled prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Valve::Aortic => "Aortic",
            Valve::Mitral => "Mitral",
            Valve::Tricuspid => "Tricuspid",
            Valve::Pulmonary => "Pulmonary",
        }
    }
}

/// Stenosis and regurgitation grades for one valve, each 0–4.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValveFindings {
    /// Stenosis grade (0–4).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stenosis: Option<u8>,
    /// Regurgitation (insufficiency) grade (0–4).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regurgitation: Option<u8>,
}

impl ValveFindings {
    /// True when neither grade is recorded.
    pub fn is_empty(&self) -> bool {
        self.stenosis.is_none() && self.regurgitation.is_none()
    }
}

/// Echocardiography findings.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EchoFindings {
    /// Global contractility assessment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_contractility: Option<Contractility>,

    /// Aortic valve grades.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aortic: Option<ValveFindings>,
    /// Mitral valve grades.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitral: Option<ValveFindings>,
    /// Tricuspid valve grades.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tricuspid: Option<ValveFindings>,
    /// Pulmonary valve grades.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pulmonary: Option<ValveFindings>,
}

impl EchoFindings {
    /// Valve findings in canonical order.
    pub fn valves(&self) -> [(Valve, Option<&ValveFindings>); 4] {
        [
            (Valve::Aortic, self.aortic.as_ref()),
            (Valve::Mitral, self.mitral.as_ref()),
            (Valve::Tricuspid, self.tricuspid.as_ref()),
            (Valve::Pulmonary, self.pulmonary.as_ref()),
        ]
    }

    /// True when no leaf is recorded at all.
    pub fn is_empty(&self) -> bool {
        self.global_contractility.is_none()
            && self
                .valves()
                .iter()
                .all(|(_, findings)| findings.is_none_or(|f| f.is_empty()))
    }
}

// ── Blood panel ────────────────────────────────────────────────────

/// Complete blood count (CBC) metrics.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompleteBloodCount {
    /// Hemoglobin (Hb) level (g/L).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hemoglobin: Option<f64>,
    /// Red blood cell (RBC) count (×10¹²/L).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red_blood_cells: Option<f64>,
    /// Hematocrit (Ht, %).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hematocrit: Option<f64>,
    /// Color index (MCH/MCHC derived, dimensionless).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_index: Option<f64>,
    /// Mean corpuscular volume (MCV, fL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_corpuscular_volume: Option<f64>,
    /// Platelet (PLT) count (×10⁹/L).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platelets: Option<f64>,
    /// White blood cell (WBC) count (×10⁹/L).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub white_blood_cells: Option<f64>,
}

impl CompleteBloodCount {
    /// All metrics in schema order, present or not.
    pub fn metrics(&self) -> [Metric; 7] {
        [
            Metric {
                key: "hemoglobin",
                label: "Hemoglobin",
                unit: "g/L",
                bounds: NON_NEGATIVE,
                value: self.hemoglobin,
            },
            Metric {
                key: "redBloodCells",
                label: "Red Blood Cells",
                unit: "×10¹²/L",
                bounds: NON_NEGATIVE,
                value: self.red_blood_cells,
            },
            Metric {
                key: "hematocrit",
                label: "Hematocrit",
                unit: "%",
                bounds: PERCENT,
                value: self.hematocrit,
            },
            Metric {
                key: "colorIndex",
                label: "Color Index",
                unit: "",
                bounds: NON_NEGATIVE,
                value: self.color_index,
            },
            Metric {
                key: "meanCorpuscularVolume",
                label: "Mean Corpuscular Volume",
                unit: "fL",
                bounds: NON_NEGATIVE,
                value: self.mean_corpuscular_volume,
            },
            Metric {
                key: "platelets",
                label: "Platelets",
                unit: "×10⁹/L",
                bounds: NON_NEGATIVE,
                value: self.platelets,
            },
            Metric {
                key: "whiteBloodCells",
                label: "White Blood Cells",
                unit: "×10⁹/L",
                bounds: NON_NEGATIVE,
                value: self.white_blood_cells,
            },
        ]
    }
}

/// White blood cell differential, six percentages.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WbcDifferential {
    /// Band neutrophils (%).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_neutrophils: Option<f64>,
    /// Segmented neutrophils (%).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segmented_neutrophils: Option<f64>,
    /// Eosinophils (%).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eosinophils: Option<f64>,
    /// Basophils (%).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basophils: Option<f64>,
    /// Lymphocytes (%).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lymphocytes: Option<f64>,
    /// Monocytes (%).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monocytes: Option<f64>,
}

impl WbcDifferential {
    /// All metrics in schema order, present or not.
    pub fn metrics(&self) -> [Metric; 6] {
        [
            Metric {
                key: "bandNeutrophils",
                label: "Band Neutrophils",
                unit: "%",
                bounds: PERCENT,
                value: self.band_neutrophils,
            },
            Metric {
                key: "segmentedNeutrophils",
                label: "Segmented Neutrophils",
                unit: "%",
                bounds: PERCENT,
                value: self.segmented_neutrophils,
            },
            Metric {
                key: "eosinophils",
                label: "Eosinophils",
                unit: "%",
                bounds: PERCENT,
                value: self.eosinophils,
            },
            Metric {
                key: "basophils",
                label: "Basophils",
                unit: "%",
                bounds: PERCENT,
                value: self.basophils,
            },
            Metric {
                key: "lymphocytes",
                label: "Lymphocytes",
                unit: "%",
                bounds: PERCENT,
                value: self.lymphocytes,
            },
            Metric {
                key: "monocytes",
                label: "Monocytes",
                unit: "%",
                bounds: PERCENT,
                value: self.monocytes,
            },
        ]
    }
}

/// Sedimentation rate and reticulocytes.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalMarkers {
    /// Erythrocyte sedimentation rate (ESR, mm/h).
    #[serde(rename = "ESR", default, skip_serializing_if = "Option::is_none")]
    pub esr: Option<f64>,
    /// Reticulocytes (%).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reticulocytes: Option<f64>,
}

impl AdditionalMarkers {
    /// All metrics in schema order, present or not.
    pub fn metrics(&self) -> [Metric; 2] {
        [
            Metric {
                key: "ESR",
                label: "ESR",
                unit: "mm/h",
                bounds: NON_NEGATIVE,
                value: self.esr,
            },
            Metric {
                key: "reticulocytes",
                label: "Reticulocytes",
                unit: "%",
                bounds: PERCENT,
                value: self.reticulocytes,
            },
        ]
    }
}

/// Cardiac injury markers.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardiacMarkers {
    /// Troponin T (cTnT) level (ng/mL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub troponin_t: Option<f64>,
    /// Creatine kinase (CK) level (U/L).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creatine_kinase: Option<f64>,
    /// CK-MB level (U/L).
    #[serde(rename = "ckMB", default, skip_serializing_if = "Option::is_none")]
    pub ck_mb: Option<f64>,
}

impl CardiacMarkers {
    /// All metrics in schema order, present or not.
    pub fn metrics(&self) -> [Metric; 3] {
        [
            Metric {
                key: "troponinT",
                label: "Troponin T",
                unit: "ng/mL",
                bounds: NON_NEGATIVE,
                value: self.troponin_t,
            },
            Metric {
                key: "creatineKinase",
                label: "Creatine Kinase",
                unit: "U/L",
                bounds: NON_NEGATIVE,
                value: self.creatine_kinase,
            },
            Metric {
                key: "ckMB",
                label: "CK-MB",
                unit: "U/L",
                bounds: NON_NEGATIVE,
                value: self.ck_mb,
            },
        ]
    }
}

/// One sub-panel of the blood test record, flattened for iteration.
#[derive(Debug, Clone)]
pub struct BloodSubPanel {
    /// Wire-format key within [`BloodPanel`].
    pub key: &'static str,
    /// Section heading used in the compiled prompt.
    pub heading: &'static str,
    /// Clause emitted when the sub-panel is absent.
    pub missing_clause: &'static str,
    /// `None` when the sub-panel is absent; otherwise its metrics.
    pub metrics: Option<Vec<Metric>>,
}

/// Blood test results, grouped into four optional sub-panels.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BloodPanel {
    /// Complete blood count (CBC) parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete_blood_count: Option<CompleteBloodCount>,
    /// WBC differential parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wbc_differential: Option<WbcDifferential>,
    /// Additional markers (ESR, reticulocytes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_markers: Option<AdditionalMarkers>,
    /// Cardiac injury marker levels.
    #[serde(
        rename = "cardiomarkers",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cardiac_markers: Option<CardiacMarkers>,
}

impl BloodPanel {
    /// The four sub-panels in schema order, with their prompt headings and
    /// missing-data clauses.
    pub fn sub_panels(&self) -> [BloodSubPanel; 4] {
        [
            BloodSubPanel {
                key: "completeBloodCount",
                heading: "Complete Blood Count:",
                missing_clause: "No complete blood count data provided.",
                metrics: self
                    .complete_blood_count
                    .as_ref()
                    .map(|p| p.metrics().to_vec()),
            },
            BloodSubPanel {
                key: "wbcDifferential",
                heading: "WBC Differential:",
                missing_clause: "No WBC differential data provided.",
                metrics: self.wbc_differential.as_ref().map(|p| p.metrics().to_vec()),
            },
            BloodSubPanel {
                key: "additionalMarkers",
                heading: "Additional Markers:",
                missing_clause: "No additional marker data provided.",
                metrics: self
                    .additional_markers
                    .as_ref()
                    .map(|p| p.metrics().to_vec()),
            },
            BloodSubPanel {
                key: "cardiomarkers",
                heading: "Cardiomarkers:",
                missing_clause: "No cardiomarker data provided.",
                metrics: self.cardiac_markers.as_ref().map(|p| p.metrics().to_vec()),
            },
        ]
    }
}

// ── Language ───────────────────────────────────────────────────────

/// Response locale for the diagnostic narrative.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    /// Default locale.
    #[default]
    English,
    Russian,
}

impl Language {
    /// The language name as it appears in the compiled prompt.
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Russian => "Russian",
        }
    }
}

// ── Top-level input and output ─────────────────────────────────────

/// One patient's clinical measurements for a single diagnostic call.
///
/// Constructed fresh per request and discarded afterwards; nothing here is
/// persisted by this crate.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalInput {
    /// Coronary angiography data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coronary_angiography: Option<CoronaryAngiography>,

    /// Echocardiography data.
    #[serde(rename = "echoCGData", default, skip_serializing_if = "Option::is_none")]
    pub echo: Option<EchoFindings>,

    /// Blood test results.
    #[serde(
        rename = "bloodTests",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub blood_tests: Option<BloodPanel>,

    /// Preferred language for the analysis.
    #[serde(default)]
    pub language: Language,
}

/// The diagnostic opinion returned to the caller. All three fields are
/// mandatory; a reply missing any of them never leaves the output validator.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DiagnosticResult {
    /// The likely diagnosis based on the provided data.
    pub diagnosis: String,
    /// Whether surgical intervention is likely needed.
    pub surgical_intervention_needed: bool,
    /// The rationale behind the diagnosis and intervention assessment.
    pub rationale: String,
}
