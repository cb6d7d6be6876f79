//! Prompt compilation: deterministic rendering of a [`ClinicalInput`] into
//! the natural-language instruction document sent to the reasoning engine.
//!
//! [`compile`] is a pure function: identical inputs yield byte-identical
//! [`PromptDocument`]s, which is what makes the outbound clinical narrative
//! cacheable, testable, and auditable. Every top-level section is always
//! mentioned; an absent sub-record gets an explicit "no data provided"
//! clause so the engine can distinguish "missing" from "not asked about",
//! and a present-but-empty angiography renders as "no lesions detected"
//! rather than "no data". Artery lines follow the schema's canonical order,
//! not the caller's insertion order.

pub mod builder;
pub mod locale;

pub use builder::PromptBuilder;

use crate::schema::{
    BloodPanel, ClinicalInput, CoronaryAngiography, DiagnosticResult, EchoFindings, Language,
    Metric,
};

/// Clause emitted when coronary angiography was not performed.
pub const NO_ANGIOGRAPHY_CLAUSE: &str = "No coronary angiography data provided.";
/// Clause emitted when echocardiography was not performed.
pub const NO_ECHO_CLAUSE: &str = "No Echo CG data provided.";
/// Clause emitted when no blood tests were supplied.
pub const NO_BLOOD_CLAUSE: &str = "No blood test data provided.";
/// Line emitted when angiography was performed and found nothing.
pub const NO_LESIONS_CLAUSE: &str = "No significant arterial lesions detected.";

/// The compiled instruction document plus the output schema the engine must
/// conform to. Handed to the adapter unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptDocument {
    /// Natural-language instruction text.
    pub text: String,
    /// JSON Schema for [`DiagnosticResult`].
    pub output_schema: serde_json::Value,
}

/// Render a validated input into the instruction document.
pub fn compile(input: &ClinicalInput) -> PromptDocument {
    let preamble = format!(
        "You are an expert cardiologist providing diagnostic assistance based on patient data.\n\
         \n\
         Analyze the following patient data to determine a likely diagnosis and assess the \
         necessity for surgical intervention. Provide a clear rationale for your assessment. {}",
        locale::response_instruction(input.language)
    );

    let text = PromptBuilder::new(preamble)
        .section(
            "Coronary Angiography Data",
            render_angiography(input.coronary_angiography.as_ref()),
        )
        .section("Echo CG Data", render_echo(input.echo.as_ref(), input.language))
        .section("Blood Test Results", render_blood(input.blood_tests.as_ref()))
        .raw(
            "Based on this information, provide a diagnosis, whether surgical intervention \
             is needed, and a rationale.",
        )
        .build();

    PromptDocument {
        text,
        output_schema: crate::json_schema_for::<DiagnosticResult>(),
    }
}

fn render_angiography(angio: Option<&CoronaryAngiography>) -> String {
    let Some(angio) = angio else {
        return NO_ANGIOGRAPHY_CLAUSE.to_string();
    };

    let mut lines = Vec::new();
    if angio.arteries.is_empty() {
        lines.push(NO_LESIONS_CLAUSE.to_string());
    } else {
        lines.push("Affected Arteries:".to_string());
        // BTreeMap iteration gives the canonical segment order.
        for (segment, severity) in &angio.arteries {
            lines.push(format!("{}: {severity}%", segment.code()));
        }
    }
    if let Some(ef) = angio.ejection_fraction {
        lines.push(format!("Ejection Fraction (EF): {ef}%"));
    }
    lines.join("\n")
}

fn render_echo(echo: Option<&EchoFindings>, language: Language) -> String {
    let Some(echo) = echo else {
        return NO_ECHO_CLAUSE.to_string();
    };
    if echo.is_empty() {
        return "Echo CG performed, no findings recorded.".to_string();
    }

    let mut lines = Vec::new();
    if let Some(contractility) = echo.global_contractility {
        lines.push(format!("Global Contractility: {contractility}"));
    }
    for (valve, findings) in echo.valves() {
        let Some(findings) = findings else { continue };
        if let Some(grade) = findings.stenosis {
            lines.push(format!("{}: {grade}", locale::stenosis_label(valve.label())));
        }
        if let Some(grade) = findings.regurgitation {
            lines.push(format!(
                "{}: {grade}",
                locale::regurgitation_label(valve.label(), language)
            ));
        }
    }
    lines.join("\n")
}

fn render_blood(blood: Option<&BloodPanel>) -> String {
    let Some(blood) = blood else {
        return NO_BLOOD_CLAUSE.to_string();
    };

    let mut lines = Vec::new();
    for panel in blood.sub_panels() {
        match panel.metrics {
            None => lines.push(panel.missing_clause.to_string()),
            Some(metrics) => {
                lines.push(panel.heading.to_string());
                let set: Vec<(&Metric, f64)> = metrics
                    .iter()
                    .filter_map(|m| m.value.map(|v| (m, v)))
                    .collect();
                if set.is_empty() {
                    lines.push("No values recorded.".to_string());
                } else {
                    for (metric, value) in set {
                        lines.push(metric_line(metric, value));
                    }
                }
            }
        }
    }
    lines.join("\n")
}

fn metric_line(metric: &Metric, value: f64) -> String {
    match metric.unit {
        "" => format!("{}: {value}", metric.label),
        "%" => format!("{}: {value}%", metric.label),
        unit => format!("{}: {value} {unit}", metric.label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{
        AdditionalMarkers, ArterySegment, CardiacMarkers, CompleteBloodCount, Contractility,
        ValveFindings, WbcDifferential,
    };
    use std::collections::BTreeMap;

    fn example_input() -> ClinicalInput {
        // The worked scenario: LM 70%, EF 45%, everything else absent.
        ClinicalInput {
            coronary_angiography: Some(CoronaryAngiography {
                arteries: BTreeMap::from([(ArterySegment::LM, 70.0)]),
                ejection_fraction: Some(45.0),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn example_scenario_renders_expected_lines() {
        let doc = compile(&example_input());
        assert!(doc.text.contains("LM: 70%"));
        assert!(doc.text.contains("Ejection Fraction (EF): 45%"));
        assert!(doc.text.contains(NO_ECHO_CLAUSE));
        assert!(doc.text.contains(NO_BLOOD_CLAUSE));
        assert!(doc.text.contains("Respond in English."));
    }

    #[test]
    fn compilation_is_deterministic() {
        let input = example_input();
        let first = compile(&input);
        let second = compile(&input);
        assert_eq!(first.text, second.text);
        assert_eq!(first.output_schema, second.output_schema);
    }

    #[test]
    fn absent_angiography_gets_explicit_marker() {
        let doc = compile(&ClinicalInput::default());
        assert!(doc.text.contains(NO_ANGIOGRAPHY_CLAUSE));
        assert!(doc.text.contains(NO_ECHO_CLAUSE));
        assert!(doc.text.contains(NO_BLOOD_CLAUSE));
    }

    #[test]
    fn empty_angiography_means_no_lesions_not_no_data() {
        let input = ClinicalInput {
            coronary_angiography: Some(CoronaryAngiography::default()),
            ..Default::default()
        };
        let doc = compile(&input);
        assert!(doc.text.contains(NO_LESIONS_CLAUSE));
        assert!(!doc.text.contains(NO_ANGIOGRAPHY_CLAUSE));
    }

    #[test]
    fn artery_order_is_canonical_not_insertion_order() {
        let mut forward = ClinicalInput::default();
        let mut angio = CoronaryAngiography::default();
        angio.arteries.insert(ArterySegment::LM, 70.0);
        angio.arteries.insert(ArterySegment::RCAprox, 80.0);
        angio.arteries.insert(ArterySegment::D1, 30.0);
        forward.coronary_angiography = Some(angio);

        let mut reversed = ClinicalInput::default();
        let mut angio = CoronaryAngiography::default();
        angio.arteries.insert(ArterySegment::D1, 30.0);
        angio.arteries.insert(ArterySegment::RCAprox, 80.0);
        angio.arteries.insert(ArterySegment::LM, 70.0);
        reversed.coronary_angiography = Some(angio);

        let first = compile(&forward);
        let second = compile(&reversed);
        assert_eq!(first.text, second.text);

        let lm = first.text.find("LM: 70%").unwrap();
        let d1 = first.text.find("D1: 30%").unwrap();
        let rca = first.text.find("RCAprox: 80%").unwrap();
        assert!(lm < d1 && d1 < rca, "left system must precede right system");
    }

    #[test]
    fn echo_renders_only_set_fields() {
        let input = ClinicalInput {
            echo: Some(EchoFindings {
                global_contractility: Some(Contractility::Impaired),
                mitral: Some(ValveFindings {
                    stenosis: Some(3),
                    regurgitation: Some(2),
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let doc = compile(&input);
        assert!(doc.text.contains("Global Contractility: Impaired"));
        assert!(doc.text.contains("Mitral Stenosis: 3"));
        assert!(doc.text.contains("Mitral Regurgitation (Insufficiency): 2"));
        assert!(!doc.text.contains("Aortic"));
        assert!(!doc.text.contains(NO_ECHO_CLAUSE));
    }

    #[test]
    fn russian_locale_changes_instruction_and_gloss() {
        let input = ClinicalInput {
            language: Language::Russian,
            echo: Some(EchoFindings {
                aortic: Some(ValveFindings {
                    stenosis: None,
                    regurgitation: Some(1),
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let doc = compile(&input);
        assert!(doc.text.contains("Respond in Russian."));
        assert!(doc.text.contains("Недостаточность"));
    }

    #[test]
    fn blood_sub_panels_render_independently() {
        let input = ClinicalInput {
            blood_tests: Some(BloodPanel {
                complete_blood_count: Some(CompleteBloodCount {
                    hemoglobin: Some(140.0),
                    hematocrit: Some(42.0),
                    color_index: Some(0.9),
                    ..Default::default()
                }),
                wbc_differential: None,
                additional_markers: Some(AdditionalMarkers {
                    esr: Some(12.0),
                    reticulocytes: None,
                }),
                cardiac_markers: Some(CardiacMarkers {
                    troponin_t: Some(0.02),
                    ..Default::default()
                }),
            }),
            ..Default::default()
        };
        let doc = compile(&input);
        assert!(doc.text.contains("Hemoglobin: 140 g/L"));
        assert!(doc.text.contains("Hematocrit: 42%"));
        assert!(doc.text.contains("Color Index: 0.9"));
        assert!(doc.text.contains("No WBC differential data provided."));
        assert!(doc.text.contains("ESR: 12 mm/h"));
        assert!(doc.text.contains("Troponin T: 0.02 ng/mL"));
        assert!(!doc.text.contains(NO_BLOOD_CLAUSE));
    }

    #[test]
    fn unset_differential_fields_are_skipped() {
        let input = ClinicalInput {
            blood_tests: Some(BloodPanel {
                wbc_differential: Some(WbcDifferential {
                    lymphocytes: Some(35.0),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let doc = compile(&input);
        assert!(doc.text.contains("Lymphocytes: 35%"));
        assert!(!doc.text.contains("Monocytes"));
    }

    #[test]
    fn output_schema_is_the_result_schema() {
        let doc = compile(&ClinicalInput::default());
        assert_eq!(doc.output_schema["required"].as_array().unwrap().len(), 3);
    }
}
