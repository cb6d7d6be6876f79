//! Input validation: typing plus bounds enforcement, applied before any
//! prompt is built.
//!
//! [`parse`] turns a loosely typed JSON payload into a [`ClinicalInput`];
//! [`validate`] checks every present numeric leaf against the range the
//! schema declares for it. Both are pure functions. Fields absent from the
//! input stay absent; nothing is defaulted here except `language`, which
//! serde defaults to English during typing.

use serde_json::Value;
use tracing::trace;

use crate::error::ValidationError;
use crate::schema::{ClinicalInput, GRADE, PERCENT};

/// Type a raw JSON value against the clinical schema.
pub fn parse(raw: &Value) -> Result<ClinicalInput, ValidationError> {
    serde_json::from_value(raw.clone()).map_err(|e| ValidationError::Malformed(e.to_string()))
}

/// Type a raw JSON string against the clinical schema.
pub fn parse_str(raw: &str) -> Result<ClinicalInput, ValidationError> {
    serde_json::from_str(raw).map_err(|e| ValidationError::Malformed(e.to_string()))
}

/// Check every present numeric field against its declared domain range.
///
/// The first violation is returned, naming the offending field path and the
/// constraint it broke. Values outside range are rejected, never clamped.
pub fn validate(input: &ClinicalInput) -> Result<(), ValidationError> {
    if let Some(angio) = &input.coronary_angiography {
        for (segment, value) in &angio.arteries {
            let field = format!("coronaryAngiography.affectedArteries.{}", segment.code());
            PERCENT.check(&field, *value)?;
        }
        if let Some(ef) = angio.ejection_fraction {
            PERCENT.check("coronaryAngiography.ejectionFraction", ef)?;
        }
    }

    if let Some(echo) = &input.echo {
        for (valve, findings) in echo.valves() {
            let Some(findings) = findings else { continue };
            if let Some(grade) = findings.stenosis {
                let field = format!("echoCGData.{}.stenosis", valve.code());
                GRADE.check(&field, f64::from(grade))?;
            }
            if let Some(grade) = findings.regurgitation {
                let field = format!("echoCGData.{}.regurgitation", valve.code());
                GRADE.check(&field, f64::from(grade))?;
            }
        }
    }

    if let Some(blood) = &input.blood_tests {
        for panel in blood.sub_panels() {
            let Some(metrics) = panel.metrics else { continue };
            for metric in metrics {
                if let Some(value) = metric.value {
                    let field = format!("bloodTests.{}.{}", panel.key, metric.key);
                    metric.bounds.check(&field, value)?;
                }
            }
        }
    }

    trace!("clinical input validated");
    Ok(())
}

/// Type and bounds-check in one step.
pub fn parse_and_validate(raw: &Value) -> Result<ClinicalInput, ValidationError> {
    let input = parse(raw)?;
    validate(&input)?;
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{
        ArterySegment, BloodPanel, CompleteBloodCount, CoronaryAngiography, EchoFindings,
        ValveFindings, WbcDifferential,
    };
    use serde_json::json;
    use std::collections::BTreeMap;

    fn angio_input(ef: Option<f64>) -> ClinicalInput {
        ClinicalInput {
            coronary_angiography: Some(CoronaryAngiography {
                arteries: BTreeMap::from([(ArterySegment::LM, 70.0)]),
                ejection_fraction: ef,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn empty_input_is_valid() {
        assert!(validate(&ClinicalInput::default()).is_ok());
    }

    #[test]
    fn lesion_bounds_edges_pass() {
        for value in [0.0, 55.0, 100.0] {
            let input = ClinicalInput {
                coronary_angiography: Some(CoronaryAngiography {
                    arteries: BTreeMap::from([(ArterySegment::RCAmid, value)]),
                    ejection_fraction: None,
                }),
                ..Default::default()
            };
            assert!(validate(&input).is_ok(), "value {value} should pass");
        }
    }

    #[test]
    fn out_of_range_ejection_fraction_names_the_field() {
        let input = angio_input(Some(130.0));
        let err = validate(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "coronaryAngiography.ejectionFraction must be within [0, 100], got 130"
        );
    }

    #[test]
    fn out_of_range_lesion_names_the_segment() {
        let input = ClinicalInput {
            coronary_angiography: Some(CoronaryAngiography {
                arteries: BTreeMap::from([(ArterySegment::LADprox, 101.0)]),
                ejection_fraction: None,
            }),
            ..Default::default()
        };
        let err = validate(&input).unwrap_err();
        assert!(
            err.to_string()
                .contains("coronaryAngiography.affectedArteries.LADprox")
        );
    }

    #[test]
    fn valve_grade_above_four_rejected() {
        let input = ClinicalInput {
            echo: Some(EchoFindings {
                mitral: Some(ValveFindings {
                    stenosis: Some(5),
                    regurgitation: None,
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = validate(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "echoCGData.mitral.stenosis must be within [0, 4], got 5"
        );
    }

    #[test]
    fn valve_grade_edges_pass() {
        for grade in [0u8, 2, 4] {
            let input = ClinicalInput {
                echo: Some(EchoFindings {
                    tricuspid: Some(ValveFindings {
                        stenosis: None,
                        regurgitation: Some(grade),
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            };
            assert!(validate(&input).is_ok(), "grade {grade} should pass");
        }
    }

    #[test]
    fn negative_marker_rejected() {
        let input = ClinicalInput {
            blood_tests: Some(BloodPanel {
                complete_blood_count: Some(CompleteBloodCount {
                    hemoglobin: Some(-3.0),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = validate(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "bloodTests.completeBloodCount.hemoglobin must be non-negative, got -3"
        );
    }

    #[test]
    fn differential_percentage_above_hundred_rejected() {
        let input = ClinicalInput {
            blood_tests: Some(BloodPanel {
                wbc_differential: Some(WbcDifferential {
                    lymphocytes: Some(120.0),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = validate(&input).unwrap_err();
        assert!(
            err.to_string()
                .contains("bloodTests.wbcDifferential.lymphocytes")
        );
    }

    #[test]
    fn nan_is_rejected_not_accepted() {
        let input = angio_input(Some(f64::NAN));
        assert!(matches!(
            validate(&input),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn parse_rejects_non_conforming_payload() {
        let err = parse(&json!({ "coronaryAngiography": { "ejectionFraction": "high" } }))
            .unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }

    #[test]
    fn parse_rejects_unknown_artery_segment() {
        let err = parse(&json!({
            "coronaryAngiography": { "affectedArteries": { "XYZ": 50.0 } }
        }))
        .unwrap_err();
        assert!(matches!(err, ValidationError::Malformed(_)));
    }

    #[test]
    fn absent_sections_stay_absent_after_parse() {
        let input = parse(&json!({ "language": "Russian" })).unwrap();
        assert!(input.coronary_angiography.is_none());
        assert!(input.echo.is_none());
        assert!(input.blood_tests.is_none());
    }

    #[test]
    fn parse_and_validate_combines_both_failures() {
        assert!(matches!(
            parse_and_validate(&json!([1, 2, 3])),
            Err(ValidationError::Malformed(_))
        ));
        assert!(matches!(
            parse_and_validate(&json!({
                "coronaryAngiography": { "ejectionFraction": 130.0 }
            })),
            Err(ValidationError::OutOfRange { .. })
        ));
    }
}
