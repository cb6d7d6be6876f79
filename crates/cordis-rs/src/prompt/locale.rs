//! Locale-sensitive phrasing for the compiled prompt.
//!
//! The document structure is identical across locales; only the response
//! instruction and the regurgitation gloss vary. Russian clinicians know
//! valve regurgitation as "недостаточность", so the Russian rendering keeps
//! that gloss next to the English term.

use crate::schema::Language;

/// The line instructing the engine which language to respond in.
pub fn response_instruction(language: Language) -> String {
    format!("Respond in {}.", language.name())
}

/// Label for a valve regurgitation line, e.g.
/// `Aortic Regurgitation (Insufficiency)`.
pub fn regurgitation_label(valve_label: &str, language: Language) -> String {
    match language {
        Language::English => format!("{valve_label} Regurgitation (Insufficiency)"),
        Language::Russian => {
            format!("{valve_label} Regurgitation (Insufficiency / Недостаточность)")
        }
    }
}

/// Label for a valve stenosis line, e.g. `Aortic Stenosis`.
pub fn stenosis_label(valve_label: &str) -> String {
    format!("{valve_label} Stenosis")
}
