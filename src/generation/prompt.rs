//! Prompt construction from the form fields.

/// Always appended so the provider renders legible text.
pub const STYLE_CLAUSE: &str =
    "clear readable text, modern typography, high contrast, professional composition";

const DEFAULT_SUBJECT: &str = "an event";

/// Descriptive fields of a generation request. Empty strings count as absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PromptFields<'a> {
    pub generation_type: Option<&'a str>,
    pub event_name: Option<&'a str>,
    pub theme: Option<&'a str>,
    pub location: Option<&'a str>,
    pub date: Option<&'a str>,
    pub event_type: Option<&'a str>,
    pub extra_prompt: Option<&'a str>,
}

impl PromptFields<'_> {
    /// True when no field would contribute anything beyond the fixed
    /// subject and style clause. `generation_type` only picks the label.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        [
            self.event_name,
            self.theme,
            self.location,
            self.date,
            self.event_type,
            self.extra_prompt,
        ]
        .into_iter()
        .all(|field| present(field).is_none())
    }
}

fn present(field: Option<&str>) -> Option<&str> {
    field.filter(|value| !value.is_empty())
}

/// Join the non-empty segments in a fixed order with `", "`.
///
/// The label is `Logo` only for the exact value `"logo"`; anything else,
/// including no value, is a `Poster`.
#[must_use]
pub fn build_prompt(fields: &PromptFields<'_>) -> String {
    let label = if fields.generation_type == Some("logo") {
        "Logo"
    } else {
        "Poster"
    };
    let subject = present(fields.event_name).unwrap_or(DEFAULT_SUBJECT);

    let segments = [
        Some(format!("{label} design for {subject}")),
        present(fields.theme).map(str::to_string),
        present(fields.location).map(|location| format!("Location: {location}")),
        present(fields.event_type).map(|event_type| format!("{event_type} theme")),
        present(fields.date).map(|date| format!("Date: {date}")),
        Some(STYLE_CLAUSE.to_string()),
        present(fields.extra_prompt).map(str::to_string),
    ];

    segments.into_iter().flatten().collect::<Vec<_>>().join(", ")
}
