use std::sync::LazyLock;

use regex::Regex;

/// Specialty used when the analysis names none.
pub const FALLBACK_SPECIALTY: &str = "General physician";

/// The specialties the analysis prompt asks the model to choose from.
pub const KNOWN_SPECIALTIES: [&str; 6] = [
    "General physician",
    "Neurologist",
    "Dermatologist",
    "Gastroenterologist",
    "Gynecologist",
    "Pediatricians",
];

// `\s*` may cross a line break, `.+` stops at the end of the line
static RECOMMENDED_DOCTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Recommended Doctor:\s*(.+)").expect("specialty pattern is valid")
});

/// Extract the specialty named on the `Recommended Doctor:` line of an analysis.
///
/// The label is matched case-insensitively and the rest of its line is
/// returned trimmed. Returns `None` when the label is absent or nothing
/// follows it.
///
/// ```
/// use smart_health::extract_specialty;
///
/// let analysis = "Self-Care: rest\nRecommended Doctor: Dermatologist\n";
/// assert_eq!(extract_specialty(analysis).as_deref(), Some("Dermatologist"));
/// assert_eq!(extract_specialty("no label here"), None);
/// ```
pub fn extract_specialty(analysis: &str) -> Option<String> {
    let captures = RECOMMENDED_DOCTOR.captures(analysis)?;
    let specialty = captures.get(1)?.as_str().trim();
    if specialty.is_empty() {
        None
    } else {
        Some(specialty.to_string())
    }
}

/// Like [`extract_specialty`], falling back to [`FALLBACK_SPECIALTY`].
pub fn recommended_specialty(analysis: &str) -> String {
    extract_specialty(analysis).unwrap_or_else(|| FALLBACK_SPECIALTY.to_string())
}
