use chrono::{DateTime, Utc};

const FALLBACK_NAME: &str = "Resume";

/// `<Name>_CV_<yyyymmddHHMMSS>.pdf`, safe for a `Content-Disposition` header.
///
/// Whitespace runs in the name become a single `_`; anything that is not an ASCII
/// letter or digit is dropped. An empty result falls back to `Resume`.
pub fn export_filename(full_name: Option<&str>, at: DateTime<Utc>) -> String {
    format!(
        "{}_CV_{}.pdf",
        sanitize_name(full_name.unwrap_or_default()),
        at.format("%Y%m%d%H%M%S")
    )
}

fn sanitize_name(name: &str) -> String {
    let cleaned = name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned
    }
}
