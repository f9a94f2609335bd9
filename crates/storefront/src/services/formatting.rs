//! French display formatting for templates and messages.

use chrono::{DateTime, Locale, NaiveDate, Utc};
use food_en_k_core::Price;
use rust_decimal::Decimal;
use url::Url;

use super::validation::ValidationErrors;

pub use food_en_k_core::format_french_phone as format_phone;

/// Format an amount as euros, `12,50 €`.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    Price::eur(amount).display()
}

/// Date rendering styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    /// `19/10/2026`
    #[default]
    Short,
    /// `lundi 19 octobre 2026`
    Long,
    /// `Il y a 3 jours`
    Relative,
}

/// Format an RFC 3339 timestamp or `YYYY-MM-DD` date.
///
/// Unparseable input renders as "Date invalide".
#[must_use]
pub fn format_date(input: &str, style: DateStyle, now: DateTime<Utc>) -> String {
    let parsed = DateTime::parse_from_rfc3339(input.trim())
        .map(|d| d.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|d| d.and_utc())
        });

    parsed.map_or_else(
        || "Date invalide".to_string(),
        |date| format_datetime(date, style, now),
    )
}

/// Format a timestamp.
#[must_use]
pub fn format_datetime(date: DateTime<Utc>, style: DateStyle, now: DateTime<Utc>) -> String {
    match style {
        DateStyle::Short => date.format("%d/%m/%Y").to_string(),
        DateStyle::Long => date
            .format_localized("%A %-d %B %Y", Locale::fr_FR)
            .to_string(),
        DateStyle::Relative => relative_time(date, now),
    }
}

/// "À l'instant", "Il y a 5 minutes", ... then the short date after 30 days.
#[must_use]
pub fn relative_time(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - date).num_seconds();

    match seconds {
        s if s < 60 => "À l'instant".to_string(),
        s if s < 3600 => format!("Il y a {} minutes", s / 60),
        s if s < 86_400 => format!("Il y a {} heures", s / 3600),
        s if s < 2_592_000 => format!("Il y a {} jours", s / 86_400),
        _ => format_datetime(date, DateStyle::Short, now),
    }
}

/// Cut `text` to at most `max_len` characters, ending with `suffix`.
#[must_use]
pub fn truncate_text(text: &str, max_len: usize, suffix: &str) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let keep = max_len.saturating_sub(suffix.chars().count());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(suffix);
    out
}

/// Uppercase the first letter, lowercase the rest.
#[must_use]
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

fn fold_accent(c: char) -> Option<&'static str> {
    Some(match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => "o",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'æ' => "ae",
        'œ' => "oe",
        _ => return None,
    })
}

/// URL slug: lowercase ASCII, accents folded, words joined by `-`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if let Some(replacement) = fold_accent(c) {
            folded.push_str(replacement);
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            folded.push(c);
        } else if c.is_whitespace() {
            folded.push(' ');
        }
    }

    let mut slug = String::with_capacity(folded.len());
    for c in folded.split_whitespace().collect::<Vec<_>>().join("-").chars() {
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug.trim_matches('-').to_string()
}

/// Group an integer string by thousands with narrow no-break spaces.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('\u{202f}');
        }
        out.push(c);
    }
    out
}

/// fr-FR number, at most 3 decimals: `1 234,5`.
#[must_use]
pub fn format_number(value: Decimal) -> String {
    let rounded = value.round_dp(3).normalize();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push(',');
        out.push_str(frac_part);
    }
    out
}

/// `0.256` with 1 decimal -> `25.6%`.
#[must_use]
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value * 100.0)
}

/// Human file size in binary units: `1.5 KB`.
#[must_use]
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    #[allow(clippy::cast_precision_loss)]
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    let rounded = (size * 100.0).round() / 100.0;
    let label = UNITS.get(unit).copied().unwrap_or("GB");
    format!("{rounded} {label}")
}

/// `#ff8000` (or `ff8000`) to `(255, 128, 0)`.
#[must_use]
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[must_use]
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// One line for a field's errors: the error itself when there is only one,
/// else `field: a, b`.
#[must_use]
pub fn format_validation_error(field: &str, errors: &[String]) -> String {
    match errors {
        [] => String::new(),
        [only] => only.clone(),
        _ => format!("{field}: {}", errors.join(", ")),
    }
}

/// One line per field with errors, in field order.
#[must_use]
pub fn format_validation_summary(errors: &ValidationErrors) -> Vec<String> {
    errors
        .iter()
        .filter(|(_, messages)| !messages.is_empty())
        .map(|(field, messages)| format_validation_error(field, messages))
        .collect()
}

/// Prefix `https://` when the URL has no scheme.
#[must_use]
pub fn ensure_https(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Host name of a URL, or the input when it does not parse.
#[must_use]
pub fn extract_domain(url: &str) -> String {
    Url::parse(&ensure_https(url))
        .ok()
        .and_then(|u| u.host_str().map(ToString::to_string))
        .unwrap_or_else(|| url.to_string())
}
