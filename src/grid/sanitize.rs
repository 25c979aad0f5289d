//! Repairs text pasted out of spreadsheets whose UTF-8 bytes were decoded as Windows-1252.

use regex::Captures;
use regex::Regex;
use std::sync::LazyLock;

/// Characters that carry no visible content and are dropped outright.
static INVISIBLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[\u{200B}\u{FEFF}\u{FFFD}]").expect("Hardcode regex pattern")
});

/// Mis-decoded sequences, longest alternatives first.
static MOJIBAKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("â€\u{201D}|â€\u{2014}|â€\u{201C}|â€\u{2013}|â€˜|â€™|â€œ|â€\u{9D}|Â°|Âµ|Â±|Â\u{A0}|\u{A0}")
        .expect("Hardcode regex pattern")
});

/// Maps a mis-decoded sequence to the character that was meant.
fn intended(sequence: &str) -> &'static str {
    match sequence {
        "â€\u{201D}" | "â€\u{2014}" => "—",
        "â€\u{201C}" | "â€\u{2013}" => "–",
        "â€˜" => "‘",
        "â€™" => "’",
        "â€œ" => "“",
        "â€\u{9D}" => "”",
        "Â°" => "°",
        "Âµ" => "µ",
        "Â±" => "±",
        _ => " ",
    }
}

/// Cleans a single cell: drops invisible characters, repairs mojibake and trims.
///
/// Replacement is repeated until no known sequence remains, so the result is a
/// fixed point and `sanitize(&sanitize(s)) == sanitize(s)` for any input.
pub fn sanitize(cell: &str) -> String {
    let mut text = INVISIBLE.replace_all(cell, "").into_owned();
    while MOJIBAKE.is_match(&text) {
        text = MOJIBAKE
            .replace_all(&text, |captures: &Captures| intended(&captures[0]))
            .into_owned();
    }
    text.trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sanitize_repairs_dashes_and_degrees() {
        assert_eq!(sanitize("1530â€\u{201C}1565 nm"), "1530–1565 nm");
        assert_eq!(sanitize("Indicator â€\u{201D} Min"), "Indicator — Min");
        assert_eq!(sanitize("Indicator â€\u{2014} Min"), "Indicator — Min");
        assert_eq!(sanitize("-40 Â°C"), "-40 °C");
        assert_eq!(sanitize("Â±0.5 Âµm"), "±0.5 µm");
    }

    #[test]
    fn sanitize_handles_spaces_and_invisible_characters() {
        assert_eq!(sanitize("\u{A0}\u{A0}Power\u{200B}"), "Power");
        assert_eq!(sanitize("10\u{A0}mW"), "10 mW");
        assert_eq!(sanitize("10Â\u{A0}mW"), "10 mW");
        assert_eq!(sanitize("\u{FEFF}Parameter"), "Parameter");
        assert_eq!(sanitize("\u{FFFD}"), "");
        assert_eq!(sanitize(" \u{200B} "), "");
    }

    #[test]
    fn sanitize_passes_unknown_text_through_trimmed() {
        assert_eq!(sanitize("  Wavelength  "), "Wavelength");
        assert_eq!(sanitize("Ã©"), "Ã©");
    }

    #[test]
    fn sanitize_reaches_fixed_point_on_nested_sequences() {
        // The inner "Â°" repairs to "°", which completes a second "Â°".
        assert_eq!(sanitize("ÂÂ°"), "°");
        // Dropping the zero-width space exposes an em dash sequence.
        assert_eq!(sanitize("â€\u{200B}\u{201D}"), "—");
    }

    proptest! {
        #[test]
        fn sanitize_is_idempotent(cell in "[aÂâ€\u{201C}\u{201D}°\u{A0}\u{200B} ]{0,12}") {
            let once = sanitize(&cell);
            prop_assert_eq!(sanitize(&once), once);
        }
    }
}
