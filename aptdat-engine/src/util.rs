//! Airport name heuristics and the facility rating.
//!
//! apt.dat airport names carry bracketed indicator tokens (`[H]` for
//! heliports, `[X]` for closed fields, `[mil]`, ...) and arbitrary
//! capitalization; both are normalized before storage. Closed and
//! military status are derived from the raw name.

use regex::Regex;
use std::sync::OnceLock;

static NAME_INDICATOR: OnceLock<Regex> = OnceLock::new();

fn name_indicator() -> &'static Regex {
    NAME_INDICATOR.get_or_init(|| Regex::new(r"(?i)\[(h|s|g|x|mil)\]").unwrap())
}

/// Strip bracketed indicator tokens from the name and trim whitespace.
pub fn strip_name_indicators(name: &str) -> String {
    name_indicator().replace_all(name, "").trim().to_string()
}

/// A field is considered closed when the name says so, either spelled
/// out or with the `[X]` indicator.
pub fn is_name_closed(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("closed") || lower.contains("[x]")
}

// US/UK military facility abbreviations matched as whole words.
const MIL_WORDS: &[&str] = &[
    "AAF", "AB", "AFB", "AFLD", "AFS", "AHP", "ANGB", "ARB", "LRRS", "MCAF", "MCALF", "MCAS",
    "NAF", "NALF", "NAS", "NAWS", "NOLF", "NSB", "NSF", "NSY", "NWS", "RAF", "RNAS",
];

/// Heuristic military detection on the raw name, run before
/// capitalization.
pub fn is_name_military(name: &str) -> bool {
    let upper = name.to_uppercase();
    if upper.contains("MILITARY") || upper.contains("AIR BASE") || upper.contains("AIR FORCE") {
        return true;
    }
    upper
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|word| MIL_WORDS.contains(&word))
}

// Tokens kept fully uppercase when capitalizing.
const KEEP_UPPER: &[&str] = &[
    "AAF", "AB", "AFB", "AFS", "ANGB", "APT", "ARB", "CGAS", "FLD", "II", "III", "INTL", "IV",
    "LRRS", "MCAF", "MCAS", "NAF", "NAS", "RAF", "RNAS", "USAF", "USN",
];

/// Capitalize an airport name word by word, keeping known
/// abbreviations uppercase.
pub fn capitalize_airport_name(name: &str) -> String {
    let words: Vec<String> = name
        .split_whitespace()
        .map(|word| {
            let upper = word.to_uppercase();
            if KEEP_UPPER.contains(&upper.as_str()) {
                upper
            } else {
                capitalize_word(word)
            }
        })
        .collect();
    words.join(" ")
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Airport facility rating, 0 to 5: one point each for taxiways,
/// parking, aprons, a tower object and add-on/3D scenery.
pub fn airport_rating(
    is_addon: bool,
    is_3d: bool,
    has_tower: bool,
    num_taxi_path: i32,
    num_parking: i32,
    num_apron: i32,
) -> i32 {
    let mut rating = 0;
    if num_taxi_path > 0 {
        rating += 1;
    }
    if num_parking > 0 {
        rating += 1;
    }
    if num_apron > 0 {
        rating += 1;
    }
    if has_tower {
        rating += 1;
    }
    if is_addon || is_3d {
        rating += 1;
    }
    rating
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicators_are_stripped_case_insensitively() {
        assert_eq!(strip_name_indicators("[H] City Hospital"), "City Hospital");
        assert_eq!(strip_name_indicators("Old Field [x]"), "Old Field");
        assert_eq!(strip_name_indicators("[MIL] Ramstein"), "Ramstein");
        assert_eq!(strip_name_indicators("Plain Name"), "Plain Name");
    }

    #[test]
    fn closed_detection() {
        assert!(is_name_closed("Old Strip (closed)"));
        assert!(is_name_closed("Somewhere [X]"));
        assert!(!is_name_closed("Open Field"));
    }

    #[test]
    fn military_detection_on_whole_words() {
        assert!(is_name_military("Ramstein AB"));
        assert!(is_name_military("Edwards AFB"));
        assert!(is_name_military("Whidbey Island NAS"));
        assert!(is_name_military("Leeuwarden Air Base"));
        // "AB" must not match inside a word
        assert!(!is_name_military("Abilene Regional"));
        assert!(!is_name_military("Nashville Intl"));
    }

    #[test]
    fn capitalization_keeps_abbreviations() {
        assert_eq!(
            capitalize_airport_name("SEATTLE TACOMA INTL"),
            "Seattle Tacoma INTL"
        );
        assert_eq!(capitalize_airport_name("edwards afb"), "Edwards AFB");
    }

    #[test]
    fn rating_sums_facility_points() {
        assert_eq!(airport_rating(false, false, false, 0, 0, 0), 0);
        assert_eq!(airport_rating(false, false, true, 1, 1, 1), 4);
        assert_eq!(airport_rating(true, true, true, 1, 1, 1), 5);
        // Add-on and 3D together still give a single point
        assert_eq!(airport_rating(true, true, false, 0, 0, 0), 1);
    }
}
