//! Affiliation decoding for MIL-STD-2525 symbol identification codes.

use crate::unit::Affiliation;

/// SIDCs shorter than this carry no usable affiliation.
pub const SIDC_MIN_LENGTH: usize = 15;

/// Position of the standard identity (affiliation) character.
const AFFILIATION_INDEX: usize = 1;

/// Decodes the affiliation of a SIDC such as `"SFGPUCIZ--------"`.
///
/// Total: every input, including the empty string, maps to an affiliation.
/// Length and position are counted in characters.
pub fn affiliation_from_sidc(sidc: &str) -> Affiliation {
    if sidc.chars().count() < SIDC_MIN_LENGTH {
        return Affiliation::Unknown;
    }

    match sidc.chars().nth(AFFILIATION_INDEX) {
        Some('F') => Affiliation::Friendly,
        Some('H') => Affiliation::Hostile,
        Some('N') => Affiliation::Neutral,
        _ => Affiliation::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_example_friendly() {
        assert_eq!(
            affiliation_from_sidc("SFGPUCIZ--------"),
            Affiliation::Friendly
        );
    }

    #[test]
    fn decodes_hostile_and_neutral() {
        assert_eq!(affiliation_from_sidc("SHGPUCIZ-------"), Affiliation::Hostile);
        assert_eq!(affiliation_from_sidc("SNGPUCIZ-------"), Affiliation::Neutral);
    }

    #[test]
    fn short_codes_are_unknown() {
        assert_eq!(affiliation_from_sidc(""), Affiliation::Unknown);
        assert_eq!(affiliation_from_sidc("S"), Affiliation::Unknown);
        // 14 characters with a valid affiliation letter
        assert_eq!(affiliation_from_sidc("SFGPUCIZ------"), Affiliation::Unknown);
    }

    #[test]
    fn other_affiliation_characters_are_unknown() {
        for c in (' '..='~').filter(|c| !matches!(c, 'F' | 'H' | 'N')) {
            let sidc = format!("S{}GPUCIZ--------", c);
            assert_eq!(
                affiliation_from_sidc(&sidc),
                Affiliation::Unknown,
                "sidc {:?}",
                sidc
            );
        }
    }

    #[test]
    fn affiliation_letter_is_case_sensitive() {
        assert_eq!(affiliation_from_sidc("SfGPUCIZ--------"), Affiliation::Unknown);
    }

    #[test]
    fn multibyte_characters_count_once() {
        assert_eq!(
            affiliation_from_sidc("äFäääääääääääää"),
            Affiliation::Friendly
        );
    }
}
