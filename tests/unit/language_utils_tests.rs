/*!
 * Tests for language tag utilities
 */

use vidweave::language_utils::{
    get_language_name, language_tags_match, normalize_to_part1, primary_subtag,
};

/// Test primary subtag extraction
#[test]
fn test_primary_subtag_withVariousTags_shouldExtractAndLowercase() {
    assert_eq!(primary_subtag("en-US"), "en");
    assert_eq!(primary_subtag("pt_BR"), "pt");
    assert_eq!(primary_subtag("FR"), "fr");
    assert_eq!(primary_subtag("  de-AT  "), "de");
    assert_eq!(primary_subtag("en"), "en");
}

/// Test normalization of region-qualified tags
#[test]
fn test_normalize_to_part1_withRegionQualifiedTag_shouldReturnPrimaryCode() {
    assert_eq!(normalize_to_part1("en-US").unwrap(), "en");
    assert_eq!(normalize_to_part1("pt-BR").unwrap(), "pt");
    assert_eq!(normalize_to_part1("fr").unwrap(), "fr");
}

/// Test normalization of 3-letter codes
#[test]
fn test_normalize_to_part1_withThreeLetterCode_shouldMapToTwoLetter() {
    assert_eq!(normalize_to_part1("eng").unwrap(), "en");
    assert_eq!(normalize_to_part1("fra").unwrap(), "fr");
}

/// Test normalization failures
#[test]
fn test_normalize_to_part1_withInvalidTag_shouldFail() {
    assert!(normalize_to_part1("zz").is_err());
    assert!(normalize_to_part1("zzz").is_err());
    assert!(normalize_to_part1("").is_err());
    assert!(normalize_to_part1("english").is_err());
}

/// Test tag matching across representations
#[test]
fn test_language_tags_match_withEquivalentTags_shouldMatch() {
    assert!(language_tags_match("en-US", "en"));
    assert!(language_tags_match("eng", "en-GB"));
    assert!(!language_tags_match("en", "fr"));
    assert!(!language_tags_match("en", "zz"));
}

/// Test language name lookup
#[test]
fn test_get_language_name_withValidTag_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en-US").unwrap(), "English");
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert!(get_language_name("zz").is_err());
}
