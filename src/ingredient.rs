use std::collections::HashSet;

// Maps common local-language ingredient terms to canonical English names.
// Scanned in order with first-match-wins, so earlier entries shadow later
// ones when a token contains more than one key.
const SYNONYM_TABLE: &[(&str, &str)] = &[
    ("ringan", "brinjal"),
    ("baingan", "eggplant"),
    ("mirchi", "chili"),
    ("methi", "fenugreek"),
    ("besan", "gram flour"),
    ("maida", "all-purpose flour"),
    ("haldi", "turmeric"),
    ("atta", "wheat flour"),
    ("dhania", "coriander"),
    ("jeera", "cumin"),
];

/// Canonicalizes a raw ingredient token.
///
/// Lower-cases and trims the token, then returns the canonical term of the
/// first synonym whose key appears anywhere in it. Tokens with no matching
/// key come back trimmed and lower-cased but otherwise unchanged, which makes
/// the function idempotent on already-canonical terms.
pub fn normalize_ingredient(raw: &str) -> String {
    let token = raw.trim().to_lowercase();
    for (local_term, canonical) in SYNONYM_TABLE {
        if token.contains(local_term) {
            return (*canonical).to_string();
        }
    }
    token
}

/// Normalizes a user inventory into a deduplicated set, dropping blank
/// entries.
pub fn normalize_inventory(items: &[String]) -> HashSet<String> {
    items
        .iter()
        .filter(|item| !item.trim().is_empty())
        .map(|item| normalize_ingredient(item))
        .collect()
}

/// Like [`normalize_inventory`], but also returns the distinct normalized
/// items in first-seen order. The ordered form feeds the embedding input so
/// identical requests produce identical query vectors.
pub fn normalize_inventory_ordered(items: &[String]) -> (HashSet<String>, Vec<String>) {
    let mut seen = HashSet::new();
    let mut ordered = Vec::new();
    for item in items {
        if item.trim().is_empty() {
            continue;
        }
        let normalized = normalize_ingredient(item);
        if seen.insert(normalized.clone()) {
            ordered.push(normalized);
        }
    }
    (seen, ordered)
}

/// Splits a raw pipe-delimited ingredient string into trimmed, non-empty
/// tokens, preserving their original casing.
pub fn split_ingredient_names(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
