// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use once_cell::sync::Lazy;
use regex::Regex;

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("camel-case boundary pattern is valid"));

/// Turns an API field identifier into a sheet label,
/// e.g. `totalNonCurrentAssets` -> `Total Non Current Assets`.
///
/// Only a lowercase-to-uppercase boundary starts a new word, so acronyms stay
/// in one piece.
pub fn humanize_field(identifier: &str) -> String {
    let spaced = CAMEL_BOUNDARY.replace_all(identifier, "$1 $2");
    title_case(&spaced)
}

/// Capitalizes the first letter of every word and lowercases the rest.
/// A word is a run of letters; anything else (spaces, digits) ends it.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
