//! Slug and title helpers for category names and URL segments.
//!
//! `snake_case("Hats & Caps") == "hats-and-caps"` and `title_case` undoes it.

/// Lowercases, spells out `&` and joins words with hyphens.
pub fn snake_case(s: &str) -> String {
    s.to_lowercase()
        .replace('&', "and")
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect()
}

/// Uppercases the first character and lowercases the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Turns a slug back into display text: hyphens become spaces, a standalone
/// `and` becomes `&`, every word is capitalized.
pub fn title_case(s: &str) -> String {
    s.to_lowercase()
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| if w == "and" { "&".to_string() } else { capitalize(w) })
        .collect::<Vec<_>>()
        .join(" ")
}
