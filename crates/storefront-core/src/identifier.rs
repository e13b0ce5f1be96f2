//! # Session Identifiers
//!
//! 32-character identifiers naming a shopper session.
//!
//! ## Alphabet
//! ```text
//! first char : A B C ... Y          (25 letters, never a digit)
//! rest       : 0-9 A B C ... Y      (35 symbols)
//!
//! Candidates are drawn from codepoints 48..=89 ('0'..='Y');
//! 58..=64 (':' ';' '<' '=' '>' '?' '@') are rejected and redrawn.
//! 'Z' (90) is never drawn.
//! ```
//!
//! The source is `rand::thread_rng`, which is fine for "looks unique" and
//! nothing more. Nothing checks for collisions.

use rand::Rng;

/// Length of every generated identifier.
pub const IDENTIFIER_LENGTH: usize = 32;

const FIRST_LETTER: u8 = b'A';
const LETTER_SPAN: u8 = 25;
const CANDIDATE_START: u8 = b'0';
const CANDIDATE_SPAN: u8 = 42;
const REJECT_START: u8 = b':';
const REJECT_END: u8 = b'@';

/// Generates a session identifier from the thread-local RNG.
///
/// ## Example
/// ```rust
/// use storefront_core::identifier::{generate_identifier, is_identifier};
///
/// let uid = generate_identifier();
/// assert_eq!(uid.len(), 32);
/// assert!(is_identifier(&uid));
/// ```
pub fn generate_identifier() -> String {
    generate_identifier_with(&mut rand::thread_rng())
}

/// Generates a session identifier from the given RNG.
pub fn generate_identifier_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut uid = String::with_capacity(IDENTIFIER_LENGTH);
    uid.push(char::from(FIRST_LETTER + rng.gen_range(0..LETTER_SPAN)));

    while uid.len() < IDENTIFIER_LENGTH {
        let code = CANDIDATE_START + rng.gen_range(0..CANDIDATE_SPAN);
        if !(REJECT_START..=REJECT_END).contains(&code) {
            uid.push(char::from(code));
        }
    }

    uid
}

/// Whether `s` has the shape of a generated identifier.
pub fn is_identifier(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == IDENTIFIER_LENGTH
        && is_letter(bytes[0])
        && bytes[1..].iter().all(|b| b.is_ascii_digit() || is_letter(*b))
}

fn is_letter(b: u8) -> bool {
    (b'A'..=b'Y').contains(&b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_identifier_shape() {
        for _ in 0..500 {
            let uid = generate_identifier();
            assert_eq!(uid.len(), IDENTIFIER_LENGTH);
            let first = uid.chars().next().unwrap();
            assert!(('A'..='Y').contains(&first), "first char {first}");
            assert!(uid
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='Y').contains(&c)));
            assert!(!uid.contains('Z'));
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = generate_identifier_with(&mut StdRng::seed_from_u64(7));
        let b = generate_identifier_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(is_identifier(&a));
    }

    #[test]
    fn test_identifiers_differ() {
        let a = generate_identifier();
        let b = generate_identifier();
        // Not guaranteed, but a collision here means the RNG is broken
        assert_ne!(a, b);
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("A0123456789BCDEFGHIJKLMNOPQRSTUV"));
        assert!(!is_identifier("00123456789BCDEFGHIJKLMNOPQRSTUV"));
        assert!(!is_identifier("A0123456789BCDEFGHIJKLMNOPQRSTUZ"));
        assert!(!is_identifier("A0123456789bcdefghijklmnopqrstuv"));
        assert!(!is_identifier("A012"));
    }
}
