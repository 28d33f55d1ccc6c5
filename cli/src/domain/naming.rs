//! Droplet name generation.
//!
//! The random source is always passed in; nothing here touches a global RNG.

use rand::Rng;

/// Characters a name suffix is drawn from.
pub const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of the random part of a droplet name.
pub const SUFFIX_LEN: usize = 12;

/// Generate `len` characters drawn uniformly from [`SUFFIX_ALPHABET`].
pub fn random_suffix<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())]))
        .collect()
}

/// Build a droplet name: `prefix` followed by a [`SUFFIX_LEN`]-character suffix.
///
/// Uniqueness is best-effort; collisions are not detected.
pub fn droplet_name<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> String {
    format!("{prefix}{}", random_suffix(rng, SUFFIX_LEN))
}
