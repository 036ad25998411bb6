/// Deterministic selection: seed strings in, reproducible indices and d20
/// rolls out.
///
/// The digest is SHA-256 over the UTF-8 bytes of the seed, with the first
/// eight bytes read big-endian. It does not depend on process, platform word
/// size or call order.
use rand::Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Sides on the simulated check die.
pub const D20: u64 = 20;

/// 64-bit digest of a seed string.
pub fn digest(seed: &str) -> u64 {
    let hash = Sha256::digest(seed.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hash[..8]);
    u64::from_be_bytes(prefix)
}

/// Reproducible index in `[0, pool_size)` for `seed`.
pub fn select(seed: &str, pool_size: usize) -> Result<usize, SelectorError> {
    if pool_size == 0 {
        return Err(SelectorError::InvalidArgument(
            "pool size must be at least 1".to_string(),
        ));
    }
    Ok((digest(seed) % pool_size as u64) as usize)
}

/// Pick an element of `pool` for `seed`.
pub fn pick<'a, T>(seed: &str, pool: &'a [T]) -> Result<&'a T, SelectorError> {
    let index = select(seed, pool.len())?;
    Ok(&pool[index])
}

/// Simulated ability check in `[1, 20]` for `seed`.
pub fn roll_check(seed: &str) -> u8 {
    (digest(seed) % D20 + 1) as u8
}

/// d20 roll that is reproducible when seeded and falls back to the thread
/// RNG otherwise.
pub fn roll_d20(seed: Option<&str>) -> u8 {
    match seed {
        Some(seed) if !seed.is_empty() => roll_check(seed),
        _ => rand::thread_rng().gen_range(1..=20),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_sha256_prefix() {
        // e3b0c44298fc1c14... is the SHA-256 of the empty string.
        assert_eq!(digest(""), 0xe3b0_c442_98fc_1c14);
        assert_eq!(digest("abc"), 13436514500253700074);
    }

    #[test]
    fn select_is_stable() {
        assert_eq!(select("Weekly Sync Meeting", 5).unwrap(), 3);
        assert_eq!(select("Weekly Sync Meeting", 3).unwrap(), 2);
        assert_eq!(select("quest", 5).unwrap(), 0);
        for _ in 0..10 {
            assert_eq!(select("abc", 5).unwrap(), 4);
        }
    }

    #[test]
    fn select_rejects_empty_pool() {
        assert!(matches!(
            select("anything", 0),
            Err(SelectorError::InvalidArgument(_))
        ));
        let empty: [&str; 0] = [];
        assert!(pick("anything", &empty).is_err());
    }

    #[test]
    fn select_single_pool_is_zero() {
        assert_eq!(select("whatever", 1).unwrap(), 0);
    }

    #[test]
    fn pick_returns_selected_element() {
        let pool = ["a", "b", "c", "d", "e"];
        assert_eq!(*pick("abc", &pool).unwrap(), "e");
    }

    #[test]
    fn roll_check_known_values() {
        assert_eq!(roll_check(""), 13);
        assert_eq!(roll_check("quest"), 6);
        assert_eq!(roll_check("Weekly Sync Meeting"), 4);
        assert_eq!(roll_check("abc"), 15);
    }

    #[test]
    fn roll_check_in_range() {
        for i in 0..500 {
            let roll = roll_check(&format!("seed-{}", i));
            assert!((1..=20).contains(&roll), "roll out of range: {}", roll);
        }
    }

    #[test]
    fn roll_d20_seeded_matches_check() {
        assert_eq!(roll_d20(Some("abc")), roll_check("abc"));
    }

    #[test]
    fn roll_d20_unseeded_in_range() {
        for _ in 0..100 {
            let roll = roll_d20(None);
            assert!((1..=20).contains(&roll));
        }
    }
}
