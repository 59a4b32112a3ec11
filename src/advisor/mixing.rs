use crate::Probability;
use sha1::Sha1;
use sha2::Digest;
use sha2::Sha256;

/// first 32 bits of SHA-256, big-endian
fn head32(seed: &str) -> u32 {
    let digest = Sha256::digest(seed.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Rollout bucket in `0..100`: the first 32 bits of SHA-1, big-endian.
fn bucket(id: &str) -> u32 {
    let digest = Sha1::digest(id.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]) % 100
}

/// Deterministic percentage roll keyed by a string.
///
/// The same `id` always lands in the same bucket, so replays of a hand
/// reproduce the same mixed choice and the same rollout group as other
/// clients hashing the hand id.
pub fn stable_roll(id: &str, pct: i64) -> bool {
    match pct {
        p if p <= 0 => false,
        p if p >= 100 => true,
        p => bucket(id) < p as u32,
    }
}

/// Deterministic weighted pick keyed by a string.
///
/// Returns the index whose cumulative weight first exceeds the seeded draw.
/// Non-positive weights are never chosen unless every weight is.
pub fn stable_weighted_choice(seed: &str, weights: &[Probability]) -> usize {
    let total = weights.iter().map(|w| w.max(0.)).sum::<Probability>();
    if weights.is_empty() || total <= 0. {
        return 0;
    }
    let draw = head32(seed) as Probability / 4294967296. * total;
    let mut acc = 0.;
    for (i, w) in weights.iter().enumerate() {
        acc += w.max(0.);
        if draw < acc {
            return i;
        }
    }
    weights.iter().rposition(|w| *w > 0.).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// the same id always rolls the same way
    #[test]
    fn roll_is_deterministic() {
        for i in 0..50 {
            let id = format!("hand-{}", i);
            assert_eq!(stable_roll(&id, 37), stable_roll(&id, 37));
        }
        assert!(!stable_roll("x", 0));
        assert!(stable_roll("x", 100));
    }

    /// buckets match the hex-prefix reading of the SHA-1 digest
    #[test]
    fn roll_buckets() {
        assert_eq!(bucket("abc"), 38);
        assert_eq!(bucket("hand-1"), 50);
        assert_eq!(bucket(""), 6);
        assert!(stable_roll("abc", 39));
        assert!(!stable_roll("abc", 38));
        assert!(stable_roll("hand-1", 51));
        assert!(!stable_roll("hand-1", 50));
    }

    /// rolls approach their percentage across many ids
    #[test]
    fn roll_is_roughly_uniform() {
        let hits = (0..2000).filter(|i| stable_roll(&format!("seed:{}", i), 30)).count();
        assert!(hits > 500 && hits < 700, "{}", hits);
    }

    /// weighted choice never picks a zero weight
    #[test]
    fn weighted_choice_respects_zero() {
        for i in 0..200 {
            let seed = format!("defense:{}", i);
            assert_eq!(stable_weighted_choice(&seed, &[0., 1.]), 1);
            assert_eq!(stable_weighted_choice(&seed, &[1., 0.]), 0);
            assert_eq!(stable_weighted_choice(&seed, &[0.3, 0.7]), stable_weighted_choice(&seed, &[0.3, 0.7]));
        }
        assert_eq!(stable_weighted_choice("any", &[]), 0);
    }
}
