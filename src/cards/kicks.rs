use super::rank::Rank;

/// A hand's kicker cards as a rank bitmask.
///
/// Comparing two masks of equal popcount orders them lexicographically
/// from the highest rank down, which is exactly how kickers break ties.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct Kickers(u32);

/// u32 isomorphism
impl From<Kickers> for u32 {
    fn from(k: Kickers) -> Self {
        k.0
    }
}
impl From<u32> for Kickers {
    fn from(n: u32) -> Self {
        Self(n)
    }
}
impl From<u16> for Kickers {
    fn from(n: u16) -> Self {
        Self(n as u32)
    }
}

/// Vec<Rank> isomorphism, highest rank first
///
/// [2, T, J]
/// xxxxxxxxxxxx 0001100000001
impl From<Kickers> for Vec<Rank> {
    fn from(k: Kickers) -> Self {
        Rank::all()
            .into_iter()
            .rev()
            .filter(|r| k.0 & u32::from(*r) != 0)
            .collect()
    }
}
impl From<Vec<Rank>> for Kickers {
    fn from(ranks: Vec<Rank>) -> Self {
        Self(ranks.iter().map(|r| u32::from(*r)).fold(0u32, |a, b| a | b))
    }
}

impl std::fmt::Display for Kickers {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for rank in Vec::<Rank>::from(*self) {
            write!(f, "{}", rank)?;
        }
        Ok(())
    }
}
