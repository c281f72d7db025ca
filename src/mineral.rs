use {
    crate::*,
    nom::{branch::alt, bytes::complete::tag, combinator::map, IResult},
    static_assertions::const_assert,
    std::{
        mem::transmute,
        ops::{Index, IndexMut},
    },
    strum::{EnumCount, EnumIter},
};

/// A mineral kind, in strict production-dependency order: each tier's robot recipe only consumes
/// minerals from lower tiers, with ore as the self-sustaining base and geodes as the terminal
/// yield.
#[derive(Clone, Copy, Debug, EnumCount, EnumIter, Eq, Ord, PartialEq, PartialOrd)]
#[repr(u8)]
pub enum Mineral {
    Ore,
    Clay,
    Obsidian,
    Geode,
}

// This guarantees we can safely convert from `u8` to `Mineral` by masking the smallest 2 bits,
// which is the same as masking by `U8_MASK`
const_assert!(Mineral::COUNT == 4_usize);

impl Mineral {
    const U8_MASK: u8 = Self::COUNT as u8 - 1_u8;
    const STRS: [&'static str; Self::COUNT] = ["ore", "clay", "obsidian", "geode"];

    pub const fn str(self) -> &'static str {
        Self::STRS[self as usize]
    }

    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        // SAFETY: See `const_assert` above
        unsafe { transmute(value & Self::U8_MASK) }
    }

    fn alt_branch<'i>(self) -> impl FnMut(&'i str) -> IResult<&'i str, Self> {
        map(tag(self.str()), move |_| self)
    }
}

impl From<u8> for Mineral {
    fn from(value: u8) -> Self {
        Self::from_u8(value)
    }
}

impl Parse for Mineral {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        alt((
            Self::Ore.alt_branch(),
            Self::Clay.alt_branch(),
            Self::Obsidian.alt_branch(),
            Self::Geode.alt_branch(),
        ))(input)
    }
}

/// A per-mineral quantity vector, indexable by `Mineral`
///
/// This is the unit of both accumulated resources and per-minute production rates. It's small
/// enough that cloning a search branch is a stack copy.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MineralCounts([u16; Mineral::COUNT]);

impl MineralCounts {
    pub const ZERO: Self = Self([0_u16; Mineral::COUNT]);

    pub const fn new(counts: [u16; Mineral::COUNT]) -> Self {
        Self(counts)
    }

    /// Returns `true` iff every component of `costs` is covered by `self`
    pub fn contains(&self, costs: &Self) -> bool {
        self.0
            .iter()
            .zip(costs.0.iter())
            .all(|(count, cost)| count >= cost)
    }

    /// Debits `costs` from `self` component-wise
    ///
    /// Callers must have already verified `self.contains(costs)`: an underflow here means a build
    /// was enumerated without being affordable, which is a defect worth dying over, not a runtime
    /// condition to recover from.
    pub fn debit(&mut self, costs: &Self) {
        for (count, cost) in self.0.iter_mut().zip(costs.0.iter()) {
            *count = count
                .checked_sub(*cost)
                .expect("mineral count underflow: build wasn't validated as affordable");
        }
    }

    /// Credits `production` to `self` component-wise
    pub fn credit(&mut self, production: &Self) {
        for (count, produced) in self.0.iter_mut().zip(production.0.iter()) {
            *count += *produced;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Mineral, u16)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(index, count)| (Mineral::from_u8(index as u8), *count))
    }
}

impl Index<Mineral> for MineralCounts {
    type Output = u16;

    fn index(&self, mineral: Mineral) -> &Self::Output {
        &self.0[mineral as usize]
    }
}

impl IndexMut<Mineral> for MineralCounts {
    fn index_mut(&mut self, mineral: Mineral) -> &mut Self::Output {
        &mut self.0[mineral as usize]
    }
}

impl From<[u16; Mineral::COUNT]> for MineralCounts {
    fn from(counts: [u16; Mineral::COUNT]) -> Self {
        Self(counts)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, strum::IntoEnumIterator};

    #[test]
    fn test_mineral_from_u8() {
        for mineral in Mineral::iter() {
            assert_eq!(Mineral::from_u8(mineral as u8), mineral);
        }
    }

    #[test]
    fn test_mineral_parse() {
        for mineral in Mineral::iter() {
            assert_eq!(Mineral::parse(mineral.str()), Ok(("", mineral)));
        }

        assert!(Mineral::parse("diamond").is_err());
    }

    #[test]
    fn test_mineral_counts_contains() {
        let counts: MineralCounts = [4_u16, 14_u16, 7_u16, 0_u16].into();

        assert!(counts.contains(&[4_u16, 14_u16, 0_u16, 0_u16].into()));
        assert!(counts.contains(&MineralCounts::ZERO));
        assert!(!counts.contains(&[5_u16, 0_u16, 0_u16, 0_u16].into()));
        assert!(!counts.contains(&[0_u16, 0_u16, 0_u16, 1_u16].into()));
    }

    #[test]
    fn test_mineral_counts_debit_and_credit() {
        let mut counts: MineralCounts = [4_u16, 14_u16, 7_u16, 0_u16].into();

        counts.debit(&[2_u16, 0_u16, 7_u16, 0_u16].into());

        assert_eq!(counts, [2_u16, 14_u16, 0_u16, 0_u16].into());

        counts.credit(&[1_u16, 1_u16, 0_u16, 1_u16].into());

        assert_eq!(counts, [3_u16, 15_u16, 0_u16, 1_u16].into());
    }

    #[test]
    #[should_panic(expected = "mineral count underflow")]
    fn test_mineral_counts_debit_underflow() {
        let mut counts: MineralCounts = MineralCounts::ZERO;

        counts.debit(&[1_u16, 0_u16, 0_u16, 0_u16].into());
    }
}
