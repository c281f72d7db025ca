use {
    crate::*,
    nom::{
        character::complete::line_ending,
        combinator::{map, opt},
        error::Error,
        multi::many0,
        sequence::terminated,
        Err, IResult,
    },
    rayon::iter::{IntoParallelRefIterator, ParallelIterator},
};

/// A parsed set of blueprints, evaluated independently
///
/// There is no data dependency between two blueprints' searches, so each one runs as its own
/// rayon job with its own private pruning ledger; a pathological blueprint can neither corrupt
/// nor block the others.
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Vec<Blueprint>);

impl Solution {
    const QUALITY_HORIZON: u8 = 24_u8;
    const EXTENDED_HORIZON: u8 = 32_u8;

    pub fn blueprints(&self) -> &[Blueprint] {
        &self.0
    }

    /// Evaluates every blueprint over `horizon` minutes, in parallel, in blueprint order
    pub fn search_all(&self, horizon: u8, heuristics: Heuristics) -> Vec<SearchOutcome> {
        self.0
            .par_iter()
            .map(|blueprint| max_geodes(blueprint, horizon, heuristics))
            .collect()
    }

    /// The sum over all blueprints of blueprint ID times maximum geode yield
    pub fn sum_of_quality_levels(&self, horizon: u8, heuristics: Heuristics) -> u32 {
        self.0
            .par_iter()
            .map(|blueprint| {
                blueprint.id() as u32 * max_geodes(blueprint, horizon, heuristics).geodes as u32
            })
            .sum()
    }

    /// The product of the maximum geode yields of the first (up to) three blueprints
    pub fn product_of_max_geodes_of_first_three(&self, horizon: u8, heuristics: Heuristics) -> u64 {
        self.0[..self.0.len().min(3_usize)]
            .par_iter()
            .map(|blueprint| max_geodes(blueprint, horizon, heuristics).geodes as u64)
            .product()
    }

    fn report_outcomes(&self, horizon: u8) {
        for (blueprint, outcome) in self
            .0
            .iter()
            .zip(self.search_all(horizon, Heuristics::default()))
        {
            println!(
                "blueprint {}: {} geodes in {} minutes via {:?}",
                blueprint.id(),
                outcome.geodes,
                horizon,
                outcome.path
            );
        }
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            many0(terminated(Blueprint::parse, opt(line_ending))),
            Self,
        )(input)
    }
}

impl RunQuestions for Solution {
    /// All 24-minute evaluations, weighted by blueprint ID. The heuristic defaults are load
    /// bearing here: loosen them and this takes noticeably longer for the same answer.
    fn q1_internal(&mut self, args: &QuestionArgs) {
        if args.verbose {
            self.report_outcomes(Self::QUALITY_HORIZON);
        }

        dbg!(self.sum_of_quality_levels(Self::QUALITY_HORIZON, Heuristics::default()));
    }

    /// Only the first three blueprints, but 32 minutes each. Rayon saves this one.
    fn q2_internal(&mut self, args: &QuestionArgs) {
        if args.verbose {
            self.report_outcomes(Self::EXTENDED_HORIZON);
        }

        dbg!(self.product_of_max_geodes_of_first_three(
            Self::EXTENDED_HORIZON,
            Heuristics::default()
        ));
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = Err<Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::OnceLock};

    const SOLUTION_STR: &str = "\
        Blueprint 1: \
        Each ore robot costs 4 ore. \
        Each clay robot costs 2 ore. \
        Each obsidian robot costs 3 ore and 14 clay. \
        Each geode robot costs 2 ore and 7 obsidian.\n\
        Blueprint 2: \
        Each ore robot costs 2 ore. \
        Each clay robot costs 3 ore. \
        Each obsidian robot costs 3 ore and 8 clay. \
        Each geode robot costs 3 ore and 12 obsidian.\n";

    fn solution() -> &'static Solution {
        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| {
            macro_rules! blueprints {
                [ $( $id:expr => [ $( [ $ore:expr, $clay:expr, $obsidian:expr ], )* ], )* ] => {
                    vec![ $( Blueprint::try_new($id, [ $(
                        [$ore, $clay, $obsidian, 0_u16].into(),
                    )* ]).unwrap(), )* ]
                };
            }

            Solution(blueprints![
                1_u16 => [
                    [4_u16, 0_u16, 0_u16],
                    [2_u16, 0_u16, 0_u16],
                    [3_u16, 14_u16, 0_u16],
                    [2_u16, 0_u16, 7_u16],
                ],
                2_u16 => [
                    [2_u16, 0_u16, 0_u16],
                    [3_u16, 0_u16, 0_u16],
                    [3_u16, 8_u16, 0_u16],
                    [3_u16, 0_u16, 12_u16],
                ],
            ])
        })
    }

    #[test]
    fn test_solution_try_from_str() {
        assert_eq!(Solution::try_from(SOLUTION_STR).as_ref(), Ok(solution()));
    }

    #[test]
    fn test_search_all() {
        let outcomes: Vec<SearchOutcome> = solution().search_all(24_u8, Heuristics::default());

        assert_eq!(
            outcomes
                .iter()
                .map(|outcome| outcome.geodes)
                .collect::<Vec<u16>>(),
            vec![9_u16, 12_u16]
        );
    }

    #[test]
    #[ignore = "32-minute searches take minutes in debug builds; run with --ignored"]
    fn test_search_all_extended_horizon() {
        let outcomes: Vec<SearchOutcome> =
            solution().search_all(Solution::EXTENDED_HORIZON, Heuristics::default());

        assert_eq!(
            outcomes
                .iter()
                .map(|outcome| outcome.geodes)
                .collect::<Vec<u16>>(),
            vec![56_u16, 62_u16]
        );
    }

    #[test]
    fn test_sum_of_quality_levels() {
        assert_eq!(
            solution().sum_of_quality_levels(24_u8, Heuristics::default()),
            33_u32
        );
    }

    #[test]
    fn test_product_of_max_geodes_of_first_three() {
        // Only two blueprints in the example, so the "first three" degenerate to both of them
        assert_eq!(
            solution().product_of_max_geodes_of_first_three(24_u8, Heuristics::default()),
            108_u64
        );
    }
}
