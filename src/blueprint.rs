use {
    crate::*,
    nom::{
        bytes::complete::tag,
        character::complete::multispace1,
        combinator::{map, map_res, opt},
        sequence::{delimited, preceded, tuple},
        IResult,
    },
    strum::{EnumCount, IntoEnumIterator},
};

/// An error rejected at `Blueprint` construction time
///
/// The search engine never sees a partially-specified blueprint: anything that parses but doesn't
/// describe a well-founded production chain dies here.
#[derive(Debug, Eq, PartialEq)]
pub enum BlueprintError {
    /// A recipe clause for this robot kind appeared more than once
    DuplicateRecipe(Mineral),

    /// No recipe clause for this robot kind appeared
    MissingRecipe(Mineral),

    /// A recipe consumes a mineral at or above its own tier (the ore robot consuming ore is the
    /// one permitted bootstrap exception)
    CyclicDependency { robot: Mineral, cost: Mineral },
}

/// An immutable cost table: for each robot kind, the minerals required to build one
///
/// Shared read-only by every search branch. Also carries the derived per-mineral maximum
/// single-step cost across all recipes, which the search engine uses to cap production-rate
/// growth.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Blueprint {
    id: u16,
    robot_costs: [MineralCounts; Mineral::COUNT],
    max_costs: MineralCounts,
}

impl Blueprint {
    pub fn try_new(
        id: u16,
        robot_costs: [MineralCounts; Mineral::COUNT],
    ) -> Result<Self, BlueprintError> {
        for robot in Mineral::iter() {
            for (cost, quantity) in robot_costs[robot as usize].iter() {
                let permitted: bool =
                    cost < robot || (robot == Mineral::Ore && cost == Mineral::Ore);

                if quantity > 0_u16 && !permitted {
                    return Err(BlueprintError::CyclicDependency { robot, cost });
                }
            }
        }

        let mut max_costs: MineralCounts = MineralCounts::ZERO;

        for robot_cost in robot_costs.iter() {
            for (mineral, quantity) in robot_cost.iter() {
                max_costs[mineral] = max_costs[mineral].max(quantity);
            }
        }

        Ok(Self {
            id,
            robot_costs,
            max_costs,
        })
    }

    #[inline]
    pub fn id(&self) -> u16 {
        self.id
    }

    #[inline]
    pub fn cost_of(&self, robot: Mineral) -> &MineralCounts {
        &self.robot_costs[robot as usize]
    }

    /// The maximum quantity of `mineral` any single recipe consumes: once `mineral` is produced at
    /// this rate, an extra producer of it can never pay off
    #[inline]
    pub fn max_cost(&self, mineral: Mineral) -> u16 {
        self.max_costs[mineral]
    }

    fn parse_cost_component<'i>(input: &'i str) -> IResult<&'i str, (u16, Mineral)> {
        map(
            tuple((parse_integer::<u16>, tag(" "), Mineral::parse)),
            |(quantity, _, mineral)| (quantity, mineral),
        )(input)
    }

    /// Parses one `Each <robot> robot costs <quantity> <mineral>[ and <quantity> <mineral>].`
    /// clause
    fn parse_recipe<'i>(input: &'i str) -> IResult<&'i str, (Mineral, MineralCounts)> {
        map(
            delimited(
                tag("Each "),
                tuple((
                    Mineral::parse,
                    preceded(tag(" robot costs "), Self::parse_cost_component),
                    opt(preceded(tag(" and "), Self::parse_cost_component)),
                )),
                tag("."),
            ),
            |(robot, first, second)| {
                let mut costs: MineralCounts = MineralCounts::ZERO;

                costs[first.1] += first.0;

                if let Some((quantity, mineral)) = second {
                    costs[mineral] += quantity;
                }

                (robot, costs)
            },
        )(input)
    }
}

impl Parse for Blueprint {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map_res(
            tuple((
                delimited(tag("Blueprint "), parse_integer::<u16>, tag(":")),
                tuple((
                    preceded(multispace1, Self::parse_recipe),
                    preceded(multispace1, Self::parse_recipe),
                    preceded(multispace1, Self::parse_recipe),
                    preceded(multispace1, Self::parse_recipe),
                )),
            )),
            |(id, recipes)| -> Result<Self, BlueprintError> {
                let mut robot_costs: [Option<MineralCounts>; Mineral::COUNT] =
                    [None; Mineral::COUNT];

                for (robot, costs) in [recipes.0, recipes.1, recipes.2, recipes.3] {
                    if robot_costs[robot as usize]
                        .replace(costs)
                        .is_some()
                    {
                        return Err(BlueprintError::DuplicateRecipe(robot));
                    }
                }

                let mut resolved_robot_costs: [MineralCounts; Mineral::COUNT] =
                    [MineralCounts::ZERO; Mineral::COUNT];

                for robot in Mineral::iter() {
                    resolved_robot_costs[robot as usize] = robot_costs[robot as usize]
                        .ok_or(BlueprintError::MissingRecipe(robot))?;
                }

                Self::try_new(id, resolved_robot_costs)
            },
        )(input)
    }
}

impl<'i> TryFrom<&'i str> for Blueprint {
    type Error = nom::Err<nom::error::Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUEPRINT_1_STR: &str = "\
        Blueprint 1: \
        Each ore robot costs 4 ore. \
        Each clay robot costs 2 ore. \
        Each obsidian robot costs 3 ore and 14 clay. \
        Each geode robot costs 2 ore and 7 obsidian.";

    fn blueprint_1() -> Blueprint {
        Blueprint::try_new(
            1_u16,
            [
                [4_u16, 0_u16, 0_u16, 0_u16].into(),
                [2_u16, 0_u16, 0_u16, 0_u16].into(),
                [3_u16, 14_u16, 0_u16, 0_u16].into(),
                [2_u16, 0_u16, 7_u16, 0_u16].into(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_blueprint_try_from_str() {
        assert_eq!(Blueprint::try_from(BLUEPRINT_1_STR), Ok(blueprint_1()));
    }

    #[test]
    fn test_blueprint_parse_multi_line_clauses() {
        let blueprint_str: &str = "\
            Blueprint 1:\n\
            Each ore robot costs 4 ore.\n\
            Each clay robot costs 2 ore.\n\
            Each obsidian robot costs 3 ore and 14 clay.\n\
            Each geode robot costs 2 ore and 7 obsidian.";

        assert_eq!(Blueprint::try_from(blueprint_str), Ok(blueprint_1()));
    }

    #[test]
    fn test_blueprint_cost_of() {
        let blueprint: Blueprint = blueprint_1();

        assert_eq!(
            *blueprint.cost_of(Mineral::Obsidian),
            [3_u16, 14_u16, 0_u16, 0_u16].into()
        );
        assert_eq!(
            *blueprint.cost_of(Mineral::Geode),
            [2_u16, 0_u16, 7_u16, 0_u16].into()
        );
    }

    #[test]
    fn test_blueprint_max_cost() {
        let blueprint: Blueprint = blueprint_1();

        assert_eq!(blueprint.max_cost(Mineral::Ore), 4_u16);
        assert_eq!(blueprint.max_cost(Mineral::Clay), 14_u16);
        assert_eq!(blueprint.max_cost(Mineral::Obsidian), 7_u16);
        assert_eq!(blueprint.max_cost(Mineral::Geode), 0_u16);
    }

    #[test]
    fn test_blueprint_try_new_rejects_cyclic_dependency() {
        let mut robot_costs: [MineralCounts; Mineral::COUNT] = [MineralCounts::ZERO; Mineral::COUNT];

        robot_costs[Mineral::Clay as usize] = [2_u16, 1_u16, 0_u16, 0_u16].into();

        assert_eq!(
            Blueprint::try_new(1_u16, robot_costs),
            Err(BlueprintError::CyclicDependency {
                robot: Mineral::Clay,
                cost: Mineral::Clay
            })
        );

        let mut robot_costs: [MineralCounts; Mineral::COUNT] = [MineralCounts::ZERO; Mineral::COUNT];

        robot_costs[Mineral::Obsidian as usize] = [0_u16, 0_u16, 0_u16, 1_u16].into();

        assert_eq!(
            Blueprint::try_new(1_u16, robot_costs),
            Err(BlueprintError::CyclicDependency {
                robot: Mineral::Obsidian,
                cost: Mineral::Geode
            })
        );
    }

    #[test]
    fn test_blueprint_try_new_accepts_all_zero() {
        assert!(Blueprint::try_new(1_u16, [MineralCounts::ZERO; Mineral::COUNT]).is_ok());
    }

    #[test]
    fn test_blueprint_parse_rejects_duplicate_recipe() {
        let blueprint_str: &str = "\
            Blueprint 1: \
            Each ore robot costs 4 ore. \
            Each ore robot costs 2 ore. \
            Each obsidian robot costs 3 ore and 14 clay. \
            Each geode robot costs 2 ore and 7 obsidian.";

        assert!(Blueprint::try_from(blueprint_str).is_err());
    }

    #[test]
    fn test_blueprint_parse_rejects_geode_consumption() {
        let blueprint_str: &str = "\
            Blueprint 1: \
            Each ore robot costs 4 ore. \
            Each clay robot costs 2 ore. \
            Each obsidian robot costs 3 ore and 14 clay. \
            Each geode robot costs 2 ore and 7 geode.";

        assert!(Blueprint::try_from(blueprint_str).is_err());
    }
}
