use crate::*;

/// One decision for one minute: bring a new robot online, or let the existing robots work
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Action {
    Build(Mineral),
    Wait,
}

/// Pruning constants for the production search
///
/// These are empirically tuned cutoffs carried over from solving the reference blueprints, not
/// admissible bounds: with the defaults enabled the search is tractable out to 32 minutes but may
/// miss a rare optimal line. Each constant can be disabled independently by setting it to `None`;
/// `EXHAUSTIVE` disables all of them, leaving only the build suppressions that are provably
/// wasteful (a robot whose mineral already accrues faster than any recipe can consume it).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Heuristics {
    /// Longest trailing run of waits tolerated on a path while a build is affordable
    pub max_consecutive_waits: Option<u8>,

    /// Caps clay robots at `horizon / fraction`, in addition to the per-step clay demand cap
    pub clay_robot_cap_fraction: Option<u8>,

    /// A branch is abandoned once its geode count trails the ledger's best for the same minute by
    /// more than this distance
    pub geode_pruning_distance: Option<u16>,

    /// Once obsidian production exceeds this rate, only geode and obsidian robots are considered;
    /// below it, only obsidian, clay, and ore robots are
    pub late_game_obsidian_threshold: Option<u16>,
}

impl Heuristics {
    /// No pruning at all: every legal build plus wait is explored at every node
    pub const EXHAUSTIVE: Self = Self {
        max_consecutive_waits: None,
        clay_robot_cap_fraction: None,
        geode_pruning_distance: None,
        late_game_obsidian_threshold: None,
    };
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            max_consecutive_waits: Some(2_u8),
            clay_robot_cap_fraction: Some(3_u8),
            geode_pruning_distance: Some(2_u16),
            // 1, not 2: gating geode builds behind a third obsidian robot starves the canonical
            // reference blueprints, see `test_late_game_threshold_sensitivity`
            late_game_obsidian_threshold: Some(1_u16),
        }
    }
}

/// A node in the decision tree: elapsed time, stockpiled minerals, and per-minute production
///
/// `Copy` on purpose: spawning a child branch is a stack copy, so sibling branches never alias
/// and there's no undo logic anywhere in the search.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProductionState {
    minute: u8,
    resources: MineralCounts,
    robots: MineralCounts,
}

impl ProductionState {
    /// Minute 1, empty stockpile, one ore robot
    pub fn initial() -> Self {
        let mut robots: MineralCounts = MineralCounts::ZERO;

        robots[Mineral::Ore] = 1_u16;

        Self {
            minute: 1_u8,
            resources: MineralCounts::ZERO,
            robots,
        }
    }
}

/// The best geode count observed at each minute across all branches explored so far
///
/// Scoped to a single blueprint's search: the bounds are only meaningful relative to one
/// blueprint's economy, so the ledger is created fresh per evaluation and never shared.
struct PruningLedger(Vec<Option<u16>>);

impl PruningLedger {
    fn new(horizon: u8) -> Self {
        Self(vec![None; horizon as usize + 1_usize])
    }

    fn best_at(&self, minute: u8) -> Option<u16> {
        self.0[minute as usize]
    }

    fn record(&mut self, minute: u8, geodes: u16) {
        self.0[minute as usize] = Some(geodes);
    }
}

/// The result of one blueprint evaluation: the maximum terminal geode count, and the action
/// sequence that reached it (one action per minute, the bootstrap wait at minute 1 included)
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SearchOutcome {
    pub geodes: u16,
    pub path: Vec<Action>,
}

/// Depth-first explorer of the build-or-wait decision tree for one blueprint
///
/// Fully deterministic: identical blueprint, horizon, and heuristics always produce an identical
/// outcome. There is no recoverable error path during a search; an invariant violation panics.
pub struct SearchEngine<'b> {
    blueprint: &'b Blueprint,
    horizon: u8,
    heuristics: Heuristics,
    ledger: PruningLedger,
    path: Vec<Action>,
    best: SearchOutcome,
}

impl<'b> SearchEngine<'b> {
    pub fn new(blueprint: &'b Blueprint, horizon: u8, heuristics: Heuristics) -> Self {
        assert!(horizon > 0_u8, "the time horizon must be at least 1 minute");

        Self {
            blueprint,
            horizon,
            heuristics,
            ledger: PruningLedger::new(horizon),
            path: Vec::with_capacity(horizon as usize),
            best: SearchOutcome {
                geodes: 0_u16,
                path: Vec::new(),
            },
        }
    }

    /// Explores the full (pruned) tree and reports the best terminal outcome
    pub fn run(mut self) -> SearchOutcome {
        self.explore(ProductionState::initial(), Action::Wait);

        self.best
    }

    fn explore(&mut self, state: ProductionState, action: Action) {
        self.path.push(action);
        self.step(state, action);
        self.path.pop();
    }

    fn step(&mut self, mut state: ProductionState, action: Action) {
        if let Action::Build(robot) = action {
            state.resources.debit(self.blueprint.cost_of(robot));
        }

        // This minute's harvest was already in motion before any build completes
        let robots: MineralCounts = state.robots;

        state.resources.credit(&robots);

        let geodes: u16 = state.resources[Mineral::Geode];

        match self.ledger.best_at(state.minute) {
            None => self.ledger.record(state.minute, geodes),
            Some(best) => {
                if self
                    .heuristics
                    .geode_pruning_distance
                    .map_or(false, |slack| geodes + slack < best)
                {
                    return;
                }

                if geodes > best {
                    self.ledger.record(state.minute, geodes);
                }
            }
        }

        // The new robot only produces starting next minute
        if let Action::Build(robot) = action {
            state.robots[robot] += 1_u16;
        }

        if state.minute == self.horizon {
            if geodes > self.best.geodes || self.best.path.is_empty() {
                self.best = SearchOutcome {
                    geodes,
                    path: self.path.clone(),
                };
            }

            return;
        }

        self.enumerate_children(state);
    }

    fn enumerate_children(&mut self, state: ProductionState) {
        use Mineral::*;

        let child: ProductionState = ProductionState {
            minute: state.minute + 1_u8,
            ..state
        };

        let candidates: &[Mineral] = match self.heuristics.late_game_obsidian_threshold {
            Some(threshold) if state.robots[Obsidian] > threshold => &[Geode, Obsidian],
            Some(_) => &[Obsidian, Clay, Ore],
            None => &[Geode, Obsidian, Clay, Ore],
        };

        let mut scheduled_build: bool = false;

        for robot in candidates.iter().copied() {
            if self.robot_is_worth_building(robot, &state)
                && state.resources.contains(self.blueprint.cost_of(robot))
            {
                scheduled_build = true;
                self.explore(child, Action::Build(robot));
            }
        }

        let consecutive_waits: usize = self
            .path
            .iter()
            .rev()
            .take_while(|action| matches!(action, Action::Wait))
            .count();

        if !scheduled_build
            || self
                .heuristics
                .max_consecutive_waits
                .map_or(true, |max_waits| consecutive_waits < max_waits as usize)
        {
            self.explore(child, Action::Wait);
        }
    }

    /// Returns `false` for robots whose production rate already covers all conceivable demand:
    /// minerals are spent at most once per minute, so a rate beyond the costliest recipe is pure
    /// waste. Clay robots are additionally subject to the heuristic horizon-fraction cap, and
    /// geode robots are never capped.
    fn robot_is_worth_building(&self, robot: Mineral, state: &ProductionState) -> bool {
        use Mineral::*;

        match robot {
            Geode => true,
            Obsidian => state.robots[Obsidian] < self.blueprint.cost_of(Geode)[Obsidian],
            Clay => {
                // The horizon cap is `robots < horizon / fraction` over the rationals, not over
                // the truncated quotient; cross-multiplying keeps it exact in integers
                state.robots[Clay] < self.blueprint.cost_of(Obsidian)[Clay]
                    && self
                        .heuristics
                        .clay_robot_cap_fraction
                        .map_or(true, |fraction| {
                            state.robots[Clay] as u32 * (fraction as u32) < self.horizon as u32
                        })
            }
            Ore => state.robots[Ore] < self.blueprint.max_cost(Ore),
        }
    }
}

/// Evaluates one blueprint over `horizon` minutes
pub fn max_geodes(blueprint: &Blueprint, horizon: u8, heuristics: Heuristics) -> SearchOutcome {
    SearchEngine::new(blueprint, horizon, heuristics).run()
}
