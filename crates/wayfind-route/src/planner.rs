use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rayon::prelude::*;
use wayfind_core::{Coord, Grid};
use wayfind_paths::{GridPather, MapCosts, Path, SearchSpace};

use crate::error::RouteError;
use crate::group::WaypointGroup;
use crate::leg::{LegKind, LegReport, LegSpec, MapRef};
use crate::permutations::Permutations;

/// Group counts from which exhaustive enumeration gets slow enough to warn
/// about (9! = 362 880 orders).
const LARGE_GROUP_COUNT: usize = 9;

/// How [`Planner::optimize`] runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Evaluate orders on the rayon thread pool.
    pub parallel: bool,
    /// Give up once this much time has passed. Checked between orders.
    pub time_limit: Option<Duration>,
}

/// A visiting order with a finite total cost.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Itinerary {
    pub order: Vec<usize>,
    pub cost: i32,
}

/// One evaluated order. `cost` is `None` when some leg has no path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    pub order: Vec<usize>,
    pub cost: Option<i32>,
}

/// Result of [`Planner::optimize`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Optimum {
    pub best: Itinerary,
    /// Every evaluated order, in lexicographic enumeration order.
    pub candidates: Vec<Candidate>,
}

/// Finds the cheapest order in which to visit every [`WaypointGroup`].
///
/// All coordinates are validated when the planner is built, so searches
/// run afterwards can only succeed or report no path.
#[derive(Debug, Clone)]
pub struct Planner {
    outer: Arc<Grid>,
    outer_costs: MapCosts,
    start: Coord,
    destination: Coord,
    groups: Vec<WaypointGroup>,
    config: PlannerConfig,
}

impl Planner {
    /// Create a planner, checking `start`, `destination` and every group
    /// coordinate against the map it belongs to.
    pub fn new(
        outer: Arc<Grid>,
        outer_costs: impl Into<MapCosts>,
        start: Coord,
        destination: Coord,
        groups: Vec<WaypointGroup>,
    ) -> Result<Self, RouteError> {
        outer
            .check(start)
            .map_err(|e| RouteError::grid("start", e))?;
        outer
            .check(destination)
            .map_err(|e| RouteError::grid("destination", e))?;
        for g in &groups {
            g.validate(&outer)?;
        }
        Ok(Self {
            outer,
            outer_costs: outer_costs.into(),
            start,
            destination,
            groups,
            config: PlannerConfig::default(),
        })
    }

    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> PlannerConfig {
        self.config
    }

    pub fn outer(&self) -> &Grid {
        &self.outer
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn destination(&self) -> Coord {
        self.destination
    }

    pub fn groups(&self) -> &[WaypointGroup] {
        &self.groups
    }

    /// The grid a leg runs on, or `None` for a group index out of range.
    pub fn grid(&self, map: MapRef) -> Option<&Grid> {
        match map {
            MapRef::Outer => Some(&self.outer),
            MapRef::Group(i) => self.groups.get(i).map(|g| &*g.grid),
        }
    }

    /// The `3n + 1` legs implied by visiting groups in `order`.
    pub fn legs(&self, order: &[usize]) -> Result<Vec<LegSpec>, RouteError> {
        self.check_order(order)?;
        Ok(self.expand(order))
    }

    /// Total cost of visiting groups in `order`, or `None` if any leg has
    /// no path or the total overflows. Stops at the first unreachable leg.
    pub fn evaluate(&self, order: &[usize], space: &mut SearchSpace) -> Result<Option<i32>, RouteError> {
        self.check_order(order)?;
        self.journey_cost(order, space)
    }

    /// Evaluate every order and return the cheapest.
    ///
    /// When several orders share the minimum cost, the first one in
    /// lexicographic order wins, in parallel mode too.
    pub fn optimize(&self) -> Result<Optimum, RouteError> {
        let n = self.groups.len();
        if n >= LARGE_GROUP_COUNT {
            warn!("exhaustive search over {n}! orders of {n} groups");
        }
        let total = Permutations::count_for(n).unwrap_or(usize::MAX);
        let deadline = self.config.time_limit.map(|limit| Instant::now() + limit);

        let candidates = if self.config.parallel {
            self.evaluate_parallel(deadline, total)?
        } else {
            self.evaluate_sequential(deadline, total)?
        };

        let Some((cost, winner)) = candidates
            .iter()
            .filter_map(|c| c.cost.map(|cost| (cost, c)))
            .min_by_key(|&(cost, _)| cost)
        else {
            return Err(RouteError::Unfeasible {
                evaluated: candidates.len(),
            });
        };

        info!(
            "best order {:?} costs {} ({} orders evaluated)",
            winner.order,
            cost,
            candidates.len()
        );
        let best = Itinerary {
            order: winner.order.clone(),
            cost,
        };
        Ok(Optimum { best, candidates })
    }

    /// Recompute `order` leg by leg, keeping every path.
    pub fn report(&self, order: &[usize]) -> Result<Vec<LegReport>, RouteError> {
        self.check_order(order)?;
        let mut space = SearchSpace::for_grid(&self.outer);
        let mut total: i32 = 0;
        let mut reports = Vec::with_capacity(order.len() * 3 + 1);
        for leg in self.expand(order) {
            let Some(path) = self.run_leg(&leg, &mut space)? else {
                return Err(RouteError::UnreachableLeg { leg });
            };
            let Some(next) = total.checked_add(path.cost) else {
                return Err(RouteError::UnreachableLeg { leg });
            };
            total = next;
            reports.push(LegReport { leg, path, total });
        }
        Ok(reports)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn check_order(&self, order: &[usize]) -> Result<(), RouteError> {
        let n = self.groups.len();
        let mut seen = vec![false; n];
        let valid = order.len() == n
            && order
                .iter()
                .all(|&i| i < n && !std::mem::replace(&mut seen[i], true));
        if valid {
            Ok(())
        } else {
            Err(RouteError::InvalidOrder {
                order: order.to_vec(),
                groups: n,
            })
        }
    }

    fn expand(&self, order: &[usize]) -> Vec<LegSpec> {
        let mut legs = Vec::with_capacity(order.len() * 3 + 1);
        let mut here = self.start;
        for &group in order {
            let g = &self.groups[group];
            legs.push(LegSpec {
                kind: LegKind::Approach { group },
                map: MapRef::Outer,
                from: here,
                to: g.entrance,
            });
            legs.push(LegSpec {
                kind: LegKind::Delve { group },
                map: MapRef::Group(group),
                from: g.inner_entrance,
                to: g.destination,
            });
            legs.push(LegSpec {
                kind: LegKind::Return { group },
                map: MapRef::Group(group),
                from: g.destination,
                to: g.inner_entrance,
            });
            here = g.entrance;
        }
        legs.push(LegSpec {
            kind: LegKind::Finish,
            map: MapRef::Outer,
            from: here,
            to: self.destination,
        });
        legs
    }

    fn run_leg(&self, leg: &LegSpec, space: &mut SearchSpace) -> Result<Option<Path>, RouteError> {
        let (grid, costs) = match leg.map {
            MapRef::Outer => (&*self.outer, &self.outer_costs),
            MapRef::Group(i) => (&*self.groups[i].grid, &self.groups[i].costs),
        };
        space.resize(grid.rows(), grid.cols());
        space
            .astar_path(&GridPather::new(grid, costs), leg.from, leg.to)
            .map_err(|e| RouteError::grid(leg.to_string(), e))
    }

    fn journey_cost(&self, order: &[usize], space: &mut SearchSpace) -> Result<Option<i32>, RouteError> {
        let mut total: i32 = 0;
        for leg in self.expand(order) {
            let Some(path) = self.run_leg(&leg, space)? else {
                return Ok(None);
            };
            let Some(next) = total.checked_add(path.cost) else {
                return Ok(None);
            };
            total = next;
        }
        Ok(Some(total))
    }

    fn evaluate_sequential(&self, deadline: Option<Instant>, total: usize) -> Result<Vec<Candidate>, RouteError> {
        let mut space = SearchSpace::for_grid(&self.outer);
        let mut candidates = Vec::new();
        for order in Permutations::new(self.groups.len()) {
            if expired(deadline) {
                return Err(self.deadline_exceeded(candidates.len(), total));
            }
            let cost = self.journey_cost(&order, &mut space)?;
            log_candidate(&order, cost);
            candidates.push(Candidate { order, cost });
        }
        Ok(candidates)
    }

    fn evaluate_parallel(&self, deadline: Option<Instant>, total: usize) -> Result<Vec<Candidate>, RouteError> {
        let orders: Vec<Vec<usize>> = Permutations::new(self.groups.len()).collect();
        let evaluated = AtomicUsize::new(0);

        // `None` marks an order skipped after the deadline.
        let results: Vec<Option<Result<Candidate, RouteError>>> = orders
            .into_par_iter()
            .map_init(
                || SearchSpace::for_grid(&self.outer),
                |space, order| {
                    if expired(deadline) {
                        return None;
                    }
                    let cost = match self.journey_cost(&order, space) {
                        Ok(cost) => cost,
                        Err(e) => return Some(Err(e)),
                    };
                    evaluated.fetch_add(1, Ordering::Relaxed);
                    log_candidate(&order, cost);
                    Some(Ok(Candidate { order, cost }))
                },
            )
            .collect();

        let mut candidates = Vec::with_capacity(results.len());
        for res in results {
            match res {
                Some(candidate) => candidates.push(candidate?),
                None => return Err(self.deadline_exceeded(evaluated.load(Ordering::Relaxed), total)),
            }
        }
        Ok(candidates)
    }

    fn deadline_exceeded(&self, evaluated: usize, total: usize) -> RouteError {
        warn!("time limit reached after {evaluated} of {total} orders");
        RouteError::DeadlineExceeded { evaluated, total }
    }
}

fn expired(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}

fn log_candidate(order: &[usize], cost: Option<i32>) {
    match cost {
        Some(cost) => debug!("order {order:?} -> {cost}"),
        None => debug!("order {order:?} -> unreachable"),
    }
}
