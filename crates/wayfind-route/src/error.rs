use thiserror::Error;
use wayfind_core::GridError;

use crate::leg::LegSpec;

/// Errors surfaced by the route planner.
///
/// An unreachable leg inside one candidate order is not an error; it only
/// disqualifies that order. These variants cover bad input and the cases
/// where no answer can be produced at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A coordinate does not fit the grid it refers to.
    #[error("invalid {context}: {source}")]
    Grid { context: String, source: GridError },
    /// A group's inner map lacks a marker symbol it was asked to locate.
    #[error("group {group:?}: marker {symbol:?} not found on its map")]
    MissingMarker { group: String, symbol: char },
    /// Every visiting order hits an unreachable leg.
    #[error("no feasible itinerary: all {evaluated} orders hit an unreachable leg")]
    Unfeasible { evaluated: usize },
    /// The time limit expired before every order was evaluated.
    #[error("time limit exceeded after evaluating {evaluated} of {total} orders")]
    DeadlineExceeded { evaluated: usize, total: usize },
    /// A caller-supplied order is not a permutation of the group indices.
    #[error("order {order:?} is not a permutation of {groups} groups")]
    InvalidOrder { order: Vec<usize>, groups: usize },
    /// A leg of the requested order has no path.
    #[error("no path for leg {leg}")]
    UnreachableLeg { leg: LegSpec },
}

impl RouteError {
    pub(crate) fn grid(context: impl Into<String>, source: GridError) -> Self {
        Self::Grid {
            context: context.into(),
            source,
        }
    }
}
