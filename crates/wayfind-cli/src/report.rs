//! Plain-text rendering of search and planning results.

use std::fmt::Write;

use wayfind_paths::Path;
use wayfind_route::{LegKind, LegReport, Optimum, Planner};

use crate::scenario::OneBased;

fn group_name(planner: &Planner, idx: usize) -> &str {
    planner.groups().get(idx).map_or("?", |g| g.name.as_str())
}

fn order_names(planner: &Planner, order: &[usize]) -> String {
    order
        .iter()
        .map(|&i| group_name(planner, i))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// One line per evaluated order, in enumeration order.
pub fn candidates(planner: &Planner, opt: &Optimum) -> String {
    let mut out = String::new();
    for c in &opt.candidates {
        let cost = c.cost.map_or_else(|| "unreachable".to_string(), |v| v.to_string());
        let _ = writeln!(out, "{:<48} {cost:>10}", order_names(planner, &c.order));
    }
    out
}

/// The winning order followed by each of its legs with running totals.
pub fn itinerary(planner: &Planner, opt: &Optimum, legs: &[LegReport]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "best order: {}", order_names(planner, &opt.best.order));
    let _ = writeln!(out, "total cost: {}", opt.best.cost);
    for r in legs {
        let what = match r.leg.kind {
            LegKind::Approach { group } => format!("to {}", group_name(planner, group)),
            LegKind::Delve { group } => format!("through {}", group_name(planner, group)),
            LegKind::Return { group } => format!("out of {}", group_name(planner, group)),
            LegKind::Finish => "to destination".to_string(),
        };
        let _ = writeln!(
            out,
            "  {what:<32} {} -> {}  steps {:>4}  cost {:>6}  total {:>7}",
            OneBased::from(r.leg.from),
            OneBased::from(r.leg.to),
            r.path.steps(),
            r.path.cost,
            r.total,
        );
    }
    out
}

/// A single path: its cost and every cell in 1-based form.
pub fn path(p: &Path) -> String {
    let cells = p
        .cells
        .iter()
        .map(|&c| OneBased::from(c).to_string())
        .collect::<Vec<_>>()
        .join(" ");
    format!("cost {} over {} steps\n{cells}\n", p.cost, p.steps())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wayfind_core::{Coord, Grid};
    use wayfind_paths::TerrainCosts;
    use wayfind_route::WaypointGroup;

    fn planner() -> Planner {
        let outer = Arc::new(Grid::parse("GGGGG").unwrap());
        let inner = Arc::new(Grid::parse("E.P").unwrap());
        let groups = vec![
            WaypointGroup::new("near", Coord::new(0, 1), inner.clone(), Coord::new(0, 0), Coord::new(0, 2)),
            WaypointGroup::new("far", Coord::new(0, 3), inner, Coord::new(0, 0), Coord::new(0, 2)),
        ];
        Planner::new(outer, TerrainCosts::default(), Coord::new(0, 0), Coord::new(0, 4), groups).unwrap()
    }

    #[test]
    fn path_lists_one_based_cells() {
        let p = Path {
            cells: vec![Coord::new(0, 0), Coord::new(0, 1)],
            cost: 10,
        };
        assert_eq!(path(&p), "cost 10 over 1 steps\n(1, 1) (1, 2)\n");
    }

    #[test]
    fn itinerary_names_groups() {
        let p = planner();
        let opt = p.optimize().unwrap();
        let legs = p.report(&opt.best.order).unwrap();
        let text = itinerary(&p, &opt, &legs);
        assert!(text.starts_with("best order: near -> far\n"));
        assert!(text.contains(&format!("total cost: {}", opt.best.cost)));
        assert!(text.contains("through far"));
        assert!(text.contains("to destination"));
        // Header lines plus seven legs.
        assert_eq!(text.lines().count(), 2 + 7);
    }

    #[test]
    fn candidates_cover_every_order() {
        let p = planner();
        let opt = p.optimize().unwrap();
        let text = candidates(&p, &opt);
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().next().unwrap().starts_with("near -> far"));
    }
}
