use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::geometry::GridPoint;

// =============================================================================
// A* PATHFINDING
// =============================================================================

/// Open-set entry. Orders so that `BinaryHeap` pops the lowest f-score first,
/// and among equal f-scores the one pushed earliest.
#[derive(Copy, Clone, Debug)]
struct OpenNode {
    f: f32,
    seq: u64,
    point: GridPoint,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.total_cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

/// A* pathfinding over a `width × height` grid with 4-directional movement.
///
/// Step cost and heuristic are both Euclidean distance. Returns the full path
/// including start and goal, or `None` if the goal can't be reached or either
/// endpoint lies outside the grid.
///
/// # Arguments
/// * `start` - Starting cell
/// * `goal` - Target cell; always enterable even if `is_blocked` says otherwise
/// * `width`, `height` - Grid dimensions; cells run from `(0, 0)` inclusive
/// * `is_blocked` - Returns true for cells that must not be expanded
pub fn astar(
    start: GridPoint,
    goal: GridPoint,
    width: i32,
    height: i32,
    is_blocked: impl Fn(GridPoint) -> bool,
) -> Option<Vec<GridPoint>> {
    let in_bounds = |p: GridPoint| p.x >= 0 && p.y >= 0 && p.x < width && p.y < height;
    if !in_bounds(start) || !in_bounds(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let mut open = BinaryHeap::new();
    let mut closed: HashSet<GridPoint> = HashSet::new();
    let mut came_from: HashMap<GridPoint, GridPoint> = HashMap::new();
    let mut g_score: HashMap<GridPoint, f32> = HashMap::new();
    let mut seq = 0u64;

    g_score.insert(start, 0.0);
    open.push(OpenNode { f: start.dist(goal), seq, point: start });

    while let Some(OpenNode { point: current, .. }) = open.pop() {
        if current == goal {
            return Some(reconstruct_path(&came_from, start, goal));
        }
        if !closed.insert(current) {
            continue;
        }

        let current_g = g_score[&current];

        for next in current.neighbors() {
            if !in_bounds(next) || closed.contains(&next) {
                continue;
            }
            // The goal is usually occupied by the entity being chased.
            if next != goal && is_blocked(next) {
                continue;
            }

            let new_g = current_g + current.dist(next);
            let existing_g = g_score.get(&next).copied().unwrap_or(f32::INFINITY);

            if new_g < existing_g {
                g_score.insert(next, new_g);
                came_from.insert(next, current);
                seq += 1;
                open.push(OpenNode { f: new_g + next.dist(goal), seq, point: next });
            }
        }
    }

    None // No path found
}

/// Reconstruct path from came_from map.
fn reconstruct_path(
    came_from: &HashMap<GridPoint, GridPoint>,
    start: GridPoint,
    goal: GridPoint,
) -> Vec<GridPoint> {
    let mut path = vec![goal];
    let mut current = goal;

    while current != start {
        current = came_from[&current];
        path.push(current);
    }

    path.reverse();
    path
}

/// Sum of the Euclidean lengths of each step along `path`.
pub fn path_length(path: &[GridPoint]) -> f32 {
    path.windows(2).map(|w| w[0].dist(w[1])).sum()
}
