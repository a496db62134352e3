//! A* pathfinding over a uniform obstacle grid
//!
//! 4-connected, unit step cost, Manhattan heuristic. Every failure mode
//! (endpoint off the grid, goal unreachable) degrades to a straight
//! `[goal]` path so callers can always move somewhere.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::types::{GridPos, Vec2};
use crate::spatial::grid::Grid;

/// One expanded cell in the search arena
#[derive(Debug, Clone, Copy)]
struct SearchNode {
    cell: GridPos,
    g_cost: i32,
    parent: Option<usize>,
}

/// Entry in the open list, pointing into the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenEntry {
    f_cost: i32,
    h_cost: i32,
    seq: u32,
    node: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap: lowest f, then lowest h, then oldest
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.h_cost.cmp(&self.h_cost))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone)]
pub struct Pathfinder {
    obstacles: Grid<bool>,
}

impl Pathfinder {
    /// Grid of `width` x `height` cells, all clear
    pub fn new(width: usize, height: usize, cell_size: f32) -> Self {
        Self {
            obstacles: Grid::new(width, height, cell_size),
        }
    }

    /// Mark or clear one cell; out-of-range cells are ignored
    pub fn set_obstacle(&mut self, x: i32, y: i32, blocked: bool) {
        self.obstacles.set(GridPos::new(x, y), blocked);
    }

    pub fn clear_grid(&mut self) {
        self.obstacles.fill(false);
    }

    /// Out-of-range cells read as blocked
    pub fn is_obstacle(&self, x: i32, y: i32) -> bool {
        self.obstacles
            .get(GridPos::new(x, y))
            .copied()
            .unwrap_or(true)
    }

    pub fn grid_width(&self) -> usize {
        self.obstacles.width
    }

    pub fn grid_height(&self) -> usize {
        self.obstacles.height
    }

    pub fn cell_size(&self) -> f32 {
        self.obstacles.cell_size
    }

    pub fn world_to_grid(&self, pos: Vec2) -> GridPos {
        self.obstacles.world_to_cell(pos)
    }

    /// Center of cell (x, y) in world space
    pub fn grid_to_world(&self, x: i32, y: i32) -> Vec2 {
        self.obstacles.cell_center(GridPos::new(x, y))
    }

    /// Find a route from `start` to `goal` in world space.
    ///
    /// The result excludes the start cell, holds one cell center per grid
    /// step and ends with the exact `goal`. Returns `[goal]` when either
    /// endpoint is off the grid or no route exists.
    pub fn find_path(&self, start: Vec2, goal: Vec2) -> Vec<Vec2> {
        let start_cell = self.world_to_grid(start);
        let goal_cell = self.world_to_grid(goal);

        if !self.obstacles.in_bounds(start_cell) || !self.obstacles.in_bounds(goal_cell) {
            tracing::debug!(
                "Path endpoint off grid ({:?} -> {:?}), falling back to direct move",
                start_cell,
                goal_cell
            );
            return vec![goal];
        }

        let cell_count = self.obstacles.width * self.obstacles.height;
        let mut closed = vec![false; cell_count];
        let mut best_g = vec![i32::MAX; cell_count];
        let mut arena: Vec<SearchNode> = Vec::new();
        let mut open = BinaryHeap::new();
        let mut seq = 0u32;
        let mut expanded = 0usize;

        let start_h = start_cell.manhattan(&goal_cell);
        arena.push(SearchNode {
            cell: start_cell,
            g_cost: 0,
            parent: None,
        });
        if let Some(i) = self.obstacles.index(start_cell) {
            best_g[i] = 0;
        }
        open.push(OpenEntry {
            f_cost: start_h,
            h_cost: start_h,
            seq,
            node: 0,
        });

        while let Some(entry) = open.pop() {
            let current = arena[entry.node];
            let Some(current_index) = self.obstacles.index(current.cell) else {
                continue;
            };
            if closed[current_index] {
                continue;
            }
            closed[current_index] = true;
            expanded += 1;

            if current.cell == goal_cell {
                let path = self.reconstruct_path(&arena, entry.node, goal);
                tracing::debug!(
                    "Path found: {} waypoints, {} nodes expanded",
                    path.len(),
                    expanded
                );
                return path;
            }

            for neighbor in self.obstacles.neighbors4(current.cell) {
                let Some(neighbor_index) = self.obstacles.index(neighbor) else {
                    continue;
                };
                if closed[neighbor_index] || self.obstacles.get(neighbor).copied().unwrap_or(true) {
                    continue;
                }

                let tentative_g = current.g_cost + 1;
                if tentative_g >= best_g[neighbor_index] {
                    continue;
                }
                best_g[neighbor_index] = tentative_g;

                arena.push(SearchNode {
                    cell: neighbor,
                    g_cost: tentative_g,
                    parent: Some(entry.node),
                });
                let h_cost = neighbor.manhattan(&goal_cell);
                seq += 1;
                open.push(OpenEntry {
                    f_cost: tentative_g + h_cost,
                    h_cost,
                    seq,
                    node: arena.len() - 1,
                });
            }
        }

        tracing::debug!(
            "No path to {:?} after {} nodes expanded, falling back to direct move",
            goal_cell,
            expanded
        );
        vec![goal]
    }

    /// Walk parent links back to the start; drop the start cell and replace
    /// the goal cell with the exact goal
    fn reconstruct_path(&self, arena: &[SearchNode], goal_node: usize, goal: Vec2) -> Vec<Vec2> {
        let mut cells = Vec::new();
        let mut cursor = arena[goal_node].parent;
        while let Some(index) = cursor {
            let node = &arena[index];
            // The root has no parent and is the start cell
            if node.parent.is_some() {
                cells.push(node.cell);
            }
            cursor = node.parent;
        }
        cells.reverse();

        let mut path: Vec<Vec2> = cells
            .into_iter()
            .map(|cell| self.obstacles.cell_center(cell))
            .collect();
        path.push(goal);
        path
    }
}
