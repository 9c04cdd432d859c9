//! Uniform grid hash over enemy centers for broad-phase bullet queries.
//!
//! Rebuilt from scratch every tick since every enemy moves every frame. A
//! query scans the 3×3 block of cells around the probe point, which covers
//! any overlap as long as entities stay smaller than one cell.

use std::collections::HashMap;

use glam::Vec2;

use super::state::Enemy;
use crate::consts::GRID_CELL_SIZE;

/// Grid of enemy indices (into `GameState::enemies`) keyed by cell
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(GRID_CELL_SIZE)
    }
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    /// Cell containing a world position
    pub fn cell_of(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    /// Remove every entry (call before each rebuild)
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn insert(&mut self, index: usize, center: Vec2) {
        let cell = self.cell_of(center);
        self.cells.entry(cell).or_default().push(index);
    }

    /// Rebuild from the live (non-destroyed) enemies
    pub fn rebuild(&mut self, enemies: &[Enemy]) {
        self.clear();
        for (index, enemy) in enemies.iter().enumerate() {
            if !enemy.is_destroyed() {
                self.insert(index, enemy.center());
            }
        }
    }

    /// Candidate indices from the 3×3 cells around `pos`, in ascending order.
    ///
    /// Candidates are a superset of real overlaps; callers still run the exact test.
    pub fn query(&self, pos: Vec2) -> Vec<usize> {
        let (cx, cy) = self.cell_of(pos);
        let mut found = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(indices) = self.cells.get(&(cx + dx, cy + dy)) {
                    found.extend_from_slice(indices);
                }
            }
        }
        // Stable order keeps resolution independent of hash iteration
        found.sort_unstable();
        found
    }

    /// Number of indexed entities
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::combat::overlaps;
    use crate::sim::state::EnemyKind;
    use proptest::prelude::*;

    fn enemy_at(id: u32, kind: EnemyKind, pos: Vec2) -> Enemy {
        Enemy::new(id, kind, kind.base_stats(), pos)
    }

    #[test]
    fn test_cell_keys_floor_negative_coordinates() {
        let grid = SpatialGrid::new(100.0);
        assert_eq!(grid.cell_of(Vec2::new(0.0, 0.0)), (0, 0));
        assert_eq!(grid.cell_of(Vec2::new(99.9, 250.0)), (0, 2));
        assert_eq!(grid.cell_of(Vec2::new(-0.1, -100.0)), (-1, -1));
    }

    #[test]
    fn test_query_covers_neighbor_cells_only() {
        let mut grid = SpatialGrid::new(100.0);
        grid.insert(0, Vec2::new(150.0, 150.0)); // cell (1,1)
        grid.insert(1, Vec2::new(250.0, 50.0)); // cell (2,0)
        grid.insert(2, Vec2::new(450.0, 450.0)); // cell (4,4)

        assert_eq!(grid.query(Vec2::new(110.0, 110.0)), vec![0, 1]);
        assert_eq!(grid.query(Vec2::new(10.0, 10.0)), vec![0]);
        assert!(grid.query(Vec2::new(-500.0, -500.0)).is_empty());
    }

    #[test]
    fn test_rebuild_skips_destroyed() {
        let mut enemies = vec![
            enemy_at(1, EnemyKind::Basic, Vec2::new(0.0, 0.0)),
            enemy_at(2, EnemyKind::Tank, Vec2::new(10.0, 10.0)),
        ];
        enemies[0].destroy();

        let mut grid = SpatialGrid::default();
        grid.rebuild(&enemies);
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.query(Vec2::new(20.0, 20.0)), vec![1]);

        grid.rebuild(&[]);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_overlap_across_cell_boundary_is_candidate() {
        // Bullet center in cell (0, 0), tank center in cell (-1, -1)
        let tank = enemy_at(0, EnemyKind::Tank, Vec2::new(-38.0, -38.0));
        let mut grid = SpatialGrid::default();
        grid.rebuild(std::slice::from_ref(&tank));

        let bullet_pos = Vec2::new(-4.0, -4.0);
        assert!(overlaps(bullet_pos, 10.0, tank.pos, tank.size()));
        assert_eq!(grid.query(bullet_pos + Vec2::splat(5.0)), vec![0]);
    }

    proptest! {
        /// The broad phase never drops a pair the exact test would accept
        #[test]
        fn prop_query_finds_every_overlap(
            cell in (-5i32..5, -5i32..5),
            jitter in (-12.0f32..12.0, -12.0f32..12.0),
            offsets in prop::collection::vec((-60.0f32..60.0, -60.0f32..60.0, 0usize..4), 1..20),
        ) {
            // Bullet hugs a cell corner so nearby enemies land in neighbouring cells
            let corner = Vec2::new(cell.0 as f32, cell.1 as f32) * GRID_CELL_SIZE;
            let bx = corner.x + jitter.0;
            let by = corner.y + jitter.1;
            let enemies: Vec<Enemy> = offsets
                .into_iter()
                .enumerate()
                .map(|(i, (dx, dy, k))| {
                    enemy_at(i as u32, EnemyKind::ALL[k], Vec2::new(bx + dx, by + dy))
                })
                .collect();
            let mut grid = SpatialGrid::default();
            grid.rebuild(&enemies);

            let bullet_pos = Vec2::new(bx, by);
            let bullet_size = 10.0;
            let candidates = grid.query(bullet_pos + Vec2::splat(bullet_size / 2.0));

            for (i, enemy) in enemies.iter().enumerate() {
                if overlaps(bullet_pos, bullet_size, enemy.pos, enemy.size()) {
                    prop_assert!(candidates.contains(&i));
                }
            }
        }
    }
}
