//! Uniform grid over enemy positions, rebuilt at the end of every tick.
//!
//! Towers query it for range checks. Entries hold the enemy's index in
//! `GameState::enemies` at rebuild time. The tick order keeps those indices
//! valid until the next rebuild: the economy filter runs before the rebuild
//! and new spawns are only ever appended.

use std::collections::HashMap;

use grovewatch_core::entities::Enemy;
use grovewatch_core::types::{EnemyId, Vector2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialEntry {
    pub index: usize,
    pub id: EnemyId,
    pub position: Vector2,
}

#[derive(Debug, Clone, Default)]
pub struct SpatialGrid {
    cell_size: f64,
    cells: HashMap<(i32, i32), Vec<SpatialEntry>>,
    len: usize,
    /// Length of the enemy list at the last rebuild. Entries never point past it.
    indexed_until: usize,
}

impl SpatialGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: HashMap::new(),
            len: 0,
            indexed_until: 0,
        }
    }

    fn key(&self, position: Vector2) -> (i32, i32) {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    /// Re-index every targetable enemy.
    pub fn rebuild(&mut self, enemies: &[Enemy]) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        self.len = 0;
        self.indexed_until = enemies.len();
        for (index, enemy) in enemies.iter().enumerate() {
            if !enemy.is_active() {
                continue;
            }
            let key = self.key(enemy.position);
            self.cells.entry(key).or_default().push(SpatialEntry {
                index,
                id: enemy.id,
                position: enemy.position,
            });
            self.len += 1;
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.len = 0;
        self.indexed_until = 0;
    }

    /// Enemies at or past this index were appended after the last rebuild.
    pub fn indexed_until(&self) -> usize {
        self.indexed_until
    }

    /// Indexed enemies.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Entries within `radius` of `center`, sorted by enemy index.
    pub fn query_radius(&self, center: Vector2, radius: f64) -> Vec<SpatialEntry> {
        if !(radius >= 0.0) || self.is_empty() {
            return Vec::new();
        }
        let (min_x, min_y) = self.key(center - Vector2::splat(radius));
        let (max_x, max_y) = self.key(center + Vector2::splat(radius));
        let radius_sq = radius * radius;

        let mut found: Vec<SpatialEntry> = Vec::new();
        for cx in min_x..=max_x {
            for cy in min_y..=max_y {
                let Some(bucket) = self.cells.get(&(cx, cy)) else {
                    continue;
                };
                found.extend(
                    bucket
                        .iter()
                        .filter(|entry| entry.position.distance_squared(center) <= radius_sq)
                        .copied(),
                );
            }
        }
        found.sort_by_key(|entry| entry.index);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::create_enemy;
    use grovewatch_core::config::GameConfig;
    use grovewatch_core::enums::EnemyType;

    fn enemy_at(id: u32, x: f64, y: f64) -> Enemy {
        let config = GameConfig::default();
        create_enemy(
            EnemyId(id),
            EnemyType::Pest,
            config.enemies.get(EnemyType::Pest),
            Vector2::new(x, y),
        )
    }

    #[test]
    fn query_finds_enemies_across_cells_in_index_order() {
        let enemies = vec![
            enemy_at(7, 95.0, 10.0),
            enemy_at(3, 10.0, 10.0),
            enemy_at(9, 400.0, 400.0),
            enemy_at(1, 41.0, 39.0),
        ];
        let mut grid = SpatialGrid::new(40.0);
        grid.rebuild(&enemies);
        assert_eq!(grid.len(), 4);

        let hits = grid.query_radius(Vector2::new(40.0, 10.0), 60.0);
        let ids: Vec<_> = hits.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![EnemyId(7), EnemyId(3), EnemyId(1)]);
        assert_eq!(hits[0].index, 0);
    }

    #[test]
    fn rebuild_skips_inactive_and_drops_stale_entries() {
        let mut enemies = vec![enemy_at(0, 10.0, 10.0), enemy_at(1, 12.0, 10.0)];
        let mut grid = SpatialGrid::new(40.0);
        grid.rebuild(&enemies);
        assert_eq!(grid.len(), 2);

        enemies[0].is_dead = true;
        enemies[1].position = Vector2::new(300.0, 300.0);
        grid.rebuild(&enemies);
        assert_eq!(grid.len(), 1);
        assert!(grid.query_radius(Vector2::new(10.0, 10.0), 20.0).is_empty());
    }

    #[test]
    fn negative_coordinates_and_radius() {
        let enemies = vec![enemy_at(0, -5.0, -5.0)];
        let mut grid = SpatialGrid::new(40.0);
        grid.rebuild(&enemies);
        assert_eq!(grid.query_radius(Vector2::ZERO, 10.0).len(), 1);
        assert!(grid.query_radius(Vector2::ZERO, -1.0).is_empty());
    }
}
