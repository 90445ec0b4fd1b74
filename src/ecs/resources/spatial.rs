use std::collections::HashMap;

use bevy_ecs::entity::Entity;
use bevy_ecs::query::Changed;
use bevy_ecs::resource::Resource;
use bevy_ecs::system::{Query, ResMut};

use crate::ecs::components::Position;
use crate::model::Vec2;

const DEFAULT_CELL_SIZE: f32 = 8.0;
const MIN_CELL_SIZE: f32 = 0.01;

/// Uniform-grid spatial index over registered entities.
///
/// Each entity lives in exactly one bucket, keyed by
/// `floor(pos / cell_size)`. `on_moved` migrates only when the bucket
/// actually changes, so stationary agents cost O(1) amortized. Queries
/// scan the rectangular bucket range overlapping the circle and filter
/// by true squared distance, so bucket edges produce no false results.
#[derive(Resource, Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    buckets: HashMap<(i32, i32), Vec<Entity>>,
    entries: HashMap<Entity, ((i32, i32), Vec2)>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(MIN_CELL_SIZE),
            buckets: HashMap::new(),
            entries: HashMap::new(),
        }
    }

    fn cell_of(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entries.contains_key(&entity)
    }

    pub fn position_of(&self, entity: Entity) -> Option<Vec2> {
        self.entries.get(&entity).map(|(_, pos)| *pos)
    }

    /// Register an entity at a position. Registering an already-known
    /// entity is idempotent and behaves as a move.
    pub fn register(&mut self, entity: Entity, pos: Vec2) {
        if self.entries.contains_key(&entity) {
            self.move_to(entity, pos);
            return;
        }
        let cell = self.cell_of(pos);
        self.buckets.entry(cell).or_default().push(entity);
        self.entries.insert(entity, (cell, pos));
    }

    /// Remove an entity. Unknown entities are a no-op — agents can be
    /// destroyed mid-query.
    pub fn unregister(&mut self, entity: Entity) {
        let Some((cell, _)) = self.entries.remove(&entity) else {
            return;
        };
        if let Some(bucket) = self.buckets.get_mut(&cell) {
            bucket.retain(|&e| e != entity);
            if bucket.is_empty() {
                self.buckets.remove(&cell);
            }
        }
    }

    /// Update an entity's position, migrating buckets only if the cell
    /// changed. A no-op for unregistered entities.
    pub fn on_moved(&mut self, entity: Entity, new_pos: Vec2) {
        if self.entries.contains_key(&entity) {
            self.move_to(entity, new_pos);
        }
    }

    fn move_to(&mut self, entity: Entity, new_pos: Vec2) {
        let new_cell = self.cell_of(new_pos);
        let Some(entry) = self.entries.get_mut(&entity) else {
            return;
        };
        let old_cell = entry.0;
        entry.1 = new_pos;
        if old_cell == new_cell {
            return;
        }
        entry.0 = new_cell;
        if let Some(bucket) = self.buckets.get_mut(&old_cell) {
            bucket.retain(|&e| e != entity);
            if bucket.is_empty() {
                self.buckets.remove(&old_cell);
            }
        }
        self.buckets.entry(new_cell).or_default().push(entity);
    }

    /// All registered entities within `radius` of `center`. Negative
    /// radii clamp to zero; an empty grid returns an empty result.
    pub fn query(&self, center: Vec2, radius: f32) -> Vec<Entity> {
        let radius = radius.max(0.0);
        let r_sq = radius * radius;
        let min = self.cell_of(Vec2::new(center.x - radius, center.y - radius));
        let max = self.cell_of(Vec2::new(center.x + radius, center.y + radius));

        let mut hits = Vec::new();
        for cx in min.0..=max.0 {
            for cy in min.1..=max.1 {
                let Some(bucket) = self.buckets.get(&(cx, cy)) else {
                    continue;
                };
                for &entity in bucket {
                    if let Some((_, pos)) = self.entries.get(&entity)
                        && pos.distance_sq(center) <= r_sq
                    {
                        hits.push(entity);
                    }
                }
            }
        }
        hits
    }

    /// Closest entity to `center` within `max_radius`, or `None`.
    pub fn nearest(&self, center: Vec2, max_radius: f32) -> Option<Entity> {
        self.nearest_matching(center, max_radius, |_| true)
    }

    /// Closest entity satisfying `accept`, expanding ring-by-ring from
    /// the center cell. Terminates early once the best candidate found
    /// so far is closer than the next ring's minimum possible distance,
    /// avoiding a full scan when the target is close.
    pub fn nearest_matching(
        &self,
        center: Vec2,
        max_radius: f32,
        accept: impl Fn(Entity) -> bool,
    ) -> Option<Entity> {
        let max_radius = max_radius.max(0.0);
        let max_r_sq = max_radius * max_radius;
        let center_cell = self.cell_of(center);
        let max_ring = (max_radius / self.cell_size).ceil() as i32 + 1;

        let mut best: Option<(Entity, f32)> = None;
        for ring in 0..=max_ring {
            // Any point in a ring-r cell is at least (r-1) cells away.
            let ring_min = (ring - 1).max(0) as f32 * self.cell_size;
            if let Some((_, best_sq)) = best
                && best_sq <= ring_min * ring_min
            {
                break;
            }
            for cell in ring_cells(center_cell, ring) {
                let Some(bucket) = self.buckets.get(&cell) else {
                    continue;
                };
                for &entity in bucket {
                    if !accept(entity) {
                        continue;
                    }
                    let Some((_, pos)) = self.entries.get(&entity) else {
                        continue;
                    };
                    let d_sq = pos.distance_sq(center);
                    if d_sq <= max_r_sq && best.is_none_or(|(_, b)| d_sq < b) {
                        best = Some((entity, d_sq));
                    }
                }
            }
        }
        best.map(|(entity, _)| entity)
    }
}

/// Cells at exactly Chebyshev distance `ring` from `center`.
fn ring_cells(center: (i32, i32), ring: i32) -> Vec<(i32, i32)> {
    if ring == 0 {
        return vec![center];
    }
    let mut cells = Vec::with_capacity((8 * ring) as usize);
    for dx in -ring..=ring {
        cells.push((center.0 + dx, center.1 - ring));
        cells.push((center.0 + dx, center.1 + ring));
    }
    for dy in (-ring + 1)..ring {
        cells.push((center.0 - ring, center.1 + dy));
        cells.push((center.0 + ring, center.1 + dy));
    }
    cells
}

/// Re-buckets entities whose `Position` changed this tick. Queries made
/// before this system runs see the previous tick's snapshot.
pub fn sync_spatial_index(
    mut grid: ResMut<SpatialGrid>,
    moved: Query<(Entity, &Position), Changed<Position>>,
) {
    for (entity, pos) in moved.iter() {
        grid.on_moved(entity, pos.0);
    }
}
