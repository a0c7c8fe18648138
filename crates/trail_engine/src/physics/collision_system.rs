//! Tomb collision system
//!
//! Owns the tombs a player leaves behind and answers "does this body hit any
//! of them" in three phases:
//!
//! 1. **Broad phase**: the 3x3 block of grid cells around the query position.
//! 2. **Prefilter**: bounding-sphere overlap between the query body and each
//!    candidate.
//! 3. **Narrow phase**: reduced SAT between oriented bounding boxes.
//!
//! The tomb store is the only owner of tomb data; the grid indexes tombs by
//! key. When the store is bounded, spawning past capacity evicts the oldest
//! tomb from both.

use std::collections::VecDeque;

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::core::config::{CollisionConfig, GridConfig};
use crate::foundation::math::{Quat, Vec3};
use crate::physics::collision::{sat_collision, BoxCollider, OrientedBoundingBox, ProjectionMode};
use crate::physics::error::GeometryError;
use crate::spatial::SpatialGrid;

new_key_type! {
    /// Stable handle to a tomb in a [`TombStore`]
    pub struct TombKey;
}

/// Obstacle left on the player's trail
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tomb {
    /// World rotation
    pub rotation: Quat,
    /// World translation (also the grid insertion point)
    pub translation: Vec3,
    /// Set once a collision test hits this tomb; never cleared by the system
    pub overlapped: bool,
}

impl Tomb {
    /// New, not yet overlapped tomb
    pub fn new(rotation: Quat, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
            overlapped: false,
        }
    }
}

/// Master list of tombs in spawn order, optionally bounded
#[derive(Debug, Clone, Default)]
pub struct TombStore {
    tombs: SlotMap<TombKey, Tomb>,
    order: VecDeque<TombKey>,
    max_tombs: usize,
}

impl TombStore {
    /// Create a store holding at most `max_tombs` tombs (0 = unbounded)
    pub fn new(max_tombs: usize) -> Self {
        Self {
            tombs: SlotMap::with_key(),
            order: VecDeque::new(),
            max_tombs,
        }
    }

    /// True when the next push will evict the oldest tomb
    pub fn is_full(&self) -> bool {
        self.max_tombs > 0 && self.tombs.len() >= self.max_tombs
    }

    /// Add a tomb. Returns its key and, when the store was full, the evicted oldest tomb.
    pub fn push(&mut self, tomb: Tomb) -> (TombKey, Option<(TombKey, Tomb)>) {
        let evicted = if self.is_full() { self.pop_oldest() } else { None };
        let key = self.tombs.insert(tomb);
        self.order.push_back(key);
        (key, evicted)
    }

    /// Remove and return the oldest tomb
    pub fn pop_oldest(&mut self) -> Option<(TombKey, Tomb)> {
        while let Some(key) = self.order.pop_front() {
            if let Some(tomb) = self.tombs.remove(key) {
                return Some((key, tomb));
            }
        }
        None
    }

    /// Tomb by key
    pub fn get(&self, key: TombKey) -> Option<&Tomb> {
        self.tombs.get(key)
    }

    /// Mutable tomb by key
    pub fn get_mut(&mut self, key: TombKey) -> Option<&mut Tomb> {
        self.tombs.get_mut(key)
    }

    /// Number of live tombs
    pub fn len(&self) -> usize {
        self.tombs.len()
    }

    /// True when no tombs are stored
    pub fn is_empty(&self) -> bool {
        self.tombs.is_empty()
    }

    /// Tombs from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = (TombKey, &Tomb)> + '_ {
        self.order
            .iter()
            .filter_map(move |&key| self.tombs.get(key).map(|tomb| (key, tomb)))
    }

    /// Drop every tomb
    pub fn clear(&mut self) {
        self.tombs.clear();
        self.order.clear();
    }
}

/// What to do once the narrow phase finds a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverlapPolicy {
    /// Flag the first colliding tomb and stop
    #[default]
    FirstHit,
    /// Flag every colliding tomb
    CollectAll,
}

/// Outcome of one collision query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Tombs returned by the grid broad phase
    pub candidates: usize,
    /// Candidates whose bounding sphere overlapped the query sphere
    pub prefiltered: usize,
    /// Tombs confirmed by the SAT test, in broad-phase order
    pub hits: Vec<TombKey>,
}

impl CollisionReport {
    /// True when at least one tomb was hit
    pub fn collided(&self) -> bool {
        !self.hits.is_empty()
    }

    /// First tomb hit, if any
    pub fn first_hit(&self) -> Option<TombKey> {
        self.hits.first().copied()
    }
}

/// Broad/narrow-phase collision detection against the tomb trail
#[derive(Debug, Clone)]
pub struct TombCollisionSystem {
    grid: SpatialGrid<TombKey>,
    tombs: TombStore,
    tomb_collider: BoxCollider,
    projection_mode: ProjectionMode,
    overlap_policy: OverlapPolicy,
    neighbor_radius: i32,
}

impl TombCollisionSystem {
    /// Create an empty system over a grid described by `grid`
    pub fn new(grid: &GridConfig, collision: &CollisionConfig) -> Self {
        Self {
            grid: SpatialGrid::new(grid.row_count, grid.column_count, grid.cell_width),
            tombs: TombStore::new(collision.max_tombs),
            tomb_collider: collision.tomb,
            projection_mode: collision.projection_mode,
            overlap_policy: collision.overlap_policy,
            neighbor_radius: collision.neighbor_radius,
        }
    }

    /// Spawn a tomb and index it at its translation.
    ///
    /// When the store is full the oldest tomb is evicted from the store and the grid.
    pub fn spawn_tomb(&mut self, rotation: Quat, translation: Vec3) -> TombKey {
        let (key, evicted) = self.tombs.push(Tomb::new(rotation, translation));

        if let Some((old_key, old)) = evicted {
            let unindexed = self
                .grid
                .remove_world(old.translation.x, old.translation.z, &old_key);
            debug!(
                "Evicted oldest tomb at ({:.1}, {:.1}) (was indexed: {})",
                old.translation.x, old.translation.z, unindexed
            );
        }

        if !self.grid.insert_world(translation.x, translation.z, key) {
            trace!(
                "Tomb at ({:.1}, {:.1}) lies outside the grid and will never be hit",
                translation.x, translation.z
            );
        }
        key
    }

    /// Test a body posed at `rotation` / `translation` against nearby tombs.
    ///
    /// Every tomb confirmed by the narrow phase gets its `overlapped` flag
    /// set; with [`OverlapPolicy::FirstHit`] the search stops at the first.
    pub fn check_collision(
        &mut self,
        collider: &BoxCollider,
        rotation: Quat,
        translation: Vec3,
    ) -> Result<CollisionReport, GeometryError> {
        let candidates = self.grid.retrieve_neighbors_world(
            translation.x,
            translation.z,
            self.neighbor_radius,
        );

        let query_sphere = collider.bounding_sphere(translation);
        let survivors: Vec<TombKey> = candidates
            .iter()
            .copied()
            .filter(|&key| {
                self.tombs.get(key).is_some_and(|tomb| {
                    query_sphere.intersects(&self.tomb_collider.bounding_sphere(tomb.translation))
                })
            })
            .collect();

        let mut report = CollisionReport {
            candidates: candidates.len(),
            prefiltered: survivors.len(),
            hits: Vec::new(),
        };
        if survivors.is_empty() {
            return Ok(report);
        }

        let query_box = collider.world_box(rotation, translation)?;
        for key in survivors {
            if !self.narrow_phase(&query_box, key)? {
                continue;
            }
            if let Some(tomb) = self.tombs.get_mut(key) {
                tomb.overlapped = true;
            }
            report.hits.push(key);
            if self.overlap_policy == OverlapPolicy::FirstHit {
                break;
            }
        }

        if report.collided() {
            debug!(
                "Collision at ({:.1}, {:.1}): {} hit(s) from {} candidates",
                translation.x,
                translation.z,
                report.hits.len(),
                report.candidates
            );
        }
        Ok(report)
    }

    fn narrow_phase(&self, query_box: &OrientedBoundingBox, key: TombKey) -> Result<bool, GeometryError> {
        let Some(tomb_box) = self.tomb_box(key).transpose()? else {
            return Ok(false);
        };
        Ok(sat_collision(query_box, &tomb_box, self.projection_mode))
    }

    /// World-space box of a stored tomb
    pub fn tomb_box(&self, key: TombKey) -> Option<Result<OrientedBoundingBox, GeometryError>> {
        self.tombs
            .get(key)
            .map(|tomb| self.tomb_collider.world_box(tomb.rotation, tomb.translation))
    }

    /// The tomb master list
    pub fn tombs(&self) -> &TombStore {
        &self.tombs
    }

    /// The broad-phase grid
    pub fn grid(&self) -> &SpatialGrid<TombKey> {
        &self.grid
    }

    /// Remove every tomb from the store and the grid
    pub fn clear(&mut self) {
        self.tombs.clear();
        self.grid.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::yaw_rotation;

    fn system_with(max_tombs: usize, overlap_policy: OverlapPolicy) -> TombCollisionSystem {
        let collision = CollisionConfig {
            max_tombs,
            overlap_policy,
            ..CollisionConfig::default()
        };
        TombCollisionSystem::new(&GridConfig::default(), &collision)
    }

    #[test]
    fn test_store_evicts_oldest_when_full() {
        let mut store = TombStore::new(2);
        let (a, none) = store.push(Tomb::new(Quat::identity(), Vec3::new(1.0, 0.0, 0.0)));
        assert!(none.is_none());
        let (b, _) = store.push(Tomb::new(Quat::identity(), Vec3::new(2.0, 0.0, 0.0)));
        assert!(store.is_full());

        let (c, evicted) = store.push(Tomb::new(Quat::identity(), Vec3::new(3.0, 0.0, 0.0)));
        let (evicted_key, evicted_tomb) = evicted.unwrap();
        assert_eq!(evicted_key, a);
        assert_eq!(evicted_tomb.translation.x, 1.0);
        assert!(store.get(a).is_none());
        assert_eq!(store.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec![b, c]);
    }

    #[test]
    fn test_unbounded_store_never_evicts() {
        let mut store = TombStore::new(0);
        for i in 0..100 {
            let (_, evicted) = store.push(Tomb::new(Quat::identity(), Vec3::new(i as f32, 0.0, 0.0)));
            assert!(evicted.is_none());
        }
        assert_eq!(store.len(), 100);
    }

    #[test]
    fn test_eviction_removes_tomb_from_grid() {
        let mut system = system_with(3, OverlapPolicy::FirstHit);
        let first = system.spawn_tomb(Quat::identity(), Vec3::new(100.0, 20.0, 100.0));
        for i in 1..=3 {
            system.spawn_tomb(Quat::identity(), Vec3::new(100.0 + i as f32 * 300.0, 20.0, 100.0));
        }

        assert_eq!(system.tombs().len(), 3);
        assert_eq!(system.grid().len(), 3);
        assert!(!system.grid().retrieve_world(100.0, 100.0).contains(&first));
        assert!(system.tombs().get(first).is_none());
        assert!(system.tomb_box(first).is_none());
    }

    #[test]
    fn test_tomb_box_follows_stored_pose() {
        let mut system = system_with(0, OverlapPolicy::FirstHit);
        let key = system.spawn_tomb(yaw_rotation(90.0), Vec3::new(2250.0, 20.0, 2250.0));

        let obb = system.tomb_box(key).unwrap().unwrap();
        // 30-unit tall slab standing on its translation
        assert!((obb.center() - Vec3::new(2250.0, 35.0, 2250.0)).norm() < 1e-2);
    }

    #[test]
    fn test_prefilter_rejects_distant_candidates() {
        let mut system = system_with(0, OverlapPolicy::FirstHit);
        // Same grid cell neighbourhood, but 200 units away: spheres 100 + 50 do not meet
        let tomb = system.spawn_tomb(yaw_rotation(90.0), Vec3::new(2250.0, 20.0, 2450.0));

        let report = system
            .check_collision(&BoxCollider::player(), Quat::identity(), Vec3::new(2250.0, 20.0, 2250.0))
            .unwrap();

        assert_eq!(report.candidates, 1);
        assert_eq!(report.prefiltered, 0);
        assert!(!report.collided());
        assert!(!system.tombs().get(tomb).unwrap().overlapped);
    }

    #[test]
    fn test_first_hit_flags_only_one_tomb() {
        let mut system = system_with(0, OverlapPolicy::FirstHit);
        let a = system.spawn_tomb(yaw_rotation(90.0), Vec3::new(2250.0, 20.0, 2240.0));
        let b = system.spawn_tomb(yaw_rotation(90.0), Vec3::new(2250.0, 20.0, 2260.0));

        let report = system
            .check_collision(&BoxCollider::player(), Quat::identity(), Vec3::new(2250.0, 20.0, 2250.0))
            .unwrap();

        assert_eq!(report.prefiltered, 2);
        assert_eq!(report.hits, vec![a]);
        assert!(system.tombs().get(a).unwrap().overlapped);
        assert!(!system.tombs().get(b).unwrap().overlapped);
    }

    #[test]
    fn test_collect_all_flags_every_hit() {
        let mut system = system_with(0, OverlapPolicy::CollectAll);
        let a = system.spawn_tomb(yaw_rotation(90.0), Vec3::new(2250.0, 20.0, 2240.0));
        let b = system.spawn_tomb(yaw_rotation(90.0), Vec3::new(2250.0, 20.0, 2260.0));

        let report = system
            .check_collision(&BoxCollider::player(), Quat::identity(), Vec3::new(2250.0, 20.0, 2250.0))
            .unwrap();

        assert_eq!(report.hits, vec![a, b]);
        assert!(system.tombs().iter().all(|(_, tomb)| tomb.overlapped));
    }

    #[test]
    fn test_tombs_outside_grid_are_stored_but_not_indexed() {
        let mut system = system_with(0, OverlapPolicy::FirstHit);
        system.spawn_tomb(Quat::identity(), Vec3::new(-50.0, 20.0, 10.0));

        assert_eq!(system.tombs().len(), 1);
        assert!(system.grid().is_empty());

        system.clear();
        assert!(system.tombs().is_empty());
    }
}
