use std::collections::HashMap;

use glam::Vec2;
use log::debug;

use crate::{
    collision::contact::{ContactManifold, ManifoldPoint},
    config::WorldSettings,
    core::constraints::{Constraint, ConstraintId},
    utils::{allocator::Arena, math::Vec2Ext, EntityId},
};

/// Unordered body pair. `PairKey::new(a, b) == PairKey::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    pub low: EntityId,
    pub high: EntityId,
}

impl PairKey {
    pub fn new(a: EntityId, b: EntityId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn involves(&self, body: EntityId) -> bool {
        self.low == body || self.high == body
    }
}

/// Last-used normal and the live (contact, friction) constraint pairs for one
/// body pair.
#[derive(Debug, Clone, Default)]
pub struct ContactPair {
    pub normal: Vec2,
    pub constraints: Vec<(ConstraintId, ConstraintId)>,
}

/// Gives contacts identity across frames so their accumulated impulses can
/// warm start the next solve.
///
/// The cache owns no constraints; it creates them in the world's arena,
/// pushes their handles to the active list and flags them for removal. The
/// solver's purge does the actual deletion.
#[derive(Debug, Clone)]
pub struct ContactCache {
    pairs: HashMap<PairKey, ContactPair>,
    contact_slop: f32,
    contact_baumgarte_term: f32,
    friction: f32,
    match_threshold: f32,
    normal_similarity: f32,
}

impl Default for ContactCache {
    fn default() -> Self {
        Self::new(&WorldSettings::default())
    }
}

impl ContactCache {
    pub fn new(settings: &WorldSettings) -> Self {
        Self {
            pairs: HashMap::new(),
            contact_slop: settings.contact_slop,
            contact_baumgarte_term: settings.contact_baumgarte_term,
            friction: settings.friction,
            match_threshold: settings.match_threshold,
            normal_similarity: settings.normal_similarity,
        }
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn contains(&self, id_a: EntityId, id_b: EntityId) -> bool {
        self.pairs.contains_key(&PairKey::new(id_a, id_b))
    }

    /// Stored (contact, friction) handles for a pair, oldest first.
    pub fn constraints_for(&self, id_a: EntityId, id_b: EntityId) -> &[(ConstraintId, ConstraintId)] {
        self.pairs
            .get(&PairKey::new(id_a, id_b))
            .map_or(&[], |pair| pair.constraints.as_slice())
    }

    pub fn normal_for(&self, id_a: EntityId, id_b: EntityId) -> Option<Vec2> {
        self.pairs.get(&PairKey::new(id_a, id_b)).map(|pair| pair.normal)
    }

    /// Reconciles this frame's manifold for `(id_a, id_b)` with the stored pair.
    pub fn add_manifold(
        &mut self,
        mut manifold: ContactManifold,
        id_a: EntityId,
        id_b: EntityId,
        constraints: &mut Arena<Constraint>,
        active: &mut Vec<ConstraintId>,
    ) {
        let key = PairKey::new(id_a, id_b);
        let Some(pair) = self.pairs.get_mut(&key) else {
            let mut pair = ContactPair {
                normal: manifold.normal,
                constraints: Vec::with_capacity(manifold.len()),
            };
            self.populate(&mut pair, &manifold, &manifold.points, constraints, active);
            self.pairs.insert(key, pair);
            return;
        };

        let mut similarity = pair.normal.dot(manifold.normal);
        if similarity < 0.0 {
            manifold.flip();
            similarity = -similarity;
        }

        for &(contact, _) in &pair.constraints {
            if let Some(c) = constraints.get_mut(contact) {
                c.should_remove = true;
            }
        }

        let mut unmatched = manifold.points.clone();
        if similarity > self.normal_similarity {
            let mut matched = vec![false; pair.constraints.len()];
            unmatched.retain(|new_point| {
                let hit = Self::match_point(
                    new_point,
                    &pair.constraints,
                    &mut matched,
                    constraints,
                    self.match_threshold,
                );
                let Some((contact, friction)) = hit else {
                    return true;
                };
                if let Some(c) = constraints.get_mut(contact) {
                    c.should_remove = false;
                    c.update_contact(new_point.point, manifold.normal, new_point.penetration);
                }
                if let Some(f) = constraints.get_mut(friction) {
                    f.update_contact(new_point.point, manifold.normal, new_point.penetration);
                }
                false
            });
        } else {
            debug!(
                "contact normal between {:?} and {:?} turned too far (dot {:.3}); dropping {} cached contacts",
                key.low,
                key.high,
                similarity,
                pair.constraints.len()
            );
        }

        pair.constraints.retain(|&(contact, friction)| {
            let keep = constraints
                .get(contact)
                .is_some_and(|c| !c.should_remove);
            if !keep {
                if let Some(f) = constraints.get_mut(friction) {
                    f.should_remove = true;
                }
            }
            keep
        });
        pair.normal = manifold.normal;

        let mut pair = std::mem::take(pair);
        self.populate(&mut pair, &manifold, &unmatched, constraints, active);
        self.pairs.insert(key, pair);
    }

    /// First stored contact, not yet matched this frame, within the match threshold.
    fn match_point(
        new_point: &ManifoldPoint,
        stored: &[(ConstraintId, ConstraintId)],
        matched: &mut [bool],
        constraints: &Arena<Constraint>,
        threshold: f32,
    ) -> Option<(ConstraintId, ConstraintId)> {
        for (index, &(contact, friction)) in stored.iter().enumerate() {
            if matched[index] {
                continue;
            }
            let Some(point) = constraints.get(contact).and_then(Constraint::contact_point) else {
                continue;
            };
            if new_point.point.dist2(point) < threshold {
                matched[index] = true;
                return Some((contact, friction));
            }
        }
        None
    }

    fn populate(
        &self,
        pair: &mut ContactPair,
        manifold: &ContactManifold,
        points: &[ManifoldPoint],
        constraints: &mut Arena<Constraint>,
        active: &mut Vec<ConstraintId>,
    ) {
        for p in points {
            let contact = constraints.insert(
                Constraint::contact(
                    manifold.reference,
                    manifold.incident,
                    p.point,
                    manifold.normal,
                    p.penetration,
                )
                .with_slop(self.contact_slop)
                .with_baumgarte_term(self.contact_baumgarte_term),
            );
            let friction = constraints.insert(
                Constraint::friction(
                    manifold.reference,
                    manifold.incident,
                    p.point,
                    manifold.normal,
                    contact,
                )
                .with_friction(self.friction),
            );
            active.push(contact);
            active.push(friction);
            pair.constraints.push((contact, friction));
        }
    }

    /// Flags every constraint of the pair for removal and forgets the pair.
    pub fn remove_manifold(
        &mut self,
        id_a: EntityId,
        id_b: EntityId,
        constraints: &mut Arena<Constraint>,
    ) {
        let key = PairKey::new(id_a, id_b);
        if let Some(pair) = self.pairs.remove(&key) {
            debug!("bodies {:?} and {:?} separated", key.low, key.high);
            Self::mark_removed(&pair, constraints);
        }
    }

    /// Drops every pair involving `body`.
    pub fn remove_body(&mut self, body: EntityId, constraints: &mut Arena<Constraint>) {
        self.pairs.retain(|key, pair| {
            if key.involves(body) {
                Self::mark_removed(pair, constraints);
                false
            } else {
                true
            }
        });
    }

    /// Flags every cached constraint for removal, then clears the table.
    pub fn remove_all(&mut self, constraints: &mut Arena<Constraint>) {
        for pair in self.pairs.values() {
            Self::mark_removed(pair, constraints);
        }
        self.clear();
    }

    /// Forgets every pair without touching the constraints.
    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    fn mark_removed(pair: &ContactPair, constraints: &mut Arena<Constraint>) {
        for &(contact, friction) in &pair.constraints {
            for id in [contact, friction] {
                if let Some(c) = constraints.get_mut(id) {
                    c.should_remove = true;
                }
            }
        }
    }
}
