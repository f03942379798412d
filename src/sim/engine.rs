//! Minimal deterministic circle physics
//!
//! Dynamic circles and static axis-aligned rectangles, semi-implicit Euler
//! integration and a sequential impulse solver. Good enough for a stacking
//! puzzle, nothing more. Bodies are kept sorted by id so iteration order,
//! and therefore every result, is reproducible.

use std::collections::BTreeSet;

use glam::Vec2;

use super::collision::{CollisionResult, circle_circle_collision, rect_circle_collision};
use super::physics::{BodyId, BodyLabel, BodyView, Material, PhysicsWorld};

/// Solver passes per step
const SOLVER_ITERATIONS: usize = 6;
/// Penetration tolerated before positional correction kicks in (pixels)
const PENETRATION_SLOP: f32 = 0.5;
/// Fraction of remaining penetration removed per pass
const POSITION_CORRECTION: f32 = 0.4;
/// Approach speeds below this never bounce (stops resting jitter)
const BOUNCE_THRESHOLD: f32 = 60.0;

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_size: Vec2 },
}

/// A rigid body owned by [`CircleWorld`]
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub label: BodyLabel,
    pub shape: Shape,
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub material: Material,
    inv_mass: f32,
}

impl Body {
    fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    fn view(&self) -> BodyView {
        BodyView {
            id: self.id,
            label: self.label,
            pos: self.pos,
            vel: self.vel,
            angle: self.angle,
        }
    }
}

/// Contact test for an ordered body pair (normal from `a` toward `b`)
fn contact(a: &Body, b: &Body) -> CollisionResult {
    match (a.shape, b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle_collision(a.pos, ra, b.pos, rb)
        }
        (Shape::Rect { half_size }, Shape::Circle { radius }) => {
            rect_circle_collision(a.pos, half_size, b.pos, radius)
        }
        (Shape::Circle { radius }, Shape::Rect { half_size }) => {
            let mut result = rect_circle_collision(b.pos, half_size, a.pos, radius);
            result.normal = -result.normal;
            result
        }
        // Static geometry never needs resolving against itself
        (Shape::Rect { .. }, Shape::Rect { .. }) => CollisionResult::miss(),
    }
}

/// Push two overlapping bodies apart and exchange impulses
fn resolve(a: &mut Body, b: &mut Body, hit: &CollisionResult) {
    let inv_a = a.inv_mass;
    let inv_b = b.inv_mass;
    let inv_sum = inv_a + inv_b;
    if inv_sum == 0.0 {
        return;
    }
    let normal = hit.normal;

    let depth = (hit.penetration - PENETRATION_SLOP).max(0.0);
    if depth > 0.0 {
        let correction = normal * (depth * POSITION_CORRECTION / inv_sum);
        a.pos -= correction * inv_a;
        b.pos += correction * inv_b;
    }

    let rel = b.vel - a.vel;
    let approach = rel.dot(normal);
    if approach >= 0.0 {
        return;
    }

    let restitution = if -approach < BOUNCE_THRESHOLD {
        0.0
    } else {
        a.material.restitution.max(b.material.restitution)
    };
    let j = -(1.0 + restitution) * approach / inv_sum;
    let impulse = normal * j;
    a.vel -= impulse * inv_a;
    b.vel += impulse * inv_b;

    // Coulomb friction along the contact tangent
    let rel = b.vel - a.vel;
    let tangent = rel - normal * rel.dot(normal);
    if tangent.length_squared() > 1e-8 {
        let tangent = tangent.normalize();
        let mu = a.material.friction.min(b.material.friction);
        let jt = (-rel.dot(tangent) / inv_sum).clamp(-j * mu, j * mu);
        let friction = tangent * jt;
        a.vel -= friction * inv_a;
        b.vel += friction * inv_b;
    }
}

/// Reference [`PhysicsWorld`] implementation
#[derive(Debug, Clone)]
pub struct CircleWorld {
    gravity: Vec2,
    /// Sorted by id
    bodies: Vec<Body>,
    /// Pairs touching at the end of the last step, (low id, high id)
    contacts: BTreeSet<(BodyId, BodyId)>,
    /// Contacts that began since the last drain
    started: Vec<(BodyId, BodyId)>,
    next_id: u32,
}

impl Default for CircleWorld {
    fn default() -> Self {
        Self::new(Vec2::new(0.0, crate::consts::GRAVITY))
    }
}

impl CircleWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity,
            bodies: Vec::new(),
            contacts: BTreeSet::new(),
            started: Vec::new(),
            next_id: 1,
        }
    }

    /// Number of bodies (static and dynamic)
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Overwrite a body's velocity (used by tests and scripted scenes)
    pub fn set_velocity(&mut self, id: BodyId, vel: Vec2) -> bool {
        match self.index_of(id) {
            Some(i) => {
                self.bodies[i].vel = vel;
                true
            }
            None => false,
        }
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.binary_search_by_key(&id, |b| b.id).ok()
    }

    fn insert(&mut self, label: BodyLabel, shape: Shape, pos: Vec2, material: Material, inv_mass: f32) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        // Ids are monotonic so pushing keeps the vector sorted
        self.bodies.push(Body {
            id,
            label,
            shape,
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            material,
            inv_mass,
        });
        id
    }

    fn integrate(&mut self, dt: f32) {
        for body in self.bodies.iter_mut().filter(|b| !b.is_static()) {
            body.vel += self.gravity * dt;
            body.vel *= 1.0 - body.material.friction_air;
            body.pos += body.vel * dt;
            // Rolling approximation for the rendered angle
            if let Shape::Circle { radius } = body.shape {
                body.angle += body.vel.x / radius * dt;
            }
        }
    }

    fn solve(&mut self) -> BTreeSet<(BodyId, BodyId)> {
        let mut touching = BTreeSet::new();
        let n = self.bodies.len();

        for pass in 0..SOLVER_ITERATIONS {
            for j in 1..n {
                let (left, right) = self.bodies.split_at_mut(j);
                let b = &mut right[0];
                for a in left.iter_mut() {
                    if a.is_static() && b.is_static() {
                        continue;
                    }
                    let hit = contact(a, b);
                    if !hit.hit {
                        continue;
                    }
                    if pass == 0 {
                        touching.insert((a.id, b.id));
                    }
                    resolve(a, b, &hit);
                }
            }
        }

        touching
    }
}

impl PhysicsWorld for CircleWorld {
    fn add_circle(&mut self, pos: Vec2, radius: f32, material: Material, label: BodyLabel) -> BodyId {
        let mass = material.density * std::f32::consts::PI * radius * radius;
        let inv_mass = if mass > 0.0 { 1.0 / mass } else { 0.0 };
        self.insert(label, Shape::Circle { radius }, pos, material, inv_mass)
    }

    fn add_static_rect(&mut self, center: Vec2, size: Vec2, friction: f32, label: BodyLabel) -> BodyId {
        let shape = Shape::Rect {
            half_size: size * 0.5,
        };
        self.insert(label, shape, center, Material::fixed(friction), 0.0)
    }

    fn remove_body(&mut self, id: BodyId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.bodies.remove(index);
        self.contacts.retain(|&(a, b)| a != id && b != id);
        self.started.retain(|&(a, b)| a != id && b != id);
        true
    }

    fn body(&self, id: BodyId) -> Option<BodyView> {
        self.index_of(id).map(|i| self.bodies[i].view())
    }

    fn bodies(&self) -> impl Iterator<Item = BodyView> + '_ {
        self.bodies.iter().map(Body::view)
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    fn step(&mut self, dt: f32) {
        self.integrate(dt);
        let touching = self.solve();
        self.started.extend(touching.difference(&self.contacts).copied());
        self.contacts = touching;
    }

    fn drain_collision_starts(&mut self) -> Vec<(BodyId, BodyId)> {
        std::mem::take(&mut self.started)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn boxed_world() -> (CircleWorld, BodyId) {
        let mut world = CircleWorld::default();
        let floor = world.add_static_rect(Vec2::new(200.0, 530.0), Vec2::new(400.0, 60.0), 0.8, BodyLabel::Floor);
        (world, floor)
    }

    #[test]
    fn test_circle_falls_and_lands_on_floor() {
        let (mut world, floor) = boxed_world();
        let id = world.add_circle(Vec2::new(200.0, 100.0), 25.0, Material::FOOD, BodyLabel::Food);

        for _ in 0..240 {
            world.step(SIM_DT);
        }

        let body = world.body(id).unwrap();
        // Floor top is y = 500, so the resting centre is near y = 475
        assert!((body.pos.y - 475.0).abs() < 3.0, "resting at {}", body.pos.y);
        assert!(body.vel.length() < 30.0);

        // One start per landing; the first bounce may add another
        let starts = world.drain_collision_starts();
        assert!(!starts.is_empty());
        assert!(starts.iter().all(|&pair| pair == (floor, id)));
        // Batch is consumed by draining
        assert!(world.drain_collision_starts().is_empty());
    }

    #[test]
    fn test_collision_start_reported_once() {
        let mut world = CircleWorld::new(Vec2::ZERO);
        let a = world.add_circle(Vec2::new(0.0, 0.0), 10.0, Material::FOOD, BodyLabel::Food);
        let b = world.add_circle(Vec2::new(19.0, 0.0), 10.0, Material::FOOD, BodyLabel::Food);

        world.step(SIM_DT);
        assert_eq!(world.drain_collision_starts(), vec![(a, b)]);

        // Still overlapping within slop: no new start event
        world.step(SIM_DT);
        assert!(world.drain_collision_starts().is_empty());
    }

    #[test]
    fn test_remove_body() {
        let mut world = CircleWorld::new(Vec2::ZERO);
        let a = world.add_circle(Vec2::ZERO, 10.0, Material::FOOD, BodyLabel::Food);
        let b = world.add_circle(Vec2::new(100.0, 0.0), 10.0, Material::FOOD, BodyLabel::Food);

        assert!(world.remove_body(a));
        assert!(!world.remove_body(a));
        assert!(world.body(a).is_none());
        assert_eq!(world.bodies().map(|v| v.id).collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn test_removed_body_drops_pending_starts() {
        let mut world = CircleWorld::new(Vec2::ZERO);
        let a = world.add_circle(Vec2::ZERO, 10.0, Material::FOOD, BodyLabel::Food);
        let _b = world.add_circle(Vec2::new(15.0, 0.0), 10.0, Material::FOOD, BodyLabel::Food);

        world.step(SIM_DT);
        world.remove_body(a);
        assert!(world.drain_collision_starts().is_empty());
    }

    #[test]
    fn test_overlapping_circles_separate() {
        let mut world = CircleWorld::new(Vec2::ZERO);
        let a = world.add_circle(Vec2::ZERO, 10.0, Material::FOOD, BodyLabel::Food);
        let b = world.add_circle(Vec2::new(10.0, 0.0), 10.0, Material::FOOD, BodyLabel::Food);

        for _ in 0..30 {
            world.step(SIM_DT);
        }

        let pa = world.body(a).unwrap().pos;
        let pb = world.body(b).unwrap().pos;
        assert!(pa.distance(pb) > 19.0);
        // Equal masses: the pair's midpoint does not drift
        assert!((crate::midpoint(pa, pb) - Vec2::new(5.0, 0.0)).length() < 0.01);
    }
}
