//! Frame driver
//!
//! Owns the bodies and obstacles and runs the per-frame sweep. For each body, in
//! insertion order: frustum test, walls, every later body, every obstacle, then
//! integration. Bodies are reached by index so a collision's changes to both
//! balls are what later tests in the same frame see.

use glam::Vec3;

use super::body::{Body, BodyDiagnostics, BodyId};
use super::boundary::resolve_boundary;
use super::collision::{resolve_obstacle, resolve_pairwise};
use super::frustum::{Containment, Frustum};
use super::obstacle::StaticObstacle;
use crate::consts::{DEFAULT_MASS, MAX_FRAME_DT};
use crate::error::{Result, SimError};
use crate::settings::SimConfig;

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub wall_hits: u32,
    pub ball_hits: u32,
    pub obstacle_hits: u32,
    pub inside: u32,
    pub intersecting: u32,
    pub outside: u32,
}

impl FrameStats {
    fn count(&mut self, containment: Containment) {
        match containment {
            Containment::Inside => self.inside += 1,
            Containment::Intersecting => self.intersecting += 1,
            Containment::Outside => self.outside += 1,
        }
    }

    fn merge(&mut self, other: FrameStats) {
        self.wall_hits += other.wall_hits;
        self.ball_hits += other.ball_hits;
        self.obstacle_hits += other.obstacle_hits;
        // Visibility reflects the latest substep only
        self.inside = other.inside;
        self.intersecting = other.intersecting;
        self.outside = other.outside;
    }
}

/// The simulated room
#[derive(Debug, Clone)]
pub struct World {
    config: SimConfig,
    /// Insertion order is iteration order
    bodies: Vec<Body>,
    obstacles: Vec<StaticObstacle>,
    frustum: Option<Frustum>,
    accumulator: f32,
    frame_count: u64,
    next_id: u32,
}

impl World {
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let config = config.sanitized();
        log::info!(
            "World created: gravity={} elasticity={} drag={}",
            config.gravity,
            config.elasticity,
            config.drag
        );
        Ok(Self {
            config,
            bodies: Vec::new(),
            obstacles: Vec::new(),
            frustum: None,
            accumulator: 0.0,
            frame_count: 0,
            next_id: 1,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Replace the configuration (validated, coefficients clamped)
    pub fn set_config(&mut self, config: SimConfig) -> Result<()> {
        config.validate()?;
        self.config = config.sanitized();
        Ok(())
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Add a ball; fails for non-positive mass
    pub fn create_body(&mut self, position: Vec3, velocity: Vec3, mass: f32) -> Result<BodyId> {
        let id = BodyId(self.next_id);
        let body = Body::new(id, position, velocity, mass)?;
        self.next_id += 1;
        self.bodies.push(body);
        log::debug!("Created body {:?} at {:?} (mass {})", id, position, mass);
        Ok(id)
    }

    /// Add a unit-mass ball
    pub fn create_body_default_mass(&mut self, position: Vec3, velocity: Vec3) -> Result<BodyId> {
        self.create_body(position, velocity, DEFAULT_MASS)
    }

    /// Remove a ball, keeping the order of the rest
    pub fn remove_body(&mut self, id: BodyId) -> Result<Body> {
        let index = self.index_of(id).ok_or(SimError::UnknownBody(id))?;
        log::debug!("Removed body {:?}", id);
        Ok(self.bodies.remove(index))
    }

    /// Remove up to `count` of the most recently added balls
    pub fn pop_bodies(&mut self, count: usize) -> Vec<Body> {
        let keep = self.bodies.len().saturating_sub(count);
        let removed = self.bodies.split_off(keep);
        log::debug!("Removed {} bodies", removed.len());
        removed
    }

    pub fn clear_bodies(&mut self) {
        log::debug!("Cleared {} bodies", self.bodies.len());
        self.bodies.clear();
    }

    pub fn add_obstacle(&mut self, obstacle: StaticObstacle) -> usize {
        self.obstacles.push(obstacle);
        self.obstacles.len() - 1
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn obstacles(&self) -> &[StaticObstacle] {
        &self.obstacles
    }

    pub fn obstacles_mut(&mut self) -> &mut [StaticObstacle] {
        &mut self.obstacles
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.index_of(id).map(|i| &self.bodies[i])
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.index_of(id).map(move |i| &mut self.bodies[i])
    }

    pub fn diagnostics(&self, id: BodyId) -> Result<BodyDiagnostics> {
        self.body(id)
            .map(Body::diagnostics)
            .ok_or(SimError::UnknownBody(id))
    }

    /// Set the view volume used for classification (recomputed per frame by the caller)
    pub fn set_frustum(&mut self, frustum: Frustum) {
        self.frustum = Some(frustum);
    }

    pub fn clear_frustum(&mut self) {
        self.frustum = None;
    }

    pub fn frustum(&self) -> Option<&Frustum> {
        self.frustum.as_ref()
    }

    /// Run one frame sweep with the caller's timestep
    pub fn step(&mut self, dt: f32) -> FrameStats {
        let mut stats = FrameStats::default();
        let config = &self.config;
        let e = config.elasticity;
        let n = self.bodies.len();

        for i in 0..n {
            if let Some(frustum) = &self.frustum {
                stats.count(self.bodies[i].classify(frustum));
            }

            if resolve_boundary(&mut self.bodies[i], &config.room, e) {
                stats.wall_hits += 1;
            }

            for j in (i + 1)..n {
                let (head, tail) = self.bodies.split_at_mut(j);
                if resolve_pairwise(&mut head[i], &mut tail[0], e) {
                    stats.ball_hits += 1;
                }
            }

            for obstacle in &self.obstacles {
                if resolve_obstacle(&mut self.bodies[i], obstacle, e) {
                    stats.obstacle_hits += 1;
                }
            }

            self.bodies[i].integrate(dt, config.gravity, config.drag, config.velocity_clamp);
        }

        for obstacle in self.obstacles.iter_mut().filter(|o| o.kinetic) {
            obstacle.edge(&config.room);
            obstacle.update(dt, config.velocity_clamp);
        }

        self.frame_count += 1;
        stats
    }

    /// Feed a wall-clock frame delta.
    ///
    /// Without a fixed step configured this is a single `step(frame_dt)`. With one,
    /// the delta goes into an accumulator drained in fixed substeps, capped per frame.
    pub fn advance(&mut self, frame_dt: f32) -> Result<FrameStats> {
        if !(frame_dt.is_finite() && frame_dt >= 0.0) {
            return Err(SimError::invalid("frame_dt", frame_dt));
        }
        let Some(fixed) = self.config.fixed_step else {
            return Ok(self.step(frame_dt));
        };

        self.accumulator += frame_dt.min(MAX_FRAME_DT);
        let mut stats = FrameStats::default();
        let mut substeps = 0;
        while self.accumulator >= fixed.dt && substeps < fixed.max_substeps {
            stats.merge(self.step(fixed.dt));
            self.accumulator -= fixed.dt;
            substeps += 1;
        }
        if substeps == fixed.max_substeps && self.accumulator > fixed.dt {
            // Drop the backlog so a slow spell doesn't replay faster than real time
            log::debug!("Dropping {:.4}s of simulation backlog", self.accumulator - fixed.dt);
            self.accumulator = fixed.dt;
        }
        Ok(stats)
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        // Ids are handed out in increasing order and removal keeps order
        self.bodies.binary_search_by_key(&id, Body::id).ok()
    }
}
