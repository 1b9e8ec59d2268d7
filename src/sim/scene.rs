//! Scene population
//!
//! Seeded random balls and the stock obstacle layout. Same seed, same scene.

use std::ops::RangeInclusive;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::BodyId;
use super::obstacle::StaticObstacle;
use super::world::World;
use crate::error::Result;

/// Value ranges for spawned balls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRanges {
    /// x and z
    pub horizontal: RangeInclusive<f32>,
    pub height: RangeInclusive<f32>,
    /// Each velocity component
    pub velocity: RangeInclusive<f32>,
    pub mass: RangeInclusive<f32>,
}

impl Default for SpawnRanges {
    fn default() -> Self {
        Self {
            horizontal: -8.0..=8.0,
            height: 2.0..=18.0,
            velocity: -2.0..=2.0,
            mass: 1.0..=20.0,
        }
    }
}

/// Initial state for one ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallSpawn {
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
}

/// Seeded ball generator
#[derive(Debug, Clone)]
pub struct Spawner {
    seed: u64,
    rng: Pcg32,
    ranges: SpawnRanges,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self::with_ranges(seed, SpawnRanges::default())
    }

    pub fn with_ranges(seed: u64, ranges: SpawnRanges) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ranges,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_ball(&mut self) -> BallSpawn {
        let r = &self.ranges;
        let position = Vec3::new(
            self.rng.random_range(r.horizontal.clone()),
            self.rng.random_range(r.height.clone()),
            self.rng.random_range(r.horizontal.clone()),
        );
        let velocity = Vec3::new(
            self.rng.random_range(r.velocity.clone()),
            self.rng.random_range(r.velocity.clone()),
            self.rng.random_range(r.velocity.clone()),
        );
        let mass = self.rng.random_range(r.mass.clone());
        BallSpawn {
            position,
            velocity,
            mass,
        }
    }

    /// Add `count` random balls to the world
    pub fn populate(&mut self, world: &mut World, count: usize) -> Result<Vec<BodyId>> {
        let ids = (0..count)
            .map(|_| {
                let spawn = self.next_ball();
                world.create_body(spawn.position, spawn.velocity, spawn.mass)
            })
            .collect::<Result<Vec<_>>>()?;
        log::info!("Spawned {} balls (seed {})", ids.len(), self.seed);
        Ok(ids)
    }
}

/// The four stock boxes
pub fn default_obstacles() -> Vec<StaticObstacle> {
    [
        Vec3::new(3.0, 1.01, 3.0),
        Vec3::new(-3.0, 8.0, 3.0),
        Vec3::new(-3.0, 5.0, -3.0),
        Vec3::new(3.0, 15.0, -3.0),
    ]
    .into_iter()
    .map(StaticObstacle::new)
    .collect()
}

/// Stock room: the four boxes plus `count` seeded balls
pub fn build_default_scene(world: &mut World, seed: u64, count: usize) -> Result<Vec<BodyId>> {
    for obstacle in default_obstacles() {
        world.add_obstacle(obstacle);
    }
    Spawner::new(seed).populate(world, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimConfig;

    #[test]
    fn test_spawns_within_ranges() {
        let mut spawner = Spawner::new(42);
        for _ in 0..200 {
            let ball = spawner.next_ball();
            assert!((-8.0..=8.0).contains(&ball.position.x));
            assert!((2.0..=18.0).contains(&ball.position.y));
            assert!((-8.0..=8.0).contains(&ball.position.z));
            assert!(ball.velocity.abs().max_element() <= 2.0);
            assert!((1.0..=20.0).contains(&ball.mass));
        }
    }

    #[test]
    fn test_same_seed_same_scene() {
        let mut a = Spawner::new(7);
        let mut b = Spawner::new(7);
        for _ in 0..10 {
            assert_eq!(a.next_ball(), b.next_ball());
        }
        assert_ne!(Spawner::new(8).next_ball(), Spawner::new(7).next_ball());
    }

    #[test]
    fn test_default_scene() {
        let mut world = World::new(SimConfig::default()).unwrap();
        let ids = build_default_scene(&mut world, 1, 100).unwrap();
        assert_eq!(ids.len(), 100);
        assert_eq!(world.obstacles().len(), 4);
        assert_eq!(world.obstacles()[0].position(), Vec3::new(3.0, 1.01, 3.0));
        world.step(1.0 / 60.0);
        assert!(world.bodies().iter().all(|b| b.position().is_finite()));
    }
}
