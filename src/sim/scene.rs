//! Scene: terrain plus the bodies falling onto it
//!
//! Owns the seeded RNG so a seed fully determines terrain and trajectories.
//! Bodies never read each other, so update order does not matter.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::body::{Body, BodySpawn};
use super::terrain::Terrain;
use crate::config::{BodyConfig, SceneConfig};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::error::ConfigResult;
use crate::render::{Canvas, draw_body};

/// Longest frame `advance` will account for
pub const MAX_FRAME_DT: f32 = 0.25;

pub struct Scene {
    seed: u64,
    rng: Pcg32,
    terrain: Terrain,
    body_config: BodyConfig,
    bodies: Vec<Body>,
    next_id: u32,
    time_ticks: u64,
    accumulator: f32,
}

impl Scene {
    /// Generate terrain and spawn `config.body_count` random bodies
    pub fn new(seed: u64, config: &SceneConfig) -> ConfigResult<Self> {
        config.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let terrain = Terrain::generate(config.terrain.clone(), &mut rng)?;

        let mut scene = Self {
            seed,
            rng,
            terrain,
            body_config: config.body.clone(),
            bodies: Vec::with_capacity(config.body_count),
            next_id: 1,
            time_ticks: 0,
            accumulator: 0.0,
        };
        for _ in 0..config.body_count {
            scene.spawn_body()?;
        }

        log::info!(
            "Scene seed {}: {}x{} domain, {} bodies",
            seed,
            config.terrain.domain_width,
            config.terrain.domain_height,
            scene.bodies.len()
        );
        Ok(scene)
    }

    fn next_body_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn a randomized body near the top of the domain
    pub fn spawn_body(&mut self) -> ConfigResult<u32> {
        let id = self.next_body_id();
        let width = self.terrain.config().domain_width;
        let body = Body::spawn_random(id, &self.body_config, width, &mut self.rng)?;
        self.bodies.push(body);
        Ok(id)
    }

    /// Add a body with explicit starting conditions
    pub fn add_body(&mut self, spawn: BodySpawn) -> ConfigResult<u32> {
        let id = self.next_body_id();
        let body = Body::new(id, &self.body_config, spawn)?;
        self.bodies.push(body);
        Ok(id)
    }

    pub fn clear_bodies(&mut self) {
        self.bodies.clear();
    }

    /// Replace the terrain; bodies in flight query the new surface from the next tick
    pub fn regenerate_terrain(&mut self) {
        self.terrain.regenerate(&mut self.rng);
    }

    /// Advance every active body by one step
    pub fn tick(&mut self) {
        let was_active = self.active_count();
        self.time_ticks += 1;
        for body in &mut self.bodies {
            body.tick(&self.terrain);
        }

        if was_active > 0 && self.all_stopped() {
            log::info!(
                "All {} bodies settled after {} ticks",
                self.bodies.len(),
                self.time_ticks
            );
        }
    }

    /// Run as many fixed ticks as `dt` seconds cover, capped per call
    ///
    /// Returns the number of ticks run; leftover time carries to the next call.
    pub fn advance(&mut self, dt: f32) -> u32 {
        // max/min rather than clamp so NaN collapses to zero
        self.accumulator += dt.max(0.0).min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.tick();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: u32) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id() == id)
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn active_count(&self) -> usize {
        self.bodies.iter().filter(|b| !b.is_stopped()).count()
    }

    pub fn all_stopped(&self) -> bool {
        self.bodies.iter().all(Body::is_stopped)
    }

    /// Terrain first, then bodies on top
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, debug: bool) {
        self.terrain.draw(canvas);
        for body in &self.bodies {
            draw_body(canvas, body, debug);
        }
    }
}
