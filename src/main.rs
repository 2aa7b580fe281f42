//! Landfall entry point
//!
//! Headless native run: builds a scene, steps it frame by frame until every
//! body has settled (or a tick limit is hit) and prints the final frame.
//!
//! Usage: `landfall [seed] [config.json] [--debug]`

use std::error::Error;

use glam::Vec2;
use landfall::SceneConfig;
use landfall::consts::SIM_DT;
use landfall::render::AsciiCanvas;
use landfall::sim::Scene;

const DEFAULT_SEED: u64 = 12345;
/// Give up on bodies that never meet a settle condition
const MAX_TICKS: u64 = 20_000;
const COLS: usize = 120;
const ROWS: usize = 40;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let debug = args.iter().any(|a| a == "--debug");
    let mut positional = args.iter().filter(|a| !a.starts_with("--"));

    let seed = match positional.next() {
        Some(s) => s.parse::<u64>()?,
        None => DEFAULT_SEED,
    };
    let config = match positional.next() {
        Some(path) => SceneConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => SceneConfig::default(),
    };

    log::info!("Landfall (native) starting, seed {}", seed);
    let mut scene = Scene::new(seed, &config)?;

    // One animation frame per loop iteration
    while !scene.all_stopped() && scene.time_ticks() < MAX_TICKS {
        scene.advance(SIM_DT);
    }
    if !scene.all_stopped() {
        log::warn!(
            "{} bodies still active after {} ticks",
            scene.active_count(),
            scene.time_ticks()
        );
    }

    let terrain = scene.terrain();
    for zone in terrain.query_landing_zones() {
        println!(
            "{:?} pad: x={:.1} width={:.1} y={:.1}",
            zone.kind, zone.x, zone.width, zone.y
        );
    }
    for body in scene.bodies() {
        let on_pad = terrain
            .landing_span_at(body.position().x)
            .map(|span| format!("{:?} pad", span.kind))
            .unwrap_or_else(|| "open ground".to_string());
        println!(
            "body {:>3}: ({:7.1}, {:7.1}) {:?} {:?} on {} after {} ticks",
            body.id(),
            body.position().x,
            body.position().y,
            body.state(),
            body.settle_reason(),
            on_pad,
            body.ticks()
        );
    }

    let cfg = terrain.config();
    let domain = Vec2::new(cfg.domain_width, cfg.domain_height);
    let mut canvas = AsciiCanvas::new(COLS, ROWS, domain);
    scene.draw(&mut canvas, debug);
    println!("{}", canvas.render());

    Ok(())
}
