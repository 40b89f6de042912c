//! Dive Chase entry point
//!
//! Headless demo: the autopilot plays the pursuer until it catches the evader
//! or the tick budget runs out. Usage: `dive-chase [tuning.json] [seed]`.
//! Set `RUST_LOG=debug` to see every state transition.

use dive_chase::consts::*;
use dive_chase::sim::{
    Autopilot, EvaderState, GameEvent, OrthoCamera, PresentationSink, PursuerState, TickInput,
    World, tick,
};
use dive_chase::Tuning;
use glam::Vec2;

/// Give up after this many ticks (two minutes at 50 Hz)
const MAX_TICKS: u64 = 6_000;
const DEFAULT_SEED: u64 = 0x5eed;

/// Logs the debug color whenever an actor's state changes
#[derive(Default)]
struct ColorLog {
    pursuer: Option<PursuerState>,
    evader: Option<EvaderState>,
}

impl PresentationSink for ColorLog {
    fn present_pursuer(&mut self, state: PursuerState) {
        if self.pursuer != Some(state) {
            log::trace!("pursuer color {:?}", state.color());
            self.pursuer = Some(state);
        }
    }

    fn present_evader(&mut self, state: EvaderState) {
        if self.evader != Some(state) {
            log::trace!("evader color {:?}", state.color());
            self.evader = Some(state);
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Dive Chase (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => Tuning::load(&path).unwrap_or_else(|e| {
            log::error!("{e}; falling back to default tuning");
            Tuning::default()
        }),
        None => Tuning::default(),
    };
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SEED);

    let camera = OrthoCamera::default();
    let mut world = World::new(&tuning, Vec2::new(-6.0, -3.0), Vec2::new(2.0, 1.0));
    let mut pilot = Autopilot::new(seed);
    let mut sink = ColorLog::default();
    let mut hops = 0u32;
    let mut dives = 0u32;

    while world.time_ticks < MAX_TICKS {
        let input: TickInput = pilot.next_input(&world);
        tick(&mut world, &camera, &input, SIM_DT);
        world.present(&mut sink);

        for event in world.drain_events() {
            match event {
                GameEvent::HopStarted { to, on_screen, .. } => {
                    hops += 1;
                    log::debug!(
                        "hop #{hops} to ({:.2}, {:.2}), on screen: {on_screen}",
                        to.x,
                        to.y
                    );
                }
                GameEvent::DiveStarted { to, .. } => {
                    dives += 1;
                    log::debug!("dive #{dives} toward ({:.2}, {:.2})", to.x, to.y);
                }
                GameEvent::Caught { at } => {
                    log::info!(
                        "caught at ({:.2}, {:.2}) after {} ticks ({:.2}s)",
                        at.x,
                        at.y,
                        world.time_ticks,
                        world.time_secs
                    );
                }
                _ => {}
            }
        }

        if world.evader.is_caught() {
            break;
        }
    }

    if !world.evader.is_caught() {
        log::info!("evader escaped for {} ticks", world.time_ticks);
    }

    match world.snapshot_json() {
        Ok(json) => log::debug!("final state:\n{json}"),
        Err(e) => log::warn!("snapshot failed: {e}"),
    }

    println!(
        "ticks: {}  hops: {hops}  dives: {dives}  caught: {}",
        world.time_ticks,
        world.evader.is_caught()
    );
}
