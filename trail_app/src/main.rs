//! Headless trail demo
//!
//! Drives a session at a fixed 60 Hz with random pointer input and logs what
//! the collision and culling core reports.
//!
//! Usage: `trail_demo [seconds] [seed] [config.toml|config.ron]`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use trail_engine::foundation::logging;
use trail_engine::prelude::*;

const FRAME_TIME: f32 = 1.0 / 60.0;
const DEFAULT_SECONDS: u32 = 30;
const DEFAULT_SEED: u64 = 7;

#[derive(Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("invalid argument {name}: {value}")]
    InvalidArgument { name: &'static str, value: String },
}

struct DemoArgs {
    seconds: u32,
    seed: u64,
    config_path: Option<String>,
}

impl DemoArgs {
    fn parse() -> Result<Self, DemoError> {
        let mut args = std::env::args().skip(1);
        let seconds = match args.next() {
            Some(value) => value
                .parse()
                .map_err(|_| DemoError::InvalidArgument { name: "seconds", value })?,
            None => DEFAULT_SECONDS,
        };
        let seed = match args.next() {
            Some(value) => value
                .parse()
                .map_err(|_| DemoError::InvalidArgument { name: "seed", value })?,
            None => DEFAULT_SEED,
        };
        Ok(Self {
            seconds,
            seed,
            config_path: args.next(),
        })
    }
}

fn run(args: &DemoArgs) -> Result<(), DemoError> {
    let mut session = match &args.config_path {
        Some(path) => {
            log::info!("Loading session config from {path}");
            GameSession::from_config_file(path)?
        }
        None => GameSession::new(SessionConfig::default())?,
    };

    let mut rng = StdRng::seed_from_u64(args.seed);
    let stopwatch = Stopwatch::start_new();
    let frames = args.seconds * 60;
    let mut total_hits = 0usize;

    for frame in 1..=frames {
        session.steer(rng.gen_range(-40.0..40.0), rng.gen_range(-10.0..10.0));
        if rng.gen_bool(0.01) && session.boost() {
            log::info!("Boost at t={:.1}s", session.timer().total_time());
        }

        let report = session.step(FRAME_TIME)?;
        total_hits += report.hits.len();

        if frame % 60 == 0 {
            let player = session.player();
            let position = player.position();
            log::info!(
                "t={:>4.1}s pos=({:>7.1}, {:>7.1}) yaw={:>6.1} tombs={:>4} visible={:>4} hits={}",
                session.timer().total_time(),
                position.x,
                position.z,
                player.yaw(),
                report.tomb_count,
                report.visible_tombs.len(),
                total_hits,
            );
        }
    }

    let overlapped = session
        .collisions()
        .tombs()
        .iter()
        .filter(|(_, tomb)| tomb.overlapped)
        .count();
    log::info!(
        "Finished {} frames in {:.1} ms: {} tombs alive, {} flagged overlapped, {} hits total",
        session.timer().frame_count(),
        stopwatch.elapsed_millis(),
        session.collisions().tombs().len(),
        overlapped,
        total_hits
    );
    Ok(())
}

fn main() {
    logging::init_with_default("info");
    log::info!("Starting trail demo");

    let result = DemoArgs::parse().and_then(|args| run(&args));
    if let Err(e) = result {
        log::error!("Trail demo failed: {e}");
        std::process::exit(1);
    }
}
