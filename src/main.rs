//! Secret Jump - headless demo runner
//!
//! Runs an autopilot session at the fixed simulation rate and logs the host
//! events. Usage: `secret-jump [seed] [records.json] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
use secret_jump::sim::GameEvent;
#[cfg(not(target_arch = "wasm32"))]
use secret_jump::{Game, PlayerRecords, Tuning};

/// Longest demo session in simulated seconds
#[cfg(not(target_arch = "wasm32"))]
const DEMO_SECONDS: f64 = 300.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Secret Jump (native demo) starting...");

    if let Err(err) = run() {
        log::error!("Demo failed: {}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly; there is no wasm binary entry point
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => arg.parse::<u64>()?,
        None => 42,
    };
    let records_path = args.next();
    let tuning = match args.next() {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };

    let mut game = Game::with_tuning(seed, tuning, 800.0, 600.0);
    game.set_idle_mode(true);
    game.start();

    // Drive the clock like a 60 Hz display
    let frame_ms = 1000.0 / 60.0;
    let mut now = 0.0;
    while now < DEMO_SECONDS * 1000.0 && !game.is_game_over() {
        game.frame(now);
        now += frame_ms;

        for event in game.drain_events() {
            match event {
                GameEvent::RankChange { rank } => {
                    log::info!("[{:>7.2}s] Rank up: {}", now / 1000.0, rank)
                }
                GameEvent::GameOver { score, rank } => {
                    log::info!("[{:>7.2}s] Game over: {} ({})", now / 1000.0, score, rank)
                }
                other => log::debug!("[{:>7.2}s] {:?}", now / 1000.0, other),
            }
        }
    }

    println!(
        "seed {}: score {} rank {} after {:.1}s",
        seed,
        game.score(),
        game.rank(),
        now / 1000.0
    );

    if let Some(path) = records_path {
        let mut records = PlayerRecords::load(&path)?;
        if game.score() > 0 {
            let outcome = records.submit("autopilot", game.score())?;
            println!(
                "leaderboard position {} (new record: {})",
                outcome.position, outcome.is_new_record
            );
            records.save(&path)?;
        }
    }

    Ok(())
}
