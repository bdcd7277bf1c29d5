//! Reflex Rush demo driver
//!
//! Runs a scripted session against the core and logs every notification.
//! The real game wires a target/interaction layer and a renderer to the
//! same API; this binary exists to exercise the core end to end.

use reflex_rush::consts::SIM_DT;
use reflex_rush::{GameConfig, GameCore, GameEvent, PowerUpKind};

fn main() {
    env_logger::init();
    log::info!("Reflex Rush core demo starting...");

    let config = GameConfig::default();
    let mut core = match GameCore::new(config.clone()) {
        Ok(core) => core,
        Err(e) => {
            eprintln!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    core.subscribe(|event| match event {
        GameEvent::ScoreChanged(score) => println!("score: {score}"),
        GameEvent::ComboChanged { count, multiplier } => {
            println!("combo: {count} (x{multiplier})")
        }
        GameEvent::PowerUpActivated { kind, duration } => {
            println!("power-up on: {} ({duration:.1}s)", kind.as_str())
        }
        GameEvent::PowerUpDeactivated(kind) => println!("power-up off: {}", kind.as_str()),
        GameEvent::TargetRequested { kind, point_value } => {
            println!("spawn request: {kind:?} worth {point_value}")
        }
        GameEvent::GameOver => println!("game over"),
    });

    core.start_session();

    // A burst of accurate play, a power-up grab, then a slip
    for _ in 0..6 {
        core.hit_good(1);
        advance(&mut core, 0.4);
    }
    core.hit_power_up(
        PowerUpKind::DoubleScore,
        config.power_up_duration(PowerUpKind::DoubleScore),
    );
    for _ in 0..4 {
        core.hit_good(1);
        advance(&mut core, 0.4);
    }
    core.hit_bomb(5);
    advance(&mut core, 4.0);

    let snapshot = core.snapshot();
    println!(
        "session snapshot: score {} combo {} interval {:.2}s",
        snapshot.score, snapshot.combo_count, snapshot.spawn_interval
    );

    core.stop_session();
}

/// Step real time forward in fixed increments
fn advance(core: &mut GameCore, seconds: f32) {
    let steps = (seconds / SIM_DT).ceil() as u32;
    for _ in 0..steps {
        core.tick(SIM_DT);
    }
}
