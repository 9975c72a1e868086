//! Disc Table headless runner
//!
//! Plays a full game with the built-in opponent shooting for both sides
//! and logs the outcome. The browser build uses `web::WebTable` instead.
//!
//! Usage: `disc-table [pool|carrom] [seed] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use disc_table::consts::MAX_SHOT_TICKS;
    use disc_table::{Engine, GameMode, GamePhase, PlayerId, RuleSetKind, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let kind = match args.next().map(|s| s.parse::<RuleSetKind>()) {
        Some(Ok(kind)) => kind,
        Some(Err(e)) => {
            log::error!("{}", e);
            std::process::exit(2);
        }
        None => RuleSetKind::Pool,
    };
    let seed = args.next().and_then(|s| s.parse::<u64>().ok());
    let mut settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    if let Some(seed) = seed {
        settings.seed = seed;
    }

    let (width, height) = match kind {
        RuleSetKind::Pool => (800.0, 400.0),
        RuleSetKind::Carrom => (600.0, 600.0),
    };

    let mut engine = Engine::new(settings);
    engine.initialize(width, height, kind, GameMode::LocalTwoPlayer);

    const MAX_SHOTS: u32 = 300;
    let mut shots = 0;
    while !engine.turn().is_over() && shots < MAX_SHOTS {
        let Some(plan) = engine.suggest_shot() else {
            log::warn!("No shot available; stopping");
            break;
        };
        engine.set_aim_angle(plan.angle);
        engine.set_aim_power(plan.power);
        engine.commit_shot();
        shots += 1;

        for _ in 0..=MAX_SHOT_TICKS {
            engine.tick();
            if engine.phase() != GamePhase::Shooting {
                break;
            }
        }

        let turn = engine.turn();
        log::info!(
            "Shot {:>3}: {} | P1 {} - P2 {}",
            shots,
            turn.message,
            turn.score(PlayerId::One),
            turn.score(PlayerId::Two)
        );
    }

    let turn = engine.turn();
    match (turn.phase, turn.winner) {
        (GamePhase::GameOver, Some(winner)) => log::info!("{} wins after {} shots", winner, shots),
        (GamePhase::GameOver, None) => log::info!("Tie after {} shots", shots),
        _ => log::info!("Stopped after {} shots without a result", shots),
    }
    engine.teardown();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
