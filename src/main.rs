//! Timing Party native entry point
//!
//! The browser build is driven from JS through `timing_party::web`. Natively there is
//! no window: this runs a headless match with bot players so the simulation can be
//! watched through the log.
//!
//! Usage: `timing-party [party|solo] [seed]`

#[cfg(not(target_arch = "wasm32"))]
mod bots {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use timing_party::sim::{LockPhase, Participant, RoundSnapshot, SimEvent};
    use timing_party::{Hand, InputEvent, MatchPhase, MatchSettings, PlayerConfig, Session};

    const DT: f32 = 1.0 / 60.0;

    /// A bot presses once its marker is within `reach` of the target, and sometimes
    /// just panics and presses early.
    struct Bot {
        reach: f32,
        panic_chance: f32,
    }

    impl Bot {
        fn decide(&self, snapshot: &RoundSnapshot, index: usize, rng: &mut Pcg32) -> bool {
            let Some(view) = snapshot.markers.get(index) else {
                return false;
            };
            if view.phase != LockPhase::Moving {
                return false;
            }
            (view.position - view.target).abs() <= self.reach || rng.random::<f32>() < self.panic_chance
        }
    }

    pub fn run_party(seed: u64) {
        let roster = vec![
            PlayerConfig::named(0, "Ada"),
            PlayerConfig::named(1, "Brick"),
            PlayerConfig::named(2, "Cleo"),
        ];
        let bots = [
            Bot { reach: 0.01, panic_chance: 0.0005 },
            Bot { reach: 0.05, panic_chance: 0.002 },
            Bot { reach: 0.15, panic_chance: 0.01 },
        ];

        let mut session = match Session::new_party(roster, MatchSettings::default(), seed) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Could not start match: {}", e);
                return;
            }
        };
        let mut rng = Pcg32::seed_from_u64(seed ^ 0xB07);

        while !session.is_finished() {
            if session.phase() == MatchPhase::Playing {
                if let Some(snapshot) = session.snapshot() {
                    for (index, bot) in bots.iter().enumerate() {
                        if bot.decide(&snapshot, index, &mut rng) {
                            session.submit_input(InputEvent::player(index as u8));
                        }
                    }
                }
            }
            if let Some(summary) = session.advance(DT) {
                for result in &summary.results {
                    log::info!("  player {}: {} (total {})", result.id, result.score, result.total);
                }
            }
            log_events(session.drain_events());
        }

        println!("Final standings:");
        for (rank, entry) in session.standings().entries.iter().enumerate() {
            println!("  {}. {:<8} {:>4}", rank + 1, entry.name, entry.total_score);
        }
    }

    pub fn run_solo(seed: u64) {
        let bot = Bot {
            reach: 0.03,
            panic_chance: 0.002,
        };
        let mut session = match Session::new_solo(MatchSettings::default(), seed) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Could not start training: {}", e);
                return;
            }
        };
        let mut rng = Pcg32::seed_from_u64(seed ^ 0x5010);

        while !session.is_finished() {
            if session.phase() == MatchPhase::Playing {
                if let Some(snapshot) = session.snapshot() {
                    for (index, hand) in [Hand::Left, Hand::Right].into_iter().enumerate() {
                        if bot.decide(&snapshot, index, &mut rng) {
                            session.submit_input(InputEvent::hand(hand));
                        }
                    }
                }
            }
            if let Some(summary) = session.advance(DT) {
                log::info!("  hands: {:?}", summary.hands);
            }
            log_events(session.drain_events());
        }

        let stats = session.solo_stats();
        println!("Training complete ({} rounds)", stats.rounds_completed);
        println!("  left:  {:>3} hits, {:.1}% accuracy", stats.left_hits, stats.left_accuracy);
        println!("  right: {:>3} hits, {:.1}% accuracy", stats.right_hits, stats.right_accuracy);
    }

    fn log_events(events: Vec<SimEvent>) {
        for event in events {
            let who = match event.participant() {
                Participant::Player(id) => format!("player {}", id),
                Participant::SoloHand(hand) => format!("{} hand", hand.as_str()),
            };
            match event {
                SimEvent::LockPending { position, .. } => {
                    log::debug!("{} pressed at {:.3}, lock pending", who, position)
                }
                SimEvent::Locked { position, intensity, .. } => {
                    log::debug!("{} locked at {:.3} (intensity {})", who, position, intensity)
                }
                SimEvent::Missed { position, .. } => log::debug!("{} missed at {:.3}", who, position),
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Timing Party (native) starting...");

    let mut args = std::env::args().skip(1);
    let mode = args.next().unwrap_or_else(|| "party".into());
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    match mode.as_str() {
        "solo" => bots::run_solo(seed),
        "party" => bots::run_party(seed),
        other => {
            log::warn!("Unknown mode '{}', expected party or solo", other);
            bots::run_party(seed);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start
}
