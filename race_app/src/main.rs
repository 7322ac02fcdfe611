//! Headless demo race
//!
//! Runs one full turn of the race without a window and reports the
//! outcome. Useful for profiling the frame loop and for sanity-checking
//! content generation on a given seed.

use race_app::harness;
use race_app::TurnStatus;

/// Frame budget before the run is declared stuck
const MAX_FRAMES: u32 = 20_000;

fn main() {
    orbit_engine::foundation::logging::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|argument| argument.parse().ok())
        .unwrap_or(2024);
    log::info!("running demo race with seed {}", seed);

    match harness::run_race(seed, MAX_FRAMES) {
        Ok(report) => {
            match report.status {
                TurnStatus::Finished {
                    elapsed,
                    collected_ratio,
                } => println!(
                    "finished in {:.1}s over {} frames; collected {}/{} artifacts ({:.0}%)",
                    elapsed,
                    report.frames,
                    report.collected,
                    report.total,
                    collected_ratio * 100.0
                ),
                TurnStatus::Running => println!(
                    "race still running after {} frames; collected {}/{} artifacts",
                    report.frames, report.collected, report.total
                ),
            }
        }
        Err(error) => {
            log::error!("race setup failed: {}", error);
            std::process::exit(1);
        }
    }
}
