//! Plinko Drop entry point
//!
//! Native: headless run that drops a batch of tokens and logs the outcome.
//! Web: logging setup only; the page drives `WebPlinko` directly.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Plinko Drop (web) ready");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use plinko_drop::audio::LogSink;
    use plinko_drop::sim::BoardGeometry;
    use plinko_drop::{Session, Settings};

    /// 60 Hz display refresh
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Frames between drops
    const DROP_INTERVAL: u32 = 12;

    env_logger::init();
    log::info!("Plinko Drop (native) starting...");

    // Usage: plinko-drop [settings.json] [drops] [seed]
    let mut args = std::env::args().skip(1);
    let settings = args
        .next()
        .map(|p| Settings::load_from(&PathBuf::from(p)))
        .unwrap_or_default();
    let mut drops: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(20);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });

    let mut session = match Session::new(settings, seed, Box::new(LogSink)) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let labels: Vec<String> = session.slots().iter().map(|s| s.label()).collect();
    log::info!("Slots: {}", labels.join(" "));

    let geometry = BoardGeometry::new(800.0, 900.0);
    let mut dropped = 0;
    let mut frame = 0u32;

    while dropped < drops || session.state.active_count() > 0 {
        if dropped < drops && frame % DROP_INTERVAL == 0 {
            match session.drop_token() {
                Ok(id) => {
                    dropped += 1;
                    log::debug!("Dropped token {}", id);
                }
                Err(e) => {
                    log::warn!("Stopping early: {}", e);
                    drops = dropped;
                }
            }
        }

        for settlement in session.frame(FRAME_DT) {
            log::info!(
                "Token {:>3} -> slot {:>2} at {:>6}x, payout {:.2}",
                settlement.id,
                settlement.slot_index,
                settlement.multiplier,
                settlement.payout()
            );
        }

        if frame % 60 == 0 {
            for snap in session.snapshots(&geometry) {
                let pos = snap.position;
                log::trace!("token {} at ({:.1}, {:.1})", snap.id, pos.x, pos.y);
            }
        }
        frame += 1;
    }

    println!(
        "Dropped {} tokens over {} frames; balance {:.2}",
        dropped,
        frame,
        session.wallet.balance()
    );
}
