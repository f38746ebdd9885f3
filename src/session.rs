//! Game session: the host side of the engine boundary
//!
//! The engine's token store is updated every frame and owned by `DropState`.
//! The wallet only changes when a settlement event crosses over. Sound goes
//! through whatever `SoundSink` the host provided.

use crate::audio::{Silent, SoundCue, SoundSink};
use crate::error::{ConfigError, WalletError};
use crate::multipliers::{self, GridConfig, RiskTier, Slot};
use crate::settings::Settings;
use crate::sim::{BoardGeometry, DropEvent, DropState, Settlement, TokenId, TokenSnapshot, tick};
use crate::wallet::Wallet;

pub struct Session {
    pub state: DropState,
    pub wallet: Wallet,
    settings: Settings,
    sink: Box<dyn SoundSink>,
    /// Host sink kept aside while muted
    parked_sink: Option<Box<dyn SoundSink>>,
}

impl Session {
    /// Validate the payout tables and tuning, then start a session
    pub fn new(
        settings: Settings,
        seed: u64,
        sink: Box<dyn SoundSink>,
    ) -> Result<Self, ConfigError> {
        multipliers::validate_tables()?;

        let state = DropState::with_tuning(settings.grid, seed, settings.tuning)?;
        let wallet = Wallet::new(settings.bet_amount);
        log::info!(
            "Session started: {} rows / {} risk, seed {}",
            settings.grid.rows,
            settings.grid.risk,
            seed
        );

        let mut session = Self {
            state,
            wallet,
            settings,
            sink,
            parked_sink: None,
        };
        if session.settings.muted {
            session.park_sink();
        }
        Ok(session)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config(&self) -> GridConfig {
        self.state.config()
    }

    /// Slot table for drawing payout boxes
    pub fn slots(&self) -> Vec<Slot> {
        self.state.slots()
    }

    pub fn snapshots(&self, geometry: &BoardGeometry) -> Vec<TokenSnapshot> {
        self.state.snapshots(geometry)
    }

    /// Reserve the current bet and release a token
    pub fn drop_token(&mut self) -> Result<TokenId, WalletError> {
        let bet = self.wallet.reserve_bet()?;
        Ok(self.state.spawn(bet))
    }

    /// Advance one display frame and route its events
    pub fn frame(&mut self, dt: f32) -> Vec<Settlement> {
        tick(&mut self.state, dt);

        let mut settled = Vec::new();
        for event in self.state.drain_events() {
            self.sink.play(SoundCue::for_event(&event));
            if let DropEvent::Settled(settlement) = event {
                self.wallet.settle(&settlement);
                settled.push(settlement);
            }
        }
        settled
    }

    /// Apply a new grid configuration; tokens in flight keep theirs
    pub fn configure(&mut self, rows: u32, risk: RiskTier) -> Result<(), ConfigError> {
        let config = GridConfig::new(rows, risk)?;
        self.state.configure(config);
        self.settings.grid = config;
        Ok(())
    }

    pub fn set_bet(&mut self, bet: f64) {
        self.wallet.set_bet(bet);
        self.settings.bet_amount = self.wallet.bet();
    }

    pub fn is_muted(&self) -> bool {
        self.settings.muted
    }

    /// Mute swaps in a silent sink; unmute restores the host's
    pub fn set_muted(&mut self, muted: bool) {
        if muted == self.settings.muted {
            return;
        }
        self.settings.muted = muted;
        if muted {
            self.park_sink();
        } else if let Some(sink) = self.parked_sink.take() {
            self.sink = sink;
        }
        log::info!("Sound {}", if muted { "muted" } else { "unmuted" });
    }

    fn park_sink(&mut self) {
        let sink = std::mem::replace(&mut self.sink, Box::new(Silent));
        self.parked_sink = Some(sink);
    }

    /// Discard all tokens in flight (bets are not refunded)
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Recorder;
    use crate::multipliers::RowCount;

    fn session(recorder: &Recorder) -> Session {
        Session::new(Settings::default(), 11, Box::new(recorder.clone())).unwrap()
    }

    fn run(session: &mut Session) -> Vec<Settlement> {
        let mut all = Vec::new();
        for _ in 0..5_000 {
            if session.state.active_count() == 0 {
                break;
            }
            all.extend(session.frame(1.0 / 60.0));
        }
        all
    }

    #[test]
    fn test_drop_debits_then_credits() {
        let recorder = Recorder::new();
        let mut s = session(&recorder);
        s.drop_token().unwrap();
        assert_eq!(s.wallet.balance(), 990.0);

        let settled = run(&mut s);
        assert_eq!(settled.len(), 1);
        let expected = 990.0 + 10.0 * settled[0].multiplier;
        assert!((s.wallet.balance() - expected).abs() < 1e-9);
        assert_eq!(s.wallet.history().len(), 1);
    }

    #[test]
    fn test_sound_cues_follow_events() {
        let recorder = Recorder::new();
        let mut s = session(&recorder);
        s.drop_token().unwrap();
        run(&mut s);

        let cues = recorder.cues();
        // 15 inner peg rows on a 16-row grid, then one landing
        assert_eq!(cues.len(), 16);
        assert!(matches!(cues.last(), Some(SoundCue::Win { .. })));
    }

    #[test]
    fn test_muted_session_plays_nothing() {
        let recorder = Recorder::new();
        let mut s = session(&recorder);
        s.set_muted(true);
        s.drop_token().unwrap();
        run(&mut s);
        assert!(recorder.cues().is_empty());

        s.set_muted(false);
        s.drop_token().unwrap();
        run(&mut s);
        assert_eq!(recorder.cues().len(), 16);
    }

    #[test]
    fn test_insufficient_funds_creates_no_token() {
        let recorder = Recorder::new();
        let mut s = session(&recorder);
        s.set_bet(5000.0);
        assert!(s.drop_token().is_err());
        assert_eq!(s.state.active_count(), 0);
        assert_eq!(s.wallet.balance(), 1000.0);
    }

    #[test]
    fn test_invalid_tuning_fails_before_any_drop() {
        let recorder = Recorder::new();
        for json in [
            r#"{"tuning":{"max_frame_dt":-0.05}}"#,
            r#"{"tuning":{"base_speed":-10.0}}"#,
            r#"{"tuning":{"speed_rows_divisor":0.0}}"#,
        ] {
            let settings = Settings::from_json(json).unwrap();
            let result = Session::new(settings, 1, Box::new(recorder.clone()));
            assert!(
                matches!(result, Err(ConfigError::InvalidTuning { .. })),
                "{json} was accepted"
            );
        }
    }

    #[test]
    fn test_configure_rejects_unsupported_rows() {
        let recorder = Recorder::new();
        let mut s = session(&recorder);
        assert_eq!(
            s.configure(10, RiskTier::Low),
            Err(ConfigError::UnsupportedRowCount(10))
        );
        assert_eq!(s.config().rows, RowCount::Sixteen);

        s.configure(8, RiskTier::High).unwrap();
        assert_eq!(s.slots().len(), 9);
        assert_eq!(s.settings().grid.rows, RowCount::Eight);
    }
}
