//! Browser bindings
//!
//! The page owns the canvas and the `requestAnimationFrame` loop; it calls
//! `frame` once per refresh and draws from `token_positions` / `slot_labels`.

use wasm_bindgen::prelude::*;

use crate::audio::WebAudioSink;
use crate::multipliers::RiskTier;
use crate::session::Session;
use crate::settings::Settings;
use crate::sim::BoardGeometry;

#[wasm_bindgen]
pub struct WebPlinko {
    session: Session,
    geometry: BoardGeometry,
}

#[wasm_bindgen]
impl WebPlinko {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Result<WebPlinko, JsValue> {
        let settings = Settings::load();
        let sink = WebAudioSink::new(settings.sfx_gain());
        let seed = js_sys::Date::now() as u64;
        let session = Session::new(settings, seed, Box::new(sink))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self {
            session,
            geometry: BoardGeometry::new(width, height),
        })
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.geometry = BoardGeometry::new(width, height);
    }

    /// Drop a token with the current bet; false when funds are short
    pub fn drop_ball(&mut self) -> bool {
        match self.session.drop_token() {
            Ok(_) => true,
            Err(e) => {
                log::info!("Drop refused: {}", e);
                false
            }
        }
    }

    /// Advance one frame; returns the number of tokens that landed
    pub fn frame(&mut self, dt_seconds: f32) -> u32 {
        self.session.frame(dt_seconds).len() as u32
    }

    /// Flat [x, y, radius, color, ...] for every active token
    pub fn token_positions(&self) -> Vec<f32> {
        let mut out = Vec::new();
        for snapshot in self.session.snapshots(&self.geometry) {
            let rows = self
                .session
                .state
                .token(snapshot.id)
                .map(|t| t.config.rows)
                .unwrap_or(self.session.config().rows);
            out.extend_from_slice(&[
                snapshot.position.x,
                snapshot.position.y,
                self.geometry.token_radius(rows),
                snapshot.color as f32,
            ]);
        }
        out
    }

    /// Flat [x, y] for every peg of the current grid
    pub fn peg_positions(&self) -> Vec<f32> {
        self.geometry
            .pegs(self.session.config().rows)
            .iter()
            .flat_map(|p| [p.x, p.y])
            .collect()
    }

    /// Flat [cx, cy, w, h] for every payout box
    pub fn slot_rects(&self) -> Vec<f32> {
        self.geometry
            .slot_rects(self.session.config().rows)
            .iter()
            .flat_map(|r| [r.center.x, r.center.y, r.size.x, r.size.y])
            .collect()
    }

    pub fn slot_labels(&self) -> Vec<String> {
        self.session.slots().iter().map(|s| s.label()).collect()
    }

    /// "r, g, b" strings for the payout boxes
    pub fn slot_colors(&self) -> Vec<String> {
        self.session.slots().iter().map(|s| s.color.css_rgb()).collect()
    }

    pub fn configure(&mut self, rows: u32, risk: &str) -> Result<(), JsValue> {
        let risk: RiskTier = risk
            .parse()
            .map_err(|e: crate::ConfigError| JsValue::from_str(&e.to_string()))?;
        self.session
            .configure(rows, risk)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.session.settings().save();
        Ok(())
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.session.set_muted(muted);
        self.session.settings().save();
    }

    pub fn set_bet(&mut self, bet: f64) {
        self.session.set_bet(bet);
    }

    pub fn halve_bet(&mut self) {
        self.session.wallet.halve_bet();
    }

    pub fn double_bet(&mut self) {
        self.session.wallet.double_bet();
    }

    pub fn reset_funds(&mut self) {
        self.session.wallet.reset_funds();
    }

    pub fn balance(&self) -> f64 {
        self.session.wallet.balance()
    }

    pub fn bet(&self) -> f64 {
        self.session.wallet.bet()
    }

    /// Flat [multiplier, net, ...] newest first
    pub fn history(&self) -> Vec<f64> {
        self.session
            .wallet
            .history()
            .iter()
            .flat_map(|h| [h.multiplier, h.net])
            .collect()
    }
}
