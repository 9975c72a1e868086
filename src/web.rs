//! Browser binding
//!
//! Thin wasm-bindgen wrapper around `Engine`. The page owns the animation
//! clock and calls `tick()` once per frame; snapshots cross the boundary
//! as JSON strings.

use wasm_bindgen::prelude::*;

use crate::game::{Engine, GameMode, SubscriptionId};
use crate::rules::RuleSetKind;
use crate::settings::Settings;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"disc-table: logger already initialized".into());
    }
    log::info!("disc-table wasm module loaded");
}

/// One pool or carrom table on the page
#[wasm_bindgen]
pub struct WebTable {
    engine: Engine,
}

#[wasm_bindgen]
impl WebTable {
    /// `ruleset` is "pool" or "carrom"; unknown names fall back to pool
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, ruleset: &str, vs_computer: bool) -> WebTable {
        let kind = ruleset.parse::<RuleSetKind>().unwrap_or_else(|e| {
            log::warn!("{}; using pool", e);
            RuleSetKind::Pool
        });
        let mode = if vs_computer {
            GameMode::VsComputer
        } else {
            GameMode::LocalTwoPlayer
        };

        let mut engine = Engine::new(Settings::load());
        engine.initialize(width, height, kind, mode);
        WebTable { engine }
    }

    /// Start over with the same rules
    pub fn restart(&mut self, width: f32, height: f32, ruleset: &str, vs_computer: bool) {
        let kind = ruleset.parse::<RuleSetKind>().unwrap_or(RuleSetKind::Pool);
        let mode = if vs_computer {
            GameMode::VsComputer
        } else {
            GameMode::LocalTwoPlayer
        };
        self.engine.initialize(width, height, kind, mode);
    }

    pub fn set_aim_angle(&mut self, radians: f32) {
        self.engine.set_aim_angle(radians);
    }

    pub fn set_aim_power(&mut self, power: f32) {
        self.engine.set_aim_power(power);
    }

    pub fn commit_shot(&mut self) {
        self.engine.commit_shot();
    }

    pub fn place_striker(&mut self, x: f32) {
        self.engine.place_striker(x);
    }

    pub fn tick(&mut self) {
        self.engine.tick();
    }

    /// Current state as JSON (empty object if serialization fails)
    pub fn snapshot_json(&self) -> String {
        match self.engine.snapshot().to_json() {
            Ok(json) => json,
            Err(e) => {
                log::error!("Snapshot serialization failed: {}", e);
                "{}".to_string()
            }
        }
    }

    /// Call `callback(json)` after every tick and input
    pub fn subscribe(&mut self, callback: js_sys::Function) -> u32 {
        let id = self.engine.subscribe(move |snapshot| {
            if let Ok(json) = snapshot.to_json() {
                if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                    log::error!("Observer threw: {:?}", e);
                }
            }
        });
        id.0
    }

    pub fn unsubscribe(&mut self, id: u32) -> bool {
        self.engine.unsubscribe(SubscriptionId(id))
    }

    /// Persist the current tuning to LocalStorage
    pub fn save_settings(&self) {
        self.engine.settings().save();
    }

    pub fn teardown(&mut self) {
        self.engine.teardown();
    }
}
