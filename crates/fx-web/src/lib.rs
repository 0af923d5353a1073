#![cfg(target_arch = "wasm32")]

mod dots;
mod reveal;
mod style;

use fx_core::{DotFieldConfig, RevealConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("fx-web starting");

    // Production tuning for the demo mounts. The dot color goes through the
    // computed-style resolver, so a page theme variable works here too.
    let dot_cfg = DotFieldConfig {
        dot_gap: 14.0,
        dot_size: 1.0,
        dot_color: "#0369a1".into(),
        glow_color: "#0369a1".into(),
        background_color: Some("#ffffff".into()),
        mouse_radius: 120.0,
        distortion_strength: 1.2,
        breathing_speed: 0.8,
        opacity: 0.7,
        return_speed: 0.06,
        ..Default::default()
    };
    let reveal_cfg = RevealConfig {
        animate_on_scroll: true,
        follow_cursor: true,
        ..Default::default()
    };

    if let Err(e) = dots::mount("dot-canvas", dot_cfg) {
        log::error!("[dots] mount error: {e:?}");
    }
    spawn_local(async move {
        if let Err(e) = reveal::mount("reveal-canvas", reveal_cfg).await {
            log::error!("[reveal] mount error: {e:?}");
        }
    });
    Ok(())
}
