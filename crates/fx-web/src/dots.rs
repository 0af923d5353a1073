//! Dot-field view: simulation from fx-core, rasterized through a 2D canvas
//! context with shadow-blur glow.

use std::cell::RefCell;
use std::rc::Rc;

use fx_core::{
    resolve_or_fallback, DotField, DotFieldConfig, DotSprite, FrameClock, PointerTracker,
};
use glam::Vec2;
use instant::Instant;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::style::ComputedStyleResolver;

struct DotView {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    field: DotField,
    tracker: PointerTracker,
    clock: FrameClock,
    start: Instant,
    dot_css: String,
    glow_css: String,
    css_width: f64,
    css_height: f64,
    sprites: Vec<DotSprite>,
}

pub fn mount(canvas_id: &str, cfg: DotFieldConfig) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| anyhow::anyhow!("missing #{canvas_id}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{e:?}")))?;

    // A missing 2D context disables the effect; it never takes the page down.
    let ctx = match canvas.get_context("2d") {
        Ok(Some(ctx)) => match ctx.dyn_into::<web::CanvasRenderingContext2d>() {
            Ok(ctx) => ctx,
            Err(_) => {
                log::warn!("[dots] unusable 2d context; effect disabled");
                return Ok(());
            }
        },
        _ => {
            log::warn!("[dots] no 2d context; effect disabled");
            return Ok(());
        }
    };

    if let Some(bg) = &cfg.background_color {
        canvas.style().set_property("background", bg).ok();
    }

    let seed = js_sys::Date::now() as u64;
    let field = DotField::new(cfg, 1.0, 1.0, seed)?;
    let view = Rc::new(RefCell::new(DotView {
        canvas: canvas.clone(),
        ctx,
        field,
        tracker: PointerTracker::new(),
        clock: FrameClock::new(),
        start: Instant::now(),
        dot_css: String::new(),
        glow_css: String::new(),
        css_width: 1.0,
        css_height: 1.0,
        sprites: Vec::new(),
    }));
    resize(&mut view.borrow_mut());

    // Window-level pointer tracking so interaction works even when page
    // content overlaps the canvas.
    {
        let view_m = view.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
            let mut v = view_m.borrow_mut();
            if !v.field.config().enable_mouse_interaction {
                return;
            }
            let rect = v.canvas.get_bounding_client_rect();
            let x = ev.client_x() as f64 - rect.left();
            let y = ev.client_y() as f64 - rect.top();
            if x >= 0.0 && x <= rect.width() && y >= 0.0 && y <= rect.height() {
                v.tracker.sample(Vec2::new(x as f32, y as f32));
            } else {
                v.tracker.leave();
            }
        }) as Box<dyn FnMut(_)>);
        window
            .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }

    // Snap to rest when the tab becomes visible again so stale velocities
    // never play out as a visible jump.
    {
        let view_v = view.clone();
        let document_v = document.clone();
        let closure = Closure::wrap(Box::new(move || {
            if !document_v.hidden() {
                let mut v = view_v.borrow_mut();
                v.field.reset_after_hidden();
                v.tracker.reset_velocity();
                v.clock.reset();
            }
        }) as Box<dyn FnMut()>);
        document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }

    {
        let view_r = view.clone();
        let closure = Closure::wrap(Box::new(move || {
            resize(&mut view_r.borrow_mut());
        }) as Box<dyn FnMut()>);
        window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }

    start_loop(view);
    Ok(())
}

/// Match the canvas backing size to CSS size * devicePixelRatio and rebuild
/// the grid. Colors re-resolve here in case the theme changed.
fn resize(view: &mut DotView) {
    let Some(window) = web::window() else {
        return;
    };
    let dpr = window.device_pixel_ratio().max(1.0);
    let rect = view.canvas.get_bounding_client_rect();
    let (w, h) = (rect.width().max(1.0), rect.height().max(1.0));
    view.canvas.set_width((w * dpr) as u32);
    view.canvas.set_height((h * dpr) as u32);
    view.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0).ok();
    view.css_width = w;
    view.css_height = h;
    view.field.rebuild(w as f32, h as f32);

    let resolver = ComputedStyleResolver::new(view.canvas.clone().into());
    view.dot_css = resolve_or_fallback(&resolver, &view.field.config().dot_color).to_css();
    view.glow_css = resolve_or_fallback(&resolver, &view.field.config().glow_color).to_css();
}

fn frame(view: &mut DotView) {
    let now_ms = view.start.elapsed().as_secs_f64() * 1000.0;
    let Some(dt) = view.clock.tick(now_ms) else {
        return;
    };
    let time_sec = now_ms / 1000.0;
    view.field.step(dt, time_sec, view.tracker.input());
    view.tracker.decay();
    view.field.sprites(time_sec, &mut view.sprites);

    let ctx = &view.ctx;
    ctx.clear_rect(0.0, 0.0, view.css_width, view.css_height);
    for sprite in &view.sprites {
        if sprite.blur > 0.0 {
            ctx.set_shadow_color(&view.glow_css);
            ctx.set_shadow_blur(sprite.blur as f64);
        } else {
            ctx.set_shadow_color("transparent");
            ctx.set_shadow_blur(0.0);
        }
        ctx.set_global_alpha(sprite.alpha as f64);
        ctx.set_fill_style_str(&view.dot_css);
        ctx.begin_path();
        ctx.arc(
            sprite.pos.x as f64,
            sprite.pos.y as f64,
            sprite.radius as f64,
            0.0,
            std::f64::consts::TAU,
        )
        .ok();
        ctx.fill();
    }
}

fn start_loop(view: Rc<RefCell<DotView>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame(&mut view.borrow_mut());
        if let Some(w) = web::window() {
            let _ = w.request_animation_frame(
                tick_clone
                    .borrow()
                    .as_ref()
                    .unwrap()
                    .as_ref()
                    .unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        let _ = w.request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}
