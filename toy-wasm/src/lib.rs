use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use toy_core::{Catalog, Config, Decorations, Engine, Viewport, draw_scene, snapshot_png};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, Url};

mod canvas;
mod logger;
mod state;
mod ui;
mod utils;

use canvas::CanvasPainter;
use state::{STATE, State};
use utils::{log, random_seed, sync_canvas_size};

/// Frame delta assumed before the first timestamp arrives.
const FIRST_FRAME_MS: f64 = 1000.0 / 60.0;

type RafClosure = Closure<dyn FnMut(f64)>;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Advance the simulation to `ts` and repaint the whole canvas.
fn draw(state: &mut State, ts: f64) {
    let vp = sync_canvas_size(state);
    let dt = state.last_ts.map_or(FIRST_FRAME_MS, |last| ts - last);
    state.last_ts = Some(ts);
    state.engine.frame(&state.cfg, vp, dt);

    let (Ok(scene), Ok(toy)) = (
        state.catalog.scene(&state.cfg.scene),
        state.catalog.toy(&state.cfg.toy),
    ) else {
        return;
    };
    let mut painter = CanvasPainter::new(&state.ctx, vp, state.dpr);
    draw_scene(&mut painter, scene, &state.decorations, vp, ts);
    state.engine.draw(&mut painter, &state.cfg, toy);
}

/// Re-render the current frame off-screen and download it as a PNG.
pub(crate) fn export_snapshot(state: &State) -> Result<(), JsValue> {
    let scene = state.catalog.scene(&state.cfg.scene).map_err(js_err)?;
    let toy = state.catalog.toy(&state.cfg.toy).map_err(js_err)?;
    let bytes = snapshot_png(
        &state.engine,
        &state.cfg,
        scene,
        toy,
        &state.decorations,
        state.viewport,
        state.last_ts.unwrap_or(0.0),
    )
    .map_err(js_err)?;

    let array = js_sys::Array::new();
    let u8 = js_sys::Uint8Array::from(bytes.as_slice());
    array.push(&u8);
    let blob = Blob::new_with_u8_array_sequence(&array)?;
    let url = Url::create_object_url_with_blob(&blob)?;
    let a = state
        .document
        .create_element("a")?
        .dyn_into::<HtmlElement>()?;
    a.set_attribute("href", &url)?;
    a.set_attribute("download", "cat-toy.png")?;
    a.click();
    Url::revoke_object_url(&url)?;
    log::info!("snapshot saved ({} bytes)", bytes.len());
    Ok(())
}

fn init_canvas(
    document: &Document,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let cv = document
        .get_element_by_id("cv")
        .ok_or_else(|| JsValue::from_str("canvas #cv not found"))?
        .dyn_into::<HtmlCanvasElement>()?;
    let ctx = cv
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D context not available"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    Ok((cv, ctx))
}

fn request_frame(cb: &Rc<RefCell<Option<RafClosure>>>) {
    if let (Some(window), Some(cb)) = (web_sys::window(), cb.borrow().as_ref()) {
        let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn start_animation(state: Rc<RefCell<State>>) {
    let f: Rc<RefCell<Option<RafClosure>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        draw(&mut state.borrow_mut(), ts);
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

/// Current settings as JSON, for the host page.
#[wasm_bindgen]
pub fn config_json() -> String {
    STATE.with(|st| {
        st.borrow()
            .as_ref()
            .and_then(|s| serde_json::to_string(&s.borrow().cfg).ok())
            .unwrap_or_else(|| "{}".to_string())
    })
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let (canvas, ctx) = init_canvas(&document)?;

    let catalog = Catalog::builtin().map_err(js_err)?;
    let mut cfg = Config::default();
    if let Ok(search) = window.location().search() {
        cfg.apply_query(&search, &catalog);
    }

    let seed = random_seed();
    let decorations = Decorations::generate(&mut SmallRng::seed_from_u64(seed));
    let viewport = Viewport::new(
        canvas.client_width() as f64,
        canvas.client_height() as f64,
    );
    let engine = Engine::new(&cfg, viewport, seed.wrapping_add(1));
    log(&format!(
        "cat toy: {} on {} ({:?})",
        cfg.toy, cfg.scene, cfg.mode
    ));

    let state = Rc::new(RefCell::new(State {
        window,
        document,
        canvas,
        ctx,
        catalog,
        cfg,
        engine,
        decorations,
        viewport,
        dpr: 1.0,
        last_ts: None,
    }));

    STATE.with(|st| st.replace(Some(state.clone())));
    ui::attach_ui(state.clone())?;
    start_animation(state);
    Ok(())
}
