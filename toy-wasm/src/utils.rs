use toy_core::{Point, Viewport};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlCanvasElement};

use crate::state::State;

/// Log a message to the browser console.
pub fn log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

/// Ensure the canvas backing store matches the CSS size and device pixel ratio
/// to prevent non-uniform stretching. Updates and returns the CSS viewport.
pub fn sync_canvas_size(state: &mut State) -> Viewport {
    let dpr = state.window.device_pixel_ratio().max(1.0);
    let (css_w, css_h) = if let Some(el) = state.canvas.dyn_ref::<Element>() {
        let rect = el.get_bounding_client_rect();
        (rect.width().max(1.0), rect.height().max(1.0))
    } else {
        (
            state.canvas.client_width() as f64,
            state.canvas.client_height() as f64,
        )
    };
    let target_w = (css_w * dpr).round().clamp(1.0, 10000.0) as u32;
    let target_h = (css_h * dpr).round().clamp(1.0, 10000.0) as u32;
    if state.canvas.width() != target_w {
        state.canvas.set_width(target_w);
    }
    if state.canvas.height() != target_h {
        state.canvas.set_height(target_h);
    }
    state.dpr = dpr;
    state.viewport = Viewport::new(css_w, css_h);
    state.viewport
}

/// Client coordinates relative to the canvas box, in CSS pixels.
pub fn canvas_point(cv: &HtmlCanvasElement, client_x: f64, client_y: f64) -> Point {
    let rect = cv.get_bounding_client_rect();
    Point::new(client_x - rect.left(), client_y - rect.top())
}

/// Seed for the simulation's random sources.
pub fn random_seed() -> u64 {
    (js_sys::Math::random() * 9_007_199_254_740_992.0) as u64
}
