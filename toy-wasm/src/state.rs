use std::cell::RefCell;
use std::rc::Rc;

use toy_core::{Catalog, Config, Decorations, Engine, Viewport};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

/// Global application state stored behind an `Rc<RefCell<_>>` so it can be
/// shared across the WASM callbacks.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub catalog: Catalog,
    /// Live settings; control callbacks write, the frame loop reads.
    pub cfg: Config,
    pub engine: Engine,
    pub decorations: Decorations,
    /// CSS size of the canvas as of the last frame.
    pub viewport: Viewport,
    pub dpr: f64,
    /// rAF timestamp of the previous frame.
    pub last_ts: Option<f64>,
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}
