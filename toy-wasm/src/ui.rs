//! DOM wiring: control panel and pointer listeners. Every control is
//! optional; missing elements are skipped.

use std::cell::RefCell;
use std::rc::Rc;

use toy_core::{Config, Mode, Scene};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Event, EventTarget, HtmlElement, HtmlInputElement, HtmlOptionElement, HtmlSelectElement,
    MouseEvent, TouchEvent,
};

use crate::state::State;
use crate::utils::{canvas_point, log};

fn listen(
    target: &EventTarget,
    event: &str,
    f: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let cb = Closure::<dyn FnMut(Event)>::wrap(Box::new(f));
    target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

fn element<T: JsCast>(doc: &Document, id: &str) -> Option<T> {
    doc.get_element_by_id(id)?.dyn_into::<T>().ok()
}

fn sync_mode_buttons(doc: &Document, mode: Mode) {
    for (id, m) in [("modeManual", Mode::Manual), ("modeAuto", Mode::Auto)] {
        if let Some(el) = doc.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("active", m == mode);
        }
    }
}

/// Expose the scene's accent colour to the page as `--accent`.
fn apply_accent(doc: &Document, scene: &Scene) {
    if let Some(root) = doc
        .document_element()
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    {
        let _ = root.style().set_property("--accent", &scene.accent.css());
    }
}

fn fill_select<'a>(
    sel: &HtmlSelectElement,
    items: impl Iterator<Item = (&'a str, &'a str)>,
    selected: &str,
) -> Result<(), JsValue> {
    sel.set_inner_html("");
    for (value, label) in items {
        let opt = HtmlOptionElement::new_with_text_and_value(label, value)?;
        sel.add_with_html_option_element(&opt)?;
    }
    sel.set_value(selected);
    Ok(())
}

pub fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    if let Ok(scene) = {
        let s = state.borrow();
        s.catalog.scene(&s.cfg.scene).cloned()
    } {
        apply_accent(&doc, &scene);
    }
    attach_mode_buttons(&doc, &state)?;
    attach_selects(&doc, &state)?;
    attach_ranges(&doc, &state)?;
    attach_pointer(&doc, &state)?;

    if let Some(btn) = doc.get_element_by_id("togglePanel") {
        let d = doc.clone();
        listen(&btn, "click", move |_| {
            if let Some(panel) = d.get_element_by_id("panel") {
                let _ = panel.class_list().toggle("hidden");
            }
        })?;
    }

    if let Some(btn) = doc.get_element_by_id("exportPng") {
        let st = state.clone();
        listen(&btn, "click", move |_| {
            if let Err(e) = crate::export_snapshot(&st.borrow()) {
                log(&format!("snapshot failed: {e:?}"));
            }
        })?;
    }
    Ok(())
}

fn attach_mode_buttons(doc: &Document, state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    sync_mode_buttons(doc, state.borrow().cfg.mode);
    for (id, mode) in [("modeManual", Mode::Manual), ("modeAuto", Mode::Auto)] {
        let Some(btn) = doc.get_element_by_id(id) else {
            continue;
        };
        let st = state.clone();
        let d = doc.clone();
        listen(&btn, "click", move |_| {
            st.borrow_mut().cfg.mode = mode;
            sync_mode_buttons(&d, mode);
        })?;
    }
    Ok(())
}

fn attach_selects(doc: &Document, state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    if let Some(sel) = element::<HtmlSelectElement>(doc, "toySel") {
        {
            let s = state.borrow();
            let items = s.catalog.toys.iter().map(|t| (t.id.as_str(), t.label.as_str()));
            fill_select(&sel, items, &s.cfg.toy)?;
        }
        let st = state.clone();
        let input = sel.clone();
        listen(&sel, "change", move |_| {
            let v = input.value();
            let mut guard = st.borrow_mut();
            let s = &mut *guard;
            match s.catalog.toy(&v) {
                Ok(_) => s.cfg.toy = v,
                Err(e) => log::warn!("{e}"),
            }
        })?;
    }
    if let Some(sel) = element::<HtmlSelectElement>(doc, "sceneSel") {
        {
            let s = state.borrow();
            let items = s.catalog.scenes.iter().map(|sc| (sc.id.as_str(), sc.label.as_str()));
            fill_select(&sel, items, &s.cfg.scene)?;
        }
        let st = state.clone();
        let input = sel.clone();
        let d = doc.clone();
        listen(&sel, "change", move |_| {
            let v = input.value();
            let mut guard = st.borrow_mut();
            let s = &mut *guard;
            match s.catalog.scene(&v) {
                Ok(scene) => {
                    apply_accent(&d, scene);
                    s.cfg.scene = v;
                }
                Err(e) => log::warn!("{e}"),
            }
        })?;
    }
    Ok(())
}

fn attach_ranges(doc: &Document, state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    type Get = fn(&Config) -> f64;
    type Set = fn(&mut Config, f64);
    let ranges: [(&str, Get, Set); 4] = [
        ("toySize", Config::toy_size, Config::set_toy_size),
        ("trailWidth", Config::trail_width, Config::set_trail_width),
        ("trailLength", Config::trail_length, Config::set_trail_length),
        ("autoSpeed", Config::auto_speed, Config::set_auto_speed),
    ];
    for (id, get, set) in ranges {
        let Some(input) = element::<HtmlInputElement>(doc, id) else {
            continue;
        };
        input.set_value(&get(&state.borrow().cfg).to_string());
        let st = state.clone();
        let el = input.clone();
        listen(&input, "input", move |_| {
            let v = el.value_as_number();
            if v.is_finite() {
                set(&mut st.borrow_mut().cfg, v);
            }
        })?;
    }
    Ok(())
}

fn attach_pointer(doc: &Document, state: &Rc<RefCell<State>>) -> Result<(), JsValue> {
    let st = state.clone();
    listen(doc, "mousemove", move |e| {
        if let Some(m) = e.dyn_ref::<MouseEvent>() {
            let mut s = st.borrow_mut();
            let p = canvas_point(&s.canvas, m.client_x() as f64, m.client_y() as f64);
            s.engine.pointer_moved(p);
        }
    })?;

    let st = state.clone();
    listen(doc, "touchmove", move |e| {
        let Some(touch) = e.dyn_ref::<TouchEvent>().and_then(|t| t.touches().get(0)) else {
            return;
        };
        let mut s = st.borrow_mut();
        let p = canvas_point(&s.canvas, touch.client_x() as f64, touch.client_y() as f64);
        s.engine.pointer_moved(p);
    })?;

    let st = state.clone();
    listen(doc, "mouseleave", move |_| {
        st.borrow_mut().engine.pointer_left();
    })?;

    let st = state.clone();
    listen(doc, "mouseenter", move |e| {
        if let Some(m) = e.dyn_ref::<MouseEvent>() {
            let mut s = st.borrow_mut();
            let p = canvas_point(&s.canvas, m.client_x() as f64, m.client_y() as f64);
            s.engine.pointer_entered(p);
        }
    })?;
    Ok(())
}
