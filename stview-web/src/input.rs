/// DOM event listeners feeding the orbit controls
use std::cell::RefCell;
use std::rc::Rc;

use stview_core::{Error, PointerButton, Result};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, MouseEvent, WheelEvent};

use crate::WebViewer;

/// Slot shared by the frame callback and every listener; emptied on dispose
pub type ViewerSlot = Rc<RefCell<Option<WebViewer>>>;

/// A registered DOM listener, removed again by [`Listener::detach`]
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(target: &EventTarget, kind: &'static str, closure: Closure<dyn FnMut(Event)>) -> Result<Self> {
        target
            .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
            .map_err(|err| Error::Render(format!("failed to listen for {kind}: {err:?}")))?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }

    pub fn detach(self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

fn with_viewer(slot: &ViewerSlot, f: impl FnOnce(&mut WebViewer)) {
    if let Some(viewer) = slot.borrow_mut().as_mut() {
        f(viewer);
    }
}

fn pointer_button(event: &MouseEvent) -> Option<PointerButton> {
    match event.button() {
        0 => Some(PointerButton::Primary),
        1 => Some(PointerButton::Middle),
        2 => Some(PointerButton::Secondary),
        _ => None,
    }
}

/// Listen on the canvas for presses and wheel steps, and on the window for
/// moves and releases so a drag keeps working outside the canvas.
pub fn install(canvas: &EventTarget, window: &EventTarget, slot: &ViewerSlot) -> Result<Vec<Listener>> {
    let viewer = slot.clone();
    let mouse_down = Closure::new(move |event: Event| {
        let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        if let Some(button) = pointer_button(mouse) {
            with_viewer(&viewer, |v| {
                v.pointer_down(button, mouse.client_x() as f32, mouse.client_y() as f32)
            });
        }
    });

    let viewer = slot.clone();
    let mouse_move = Closure::new(move |event: Event| {
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            with_viewer(&viewer, |v| {
                v.pointer_move(mouse.client_x() as f32, mouse.client_y() as f32)
            });
        }
    });

    let viewer = slot.clone();
    let mouse_up = Closure::new(move |_event: Event| with_viewer(&viewer, |v| v.pointer_up()));

    let viewer = slot.clone();
    let wheel = Closure::new(move |event: Event| {
        if let Some(wheel) = event.dyn_ref::<WheelEvent>() {
            event.prevent_default();
            with_viewer(&viewer, |v| v.wheel(wheel.delta_y() as f32));
        }
    });

    let context_menu = Closure::new(|event: Event| event.prevent_default());

    let wiring: [(&EventTarget, &'static str, Closure<dyn FnMut(Event)>); 5] = [
        (canvas, "mousedown", mouse_down),
        (window, "mousemove", mouse_move),
        (window, "mouseup", mouse_up),
        (canvas, "wheel", wheel),
        (canvas, "contextmenu", context_menu),
    ];

    let mut listeners = Vec::with_capacity(wiring.len());
    for (target, kind, closure) in wiring {
        match Listener::attach(target, kind, closure) {
            Ok(listener) => listeners.push(listener),
            Err(err) => {
                listeners.into_iter().for_each(Listener::detach);
                return Err(err);
            }
        }
    }
    Ok(listeners)
}
