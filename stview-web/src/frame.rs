/// `requestAnimationFrame` as a frame scheduler
use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use stview_core::{Error, FrameScheduler, Result};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// The closure every animation frame calls back into. It is installed
/// before the viewer starts and dropped on dispose.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub struct AnimationFrameScheduler {
    window: Window,
    callback: FrameCallback,
}

impl AnimationFrameScheduler {
    pub fn new(window: Window, callback: FrameCallback) -> Self {
        Self { window, callback }
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    type Token = i32;

    fn request_frame(&mut self) -> Result<i32> {
        let callback = self.callback.borrow();
        let closure = callback
            .as_ref()
            .ok_or_else(|| Error::Schedule("frame callback is not installed".into()))?;
        self.window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .map_err(|err| Error::Schedule(format!("requestAnimationFrame failed: {err:?}")))
    }

    fn cancel_frame(&mut self, token: i32) {
        if let Err(err) = self.window.cancel_animation_frame(token) {
            warn!("cancelAnimationFrame({token}) failed: {err:?}");
        }
    }
}
