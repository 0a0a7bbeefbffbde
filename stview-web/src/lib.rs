/// stview Web - WASM structural model viewer
///
/// Mounts the viewer into a sized DOM container, draws it with WebGL2 on
/// every animation frame and tears everything down again on dispose.

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;
use std::sync::OnceLock;

use log::{error, info};
use stview_core::{StructuralModel, SurfaceSize, Viewer, ViewerConfig};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

pub mod buffers;
pub mod frame;
pub mod gl;
pub mod input;

use crate::frame::{AnimationFrameScheduler, FrameCallback};
use crate::gl::GlRenderer;
use crate::input::{Listener, ViewerSlot};

/// Datasets shipped with the viewer
pub const BUNDLED_NODES: &str = include_str!("../../data/nodes.json");
pub const BUNDLED_MEMBERS: &str = include_str!("../../data/members.json");

pub type WebViewer = Viewer<GlRenderer, AnimationFrameScheduler>;

fn js_error(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn init_logging_once() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        #[cfg(target_arch = "wasm32")]
        {
            console_error_panic_hook::set_once();
            let _ = wasm_logger::init(wasm_logger::Config::default());
        }
    });
}

fn container_size(container: &HtmlElement) -> SurfaceSize {
    SurfaceSize::new(
        container.client_width().max(0) as u32,
        container.client_height().max(0) as u32,
    )
}

struct Mounted {
    container: HtmlElement,
    viewer: ViewerSlot,
    frame_callback: FrameCallback,
    listeners: Vec<Listener>,
}

/// A mounted view. Call `dispose()` when the hosting view goes away.
#[wasm_bindgen]
pub struct ViewerHandle {
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl ViewerHandle {
    /// Cancel the pending frame, remove listeners and the canvas
    pub fn dispose(&mut self) {
        let Some(mounted) = self.mounted.take() else {
            return;
        };
        for listener in mounted.listeners {
            listener.detach();
        }
        let viewer = mounted.viewer.borrow_mut().take();
        if let Some(mut viewer) = viewer {
            viewer.dispose();
        }
        mounted.frame_callback.borrow_mut().take();
    }

    /// Re-read the container size after a layout change
    pub fn resize(&mut self) {
        let Some(mounted) = self.mounted.as_ref() else {
            return;
        };
        let surface = container_size(&mounted.container);
        if let Some(viewer) = mounted.viewer.borrow_mut().as_mut() {
            viewer.resize(surface);
        }
    }

    #[wasm_bindgen(js_name = resetCamera)]
    pub fn reset_camera(&mut self) {
        if let Some(mounted) = self.mounted.as_ref() {
            if let Some(viewer) = mounted.viewer.borrow_mut().as_mut() {
                viewer.reset_camera();
            }
        }
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.mounted
            .as_ref()
            .and_then(|m| m.viewer.borrow().as_ref().map(|v| v.is_active()))
            .unwrap_or(false)
    }

    #[wasm_bindgen(js_name = framesRendered)]
    pub fn frames_rendered(&self) -> f64 {
        self.mounted
            .as_ref()
            .and_then(|m| m.viewer.borrow().as_ref().map(|v| v.frames_rendered() as f64))
            .unwrap_or(0.0)
    }
}

impl Drop for ViewerHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Mount the viewer with the bundled datasets
#[wasm_bindgen]
pub fn initialize(container: HtmlElement, options: Option<String>) -> Result<ViewerHandle, JsValue> {
    initialize_with_data(container, BUNDLED_NODES, BUNDLED_MEMBERS, options)
}

/// Mount the viewer with caller-supplied node and member JSON arrays.
///
/// `options` is an optional JSON object overriding any `ViewerConfig` field.
#[wasm_bindgen(js_name = initializeWithData)]
pub fn initialize_with_data(
    container: HtmlElement,
    nodes_json: &str,
    members_json: &str,
    options: Option<String>,
) -> Result<ViewerHandle, JsValue> {
    init_logging_once();

    let config = match options.as_deref() {
        Some(json) => ViewerConfig::from_json(json).map_err(js_error)?,
        None => ViewerConfig::default(),
    };
    let model = StructuralModel::from_json(nodes_json, members_json).map_err(js_error)?;
    let window = web_sys::window().ok_or_else(|| js_error("no global window"))?;
    let surface = container_size(&container);

    let slot: ViewerSlot = Rc::new(RefCell::new(None));
    let frame_callback: FrameCallback = Rc::new(RefCell::new(None));
    let frame_slot = slot.clone();
    *frame_callback.borrow_mut() = Some(Closure::new(move |_timestamp: f64| {
        if let Some(viewer) = frame_slot.borrow_mut().as_mut() {
            if let Err(err) = viewer.on_frame() {
                error!("render loop stopped: {err}");
            }
        }
    }));

    let renderer = GlRenderer::mount(&container, surface).map_err(js_error)?;
    let canvas = renderer.canvas().clone();
    let scheduler = AnimationFrameScheduler::new(window.clone(), frame_callback.clone());

    let viewer = match Viewer::initialize(&model, &config, surface, renderer, scheduler) {
        Ok(viewer) => viewer,
        Err(err) => {
            frame_callback.borrow_mut().take();
            let _ = container.remove_child(&canvas);
            return Err(js_error(err));
        }
    };
    *slot.borrow_mut() = Some(viewer);

    let listeners = match input::install(&canvas, &window, &slot) {
        Ok(listeners) => listeners,
        Err(err) => {
            if let Some(mut viewer) = slot.borrow_mut().take() {
                viewer.dispose();
            }
            frame_callback.borrow_mut().take();
            return Err(js_error(err));
        }
    };

    info!(
        "mounted structural viewer: {} nodes, {} members",
        model.nodes.len(),
        model.members.len()
    );
    Ok(ViewerHandle {
        mounted: Some(Mounted {
            container,
            viewer: slot,
            frame_callback,
            listeners,
        }),
    })
}

/// Free-function form of `ViewerHandle.dispose()`
#[wasm_bindgen]
pub fn dispose(handle: &mut ViewerHandle) {
    handle.dispose();
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    init_logging_once();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_datasets_parse() {
        let model = StructuralModel::from_json(BUNDLED_NODES, BUNDLED_MEMBERS).unwrap();
        assert_eq!(model.nodes.len(), 15);
        assert_eq!(model.members.len(), 25);
        for member in &model.members {
            assert!(model.find_node(&member.start).is_some());
            assert!(model.find_node(&member.end).is_some());
        }
    }
}
