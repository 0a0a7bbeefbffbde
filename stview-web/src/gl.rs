/// WebGL2 renderer drawing into a canvas inside the host container
use log::{debug, warn};
use stview_core::{Camera, Color, Error, Result, Scene, SceneRenderer, SurfaceSize};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, HtmlElement, WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram,
    WebGlShader, WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::buffers::SceneBuffers;

const VERTEX_SHADER: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
uniform mat4 u_mvp;
void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
}
"#;

const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;
uniform vec3 u_color;
out vec4 frag_color;
void main() {
    frag_color = vec4(u_color, 1.0);
}
"#;

fn gl_error(context: &str, err: JsValue) -> Error {
    Error::Render(format!("{context}: {err:?}"))
}

/// One vertex array holding a static position buffer
struct Batch {
    vao: WebGlVertexArrayObject,
    buffer: WebGlBuffer,
    mode: u32,
    count: i32,
    color: Color,
}

impl Batch {
    fn upload(gl: &Gl, vertices: &[f32], mode: u32, color: Color) -> Result<Self> {
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| Error::Render("failed to create vertex array".into()))?;
        let buffer = gl
            .create_buffer()
            .ok_or_else(|| Error::Render("failed to create buffer".into()))?;

        gl.bind_vertex_array(Some(&vao));
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
        let data = js_sys::Float32Array::from(vertices);
        gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &data, Gl::STATIC_DRAW);
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 3, Gl::FLOAT, false, 0, 0);
        gl.bind_vertex_array(None);

        Ok(Self {
            vao,
            buffer,
            mode,
            count: (vertices.len() / 3) as i32,
            color,
        })
    }

    fn draw(&self, gl: &Gl, color_location: &WebGlUniformLocation) {
        if self.count == 0 {
            return;
        }
        let [r, g, b] = self.color.to_rgb_f32();
        gl.uniform3f(Some(color_location), r, g, b);
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(self.mode, 0, self.count);
    }

    fn delete(&self, gl: &Gl) {
        gl.delete_vertex_array(Some(&self.vao));
        gl.delete_buffer(Some(&self.buffer));
    }
}

/// Canvas, GL context and uploaded geometry of one mounted view
pub struct GlRenderer {
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    gl: Gl,
    program: WebGlProgram,
    mvp_location: WebGlUniformLocation,
    color_location: WebGlUniformLocation,
    batches: Option<Vec<Batch>>,
}

impl GlRenderer {
    /// Create a canvas of the given size and append it to `container`
    pub fn mount(container: &HtmlElement, surface: SurfaceSize) -> Result<Self> {
        let document = container
            .owner_document()
            .ok_or_else(|| Error::Render("container is not attached to a document".into()))?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|err| gl_error("failed to create canvas", err))?
            .dyn_into()
            .map_err(|_| Error::Render("created element is not a canvas".into()))?;
        canvas.set_width(surface.width);
        canvas.set_height(surface.height);
        canvas
            .set_attribute("style", "display: block")
            .map_err(|err| gl_error("failed to style canvas", err))?;

        let gl: Gl = canvas
            .get_context("webgl2")
            .map_err(|err| gl_error("failed to get context", err))?
            .ok_or_else(|| Error::Render("WebGL2 is not available".into()))?
            .dyn_into()
            .map_err(|_| Error::Render("context is not WebGL2".into()))?;

        let program = link_program(&gl, VERTEX_SHADER, FRAGMENT_SHADER)?;
        let mvp_location = gl
            .get_uniform_location(&program, "u_mvp")
            .ok_or_else(|| Error::Render("missing uniform u_mvp".into()))?;
        let color_location = gl
            .get_uniform_location(&program, "u_color")
            .ok_or_else(|| Error::Render("missing uniform u_color".into()))?;

        container
            .append_child(&canvas)
            .map_err(|err| gl_error("failed to attach canvas", err))?;

        gl.enable(Gl::DEPTH_TEST);
        gl.viewport(0, 0, surface.width as i32, surface.height as i32);

        Ok(Self {
            container: container.clone(),
            canvas,
            gl,
            program,
            mvp_location,
            color_location,
            batches: None,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn upload(&self, scene: &Scene) -> Result<Vec<Batch>> {
        let buffers = SceneBuffers::from_scene(scene);
        let style = scene.style();

        let mut batches = vec![
            Batch::upload(&self.gl, &buffers.cubes, Gl::TRIANGLES, style.node_color)?,
            Batch::upload(&self.gl, &buffers.lines, Gl::LINES, style.line_color)?,
        ];
        for (color, vertices) in &buffers.axes {
            batches.push(Batch::upload(&self.gl, vertices, Gl::LINES, *color)?);
        }

        debug!(
            "uploaded {} cube vertices and {} line vertices",
            buffers.cube_vertex_count(),
            buffers.line_vertex_count()
        );
        Ok(batches)
    }
}

impl SceneRenderer for GlRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()> {
        if self.gl.is_context_lost() {
            return Err(Error::Render("WebGL context lost".into()));
        }
        if self.batches.is_none() {
            self.batches = Some(self.upload(scene)?);
        }

        let gl = &self.gl;
        let [r, g, b] = scene.style().background.to_rgb_f32();
        gl.clear_color(r, g, b, 1.0);
        gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);

        let mvp = camera.view_projection() * scene.model_matrix();
        gl.use_program(Some(&self.program));
        gl.uniform_matrix4fv_with_f32_array(Some(&self.mvp_location), false, mvp.as_slice());

        for batch in self.batches.iter().flatten() {
            batch.draw(gl, &self.color_location);
        }
        gl.bind_vertex_array(None);
        Ok(())
    }

    fn resize(&mut self, surface: SurfaceSize) {
        self.canvas.set_width(surface.width);
        self.canvas.set_height(surface.height);
        self.gl
            .viewport(0, 0, surface.width as i32, surface.height as i32);
    }

    fn release(&mut self) {
        if let Some(batches) = self.batches.take() {
            for batch in &batches {
                batch.delete(&self.gl);
            }
        }
        self.gl.delete_program(Some(&self.program));

        if let Err(err) = self.container.remove_child(&self.canvas) {
            warn!("canvas was already detached: {err:?}");
        }
    }
}

fn compile_shader(gl: &Gl, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or_else(|| Error::Render("failed to create shader".into()))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(Error::Render(format!("shader compilation failed: {log}")))
    }
}

fn link_program(gl: &Gl, vertex_source: &str, fragment_source: &str) -> Result<WebGlProgram> {
    let vertex = compile_shader(gl, Gl::VERTEX_SHADER, vertex_source)?;
    let fragment = compile_shader(gl, Gl::FRAGMENT_SHADER, fragment_source)?;
    let program = gl
        .create_program()
        .ok_or_else(|| Error::Render("failed to create program".into()))?;

    gl.attach_shader(&program, &vertex);
    gl.attach_shader(&program, &fragment);
    gl.link_program(&program);
    gl.delete_shader(Some(&vertex));
    gl.delete_shader(Some(&fragment));

    if gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(Error::Render(format!("program link failed: {log}")))
    }
}
