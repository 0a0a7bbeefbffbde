/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    queue,
};
use nalgebra::{Point3, Vector3, Vector4};
use std::io::Write;
use stview_core::{Camera, Color, Mesh, Result, Scene, SceneRenderer, SurfaceSize, Triangle};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: u32 = 2;

/// Camera surface for a grid of terminal cells
pub fn surface_for_cells(columns: u16, rows: u16) -> SurfaceSize {
    SurfaceSize::new(columns as u32, rows as u32 * CELL_ASPECT)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    color: Option<Color>,
}

const BLANK: Cell = Cell {
    ch: ' ',
    color: None,
};

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r(),
        g: color.g(),
        b: color.b(),
    }
}

/// Glyph following the on-screen direction of a line
fn line_glyph(dx: f32, dy: f32) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ay * 2.0 < ax {
        '-'
    } else if ax * 2.0 < ay {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Renders a scene into a character grid and writes it to `writer`
pub struct AsciiRenderer<W: Write> {
    writer: W,
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    cells: Vec<Cell>,
    status: String,
}

impl<W: Write> AsciiRenderer<W> {
    pub fn new(writer: W, columns: u16, rows: u16) -> Self {
        let (width, height) = (columns as usize, rows as usize);
        Self {
            writer,
            width,
            height,
            depth_buffer: vec![f32::INFINITY; width * height],
            cells: vec![BLANK; width * height],
            status: String::new(),
        }
    }

    /// Text drawn over the first row
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.cells.fill(BLANK);
    }

    /// Character at a cell, for inspection
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x].ch)
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Fill the character grid from the scene
    pub fn rasterize(&mut self, scene: &Scene, camera: &Camera) {
        self.clear();
        let style = *scene.style();

        for cube in scene.cubes() {
            let center = scene.world_point(&cube.center);
            let mesh = Mesh::cube(center, cube.edge);
            for triangle in &mesh.triangles {
                self.rasterize_triangle(triangle, camera, style.node_color);
            }
        }

        for line in scene.lines() {
            let (start, end) = (scene.world_point(&line.start), scene.world_point(&line.end));
            self.rasterize_line(&start, &end, camera, style.line_color);
        }

        for axis in scene.axes().into_iter().flatten() {
            let (start, end) = (scene.world_point(&axis.start), scene.world_point(&axis.end));
            self.rasterize_line(&start, &end, camera, axis.color);
        }
    }

    fn project(&self, camera: &Camera, point: &Point3<f32>) -> Option<(f32, f32, f32)> {
        camera.project_to_screen(point, self.width as u32, self.height as u32)
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, cell: Cell) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.cells[idx] = cell;
        }
    }

    fn rasterize_triangle(&mut self, triangle: &Triangle, camera: &Camera, color: Color) {
        let normal = triangle.calculate_normal();
        let v0 = triangle.vertices[0].position;
        let to_camera: Vector3<f32> = (camera.position - v0).normalize();
        let brightness = normal.dot(&to_camera);
        if brightness <= 0.0 {
            return; // Back face
        }

        let mut coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in coords.iter_mut().zip(&triangle.vertices) {
            match self.project(camera, &vertex.position) {
                Some(screen) => *slot = screen,
                None => return,
            }
        }

        let index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let ch = LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)];
        self.fill_triangle(&coords, Cell { ch, color: Some(color) });
    }

    fn fill_triangle(&mut self, coords: &[(f32, f32, f32); 3], cell: Cell) {
        let [v0, v1, v2] = *coords;

        let min_x = v0.0.min(v1.0).min(v2.0).floor().max(0.0) as i32;
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = v0.1.min(v1.1).min(v2.1).floor().max(0.0) as i32;
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                let Some((w0, w1, w2)) = barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), p)
                else {
                    return;
                };
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                    self.plot(x, y, depth, cell);
                }
            }
        }
    }

    fn rasterize_line(&mut self, start: &Point3<f32>, end: &Point3<f32>, camera: &Camera, color: Color) {
        let view_projection = camera.view_projection();
        let clip_start = view_projection * start.to_homogeneous();
        let clip_end = view_projection * end.to_homogeneous();
        let Some((clip_start, clip_end)) = clip_segment(clip_start, clip_end) else {
            return;
        };
        let (Some(a), Some(b)) = (self.to_screen(&clip_start), self.to_screen(&clip_end)) else {
            return;
        };

        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let cell = Cell {
            ch: line_glyph(dx, dy),
            color: Some(color),
        };

        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = (a.0 + dx * t).floor() as i32;
            let y = (a.1 + dy * t).floor() as i32;
            let depth = a.2 + (b.2 - a.2) * t;
            self.plot(x, y, depth, cell);
        }
    }

    /// Grid position and NDC depth of a clip-space point
    fn to_screen(&self, clip: &Vector4<f32>) -> Option<(f32, f32, f32)> {
        if clip.w <= 1e-6 {
            return None;
        }
        let ndc = clip.xyz() / clip.w;
        let x = (ndc.x + 1.0) * 0.5 * self.width as f32;
        let y = (1.0 - ndc.y) * 0.5 * self.height as f32;
        Some((x, y, ndc.z))
    }

    /// Write the grid, background and status line
    pub fn draw(&mut self, background: Color) -> std::io::Result<()> {
        let background = term_color(background);
        queue!(self.writer, SetBackgroundColor(background))?;

        for y in 0..self.height {
            queue!(self.writer, cursor::MoveTo(0, y as u16))?;
            let mut current = None;
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                if cell.color != current {
                    if let Some(color) = cell.color {
                        queue!(self.writer, SetForegroundColor(term_color(color)))?;
                    }
                    current = cell.color;
                }
                queue!(self.writer, Print(cell.ch))?;
            }
        }

        if !self.status.is_empty() {
            let status: String = self.status.chars().take(self.width).collect();
            queue!(
                self.writer,
                cursor::MoveTo(0, 0),
                SetForegroundColor(TermColor::Yellow),
                Print(status)
            )?;
        }

        queue!(self.writer, ResetColor)?;
        self.writer.flush()
    }
}

impl<W: Write> SceneRenderer for AsciiRenderer<W> {
    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<()> {
        self.rasterize(scene, camera);
        self.draw(scene.style().background)?;
        Ok(())
    }

    fn resize(&mut self, surface: SurfaceSize) {
        self.width = surface.width as usize;
        self.height = (surface.height / CELL_ASPECT) as usize;
        let size = self.width * self.height;
        self.depth_buffer = vec![f32::INFINITY; size];
        self.cells = vec![BLANK; size];
    }

    fn release(&mut self) {
        self.depth_buffer = Vec::new();
        self.cells = Vec::new();
        self.width = 0;
        self.height = 0;
        let _ = queue!(self.writer, ResetColor);
        let _ = self.writer.flush();
    }
}

/// Clip a segment to the view volume `-w <= x, y, z <= w` (Liang-Barsky).
///
/// Returns the visible part, or `None` when nothing is visible.
fn clip_segment(a: Vector4<f32>, b: Vector4<f32>) -> Option<(Vector4<f32>, Vector4<f32>)> {
    let planes = |v: &Vector4<f32>| {
        [
            v.w + v.x,
            v.w - v.x,
            v.w + v.y,
            v.w - v.y,
            v.w + v.z,
            v.w - v.z,
        ]
    };
    let delta = b - a;
    let (mut t_enter, mut t_exit) = (0.0f32, 1.0f32);

    // Each plane distance is linear along the segment: p + t * q >= 0
    for (p, q) in planes(&a).into_iter().zip(planes(&delta)) {
        if q.abs() < 1e-9 {
            if p < 0.0 {
                return None;
            }
            continue;
        }
        let t = -p / q;
        if q > 0.0 {
            t_enter = t_enter.max(t);
        } else {
            t_exit = t_exit.min(t);
        }
        if t_enter > t_exit {
            return None;
        }
    }

    Some((a + delta * t_enter, a + delta * t_exit))
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
