/// Terminal host for the structural model viewer
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal,
};
use log::debug;
use std::io::{self, stdout, Stdout, Write};
use std::time::{Duration, Instant};
use stview_core::{
    FrameScheduler, PointerButton, Result, StructuralModel, Viewer, ViewerConfig,
};

pub mod renderer;

pub use renderer::{surface_for_cells, AsciiRenderer, CELL_ASPECT};

/// Rotation applied per arrow key press, in radians
const ROTATE_STEP: f32 = 0.1;
/// Pan applied per key press, in surface units
const PAN_STEP: f32 = 4.0;

/// Frame scheduler backed by a fixed frame interval.
///
/// Holds at most one outstanding request; the host loop waits until
/// [`PacedScheduler::due`] and then runs the frame.
#[derive(Debug)]
pub struct PacedScheduler {
    interval: Duration,
    next_token: u64,
    pending: Option<(u64, Instant)>,
}

impl PacedScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_token: 0,
            pending: None,
        }
    }

    /// Scheduler targeting `fps` frames per second
    pub fn with_fps(fps: u32) -> Self {
        Self::new(Duration::from_secs(1) / fps.max(1))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the outstanding frame should run, if one is requested
    pub fn due(&self) -> Option<Instant> {
        self.pending.map(|(_, at)| at)
    }
}

impl FrameScheduler for PacedScheduler {
    type Token = u64;

    fn request_frame(&mut self) -> Result<u64> {
        self.next_token += 1;
        self.pending = Some((self.next_token, Instant::now() + self.interval));
        Ok(self.next_token)
    }

    fn cancel_frame(&mut self, token: u64) {
        if matches!(self.pending, Some((pending, _)) if pending == token) {
            self.pending = None;
        }
    }
}

/// Switch to raw mode and the alternate screen. Raw mode is undone again
/// if the screen cannot be set up.
fn enter_screen<W: Write>(
    out: &mut W,
    enable_raw: impl FnOnce() -> io::Result<()>,
    disable_raw: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    enable_raw()?;
    if let Err(err) = execute!(
        out,
        terminal::EnterAlternateScreen,
        EnableMouseCapture,
        cursor::Hide
    ) {
        let _ = disable_raw();
        return Err(err);
    }
    Ok(())
}

fn poll_event(timeout: Duration) -> io::Result<Option<Event>> {
    if event::poll(timeout)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

/// Hand input to `on_event` until `due` has passed.
///
/// Every wait is bounded by the time left, so a steady stream of input
/// cannot hold back the frame.
fn pump_until<F, H>(due: Instant, mut next_event: F, mut on_event: H) -> io::Result<()>
where
    F: FnMut(Duration) -> io::Result<Option<Event>>,
    H: FnMut(Event),
{
    loop {
        let now = Instant::now();
        if now >= due {
            return Ok(());
        }
        if let Some(event) = next_event(due - now)? {
            on_event(event);
        }
    }
}

pub type TerminalViewer = Viewer<AsciiRenderer<Stdout>, PacedScheduler>;

/// Main application struct for terminal rendering
pub struct TerminalApp {
    viewer: TerminalViewer,
    nodes: usize,
    members: usize,
    last_sample: Instant,
    sampled_frames: u64,
    fps: f32,
}

impl TerminalApp {
    pub fn new(model: &StructuralModel, config: &ViewerConfig, fps: u32) -> Result<Self> {
        let (columns, rows) = terminal::size()?;
        let renderer = AsciiRenderer::new(stdout(), columns, rows);
        let viewer = Viewer::initialize(
            model,
            config,
            surface_for_cells(columns, rows),
            renderer,
            PacedScheduler::with_fps(fps),
        )?;

        Ok(Self {
            viewer,
            nodes: model.nodes.len(),
            members: model.members.len(),
            last_sample: Instant::now(),
            sampled_frames: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        enter_screen(
            &mut stdout(),
            terminal::enable_raw_mode,
            terminal::disable_raw_mode,
        )?;

        let result = self.main_loop();
        self.viewer.dispose();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> Result<()> {
        while self.viewer.is_active() {
            let Some(due) = self.viewer.scheduler().due() else {
                break;
            };

            pump_until(due, poll_event, |event| self.handle_event(event))?;

            self.update_fps();
            let status = self.status_line();
            self.viewer.renderer_mut().set_status(status);
            self.viewer.on_frame()?;
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(columns, rows) => {
                debug!("terminal resized to {columns}x{rows}");
                self.viewer.resize(surface_for_cells(columns, rows));
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, kind, .. }: KeyEvent) {
        if kind == KeyEventKind::Release {
            return;
        }
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.viewer.dispose(),
            KeyCode::Left => self.viewer.rotate(ROTATE_STEP, 0.0),
            KeyCode::Right => self.viewer.rotate(-ROTATE_STEP, 0.0),
            KeyCode::Up => self.viewer.rotate(0.0, ROTATE_STEP),
            KeyCode::Down => self.viewer.rotate(0.0, -ROTATE_STEP),
            KeyCode::Char('w') => self.viewer.pan(0.0, PAN_STEP),
            KeyCode::Char('s') => self.viewer.pan(0.0, -PAN_STEP),
            KeyCode::Char('a') => self.viewer.pan(PAN_STEP, 0.0),
            KeyCode::Char('d') => self.viewer.pan(-PAN_STEP, 0.0),
            KeyCode::Char('+') | KeyCode::Char('=') => self.viewer.wheel(-1.0),
            KeyCode::Char('-') => self.viewer.wheel(1.0),
            KeyCode::Char('r') => self.viewer.reset_camera(),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let x = mouse.column as f32;
        let y = (mouse.row as u32 * CELL_ASPECT) as f32;
        match mouse.kind {
            MouseEventKind::Down(button) => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Middle => PointerButton::Middle,
                    MouseButton::Right => PointerButton::Secondary,
                };
                self.viewer.pointer_down(button, x, y);
            }
            MouseEventKind::Drag(_) => self.viewer.pointer_move(x, y),
            MouseEventKind::Up(_) => self.viewer.pointer_up(),
            MouseEventKind::ScrollUp => self.viewer.wheel(-1.0),
            MouseEventKind::ScrollDown => self.viewer.wheel(1.0),
            _ => {}
        }
    }

    fn update_fps(&mut self) {
        let now = Instant::now();
        let elapsed = now - self.last_sample;
        if elapsed.as_secs() >= 1 {
            let frames = self.viewer.frames_rendered();
            self.fps = (frames - self.sampled_frames) as f32 / elapsed.as_secs_f32();
            self.sampled_frames = frames;
            self.last_sample = now;
        }
    }

    fn status_line(&self) -> String {
        format!(
            "stview | {} nodes {} members | FPS: {:.1} | arrows/drag=Orbit WASD=Pan +/-=Zoom R=Reset Q=Quit",
            self.nodes, self.members, self.fps
        )
    }
}
