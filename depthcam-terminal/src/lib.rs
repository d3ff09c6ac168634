/// Terminal-based ASCII depth viewer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use depthcam_core::{CameraConfig, RotationState, Shape};
use std::io::{self, stdout, Write};
use std::time::Duration;

pub mod renderer;

pub use renderer::{AsciiRenderer, RenderMethod};

/// Distance from the camera to the shape's origin
const VIEW_DISTANCE: f32 = 5.0;

const FRAME_TIME: Duration = Duration::from_millis(33);

/// Interactive viewer: a shape, its rotation and the renderer drawing it
pub struct TerminalApp {
    shape: Box<dyn Shape>,
    rotation: RotationState,
    distance: f32,
    renderer: AsciiRenderer,
    running: bool,
}

impl TerminalApp {
    /// Viewer sized to the current terminal.
    pub fn new(shape: Box<dyn Shape>, config: CameraConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(shape, config, width as usize, height as usize))
    }

    pub fn with_size(
        shape: Box<dyn Shape>,
        config: CameraConfig,
        width: usize,
        height: usize,
    ) -> Self {
        // Keep the radius comfortably inside the view
        let distance = VIEW_DISTANCE.max(shape.max_radius() * 3.0);

        Self {
            shape,
            rotation: RotationState::new(0.3, 0.3, 0.0),
            distance,
            renderer: AsciiRenderer::new(width, height, config),
            running: true,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            if event::poll(FRAME_TIME)? {
                match event::read()? {
                    Event::Key(KeyEvent { code, .. }) => self.handle_key(code),
                    Event::Resize(width, height) => {
                        self.renderer.resize(width as usize, height as usize)
                    }
                    _ => {}
                }
            }

            // Slow spin between key presses
            self.rotation.rotate(0.01, 0.015, 0.0);
            self.render()?;
        }

        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('m') => self.renderer.toggle_method(),
            KeyCode::Char('w') | KeyCode::Up => self.rotation.rotate(0.1, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => self.rotation.rotate(-0.1, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => self.rotation.rotate(0.0, -0.1, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.rotation.rotate(0.0, 0.1, 0.0),
            KeyCode::Char('e') => self.rotation.rotate(0.0, 0.0, 0.1),
            KeyCode::Char('r') => self.rotation.rotate(0.0, 0.0, -0.1),
            _ => {}
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.clear();
        let written = self
            .renderer
            .render_shape(self.shape.as_ref(), &self.rotation, self.distance);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Depthcam | {} | {} px | M=Method Q=Quit",
                self.renderer.method().label(),
                written
            )),
            ResetColor
        )?;

        stdout.flush()
    }
}
