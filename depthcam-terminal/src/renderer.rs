/// ASCII depth view for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use depthcam_core::{
    CameraConfig, DepthCamera, FrameBuffer, OwnerId, PinholeProjection, RotationState, Shape,
    Transform,
};
use std::io::Write;

/// Character luminosity ramp for depth shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;

/// Vertical field of view used when the config has no intrinsics
const FOV_Y: f32 = std::f32::consts::PI / 4.0;

const SHAPE_OWNER: OwnerId = OwnerId(1);

/// Which technique produces the depth image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMethod {
    Rasterize,
    Raycast,
}

impl RenderMethod {
    pub fn toggled(self) -> Self {
        match self {
            RenderMethod::Rasterize => RenderMethod::Raycast,
            RenderMethod::Raycast => RenderMethod::Rasterize,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RenderMethod::Rasterize => "rasterize",
            RenderMethod::Raycast => "raycast",
        }
    }
}

/// Renders one shape into a depth image and draws it as characters
pub struct AsciiRenderer {
    config: CameraConfig,
    camera: DepthCamera,
    frame: FrameBuffer,
    method: RenderMethod,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize, config: CameraConfig) -> Self {
        Self {
            camera: DepthCamera::new(terminal_config(&config, width, height)),
            config,
            frame: FrameBuffer::new(width, height),
            method: RenderMethod::Rasterize,
        }
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.camera = DepthCamera::new(terminal_config(&self.config, width, height));
        self.frame = FrameBuffer::new(width, height);
    }

    pub fn method(&self) -> RenderMethod {
        self.method
    }

    pub fn toggle_method(&mut self) {
        self.method = self.method.toggled();
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn clear(&mut self) {
        self.frame.clear();
    }

    /// Render `shape` rotated in place `distance` units in front of the
    /// camera. Returns the number of pixels written.
    pub fn render_shape(
        &mut self,
        shape: &dyn Shape,
        rotation: &RotationState,
        distance: f32,
    ) -> usize {
        let pose = Transform::pose(0.0, 0.0, -distance, rotation);
        match self.method {
            RenderMethod::Rasterize => {
                self.camera
                    .rasterize_in_camera(shape, &pose, &mut self.frame, Some(SHAPE_OWNER));
                self.frame.depth.written_count()
            }
            RenderMethod::Raycast => {
                let optical = Transform::to_optical(&pose);
                self.camera.render(shape, &optical, &mut self.frame.depth)
            }
        }
    }

    /// Character for the pixel at (x, y); nearer surfaces are brighter.
    pub fn char_at(&self, x: usize, y: usize, near: f32, far: f32) -> char {
        match self.frame.depth.depth(x, y) {
            Some(depth) => shade(depth, near, far),
            None => LUMINOSITY_RAMP[0],
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let (near, far) = depth_range(&self.frame);

        for y in 0..self.height() {
            for x in 0..self.width() {
                let c = self.char_at(x, y, near, far);

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            writer.queue(Print('\n'))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Fill in intrinsics that keep square pixels square on a terminal grid.
fn terminal_config(config: &CameraConfig, width: usize, height: usize) -> CameraConfig {
    if config.intrinsics.is_some() {
        return config.clone();
    }
    let fy = height as f32 / 2.0 / (FOV_Y / 2.0).tan();
    CameraConfig {
        intrinsics: Some(PinholeProjection::new(
            fy * CELL_ASPECT,
            fy,
            width as f32 / 2.0,
            height as f32 / 2.0,
        )),
        ..config.clone()
    }
}

/// Nearest and farthest written depth, or (0, 0) for an empty frame.
fn depth_range(frame: &FrameBuffer) -> (f32, f32) {
    let mut near = f32::INFINITY;
    let mut far = 0.0f32;
    for depth in frame.depth.as_slice().iter().filter(|d| **d != 0.0) {
        near = near.min(*depth);
        far = far.max(*depth);
    }
    if near.is_finite() {
        (near, far)
    } else {
        (0.0, 0.0)
    }
}

/// Map a written depth onto the visible part of the ramp.
fn shade(depth: f32, near: f32, far: f32) -> char {
    let brightest = LUMINOSITY_RAMP.len() - 1;
    let span = far - near;
    if span <= f32::EPSILON {
        return LUMINOSITY_RAMP[brightest];
    }
    let closeness = ((far - depth) / span).clamp(0.0, 1.0);
    // Index 0 is reserved for empty pixels
    let index = 1 + (closeness * (brightest - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(brightest)]
}
