/// Depthcam Terminal Demo - Rotating depth view
///
/// Renders a cube, or the STL file given on the command line, as an ASCII
/// depth image.
/// Usage: depthcam-terminal [--config camera.toml] [shape.stl]
/// Controls:
///   - WASD / Arrow Keys: Rotate the shape
///   - E/R: Roll rotation
///   - M: Switch between rasterizing and ray casting
///   - Q/ESC: Quit

use clap::Parser;
use depthcam_core::{BoxShape, CameraConfig, MeshShape, Shape};
use depthcam_terminal::TerminalApp;
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "depthcam-terminal")]
#[command(about = "Rotating ASCII depth view of a shape", long_about = None)]
struct Args {
    /// Camera config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// STL file to view instead of the default cube
    stl: Option<PathBuf>,
}

fn to_io(err: depthcam_core::Error) -> io::Error {
    let kind = match &err {
        depthcam_core::Error::Io(e) => e.kind(),
        _ => io::ErrorKind::InvalidData,
    };
    io::Error::new(kind, err.to_string())
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => CameraConfig::load(path).map_err(to_io)?,
        None => CameraConfig::default(),
    };

    let shape: Box<dyn Shape> = match &args.stl {
        Some(path) => {
            println!("Loading STL file: {}", path.display());
            let shape = MeshShape::from_stl_file(path).map_err(to_io)?;
            println!("Loaded {} triangles", shape.mesh().triangles.len());
            Box::new(shape)
        }
        None => Box::new(BoxShape::cube(2.0)),
    };

    let mut app = TerminalApp::new(shape, config)?;
    app.run()
}
