/// Example: Render an STL file once with both methods and print a summary
///
/// Usage: cargo run --example load_stl -- path/to/file.stl

use depthcam_core::{
    BoxShape, DepthCamera, FrameBuffer, MeshShape, OwnerId, RotationState, Shape, Transform,
};
use std::env;
use std::io;

const WIDTH: usize = 320;
const HEIGHT: usize = 240;

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let shape: Box<dyn Shape> = if args.len() < 2 {
        eprintln!("Usage: {} <stl-file>", args[0]);
        eprintln!("\nNo STL file provided, using default cube...");
        Box::new(BoxShape::cube(2.0))
    } else {
        println!("Loading STL file: {}", args[1]);
        let shape = MeshShape::from_stl_file(&args[1])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        Box::new(shape)
    };

    println!(
        "{} points, {} triangles, radius {:.3}",
        shape.mesh().points.len(),
        shape.mesh().triangles.len(),
        shape.max_radius()
    );

    let camera = DepthCamera::default();
    let pose = Transform::pose(
        0.0,
        0.0,
        -3.0 * shape.max_radius(),
        &RotationState::new(0.3, 0.3, 0.0),
    );

    let mut frame = FrameBuffer::new(WIDTH, HEIGHT);
    let bounds = camera.rasterize_in_camera(shape.as_ref(), &pose, &mut frame, Some(OwnerId(1)));
    println!(
        "rasterize: {} pixels in {:?}",
        frame.depth.written_count(),
        bounds
    );

    frame.clear();
    let written = camera.render(shape.as_ref(), &Transform::to_optical(&pose), &mut frame.depth);
    println!("raycast:   {} pixels", written);

    Ok(())
}
