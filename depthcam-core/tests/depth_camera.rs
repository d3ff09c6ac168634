use approx::assert_relative_eq;
use depthcam_core::{
    BoxShape, CameraConfig, DepthCamera, Error, FrameBuffer, Mesh, MeshShape, OwnerId,
    PinholeProjection, Pose3D, RasterizeResult, RotationState, Transform,
};
use nalgebra::Point2;

fn screen_triangle(size: usize, pixels: [(f32, f32); 3], depth: f32) -> MeshShape {
    let projection = PinholeProjection::for_image(size, size);
    let mut mesh = Mesh::new();
    for (u, v) in pixels {
        mesh.add_point(projection.unproject(&Point2::new(u, v), depth));
    }
    mesh.add_triangle(0, 1, 2);
    MeshShape::new(mesh)
}

#[test]
fn test_both_methods_agree_on_the_optical_axis() {
    let camera = DepthCamera::default();
    let shape = BoxShape::cube(1.0);
    let rotation = RotationState::zero();

    for distance in [2.0f32, 3.0, 5.0] {
        // The ray caster looks down +Z, the rasterizer down -Z
        let mut cast = FrameBuffer::new(16, 16);
        let ahead = Transform::pose(0.0, 0.0, distance, &rotation);
        camera.render(&shape, &ahead, &mut cast.depth);

        let mut raster = FrameBuffer::new(16, 16);
        camera.rasterize_in_camera(
            &shape,
            &Transform::pose(0.0, 0.0, -distance, &rotation),
            &mut raster,
            None,
        );

        let expected = distance - 0.5;
        assert_relative_eq!(cast.depth.depth(8, 8).unwrap(), expected, epsilon = 1e-4);
        assert_relative_eq!(raster.depth.depth(8, 8).unwrap(), expected, epsilon = 1e-4);
    }
}

#[test]
fn test_both_methods_agree_on_slanted_faces() {
    let camera = DepthCamera::default();
    let shape = BoxShape::cube(1.0);
    let projection = PinholeProjection::for_image(16, 16);
    let pose = Transform::pose(0.0, 0.0, -3.0, &RotationState::new(0.0, 0.5, 0.0));

    let mut cast = FrameBuffer::new(16, 16);
    camera.render(&shape, &Transform::to_optical(&pose), &mut cast.depth);
    let mut raster = FrameBuffer::new(16, 16);
    camera.rasterize_in_camera(&shape, &pose, &mut raster, None);

    // The front face spans columns 6.6..11.9, the left face 4.6..6.6
    for (x, y) in [(8, 8), (10, 8), (7, 8), (8, 6), (8, 10), (5, 8)] {
        let distance = cast.depth.depth(x, y).unwrap();
        // Ray distance to depth along the view axis
        let axial = distance / projection.pixel_direction(x, y).norm();
        let rasterized = raster.depth.depth(x, y).unwrap();
        assert_relative_eq!(axial, rasterized, epsilon = 1e-4);
    }
}

#[test]
fn test_quad_scenario_through_world_poses() {
    let camera = DepthCamera::default();
    let shape = screen_triangle(4, [(-2.5, 1.9), (1.9, 1.9), (1.9, -2.5)], 2.0);

    // Moving both camera and object together changes nothing
    let shift = Transform::pose(1.0, -2.0, 0.5, &RotationState::new(0.2, -0.4, 0.1));
    let mut frame = FrameBuffer::new(4, 4);
    let bounds = camera.rasterize(&shape, &shift, &shift, &mut frame, Some(OwnerId(7)));

    assert_eq!(
        bounds,
        RasterizeResult {
            min_x: 0,
            min_y: 0,
            max_x: 1,
            max_y: 1
        }
    );
    assert_eq!(frame.depth.written_count(), 4);
    assert_eq!(frame.owners.get(1, 1), Some(&Some(OwnerId(7))));
    assert_eq!(frame.owners.get(2, 2), Some(&None));
    assert_eq!(frame.triangles.get(0, 0), Some(&Some(0)));
}

#[test]
fn test_ray_cast_and_rasterized_shapes_composite() {
    let camera = DepthCamera::default();
    let shape = BoxShape::cube(1.0);
    let mut frame = FrameBuffer::new(16, 16);

    camera.render(&shape, &Transform::translation(0.0, 0.0, 3.0), &mut frame.depth);
    assert_relative_eq!(frame.depth.depth(8, 8).unwrap(), 2.5, epsilon = 1e-5);

    // Farther rasterized cube loses, nearer one wins
    let far = Transform::translation(0.0, 0.0, -4.0);
    camera.rasterize_in_camera(&shape, &far, &mut frame, Some(OwnerId(1)));
    assert_relative_eq!(frame.depth.depth(8, 8).unwrap(), 2.5, epsilon = 1e-5);
    assert_eq!(frame.owners.get(8, 8), Some(&None));

    let near = Transform::translation(0.0, 0.0, -2.0);
    camera.rasterize_in_camera(&shape, &near, &mut frame, Some(OwnerId(2)));
    assert_relative_eq!(frame.depth.depth(8, 8).unwrap(), 1.5, epsilon = 1e-5);
    assert_eq!(frame.owners.get(8, 8), Some(&Some(OwnerId(2))));

    frame.clear();
    assert_eq!(frame.depth.written_count(), 0);
    assert!(frame.owners.as_slice().iter().all(Option::is_none));
}

#[test]
fn test_configured_intrinsics_drive_both_methods() {
    let config = CameraConfig::from_toml_str(
        r#"
        [intrinsics]
        fx = 8.0
        fy = 8.0
        cx = 4.0
        cy = 4.0
        "#,
    )
    .unwrap();
    let camera = DepthCamera::new(config);
    let shape = BoxShape::cube(1.0);

    let mut frame = FrameBuffer::new(8, 8);
    let pose = Transform::translation(0.0, 0.0, -3.0);
    let bounds = camera.rasterize_in_camera(&shape, &pose, &mut frame, None);

    // Front face projects to 2.4..5.6 on both axes
    assert_eq!(
        bounds,
        RasterizeResult {
            min_x: 3,
            min_y: 3,
            max_x: 5,
            max_y: 5
        }
    );
    assert_eq!(frame.depth.written_count(), 9);

    frame.clear();
    camera.render(&shape, &Transform::translation(0.0, 0.0, 3.0), &mut frame.depth);
    assert_relative_eq!(frame.depth.depth(4, 4).unwrap(), 2.5, epsilon = 1e-5);
}

#[test]
fn test_stl_file_renders() {
    let mut data = vec![0u8; 80];
    let cube = Mesh::cube(1.0);
    data.extend_from_slice(&(cube.triangles.len() as u32).to_le_bytes());
    for triangle in &cube.triangles {
        data.extend_from_slice(&[0u8; 12]);
        for p in cube.triangle_points(triangle) {
            for c in [p.x, p.y, p.z] {
                data.extend_from_slice(&c.to_le_bytes());
            }
        }
        data.extend_from_slice(&[0u8; 2]);
    }

    let path = std::env::temp_dir().join(format!("depthcam-cube-{}.stl", std::process::id()));
    std::fs::write(&path, &data).unwrap();
    let shape = MeshShape::from_stl_file(&path);
    std::fs::remove_file(&path).unwrap();
    let shape = shape.unwrap();

    let camera = DepthCamera::default();
    let mut from_stl = FrameBuffer::new(16, 16);
    let mut from_box = FrameBuffer::new(16, 16);
    let pose = Transform::pose(0.0, 0.0, -3.0, &RotationState::new(0.3, 0.4, 0.0));
    camera.rasterize_in_camera(&shape, &pose, &mut from_stl, None);
    camera.rasterize_in_camera(&BoxShape::cube(1.0), &pose, &mut from_box, None);

    assert_eq!(from_stl.depth, from_box.depth);
    assert_eq!(from_stl.triangles, from_box.triangles);
}

#[test]
fn test_missing_stl_file_is_io_error() {
    let err = MeshShape::from_stl_file("/nonexistent/depthcam/shape.stl").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_camera_inside_box_sees_nothing() {
    let camera = DepthCamera::default();
    let mut frame = FrameBuffer::new(8, 8);
    let bounds =
        camera.rasterize_in_camera(&BoxShape::cube(1.0), &Pose3D::identity(), &mut frame, None);

    // Seen from inside, every face is back-facing
    assert!(bounds.is_empty());
    assert_eq!(frame.depth.written_count(), 0);
}
