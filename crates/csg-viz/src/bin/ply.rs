//! Combines two PLY meshes and shows the result.
//!
//! Usage: `ply <a.ply> <b.ply> <union|subtract|intersect|inverse> [out.ply]`

use std::error::Error;
use std::path::{Path, PathBuf};

use bsp_csg::{lerp, Csg, Node};
use csg_mesh::{read_ply_file, write_ply_file, IndexedMesh, Rgb, Triangulation, VertexMerge};
use csg_viz::{draw_back_to_front, init_logging, OrbitCamera, Operation};
use macroquad::prelude::*;

struct Args {
    a: PathBuf,
    b: PathBuf,
    operation: Operation,
    output: Option<PathBuf>,
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let usage = "usage: ply <a.ply> <b.ply> <union|subtract|intersect|inverse> [out.ply]";

    let a = args.next().ok_or(usage)?;
    let b = args.next().ok_or(usage)?;
    let operation = args.next().ok_or(usage)?.parse::<Operation>()?;
    Ok(Args {
        a: a.into(),
        b: b.into(),
        operation,
        output: args.next().map(PathBuf::from),
    })
}

fn load(path: &Path) -> Result<Csg<Option<Rgb>>, Box<dyn Error>> {
    let csg = read_ply_file(path)?.to_csg(Triangulation::Fan)?;
    println!("{}: {} polygons, volume {:.3}", path.display(), csg.len(), csg.volume());
    Ok(csg)
}

fn run() -> Result<Csg<Option<Rgb>>, Box<dyn Error>> {
    let args = parse_args()?;
    let a = load(&args.a)?;
    let b = load(&args.b)?;

    let result = args.operation.apply(&a, &b);
    println!(
        "{}: {} polygons, volume {:.3}",
        args.operation,
        result.len(),
        result.volume()
    );

    if let Some(output) = &args.output {
        let mesh = IndexedMesh::from_csg(&result, VertexMerge::Exact);
        write_ply_file(&mesh, output)?;
        println!(
            "Wrote {} ({} vertices, {} faces)",
            output.display(),
            mesh.vertex_count(),
            mesh.face_count()
        );
    }
    Ok(result)
}

/// Centre and radius of the axis-aligned box around all vertices.
fn bounds(csg: &Csg<Option<Rgb>>) -> (Vec3, f32) {
    let mut vertices = csg.polygons().iter().flat_map(|p| p.vertices());
    let Some(first) = vertices.next() else {
        return (Vec3::ZERO, 1.0);
    };
    let (min, max) = vertices.fold((*first, *first), |(min, max), v| (min.inf(v), max.sup(v)));
    let centre = lerp(&min, &max, 0.5);
    let radius = (max - min).norm() as f32 / 2.0;
    (vec3(centre.x as f32, centre.y as f32, centre.z as f32), radius.max(0.5))
}

#[macroquad::main("CSG PLY Viewer")]
async fn main() {
    init_logging();

    let result = match run() {
        Ok(result) => result,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };
    let tree = Node::from_polygons(result.polygons().to_vec(), result.epsilon());

    let (centre, radius) = bounds(&result);
    let mut camera = OrbitCamera::new(radius * 3.0, 0.6, 0.4)
        .with_zoom(radius * 0.2, radius * 0.5, radius * 20.0)
        .with_target(centre);

    loop {
        camera.update();

        clear_background(Color::from_rgba(15, 15, 25, 255));
        set_camera(&camera.to_camera3d());
        draw_back_to_front(&tree, camera.eye_point());
        set_default_camera();

        draw_text(
            &format!("Polygons: {} | Volume: {:.3}", result.len(), result.volume()),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text("Drag mouse to rotate, scroll to zoom", 10.0, 47.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
