use bsp_csg::{Csg, Node, Point};
use csg_mesh::Rgb;
use csg_viz::{draw_back_to_front, init_logging, OrbitCamera, Operation};
use macroquad::prelude::*;

const RED_FACE: Rgb = [220, 70, 60];
const BLUE_FACE: Rgb = [60, 120, 220];
const CUBE_SIZE: f64 = 4.0;

fn result_tree(result: &Csg<Option<Rgb>>) -> Node<Option<Rgb>> {
    Node::from_polygons(result.polygons().to_vec(), result.epsilon())
}

#[macroquad::main("CSG Boolean Operations")]
async fn main() {
    init_logging();

    let a = Csg::cube(Point::new(-3.0, -3.0, -3.0), CUBE_SIZE, Some(RED_FACE));
    let b = Csg::cube(Point::new(-1.0, -1.0, -1.0), CUBE_SIZE, Some(BLUE_FACE));
    println!("Operands: {} and {} polygons", a.len(), b.len());

    let mut operation = Operation::Union;
    let mut result = operation.apply(&a, &b);
    let mut tree = result_tree(&result);
    println!("{operation}: {} polygons, volume {:.3}", result.len(), result.volume());

    let mut camera = OrbitCamera::new(16.0, 0.6, 0.4).with_zoom(1.0, 6.0, 60.0);
    let keys = [KeyCode::Key1, KeyCode::Key2, KeyCode::Key3, KeyCode::Key4];

    loop {
        camera.update();

        for (key, op) in keys.into_iter().zip(Operation::ALL) {
            if is_key_pressed(key) && op != operation {
                operation = op;
                result = operation.apply(&a, &b);
                tree = result_tree(&result);
                println!("{operation}: {} polygons, volume {:.3}", result.len(), result.volume());
            }
        }

        clear_background(Color::from_rgba(15, 15, 25, 255));
        set_camera(&camera.to_camera3d());

        draw_back_to_front(&tree, camera.eye_point());

        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(6.0, 0.0, 0.0), RED);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 6.0, 0.0), GREEN);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 6.0), BLUE);

        set_default_camera();

        draw_text(&format!("CSG {operation}"), 10.0, 25.0, 22.0, WHITE);
        draw_text(
            &format!(
                "Polygons: {} | Volume: {:.3} | Tree depth: {}",
                result.len(),
                result.volume(),
                tree.depth()
            ),
            10.0,
            47.0,
            18.0,
            GRAY,
        );
        draw_text(
            "[1] union  [2] subtract  [3] intersect  [4] inverse",
            10.0,
            69.0,
            16.0,
            YELLOW,
        );
        draw_text("Drag mouse to rotate, scroll to zoom", 10.0, 89.0, 16.0, DARKGRAY);
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 109.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
