//! Shared visualization utilities for the CSG viewers.

use std::hash::{Hash, Hasher};

use bsp_csg::{Node, PlaneSide, Point, Polygon, PLANE_EPSILON};
use csg_mesh::Rgb;
use macroquad::models::{draw_mesh, Mesh, Vertex};
use macroquad::prelude::*;

mod operation;
pub use operation::{Operation, UnknownOperation};

/// Polygon type drawn by the viewers: the tag is an optional face colour.
pub type ColoredPolygon = Polygon<Option<Rgb>>;

/// Returns the polygon's colour tag, or a deterministic colour hashed from
/// its vertices so split fragments stay stable across frames.
pub fn polygon_color(polygon: &ColoredPolygon) -> Color {
    if let Some([r, g, b]) = *polygon.tag() {
        return Color::from_rgba(r, g, b, 255);
    }

    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for v in polygon.vertices() {
        v.x.to_bits().hash(&mut hasher);
        v.y.to_bits().hash(&mut hasher);
        v.z.to_bits().hash(&mut hasher);
    }
    let hash = hasher.finish();

    // Keep a minimum brightness.
    let r = (((hash >> 16) & 0xFF) as u8).max(40);
    let g = (((hash >> 8) & 0xFF) as u8).max(40);
    let b = ((hash & 0xFF) as u8).max(40);

    Color::from_rgba(r, g, b, 255)
}

/// Shades `color` by how much the face turns towards a fixed light, so
/// adjacent faces of the same colour stay distinguishable.
fn shaded(color: Color, polygon: &ColoredPolygon) -> Color {
    let light = vec3(0.3, 0.8, 0.5).normalize();
    let n = polygon.plane().normal();
    let facing = vec3(n.x as f32, n.y as f32, n.z as f32).dot(light);
    let k = 0.55 + 0.45 * facing.max(0.0);
    Color::new(color.r * k, color.g * k, color.b * k, color.a)
}

/// Draws a single polygon as a fan of triangles.
pub fn draw_polygon(polygon: &ColoredPolygon) {
    let verts = polygon.vertices();
    if verts.len() < 3 {
        return;
    }

    let color = shaded(polygon_color(polygon), polygon);
    let mesh_vertices: Vec<Vertex> = verts
        .iter()
        .map(|p| Vertex::new2(vec3(p.x as f32, p.y as f32, p.z as f32), vec2(0.0, 0.0), color))
        .collect();

    let mut indices: Vec<u16> = Vec::with_capacity((verts.len() - 2) * 3);
    for i in 1..verts.len() - 1 {
        indices.extend_from_slice(&[0, i as u16, (i + 1) as u16]);
    }

    draw_mesh(&Mesh {
        vertices: mesh_vertices,
        indices,
        texture: None,
    });
}

pub fn draw_polygons(polygons: &[ColoredPolygon]) {
    for polygon in polygons {
        draw_polygon(polygon);
    }
}

/// Draws every polygon of `tree` farthest-first as seen from `eye`.
pub fn draw_back_to_front(tree: &Node<Option<Rgb>>, eye: Point) {
    enum Step<'a> {
        Visit(&'a Node<Option<Rgb>>),
        Draw(&'a Node<Option<Rgb>>),
    }

    let mut stack = vec![Step::Visit(tree)];
    while let Some(step) = stack.pop() {
        let node = match step {
            Step::Draw(node) => {
                draw_polygons(node.polygons());
                continue;
            }
            Step::Visit(node) => node,
        };
        let Some(plane) = node.plane() else {
            continue;
        };

        // The subtree on the eye's side is nearer and is drawn last.
        let (near, far) = match plane.classify_point(&eye, PLANE_EPSILON) {
            PlaneSide::Back => (node.back(), node.front()),
            PlaneSide::Front | PlaneSide::Coplanar => (node.front(), node.back()),
        };
        stack.extend(near.map(Step::Visit));
        stack.push(Step::Draw(node));
        stack.extend(far.map(Step::Visit));
    }
}

/// Simple orbit camera for 3D scene navigation.
pub struct OrbitCamera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target: Vec3,
    /// Multiplier for scroll wheel zoom
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitCamera {
    pub fn new(distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            distance,
            yaw,
            pitch,
            target: vec3(0.0, 0.0, 0.0),
            zoom_speed: 2.0,
            min_distance: 4.0,
            max_distance: 100.0,
        }
    }

    /// Sets the zoom speed and distance limits.
    pub fn with_zoom(mut self, speed: f32, min: f32, max: f32) -> Self {
        self.zoom_speed = speed;
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Updates camera state from mouse drag, scroll and arrow keys.
    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= delta.x * 2.0;
            self.pitch -= delta.y * 2.0;
        }

        let scroll = mouse_wheel().1;
        self.distance = (self.distance - scroll * self.zoom_speed).clamp(self.min_distance, self.max_distance);

        if is_key_down(KeyCode::Left) {
            self.yaw += 0.02;
        }
        if is_key_down(KeyCode::Right) {
            self.yaw -= 0.02;
        }
        if is_key_down(KeyCode::Up) {
            self.pitch += 0.02;
        }
        if is_key_down(KeyCode::Down) {
            self.pitch -= 0.02;
        }

        // Stay clear of the poles.
        self.pitch = self.pitch.clamp(-1.5, 1.5);
    }

    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + vec3(x, y, z)
    }

    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            up: vec3(0.0, 1.0, 0.0),
            target: self.target,
            ..Default::default()
        }
    }

    /// Camera position in model space, for back-to-front drawing.
    pub fn eye_point(&self) -> Point {
        let pos = self.position();
        Point::new(pos.x as f64, pos.y as f64, pos.z as f64)
    }
}

/// Installs a `tracing` subscriber filtered by `RUST_LOG`.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
