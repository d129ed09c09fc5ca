//! Splitting polygons by a plane.

use crate::plane::{Classification, Plane, PlaneSide};
use crate::polygon::Polygon;
use crate::vector::{lerp, Real};

/// Where a polygon ends up after being split by a plane.
///
/// Non-spanning polygons are handed back untouched. Spanning ones are cut in
/// two; a fragment with fewer than three vertices is dropped, so either side
/// may be `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Split<S> {
    /// On the plane, facing the same way as the plane normal.
    CoplanarFront(Polygon<S>),
    /// On the plane, facing against the plane normal.
    CoplanarBack(Polygon<S>),
    Front(Polygon<S>),
    Back(Polygon<S>),
    Spanning {
        front: Option<Polygon<S>>,
        back: Option<Polygon<S>>,
    },
}

impl<S> Split<S> {
    /// Routes the result into the four output lists.
    ///
    /// Callers that do not distinguish coplanar polygons by facing pass the
    /// same target for both through [`Split::route_coplanar_together`].
    pub fn route(
        self,
        coplanar_front: &mut Vec<Polygon<S>>,
        coplanar_back: &mut Vec<Polygon<S>>,
        front: &mut Vec<Polygon<S>>,
        back: &mut Vec<Polygon<S>>,
    ) {
        match self {
            Split::CoplanarFront(p) => coplanar_front.push(p),
            Split::CoplanarBack(p) => coplanar_back.push(p),
            Split::Front(p) => front.push(p),
            Split::Back(p) => back.push(p),
            Split::Spanning { front: f, back: b } => {
                front.extend(f);
                back.extend(b);
            }
        }
    }

    /// Like [`Split::route`], with both coplanar facings sent to `coplanar`.
    pub fn route_coplanar_together(
        self,
        coplanar: &mut Vec<Polygon<S>>,
        front: &mut Vec<Polygon<S>>,
        back: &mut Vec<Polygon<S>>,
    ) {
        match self {
            Split::CoplanarFront(p) | Split::CoplanarBack(p) => coplanar.push(p),
            Split::Front(p) => front.push(p),
            Split::Back(p) => back.push(p),
            Split::Spanning { front: f, back: b } => {
                front.extend(f);
                back.extend(b);
            }
        }
    }

    /// Like [`Split::route`], with coplanar polygons sent to the side they face.
    pub fn route_coplanar_by_facing(self, front: &mut Vec<Polygon<S>>, back: &mut Vec<Polygon<S>>) {
        match self {
            Split::CoplanarFront(p) | Split::Front(p) => front.push(p),
            Split::CoplanarBack(p) | Split::Back(p) => back.push(p),
            Split::Spanning { front: f, back: b } => {
                front.extend(f);
                back.extend(b);
            }
        }
    }
}

impl Plane {
    /// Splits `polygon` by this plane.
    ///
    /// Each vertex is classified with tolerance `epsilon`. A polygon entirely
    /// on one side (or on the plane) is returned whole. A spanning polygon is
    /// cut along the plane, Sutherland-Hodgman style: on-plane vertices go to
    /// both fragments and a new vertex is interpolated on every edge that
    /// crosses from front to back. Both fragments keep the original tag.
    pub fn split_polygon<S: Clone>(&self, polygon: Polygon<S>, epsilon: Real) -> Split<S> {
        let (sides, classification) = self.classify_points(polygon.vertices(), epsilon);

        match classification {
            Classification::Coplanar => {
                if self.normal().dot(&polygon.plane().normal()) > 0.0 {
                    Split::CoplanarFront(polygon)
                } else {
                    Split::CoplanarBack(polygon)
                }
            }
            Classification::Front => Split::Front(polygon),
            Classification::Back => Split::Back(polygon),
            Classification::Spanning => self.split_spanning(polygon, &sides),
        }
    }

    fn split_spanning<S: Clone>(&self, polygon: Polygon<S>, sides: &[PlaneSide]) -> Split<S> {
        let vertices = polygon.vertices();
        let n = vertices.len();

        let mut front_verts = Vec::with_capacity(n + 1);
        let mut back_verts = Vec::with_capacity(n + 1);

        for i in 0..n {
            let j = (i + 1) % n;
            let (ti, tj) = (sides[i], sides[j]);
            let (vi, vj) = (vertices[i], vertices[j]);

            if ti != PlaneSide::Back {
                front_verts.push(vi);
            }
            if ti != PlaneSide::Front {
                back_verts.push(vi);
            }
            if ti.bits() | tj.bits() == Classification::Spanning.bits() {
                let t = (self.offset() - self.normal().dot(&vi.coords))
                    / self.normal().dot(&(vj - vi));
                let v = lerp(&vi, &vj, t);
                front_verts.push(v);
                back_verts.push(v);
            }
        }

        let tag = polygon.into_tag();
        let front = (front_verts.len() >= 3).then(|| Polygon::new_unchecked(front_verts, tag.clone()));
        let back = (back_verts.len() >= 3).then(|| Polygon::new_unchecked(back_verts, tag));

        Split::Spanning { front, back }
    }
}
