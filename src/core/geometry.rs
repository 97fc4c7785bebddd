use serde::{Deserialize, Serialize};

/// A point in image pixel space.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Vertex {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

impl Vertex {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Closed polygon over ordered vertices; the last vertex connects back to the first.
///
/// An empty region means the bounds are unknown. One vertex is treated as a
/// point and two vertices (or any collinear set) as a polyline with no interior.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Region {
    pub vertices: Vec<Vertex>,
}

impl Region {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned rectangle `[(x0,y0),(x1,y0),(x1,y1),(x0,y1)]`.
    pub fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self::new(vec![
            Vertex::new(x0, y0),
            Vertex::new(x1, y0),
            Vertex::new(x1, y1),
            Vertex::new(x0, y1),
        ])
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn area(&self) -> f64 {
        area(self)
    }

    pub fn distance(&self, other: &Region) -> f64 {
        distance(self, other)
    }

    pub fn intersects(&self, other: &Region) -> bool {
        intersects(self, other)
    }

    pub fn contains(&self, vertex: Vertex) -> bool {
        contains(self, vertex)
    }

    fn edges(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
        let n = self.vertices.len();
        let count = match n {
            0 => 0,
            1 => 1,
            2 => 1,
            _ => n,
        };
        (0..count).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    fn has_interior(&self) -> bool {
        self.vertices.len() >= 3 && twice_signed_area(&self.vertices) != 0
    }
}

impl From<Vec<Vertex>> for Region {
    fn from(vertices: Vec<Vertex>) -> Self {
        Self::new(vertices)
    }
}

/// Polygon area by the shoelace formula. Regions with fewer than three vertices have area 0.
pub fn area(region: &Region) -> f64 {
    if region.vertices.len() < 3 {
        return 0.0;
    }
    (twice_signed_area(&region.vertices).abs() as f64) / 2.0
}

/// Minimum distance between two regions, 0 when they touch or overlap.
///
/// Distance to an empty region is `f64::INFINITY`.
pub fn distance(a: &Region, b: &Region) -> f64 {
    if a.is_empty() || b.is_empty() {
        return f64::INFINITY;
    }
    if intersects(a, b) {
        return 0.0;
    }

    let mut best = f64::INFINITY;
    for (p1, p2) in a.edges() {
        for (q1, q2) in b.edges() {
            best = best.min(segment_distance(p1, p2, q1, q2));
        }
    }
    best
}

/// Whether two regions share at least one point (boundaries or interiors).
pub fn intersects(a: &Region, b: &Region) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }

    for (p1, p2) in a.edges() {
        for (q1, q2) in b.edges() {
            if segments_intersect(p1, p2, q1, q2) {
                return true;
            }
        }
    }

    // No boundary crossing: one shape may still lie entirely inside the other.
    (a.has_interior() && point_in_polygon(&a.vertices, b.vertices[0]))
        || (b.has_interior() && point_in_polygon(&b.vertices, a.vertices[0]))
}

/// Whether the vertex lies strictly inside the region. Boundary points are not contained.
pub fn contains(region: &Region, vertex: Vertex) -> bool {
    if !region.has_interior() {
        return false;
    }
    if region
        .edges()
        .any(|(p1, p2)| orientation(p1, p2, vertex) == 0 && on_segment(p1, p2, vertex))
    {
        return false;
    }
    point_in_polygon(&region.vertices, vertex)
}

/// Minimal axis-aligned rectangle over every vertex of the given regions, in the
/// corner order `(minX,minY),(minX,maxY),(maxX,maxY),(maxX,minY)`.
///
/// Returns an empty region when no vertices are present.
pub fn bounding_region<'a>(regions: impl IntoIterator<Item = &'a Region>) -> Region {
    let mut vertices = regions.into_iter().flat_map(|r| r.vertices.iter());
    let Some(first) = vertices.next() else {
        return Region::default();
    };

    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for v in vertices {
        min_x = min_x.min(v.x);
        min_y = min_y.min(v.y);
        max_x = max_x.max(v.x);
        max_y = max_y.max(v.y);
    }

    Region::new(vec![
        Vertex::new(min_x, min_y),
        Vertex::new(min_x, max_y),
        Vertex::new(max_x, max_y),
        Vertex::new(max_x, min_y),
    ])
}

fn twice_signed_area(vertices: &[Vertex]) -> i128 {
    let n = vertices.len();
    (0..n)
        .map(|i| {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            a.x as i128 * b.y as i128 - b.x as i128 * a.y as i128
        })
        .sum()
}

// i128 keeps the cross product exact for any pair of i32 coordinates.
fn orientation(a: Vertex, b: Vertex, c: Vertex) -> i128 {
    let val = (b.y as i128 - a.y as i128) * (c.x as i128 - b.x as i128)
        - (b.x as i128 - a.x as i128) * (c.y as i128 - b.y as i128);
    val.signum()
}

// Assumes `c` is collinear with `a`-`b`.
fn on_segment(a: Vertex, b: Vertex, c: Vertex) -> bool {
    c.x >= a.x.min(b.x) && c.x <= a.x.max(b.x) && c.y >= a.y.min(b.y) && c.y <= a.y.max(b.y)
}

fn segments_intersect(p1: Vertex, p2: Vertex, q1: Vertex, q2: Vertex) -> bool {
    let o1 = orientation(p1, p2, q1);
    let o2 = orientation(p1, p2, q2);
    let o3 = orientation(q1, q2, p1);
    let o4 = orientation(q1, q2, p2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == 0 && on_segment(p1, p2, q1))
        || (o2 == 0 && on_segment(p1, p2, q2))
        || (o3 == 0 && on_segment(q1, q2, p1))
        || (o4 == 0 && on_segment(q1, q2, p2))
}

fn point_in_polygon(vertices: &[Vertex], point: Vertex) -> bool {
    let (px, py) = (point.x as f64, point.y as f64);
    let n = vertices.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (vertices[i].x as f64, vertices[i].y as f64);
        let (xj, yj) = (vertices[j].x as f64, vertices[j].y as f64);
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn point_segment_distance(p: Vertex, a: Vertex, b: Vertex) -> f64 {
    let (px, py) = (p.x as f64, p.y as f64);
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
    }
    let t = (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0);
    let (cx, cy) = (ax + t * dx, ay + t * dy);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

fn segment_distance(p1: Vertex, p2: Vertex, q1: Vertex, q2: Vertex) -> f64 {
    if segments_intersect(p1, p2, q1, q2) {
        return 0.0;
    }
    point_segment_distance(p1, q1, q2)
        .min(point_segment_distance(p2, q1, q2))
        .min(point_segment_distance(q1, p1, p2))
        .min(point_segment_distance(q2, p1, p2))
}
