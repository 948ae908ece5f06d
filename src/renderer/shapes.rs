//! Shape generation for 2D primitives
//!
//! Everything is built in field coordinates (origin top-left, y down). The
//! pipeline maps them to clip space.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::vertex::{Vertex, colors};
use crate::config::FieldGeometry;
use crate::sim::collision::Rect;
use crate::sim::{Actor, Obstacle, Session};

/// Axis-aligned quad as two triangles
pub fn rect(r: &Rect, color: [f32; 4]) -> [Vertex; 6] {
    let (x0, y0, x1, y1) = (r.x, r.y, r.right(), r.bottom());
    [
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
        Vertex::new(x0, y1, color),
    ]
}

fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> [Vertex; 3] {
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Background stars, generated once per renderer
#[derive(Debug, Clone)]
pub struct Starfield {
    stars: Vec<Vertex>,
}

impl Starfield {
    pub const STAR_COUNT: usize = 40;
    const STAR_SIZE: f32 = 1.5;

    /// Scatter stars over the sky above the ground line
    pub fn new(field: &FieldGeometry, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut stars = Vec::with_capacity(Self::STAR_COUNT * 6);
        let sky = (field.ground_y - Self::STAR_SIZE).max(0.0);
        for _ in 0..Self::STAR_COUNT {
            let x = rng.random_range(0.0..field.width);
            let y = rng.random::<f32>() * sky;
            let mut color = colors::STAR;
            color[3] = rng.random_range(0.3..0.9);
            let star = Rect::new(x, y, Self::STAR_SIZE, Self::STAR_SIZE);
            stars.extend_from_slice(&rect(&star, color));
        }
        Self { stars }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.stars
    }
}

/// Body with a spiky back. The spikes bob with the walk cycle.
pub fn hedgehog(actor: &Actor) -> Vec<Vertex> {
    let b = actor.bounds();
    let mut vertices = Vec::with_capacity(6 * 2 + 3 * 4);
    let body = Rect::new(b.x, b.y + b.height * 0.35, b.width, b.height * 0.65);
    vertices.extend_from_slice(&rect(&body, colors::HEDGEHOG));

    let bob = if actor.is_grounded() {
        (actor.anim_frame.floor() % 2.0) * 1.5
    } else {
        0.0
    };
    let spikes = 4;
    let spike_w = b.width * 0.8 / spikes as f32;
    for i in 0..spikes {
        let x0 = b.x + spike_w * i as f32;
        let base = body.y + 1.0;
        vertices.extend_from_slice(&triangle(
            Vec2::new(x0, base),
            Vec2::new(x0 + spike_w, base),
            Vec2::new(x0 + spike_w * 0.5, b.y + bob),
            colors::HEDGEHOG_SPIKES,
        ));
    }

    let face = Rect::new(b.right() - b.width * 0.3, body.y + 3.0, b.width * 0.3, body.height * 0.5);
    vertices.extend_from_slice(&rect(&face, colors::HEDGEHOG_FACE));
    vertices
}

/// Stem plus a cap coloured by kind
pub fn mushroom(obstacle: &Obstacle) -> Vec<Vertex> {
    let b = obstacle.bounds();
    let mut vertices = Vec::with_capacity(12);
    let stem = Rect::new(
        b.x + b.width * 0.3,
        b.y + b.height * 0.45,
        b.width * 0.4,
        b.height * 0.55,
    );
    let cap = Rect::new(b.x, b.y, b.width, b.height * 0.5);
    vertices.extend_from_slice(&rect(&stem, colors::STEM));
    vertices.extend_from_slice(&rect(&cap, colors::mushroom_cap(obstacle.kind)));
    vertices
}

/// Full frame: sky, stars, ground, mushrooms, hedgehog (back to front)
pub fn scene(session: &Session, starfield: &Starfield) -> Vec<Vertex> {
    let field = session.config().field;
    let mut vertices = Vec::with_capacity(256);

    vertices.extend_from_slice(&rect(&Rect::new(0.0, 0.0, field.width, field.height), colors::SKY));
    vertices.extend_from_slice(starfield.vertices());

    let ground = Rect::new(0.0, field.ground_y, field.width, field.height - field.ground_y);
    vertices.extend_from_slice(&rect(&ground, colors::GROUND));
    let grass = Rect::new(0.0, field.ground_y, field.width, 2.0);
    vertices.extend_from_slice(&rect(&grass, colors::GRASS));

    for obstacle in session.obstacles() {
        vertices.extend(mushroom(obstacle));
    }
    vertices.extend(hedgehog(session.actor()));
    vertices
}
