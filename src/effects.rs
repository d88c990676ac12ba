//! Decorative particles: the per-tier result effects and the cursor
//! trail. All kinematics run in viewport pixels (y down) with one
//! implicit time step per frame; positions are converted to world
//! space only when drawn.

use bevy::prelude::*;

use crate::layout::{to_world, Viewport};
use crate::quiz::ResultTier;
use rand::Rng;

/// Shared palette for confetti and fireworks.
pub const EFFECT_COLORS: [Color; 15] = [
    Color::srgb(0.957, 0.263, 0.212),
    Color::srgb(0.914, 0.118, 0.388),
    Color::srgb(0.612, 0.153, 0.690),
    Color::srgb(0.404, 0.227, 0.718),
    Color::srgb(0.247, 0.318, 0.710),
    Color::srgb(0.129, 0.588, 0.953),
    Color::srgb(0.012, 0.663, 0.957),
    Color::srgb(0.0, 0.737, 0.831),
    Color::srgb(0.0, 0.588, 0.533),
    Color::srgb(0.298, 0.686, 0.314),
    Color::srgb(0.545, 0.765, 0.290),
    Color::srgb(0.804, 0.863, 0.224),
    Color::srgb(1.0, 0.922, 0.231),
    Color::srgb(1.0, 0.757, 0.027),
    Color::srgb(1.0, 0.596, 0.0),
];

const RAIN_BLUE: Color = Color::srgba(0.541, 0.706, 0.973, 0.588);

/// Applied to every firework particle, rockets and sparks alike.
const GRAVITY: Vec2 = Vec2::new(0.0, 0.2);

/// Sparks spawned when a rocket reaches its apex.
pub const SPARKS_PER_BURST: usize = 100;

/// One cursor-trail particle every this many frames.
pub const TRAIL_CADENCE: u64 = 3;

fn pick_color(rng: &mut impl Rng) -> Color {
    EFFECT_COLORS[rng.random_range(0..EFFECT_COLORS.len())]
}

fn random_direction(rng: &mut impl Rng) -> Vec2 {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    Vec2::new(angle.cos(), angle.sin())
}

fn alpha(life: f32) -> f32 {
    (life / 255.0).clamp(0.0, 1.0)
}

pub struct Confetti {
    pos: Vec2,
    vel: Vec2,
    size: Vec2,
    color: Color,
    angle: f32,
    spin: f32,
    life: f32,
}

impl Confetti {
    pub fn new(x: f32, y: f32, scale: f32, rng: &mut impl Rng) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::new(
                rng.random_range(-1.0..1.0) * scale,
                rng.random_range(1.0..3.0) * scale,
            ),
            size: Vec2::new(rng.random_range(5.0..10.0), rng.random_range(10.0..20.0)) * scale,
            color: pick_color(rng),
            angle: rng.random_range(0.0..std::f32::consts::TAU),
            spin: rng.random_range(-0.1..0.1),
            life: 255.0,
        }
    }

    fn update(&mut self) {
        self.pos += self.vel;
        self.angle += self.spin;
        self.life -= 2.0;
    }

    fn finished(&self, view: Viewport) -> bool {
        self.life < 0.0 || self.pos.y > view.height + 20.0
    }

    fn draw(&self, gizmos: &mut Gizmos, view: Viewport) {
        let iso = Isometry2d::new(to_world(self.pos, view), Rot2::radians(self.angle));
        gizmos.rect_2d(iso, self.size, self.color);
    }
}

pub struct Bubble {
    pos: Vec2,
    vel: Vec2,
    diameter: f32,
    life: f32,
}

impl Bubble {
    pub fn new(x: f32, y: f32, scale: f32, frame: u64, rng: &mut impl Rng) -> Self {
        Self {
            pos: Vec2::new(x, y),
            // Horizontal drift is fixed at spawn from the frame count,
            // so neighbouring bubbles wobble out of phase.
            vel: Vec2::new(
                (frame as f32 * 0.1 + x).sin() * 0.5,
                -rng.random_range(1.0..3.0) * scale,
            ),
            diameter: rng.random_range(10.0..40.0) * scale,
            life: 255.0,
        }
    }

    fn update(&mut self) {
        self.pos += self.vel;
        self.life -= 1.5;
    }

    fn finished(&self) -> bool {
        self.life < 0.0 || self.pos.y < -40.0
    }

    fn draw(&self, gizmos: &mut Gizmos, view: Viewport) {
        let color = Color::WHITE.with_alpha(alpha(self.life));
        gizmos.circle_2d(to_world(self.pos, view), self.diameter / 2.0, color);
    }
}

pub struct Raindrop {
    pos: Vec2,
    vel: Vec2,
    length: f32,
}

impl Raindrop {
    pub fn new(x: f32, y: f32, scale: f32, rng: &mut impl Rng) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::new(0.0, rng.random_range(8.0..15.0) * scale),
            length: rng.random_range(10.0..20.0) * scale,
        }
    }

    fn update(&mut self) {
        self.pos += self.vel;
    }

    fn finished(&self, view: Viewport) -> bool {
        self.pos.y > view.height
    }

    fn draw(&self, gizmos: &mut Gizmos, view: Viewport) {
        let tail = self.pos + Vec2::new(0.0, self.length);
        gizmos.line_2d(to_world(self.pos, view), to_world(tail, view), RAIN_BLUE);
    }
}

/// A single firework particle: either the climbing rocket or one of the
/// sparks it bursts into. Both fall under the same gravity; only sparks
/// burn out on their own.
pub struct Spark {
    pos: Vec2,
    vel: Vec2,
    color: Color,
    size: f32,
    life: f32,
    rocket: bool,
}

impl Spark {
    fn rocket(x: f32, y: f32, color: Color, scale: f32, rng: &mut impl Rng) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::new(0.0, -rng.random_range(12.0..16.0) * scale),
            color,
            size: rng.random_range(2.0..4.0) * scale,
            life: 255.0,
            rocket: true,
        }
    }

    fn burst(at: Vec2, color: Color, scale: f32, rng: &mut impl Rng) -> Self {
        Self {
            pos: at,
            vel: random_direction(rng) * (rng.random_range(1.0..6.0) * scale),
            color,
            size: rng.random_range(2.0..4.0) * scale,
            life: 255.0,
            rocket: false,
        }
    }

    fn update(&mut self) {
        self.vel += GRAVITY;
        self.pos += self.vel;
        if !self.rocket {
            self.life -= 4.0;
        }
    }

    fn finished(&self) -> bool {
        self.life < 0.0
    }

    fn draw(&self, gizmos: &mut Gizmos, view: Viewport) {
        let color = self.color.with_alpha(alpha(self.life));
        gizmos.circle_2d(to_world(self.pos, view), self.size / 2.0, color);
    }
}

/// Composite firework: the rocket until its apex, then the sparks it
/// owns. Finished only once it has exploded and every spark is reaped.
pub struct Firework {
    rocket: Spark,
    color: Color,
    scale: f32,
    exploded: bool,
    sparks: Vec<Spark>,
}

impl Firework {
    pub fn new(view: Viewport, scale: f32, rng: &mut impl Rng) -> Self {
        let color = pick_color(rng);
        Self {
            rocket: Spark::rocket(
                rng.random_range(0.0..view.width),
                view.height,
                color,
                scale,
                rng,
            ),
            color,
            scale,
            exploded: false,
            sparks: Vec::new(),
        }
    }

    fn update(&mut self, rng: &mut impl Rng) {
        if !self.exploded {
            self.rocket.update();
            // Apex: the rocket has stopped rising and begun to fall.
            if self.rocket.vel.y >= 0.0 {
                self.exploded = true;
                self.explode(rng);
            }
        }
        for spark in &mut self.sparks {
            spark.update();
        }
        self.sparks.retain(|spark| !spark.finished());
    }

    fn explode(&mut self, rng: &mut impl Rng) {
        let at = self.rocket.pos;
        for _ in 0..SPARKS_PER_BURST {
            self.sparks.push(Spark::burst(at, self.color, self.scale, rng));
        }
    }

    fn finished(&self) -> bool {
        self.exploded && self.sparks.is_empty()
    }

    fn draw(&self, gizmos: &mut Gizmos, view: Viewport) {
        if !self.exploded {
            self.rocket.draw(gizmos, view);
        }
        for spark in &self.sparks {
            spark.draw(gizmos, view);
        }
    }

    #[cfg(test)]
    pub fn exploded(&self) -> bool {
        self.exploded
    }

    #[cfg(test)]
    pub fn spark_count(&self) -> usize {
        self.sparks.len()
    }
}

/// Closed set of result-screen particles behind one update/draw/finished
/// contract.
pub enum EffectParticle {
    Confetti(Confetti),
    Bubble(Bubble),
    Rain(Raindrop),
    Firework(Firework),
}

impl EffectParticle {
    pub fn update(&mut self, rng: &mut impl Rng) {
        match self {
            Self::Confetti(p) => p.update(),
            Self::Bubble(p) => p.update(),
            Self::Rain(p) => p.update(),
            Self::Firework(p) => p.update(rng),
        }
    }

    pub fn finished(&self, view: Viewport) -> bool {
        match self {
            Self::Confetti(p) => p.finished(view),
            Self::Bubble(p) => p.finished(),
            Self::Rain(p) => p.finished(view),
            Self::Firework(p) => p.finished(),
        }
    }

    pub fn draw(&self, gizmos: &mut Gizmos, view: Viewport) {
        match self {
            Self::Confetti(p) => p.draw(gizmos, view),
            Self::Bubble(p) => p.draw(gizmos, view),
            Self::Rain(p) => p.draw(gizmos, view),
            Self::Firework(p) => p.draw(gizmos, view),
        }
    }
}

/// Owns the result-screen particles: spawns on the active tier's
/// cadence, steps every particle once per frame, and reaps finished
/// ones after drawing.
#[derive(Resource, Default)]
pub struct Effects {
    particles: Vec<EffectParticle>,
    result_frames: u64,
}

impl Effects {
    /// Reset at the QUIZ -> RESULT transition: drops leftovers and
    /// restarts the result animation clock.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.result_frames = 0;
    }

    pub fn result_frames(&self) -> u64 {
        self.result_frames
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// One result-screen frame: maybe spawn, then step everything.
    pub fn advance(
        &mut self,
        tier: ResultTier,
        frame: u64,
        view: Viewport,
        scale: f32,
        rng: &mut impl Rng,
    ) {
        self.result_frames += 1;
        if frame % tier.spawn_cadence() == 0 {
            self.particles.push(Self::spawn(tier, frame, view, scale, rng));
        }
        for particle in &mut self.particles {
            particle.update(rng);
        }
    }

    /// Per-tier factory: where each variant enters relative to its
    /// travel direction.
    fn spawn(
        tier: ResultTier,
        frame: u64,
        view: Viewport,
        scale: f32,
        rng: &mut impl Rng,
    ) -> EffectParticle {
        let x = rng.random_range(0.0..view.width);
        match tier {
            ResultTier::Perfect => EffectParticle::Firework(Firework::new(view, scale, rng)),
            ResultTier::Good => EffectParticle::Confetti(Confetti::new(x, -20.0, scale, rng)),
            ResultTier::Okay => {
                EffectParticle::Bubble(Bubble::new(x, view.height + 20.0, scale, frame, rng))
            }
            ResultTier::Low => EffectParticle::Rain(Raindrop::new(x, -20.0, scale, rng)),
        }
    }

    pub fn draw(&self, gizmos: &mut Gizmos, view: Viewport) {
        for particle in &self.particles {
            particle.draw(gizmos, view);
        }
    }

    pub fn reap(&mut self, view: Viewport) {
        self.particles.retain(|particle| !particle.finished(view));
    }
}

/// Small fading dot shed by the cursor.
pub struct TrailParticle {
    pos: Vec2,
    vel: Vec2,
    color: Color,
    size: f32,
    life: f32,
}

impl TrailParticle {
    pub fn new(at: Vec2, scale: f32, rng: &mut impl Rng) -> Self {
        Self {
            pos: at,
            vel: random_direction(rng) * (rng.random_range(0.5..2.0) * scale * 0.5),
            color: Color::srgb(
                rng.random_range(0.59..1.0),
                rng.random_range(0.39..0.78),
                1.0,
            ),
            size: rng.random_range(3.0..6.0) * scale,
            life: 255.0,
        }
    }

    fn update(&mut self) {
        self.pos += self.vel;
        self.life -= 5.0;
        self.size *= 0.98;
    }

    fn finished(&self) -> bool {
        self.life < 0.0
    }

    fn draw(&self, gizmos: &mut Gizmos, view: Viewport) {
        let color = self.color.with_alpha(alpha(self.life));
        gizmos.circle_2d(to_world(self.pos, view), self.size / 2.0, color);
    }
}

/// Cursor trail: runs every frame in every state, independent of the
/// result effects.
#[derive(Resource, Default)]
pub struct CursorTrail {
    particles: Vec<TrailParticle>,
}

impl CursorTrail {
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn advance(&mut self, frame: u64, pointer: Option<Vec2>, scale: f32, rng: &mut impl Rng) {
        if frame % TRAIL_CADENCE == 0 {
            if let Some(at) = pointer {
                self.particles.push(TrailParticle::new(at, scale, rng));
            }
        }
        for particle in &mut self.particles {
            particle.update();
        }
    }

    pub fn draw(&self, gizmos: &mut Gizmos, view: Viewport) {
        for particle in &self.particles {
            particle.draw(gizmos, view);
        }
    }

    pub fn reap(&mut self) {
        self.particles.retain(|particle| !particle.finished());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const VIEW: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    /// Steps a particle until it reports finished, failing if it never
    /// does within `bound` frames.
    fn frames_to_finish(particle: &mut EffectParticle, bound: usize) -> usize {
        let mut rng = rng();
        for frame in 0..bound {
            if particle.finished(VIEW) {
                return frame;
            }
            particle.update(&mut rng);
        }
        panic!("particle still alive after {bound} frames");
    }

    #[test]
    fn confetti_is_reaped_within_its_lifespan() {
        let mut rng = rng();
        for _ in 0..20 {
            let mut p = EffectParticle::Confetti(Confetti::new(400.0, -20.0, 1.0, &mut rng));
            // 255 / 2 per frame, unless it exits the bottom first.
            assert!(frames_to_finish(&mut p, 130) <= 129);
        }
    }

    #[test]
    fn bubbles_expire_or_leave_the_top() {
        let mut rng = rng();
        for _ in 0..20 {
            let mut p = EffectParticle::Bubble(Bubble::new(100.0, 620.0, 1.0, 7, &mut rng));
            assert!(frames_to_finish(&mut p, 172) <= 171);
        }
    }

    #[test]
    fn rain_leaves_through_the_bottom() {
        let mut rng = rng();
        for _ in 0..20 {
            let mut p = EffectParticle::Rain(Raindrop::new(100.0, -20.0, 1.0, &mut rng));
            // Slowest drop covers 620px at 8px/frame.
            assert!(frames_to_finish(&mut p, 80) <= 79);
        }
    }

    #[test]
    fn trail_particles_fade_out() {
        let mut rng = rng();
        let mut p = TrailParticle::new(Vec2::new(10.0, 10.0), 1.0, &mut rng);
        for _ in 0..52 {
            assert!(!p.finished());
            p.update();
        }
        assert!(p.finished());
    }

    #[test]
    fn rocket_explodes_at_apex_into_exactly_100_sparks() {
        let mut rng = rng();
        let mut firework = Firework::new(VIEW, 1.0, &mut rng);
        assert!(!firework.exploded());
        assert!(!firework.finished());

        // Launch speed is at most 16px/frame against 0.2 gravity, so the
        // apex arrives within 80 frames.
        let mut frames = 0;
        while !firework.exploded() {
            firework.update(&mut rng);
            frames += 1;
            assert!(frames <= 80, "rocket never reached its apex");
        }
        assert_eq!(firework.spark_count(), SPARKS_PER_BURST);
        assert!(!firework.finished());

        // Sparks burn 4 life per frame: all gone within 64 more frames.
        for _ in 0..64 {
            firework.update(&mut rng);
        }
        assert_eq!(firework.spark_count(), 0);
        assert!(firework.finished());
    }

    #[test]
    fn director_spawns_on_the_tier_cadence() {
        let mut rng = rng();
        let mut effects = Effects::default();

        // Perfect: one firework per 60 frames.
        for frame in 0..60u64 {
            effects.advance(ResultTier::Perfect, frame, VIEW, 1.0, &mut rng);
        }
        assert_eq!(effects.len(), 1);
        effects.advance(ResultTier::Perfect, 60, VIEW, 1.0, &mut rng);
        assert_eq!(effects.len(), 2);

        // Good: confetti every other frame.
        let mut effects = Effects::default();
        for frame in 0..10u64 {
            effects.advance(ResultTier::Good, frame, VIEW, 1.0, &mut rng);
        }
        assert_eq!(effects.len(), 5);
    }

    #[test]
    fn clear_resets_particles_and_the_result_clock() {
        let mut rng = rng();
        let mut effects = Effects::default();
        for frame in 0..30u64 {
            effects.advance(ResultTier::Low, frame, VIEW, 1.0, &mut rng);
        }
        assert!(!effects.is_empty());
        assert_eq!(effects.result_frames(), 30);

        effects.clear();
        assert!(effects.is_empty());
        assert_eq!(effects.result_frames(), 0);
    }

    #[test]
    fn the_active_population_stays_bounded_under_reaping() {
        let mut rng = rng();
        let mut effects = Effects::default();
        let short = Viewport {
            width: 800.0,
            height: 100.0,
        };
        for frame in 0..600u64 {
            effects.advance(ResultTier::Low, frame, short, 1.0, &mut rng);
            effects.reap(short);
        }
        // Slowest drop lives ~15 frames on a 100px viewport; at one
        // spawn per 2 frames the steady state is well under 20.
        assert!(effects.len() < 20, "population grew to {}", effects.len());
    }

    #[test]
    fn cursor_trail_spawns_every_third_frame_and_reaps() {
        let mut rng = rng();
        let mut trail = CursorTrail::default();
        let at = Some(Vec2::new(100.0, 100.0));

        for frame in 0..9u64 {
            trail.advance(frame, at, 1.0, &mut rng);
            trail.reap();
        }
        assert_eq!(trail.len(), 3);

        // Without a pointer nothing new spawns and the rest fades out.
        for frame in 9..80u64 {
            trail.advance(frame, None, 1.0, &mut rng);
            trail.reap();
        }
        assert!(trail.is_empty());
    }
}
