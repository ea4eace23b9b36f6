use rand::Rng;

/// Default number of particles in the scene
pub const DEFAULT_PARTICLE_COUNT: usize = 200;

/// Per-frame orbital angle increment; faster while the clock runs to
/// convey activity
pub fn orbit_step(is_running: bool) -> f64 {
    if is_running {
        0.02
    } else {
        0.005
    }
}

/// Particle hue in [0, 1): score-derived base plus a spatial + temporal
/// sine perturbation
pub fn particle_hue(now_ms: u64, index: usize, score: u8) -> f64 {
    let t = now_ms as f64 * 0.001;
    let hue = score as f64 / 100.0 + (t + index as f64 * 0.1).sin() * 0.1;
    hue.rem_euclid(1.0)
}

/// Focus-mesh scale: a score-dependent base size modulated by a sine
/// pulse whose speed depends on run state
pub fn pulse_scale(now_ms: u64, is_running: bool, score: u8) -> f64 {
    let speed = if is_running { 0.002 } else { 0.001 };
    let pulse = 1.0 + (now_ms as f64 * speed).sin() * 0.1;
    let base = 1.0 + (score as f64 / 100.0) * 0.5;
    base * pulse
}

/// Camera orbit angle around the origin
pub fn camera_angle(now_ms: u64, is_running: bool) -> f64 {
    let speed = if is_running { 0.0002 } else { 0.0001 };
    now_ms as f64 * speed
}

/// Camera distance from the origin grows with the score
pub fn camera_radius(score: u8) -> f64 {
    5.0 + score as f64 * 0.05
}

/// Convert HSL (h in [0,1), s and l in [0,1]) to RGB components in [0,1]
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hue = |mut t: f64| {
        t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    (hue(h + 1.0 / 3.0), hue(h), hue(h - 1.0 / 3.0))
}

/// A single particle orbiting the origin in the horizontal plane
#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// RGB components in [0, 1], refreshed every frame
    pub color: (f64, f64, f64),
}

/// Decorative particle scene: a cloud of orbiting particles around a
/// pulsing focus mesh, viewed by a camera circling the origin.
///
/// Everything here is a pure function of (frame time, run state, score)
/// except the continuously accumulating rotation angles.
#[derive(Debug)]
pub struct ParticleScene {
    pub particles: Vec<Particle>,
    pub mesh_rot_x: f64,
    pub mesh_rot_y: f64,
    pub mesh_scale: f64,
    pub mesh_color: (f64, f64, f64),
    pub camera_angle: f64,
    pub camera_radius: f64,
}

impl ParticleScene {
    /// Construct scene resources: particles at random positions in a
    /// 10-unit cube with random initial colors
    pub fn new(particle_count: usize) -> Self {
        let mut rng = rand::thread_rng();
        let particles = (0..particle_count)
            .map(|_| Particle {
                x: rng.gen_range(-5.0..5.0),
                y: rng.gen_range(-5.0..5.0),
                z: rng.gen_range(-5.0..5.0),
                color: (rng.gen::<f64>(), rng.gen::<f64>(), rng.gen::<f64>()),
            })
            .collect();
        Self {
            particles,
            mesh_rot_x: 0.0,
            mesh_rot_y: 0.0,
            mesh_scale: 1.0,
            mesh_color: (0.0, 1.0, 0.0),
            camera_angle: 0.0,
            camera_radius: 5.0,
        }
    }

    /// Advance one animation frame
    pub fn advance(&mut self, now_ms: u64, is_running: bool, score: u8) {
        self.mesh_rot_x += 0.005;
        self.mesh_rot_y += 0.01;

        let step = orbit_step(is_running);
        for (i, p) in self.particles.iter_mut().enumerate() {
            // Orbital motion in the xz plane, radius preserved
            let angle = p.z.atan2(p.x) + step;
            let radius = (p.x * p.x + p.z * p.z).sqrt();
            p.x = angle.cos() * radius;
            p.z = angle.sin() * radius;

            p.color = hsl_to_rgb(particle_hue(now_ms, i, score), 0.8, 0.5);
        }

        self.mesh_scale = pulse_scale(now_ms, is_running, score);
        self.mesh_color = hsl_to_rgb(score as f64 / 100.0, 1.0, 0.5);
        self.camera_angle = camera_angle(now_ms, is_running);
        self.camera_radius = camera_radius(score);
    }
}
