//! Monte-Carlo scatter statistics for one material at a time.
//!
//! Rays are fired at a flat surface through the origin with normal +Y.
//! Work is split across rayon workers, each with its own generator.

use lumen_scatter::{
    worker_rng, Color, HitRecord, Material, Ray, Scatter, ScatterKind, ScatterResult, Vec3,
};
use rayon::prelude::*;

/// Probe configuration.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Total scatter samples per material and side
    pub samples: u32,
    /// Base seed; worker `i` uses `worker_rng(seed, i)`
    pub seed: u64,
    /// Number of independent workers
    pub workers: usize,
    /// Angle between the incoming ray and the surface normal
    pub incidence_degrees: f32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            samples: 100_000,
            seed: 0,
            workers: rayon::current_num_threads(),
            incidence_degrees: 45.0,
        }
    }
}

/// Which side of the surface the incoming ray starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Travelling against the normal (entering)
    Outside,
    /// Travelling along the normal (exiting)
    Inside,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Outside => "outside",
            Side::Inside => "inside",
        }
    }
}

/// Accumulated outcomes of a probe run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProbeStats {
    pub samples: u64,
    pub absorbed: u64,
    pub diffuse: u64,
    pub reflected: u64,
    pub refracted: u64,
    /// Scattered rays with a NaN or infinite direction
    pub non_finite: u64,
    pub attenuation_sum: Color,
}

impl ProbeStats {
    fn record(&mut self, result: Option<ScatterResult>) {
        self.samples += 1;
        let Some(result) = result else {
            self.absorbed += 1;
            return;
        };

        match result.kind {
            ScatterKind::Diffuse => self.diffuse += 1,
            ScatterKind::Reflected => self.reflected += 1,
            ScatterKind::Refracted => self.refracted += 1,
        }
        if !result.scattered.direction().is_finite() {
            self.non_finite += 1;
        }
        self.attenuation_sum += result.attenuation;
    }

    fn merge(self, other: ProbeStats) -> ProbeStats {
        ProbeStats {
            samples: self.samples + other.samples,
            absorbed: self.absorbed + other.absorbed,
            diffuse: self.diffuse + other.diffuse,
            reflected: self.reflected + other.reflected,
            refracted: self.refracted + other.refracted,
            non_finite: self.non_finite + other.non_finite,
            attenuation_sum: self.attenuation_sum + other.attenuation_sum,
        }
    }

    /// Number of samples that were not absorbed.
    pub fn scattered(&self) -> u64 {
        self.samples - self.absorbed
    }

    pub fn scatter_fraction(&self) -> f64 {
        self.ratio(self.scattered())
    }

    pub fn fraction(&self, kind: ScatterKind) -> f64 {
        let count = match kind {
            ScatterKind::Diffuse => self.diffuse,
            ScatterKind::Reflected => self.reflected,
            ScatterKind::Refracted => self.refracted,
        };
        self.ratio(count)
    }

    /// Mean attenuation over scattered samples, or zero if all were absorbed.
    pub fn mean_attenuation(&self) -> Color {
        match self.scattered() {
            0 => Color::ZERO,
            n => self.attenuation_sum / n as f32,
        }
    }

    fn ratio(&self, count: u64) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            count as f64 / self.samples as f64
        }
    }
}

/// The probe ray for a given incidence angle, aimed at the origin.
pub fn incident_ray(incidence_degrees: f32, side: Side) -> Ray {
    let theta = incidence_degrees.to_radians();
    let direction = match side {
        Side::Outside => Vec3::new(theta.sin(), -theta.cos(), 0.0),
        Side::Inside => Vec3::new(theta.sin(), theta.cos(), 0.0),
    };
    Ray::new(-direction, direction)
}

/// Scatter `config.samples` rays off `material` and tally the outcomes.
pub fn probe_material(material: &Material, side: Side, config: &ProbeConfig) -> ProbeStats {
    let rec = HitRecord::new(1.0, Vec3::ZERO, Vec3::Y, material);
    let ray = incident_ray(config.incidence_degrees, side);

    let workers = config.workers.max(1);
    let samples = config.samples as usize;
    let base = samples / workers;
    let remainder = samples % workers;

    log::debug!(
        "Probing {} ({}) with {} workers, {} samples each",
        material.kind_name(),
        side.label(),
        workers,
        base
    );

    (0..workers)
        .into_par_iter()
        .map(|worker| {
            let mut rng = worker_rng(config.seed, worker);
            let count = base + usize::from(worker < remainder);

            let mut stats = ProbeStats::default();
            for _ in 0..count {
                stats.record(material.scatter(&ray, &rec, &mut rng));
            }
            stats
        })
        .reduce(ProbeStats::default, ProbeStats::merge)
}
