//! Deterministic clustering of color samples.

use super::space::{Color, ColorSpace};

/// Replaceable clustering primitive.
pub trait Clustering: Send + Sync {
    /// Partitions `samples` into at most `k` clusters.
    ///
    /// Must be deterministic: the same input always yields the same output.
    fn cluster(&self, samples: &[Color], k: usize) -> Clusters;
}

/// Output of a clustering run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clusters {
    centroids: Vec<Color>,
    assignments: Vec<usize>,
    sizes: Vec<usize>,
}

impl Clusters {
    /// Builds clusters from centroids and per-sample assignments.
    #[must_use]
    pub fn new(centroids: Vec<Color>, assignments: Vec<usize>) -> Self {
        let mut sizes = vec![0; centroids.len()];
        for &a in &assignments {
            if let Some(size) = sizes.get_mut(a) {
                *size += 1;
            }
        }
        Self {
            centroids,
            assignments,
            sizes,
        }
    }

    /// Cluster centers.
    #[must_use]
    pub fn centroids(&self) -> &[Color] {
        &self.centroids
    }

    /// Cluster index of each sample.
    #[must_use]
    pub fn assignments(&self) -> &[usize] {
        &self.assignments
    }

    /// Number of samples per cluster.
    #[must_use]
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Index of the largest cluster; ties go to the lowest index.
    #[must_use]
    pub fn dominant(&self) -> Option<usize> {
        self.sizes
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, usize)>, (i, &size)| match best {
                Some((_, best_size)) if best_size >= size => best,
                _ => Some((i, size)),
            })
            .map(|(i, _)| i)
    }

    /// Centroid of the largest cluster.
    #[must_use]
    pub fn dominant_centroid(&self) -> Option<Color> {
        self.dominant().map(|i| self.centroids[i])
    }
}

/// Lloyd's k-means with maximin (farthest-point) initialization.
#[derive(Debug, Clone, Copy)]
pub struct KMeans {
    space: ColorSpace,
    max_iterations: usize,
}

impl KMeans {
    /// Iteration cap used by [`KMeans::new`].
    pub const DEFAULT_MAX_ITERATIONS: usize = 20;

    /// Creates a k-means clusterer measuring distance in `space`.
    #[must_use]
    pub const fn new(space: ColorSpace) -> Self {
        Self {
            space,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Overrides the iteration cap.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Seeds centroids: the sample closest to the mean, then repeatedly the
    /// sample farthest from every chosen centroid. Stops early once all
    /// samples coincide with a centroid.
    fn initialize(&self, samples: &[Color], k: usize) -> Vec<Color> {
        let Some(mean) = self.space.mean(samples) else {
            return Vec::new();
        };
        let Some(first) = argmin(samples.iter().map(|&s| self.space.distance(s, mean))) else {
            return Vec::new();
        };

        let mut centroids = vec![samples[first]];
        let mut nearest: Vec<f32> = samples
            .iter()
            .map(|&s| self.space.distance(s, samples[first]))
            .collect();

        while centroids.len() < k {
            let Some(far) = argmax(nearest.iter().copied()) else {
                break;
            };
            if nearest[far] <= 0.0 {
                break;
            }
            let chosen = samples[far];
            centroids.push(chosen);
            for (d, &s) in nearest.iter_mut().zip(samples) {
                *d = d.min(self.space.distance(s, chosen));
            }
        }
        centroids
    }

    fn assign(&self, samples: &[Color], centroids: &[Color]) -> Vec<usize> {
        samples
            .iter()
            .map(|&s| argmin(centroids.iter().map(|&c| self.space.distance(s, c))).unwrap_or(0))
            .collect()
    }

    fn update(&self, samples: &[Color], assignments: &[usize], centroids: &[Color]) -> Vec<Color> {
        centroids
            .iter()
            .enumerate()
            .map(|(i, &old)| {
                let members = samples
                    .iter()
                    .zip(assignments)
                    .filter(|(_, &a)| a == i)
                    .map(|(s, _)| s);
                // Empty clusters keep their centroid.
                self.space.mean(members).unwrap_or(old)
            })
            .collect()
    }
}

impl Clustering for KMeans {
    fn cluster(&self, samples: &[Color], k: usize) -> Clusters {
        let k = k.min(samples.len());
        if k == 0 {
            return Clusters::default();
        }

        let mut centroids = self.initialize(samples, k);
        let mut assignments = self.assign(samples, &centroids);
        for _ in 0..self.max_iterations {
            let updated = self.update(samples, &assignments, &centroids);
            let next = self.assign(samples, &updated);
            centroids = updated;
            if next == assignments {
                break;
            }
            assignments = next;
        }
        Clusters::new(centroids, assignments)
    }
}

/// Index of the smallest value; first wins on ties.
fn argmin(values: impl Iterator<Item = f32>) -> Option<usize> {
    values
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, v)| match best {
            Some((_, b)) if b <= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Index of the largest value; first wins on ties.
fn argmax(values: impl Iterator<Item = f32>) -> Option<usize> {
    values
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
