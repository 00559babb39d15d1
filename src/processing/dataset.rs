//! Re-iterable datasets of (image, label) examples, and the shuffle/batch
//! stages applied on top of them.
use anyhow::Result;
use ndarray::{Array1, Array3, Array4, Axis};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};

/// One padded feature image and its label (0 or 1)
#[derive(Clone, Debug, PartialEq)]
pub struct Example {
    pub image: Array3<f64>,
    pub label: i64,
}

/// Shape and type description of the elements of a dataset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementSpec {
    pub image_shape: (usize, usize, usize),
}

pub type ExampleIter<'a> = Box<dyn Iterator<Item = Result<Example>> + 'a>;

pub trait Dataset {
    /// A fresh, full pass over the examples
    fn iter(&self) -> ExampleIter<'_>;

    fn element_spec(&self) -> ElementSpec;

    /// Number of examples in one pass, when known in advance
    fn cardinality(&self) -> Option<usize>;

    fn shuffle(self, buffer_size: usize, seed: Option<u64>, reshuffle_each_iteration: bool) -> Shuffled<Self>
    where
        Self: Sized,
    {
        Shuffled::new(self, buffer_size, seed, reshuffle_each_iteration)
    }

    fn batch(self, batch_size: usize) -> Batched<Self>
    where
        Self: Sized,
    {
        Batched::new(self, batch_size)
    }

    /// Collect one full pass
    fn collect_pass(&self) -> Result<Vec<Example>> {
        self.iter().collect()
    }
}

/// Reorder the examples of `inner` through a window of `buffer_size`
/// elements: each output is drawn uniformly from the window, which is then
/// refilled from the upstream pass.
pub struct Shuffled<D> {
    inner: D,
    buffer_size: usize,
    // drawn once at construction when no seed is given
    seed: u64,
    reshuffle_each_iteration: bool,
    passes: AtomicU64,
}

impl<D: Dataset> Shuffled<D> {
    pub fn new(inner: D, buffer_size: usize, seed: Option<u64>, reshuffle_each_iteration: bool) -> Self {
        Shuffled {
            inner,
            buffer_size: buffer_size.max(1),
            seed: seed.unwrap_or_else(rand::random),
            reshuffle_each_iteration,
            passes: AtomicU64::new(0),
        }
    }

    fn pass_rng(&self) -> SmallRng {
        let pass = self.passes.fetch_add(1, Ordering::Relaxed);
        if self.reshuffle_each_iteration {
            SmallRng::seed_from_u64(self.seed.wrapping_add(pass))
        } else {
            SmallRng::seed_from_u64(self.seed)
        }
    }
}

struct ShuffleIter<'a> {
    upstream: ExampleIter<'a>,
    buffer: Vec<Result<Example>>,
    buffer_size: usize,
    rng: SmallRng,
}

impl Iterator for ShuffleIter<'_> {
    type Item = Result<Example>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.buffer.len() < self.buffer_size {
            match self.upstream.next() {
                Some(x) => self.buffer.push(x),
                None => break,
            }
        }
        if self.buffer.is_empty() {
            return None;
        }
        let idx = self.rng.gen_range(0..self.buffer.len());
        Some(self.buffer.swap_remove(idx))
    }
}

impl<D: Dataset> Dataset for Shuffled<D> {
    fn iter(&self) -> ExampleIter<'_> {
        Box::new(ShuffleIter {
            upstream: self.inner.iter(),
            buffer: Vec::with_capacity(self.buffer_size),
            buffer_size: self.buffer_size,
            rng: self.pass_rng(),
        })
    }

    fn element_spec(&self) -> ElementSpec {
        self.inner.element_spec()
    }

    fn cardinality(&self) -> Option<usize> {
        self.inner.cardinality()
    }
}

/// A stack of examples: images (n, h, w, c) and labels (n)
#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    pub images: Array4<f64>,
    pub labels: Array1<i64>,
}

impl Batch {
    pub fn from_examples(examples: &[Example]) -> Result<Batch> {
        let views: Vec<_> = examples.iter().map(|e| e.image.view()).collect();
        Ok(Batch {
            images: ndarray::stack(Axis(0), &views)?,
            labels: examples.iter().map(|e| e.label).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

pub struct Batched<D> {
    inner: D,
    batch_size: usize,
}

impl<D: Dataset> Batched<D> {
    pub fn new(inner: D, batch_size: usize) -> Self {
        Batched {
            inner,
            batch_size: batch_size.max(1),
        }
    }

    /// A fresh pass, grouped in batches; the last one may be smaller
    pub fn iter(&self) -> impl Iterator<Item = Result<Batch>> + '_ {
        let mut upstream = self.inner.iter();
        let batch_size = self.batch_size;
        std::iter::from_fn(move || {
            let mut examples = Vec::with_capacity(batch_size);
            for x in upstream.by_ref().take(batch_size) {
                match x {
                    Ok(e) => examples.push(e),
                    Err(e) => return Some(Err(e)),
                }
            }
            if examples.is_empty() {
                None
            } else {
                Some(Batch::from_examples(&examples))
            }
        })
    }

    pub fn element_spec(&self) -> ElementSpec {
        self.inner.element_spec()
    }

    /// Number of batches in one pass
    pub fn cardinality(&self) -> Option<usize> {
        self.inner
            .cardinality()
            .map(|n| (n + self.batch_size - 1) / self.batch_size)
    }
}
