//! Draw negative CDR3s for an epitope from a candidate pool
use crate::data::known_pairs::KnownPairs;
use crate::shared::errors::PipelineError;
use anyhow::Result;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

// rejection-sampling attempts before scanning the whole pool
const MAX_ATTEMPTS: usize = 64;

pub struct NegativeSampler<'a> {
    pool: &'a [String],
    known: &'a KnownPairs,
    index: Uniform<usize>,
}

impl<'a> NegativeSampler<'a> {
    pub fn new(pool: &'a [String], known: &'a KnownPairs) -> Result<NegativeSampler<'a>> {
        if pool.is_empty() {
            return Err(PipelineError::EmptySource(
                "empty CDR3 pool for negative sampling".to_string(),
            ))?;
        }
        Ok(NegativeSampler {
            pool,
            known,
            index: Uniform::new(0, pool.len()),
        })
    }

    fn acceptable(&self, cdr3: &str, epitope: &str) -> bool {
        !self.known.contains(cdr3, epitope)
    }

    /// A CDR3 of the pool that is not a known binder of `epitope`
    pub fn sample<R: Rng>(&self, epitope: &str, rng: &mut R) -> Result<&'a str> {
        let pool: &'a [String] = self.pool;
        for _ in 0..MAX_ATTEMPTS {
            let cdr3 = pool[self.index.sample(rng)].as_str();
            if self.acceptable(cdr3, epitope) {
                return Ok(cdr3);
            }
        }
        // crowded epitope: pick uniformly among the remaining candidates
        let candidates: Vec<&'a str> = pool
            .iter()
            .map(String::as_str)
            .filter(|c| self.acceptable(c, epitope))
            .collect();
        if candidates.is_empty() {
            return Err(PipelineError::NoNegativeCandidate {
                epitope: epitope.to_string(),
            })?;
        }
        Ok(candidates[rng.gen_range(0..candidates.len())])
    }
}
