//! Set of true (cdr3, epitope) pairings, used to keep negatives honest
use crate::data::source::SourceHeaders;
use crate::shared::parser::{delimiter_for, read_columns};
use crate::shared::sequence::SequencePair;
use anyhow::Result;
use std::collections::{HashMap, HashSet};
use std::path::Path;

#[derive(Default, Clone, Debug)]
pub struct KnownPairs {
    // epitope -> cdr3s binding it
    by_epitope: HashMap<String, HashSet<String>>,
}

impl KnownPairs {
    pub fn new() -> KnownPairs {
        KnownPairs::default()
    }

    /// Every pairing listed in a dataset file, whatever its label
    pub fn load(path: &Path, headers: &SourceHeaders) -> Result<KnownPairs> {
        let records = read_columns(
            path,
            delimiter_for(path),
            &[headers.cdr3_header.as_str(), headers.epitope_header.as_str()],
        )?;
        let known: KnownPairs = records
            .into_iter()
            .map(|r| (r.values[0].clone(), r.values[1].clone()))
            .collect();
        log::debug!("{} known pairs read from {}", known.len(), path.display());
        Ok(known)
    }

    /// Positive pairs of `pairs`
    pub fn from_positives<'a>(pairs: impl IntoIterator<Item = &'a SequencePair>) -> KnownPairs {
        pairs
            .into_iter()
            .filter(|p| p.is_positive())
            .map(|p| (p.cdr3.clone(), p.epitope.clone()))
            .collect()
    }

    pub fn insert(&mut self, cdr3: &str, epitope: &str) -> bool {
        self.by_epitope
            .entry(epitope.to_string())
            .or_default()
            .insert(cdr3.to_string())
    }

    pub fn contains(&self, cdr3: &str, epitope: &str) -> bool {
        self.by_epitope
            .get(epitope)
            .map_or(false, |cdr3s| cdr3s.contains(cdr3))
    }

    pub fn extend(&mut self, other: &KnownPairs) {
        for (epitope, cdr3s) in &other.by_epitope {
            self.by_epitope
                .entry(epitope.clone())
                .or_default()
                .extend(cdr3s.iter().cloned());
        }
    }

    pub fn len(&self) -> usize {
        self.by_epitope.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<(String, String)> for KnownPairs {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut known = KnownPairs::new();
        for (cdr3, epitope) in iter {
            known.insert(&cdr3, &epitope);
        }
        known
    }
}
