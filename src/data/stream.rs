//! Restartable view over the rows of a source
use crate::data::source::SequenceSource;
use crate::shared::sequence::SequencePair;
use std::sync::Arc;

/// Fixed snapshot of pairs. Every call to `iter` is a new, full pass; the
/// rows themselves never change after construction.
#[derive(Clone, Debug)]
pub struct DataStream {
    pairs: Arc<[SequencePair]>,
}

impl DataStream {
    pub fn new(source: &SequenceSource) -> DataStream {
        DataStream::from_pairs(source.pairs().to_vec())
    }

    pub fn from_pairs(pairs: Vec<SequencePair>) -> DataStream {
        DataStream {
            pairs: pairs.into(),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SequencePair> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn positives(&self) -> impl Iterator<Item = &SequencePair> {
        self.iter().filter(|p| p.is_positive())
    }
}

impl<'a> IntoIterator for &'a DataStream {
    type Item = &'a SequencePair;
    type IntoIter = std::slice::Iter<'a, SequencePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
