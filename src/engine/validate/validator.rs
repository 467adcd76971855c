use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use super::counter::EntryCounter;
use crate::engine::errors::MergeError;

/// Compares entry totals of the source files against the merged outputs.
pub struct Validator {
    counter: Arc<dyn EntryCounter>,
    collection: String,
}

impl Validator {
    pub fn new(counter: Arc<dyn EntryCounter>, collection: impl Into<String>) -> Self {
        Self {
            counter,
            collection: collection.into(),
        }
    }

    pub fn total(&self, files: &[PathBuf]) -> Result<u64, MergeError> {
        files
            .par_iter()
            .map(|path| {
                let n = self.counter.count(path, &self.collection)?;
                debug!(target: "validate::count", file = %path.display(), entries = n, "Counted entries");
                Ok::<u64, MergeError>(n)
            })
            .try_reduce(
                || 0,
                |a, b| {
                    a.checked_add(b).ok_or_else(|| MergeError::CountOverflow {
                        collection: self.collection.clone(),
                    })
                },
            )
    }

    /// Returns the common total when both sides agree.
    pub fn validate(&self, inputs: &[PathBuf], outputs: &[PathBuf]) -> Result<u64, MergeError> {
        let input_total = self.total(inputs)?;
        let output_total = self.total(outputs)?;

        if input_total != output_total {
            return Err(MergeError::DataLoss {
                input_total,
                output_total,
            });
        }

        info!(
            target: "validate::totals",
            collection = %self.collection,
            entries = input_total,
            inputs = inputs.len(),
            outputs = outputs.len(),
            "Entry counts match"
        );
        Ok(input_total)
    }
}
