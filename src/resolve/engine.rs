use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::variant::{ClassificationResult, VariantRecord};
use crate::reference::store::{SequenceSource, StoreError};
use crate::resolve::classifier::{classify_allele, AlleleMatch};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Failed to resolve {rs_id} at {chromosome}:{position}: {source}")]
    Lookup {
        rs_id: String,
        chromosome: String,
        position: u64,
        #[source]
        source: StoreError,
    },
}

impl ResolveError {
    /// The store failure that aborted the run
    #[must_use]
    pub fn store_error(&self) -> &StoreError {
        match self {
            Self::Lookup { source, .. } => source,
        }
    }
}

/// Why a record was left out of the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Neither allele equals the reference base
    NoMatch,
    /// The position lies past the end of the chromosome
    OutsideSequence,
}

/// Decision for a single record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// One of the alleles matched the reference base
    Emitted(ClassificationResult),
    /// Neither allele matched; the record is left out of the output
    Dropped(DropReason),
}

/// Receives the outcome of every record as it is resolved.
pub trait ResolutionObserver {
    fn on_outcome(&mut self, record: &VariantRecord, outcome: &Outcome);
}

impl<O: ResolutionObserver + ?Sized> ResolutionObserver for &mut O {
    fn on_outcome(&mut self, record: &VariantRecord, outcome: &Outcome) {
        (**self).on_outcome(record, outcome);
    }
}

/// Observer that reports dropped records through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ResolutionObserver for TracingObserver {
    fn on_outcome(&mut self, record: &VariantRecord, outcome: &Outcome) {
        match outcome {
            Outcome::Emitted(_) => {}
            Outcome::Dropped(DropReason::NoMatch) => debug!(
                "Dropping {} at {}:{}: neither {} nor {} is the reference base",
                record.rs_id, record.chromosome, record.position, record.allele_1, record.allele_2
            ),
            Outcome::Dropped(DropReason::OutsideSequence) => warn!(
                "Dropping {}: position {} is past the end of {}",
                record.rs_id, record.position, record.chromosome
            ),
        }
    }
}

/// Counts for a resolution run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionSummary {
    pub records: usize,
    pub emitted: usize,
    pub dropped: usize,
    /// Dropped records whose position lies past the end of the chromosome
    pub outside_sequence: usize,
}

/// Output of a resolution run, in input order
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub results: Vec<ClassificationResult>,
    pub summary: ResolutionSummary,
}

/// Decide the REF/ALT orientation of a single record.
///
/// `allele_1` wins whenever it matches, including when both alleles match.
/// `allele_2` is used only when `allele_1` does not match. When neither matches
/// the record is [`Outcome::Dropped`], including when the position lies past the
/// end of the chromosome.
///
/// # Errors
///
/// Returns the [`StoreError`] of the first failed lookup.
pub fn classify_record<S>(source: &mut S, record: &VariantRecord) -> Result<Outcome, StoreError>
where
    S: SequenceSource + ?Sized,
{
    let chromosome = record.chromosome.as_str();
    let match_1 = classify_allele(source, chromosome, record.position, record.allele_1)?;
    let match_2 = classify_allele(source, chromosome, record.position, record.allele_2)?;

    let outcome = if match_1 == AlleleMatch::Reference {
        Outcome::Emitted(ClassificationResult::new(
            record,
            record.allele_1,
            record.allele_2,
        ))
    } else if match_2 == AlleleMatch::Reference {
        Outcome::Emitted(ClassificationResult::new(
            record,
            record.allele_2,
            record.allele_1,
        ))
    } else if match_1 == AlleleMatch::OutsideSequence {
        Outcome::Dropped(DropReason::OutsideSequence)
    } else {
        Outcome::Dropped(DropReason::NoMatch)
    };

    Ok(outcome)
}

/// Resolves reference alleles for a table of variant records
pub struct ResolutionEngine<'a, S: ?Sized, O = TracingObserver> {
    source: &'a mut S,
    observer: O,
}

impl<'a, S> ResolutionEngine<'a, S, TracingObserver>
where
    S: SequenceSource + ?Sized,
{
    pub fn new(source: &'a mut S) -> Self {
        Self {
            source,
            observer: TracingObserver,
        }
    }
}

impl<'a, S, O> ResolutionEngine<'a, S, O>
where
    S: SequenceSource + ?Sized,
    O: ResolutionObserver,
{
    /// Replace the observer notified of each record's outcome
    pub fn with_observer<P: ResolutionObserver>(self, observer: P) -> ResolutionEngine<'a, S, P> {
        ResolutionEngine {
            source: self.source,
            observer,
        }
    }

    /// Resolve every record in order.
    ///
    /// Records whose alleles both miss the reference base are skipped. The first
    /// lookup failure aborts the whole run and no results are returned.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::Lookup` naming the record whose lookup failed.
    pub fn resolve(&mut self, records: &[VariantRecord]) -> Result<Resolution, ResolveError> {
        info!("Resolving reference alleles for {} records", records.len());

        let mut resolution = Resolution {
            results: Vec::with_capacity(records.len()),
            summary: ResolutionSummary {
                records: records.len(),
                ..ResolutionSummary::default()
            },
        };

        for record in records {
            let outcome =
                classify_record(&mut *self.source, record).map_err(|source| ResolveError::Lookup {
                    rs_id: record.rs_id.clone(),
                    chromosome: record.chromosome.clone(),
                    position: record.position,
                    source,
                })?;

            self.observer.on_outcome(record, &outcome);

            match outcome {
                Outcome::Emitted(result) => {
                    resolution.summary.emitted += 1;
                    resolution.results.push(result);
                }
                Outcome::Dropped(reason) => {
                    resolution.summary.dropped += 1;
                    if reason == DropReason::OutsideSequence {
                        resolution.summary.outside_sequence += 1;
                    }
                }
            }
        }

        info!(
            "Resolved {} records ({} dropped)",
            resolution.summary.emitted, resolution.summary.dropped
        );

        Ok(resolution)
    }
}
