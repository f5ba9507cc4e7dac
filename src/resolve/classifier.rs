use tracing::warn;

use crate::core::types::Base;
use crate::reference::store::{SequenceSource, StoreError};

/// How a candidate allele relates to the reference base at its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlleleMatch {
    /// The allele equals the reference base
    Reference,
    /// The reference base is the lowercase (soft-masked) form of the allele.
    /// Not treated as a match.
    SoftMasked,
    /// The allele differs from the reference base
    Other,
    /// The position lies past the end of the chromosome
    OutsideSequence,
}

/// Compare `candidate` with the reference base at `chromosome:position`.
///
/// The comparison is exact and case-sensitive; a soft-masked reference base is
/// reported as [`AlleleMatch::SoftMasked`] with a warning rather than normalized.
///
/// # Errors
///
/// Propagates the [`StoreError`] of the underlying lookup unchanged.
pub fn classify_allele<S>(
    source: &mut S,
    chromosome: &str,
    position: u64,
    candidate: Base,
) -> Result<AlleleMatch, StoreError>
where
    S: SequenceSource + ?Sized,
{
    let Some(reference_base) = source.base_at(chromosome, position)? else {
        return Ok(AlleleMatch::OutsideSequence);
    };
    let allele = candidate.as_byte();

    let result = if reference_base == allele {
        AlleleMatch::Reference
    } else if reference_base.eq_ignore_ascii_case(&allele) {
        warn!(
            "Soft-masked reference base '{}' at {}:{} does not match allele {}",
            char::from(reference_base),
            chromosome,
            position,
            candidate
        );
        AlleleMatch::SoftMasked
    } else {
        AlleleMatch::Other
    };

    Ok(result)
}

/// Check whether `candidate` is the reference base at `chromosome:position`.
///
/// Positions past the end of the chromosome have no reference base and never match.
///
/// # Errors
///
/// Propagates the [`StoreError`] of the underlying lookup unchanged.
pub fn is_reference<S>(
    source: &mut S,
    chromosome: &str,
    position: u64,
    candidate: Base,
) -> Result<bool, StoreError>
where
    S: SequenceSource + ?Sized,
{
    Ok(classify_allele(source, chromosome, position, candidate)? == AlleleMatch::Reference)
}
