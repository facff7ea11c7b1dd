//! Priced/free variant merging.
//!
//! Router-style sources list the same logical model twice: once priced and
//! once with a free-tier suffix. A [`VariantBundle`] carries both records
//! plus the identity table's declaration of which variants were *expected*,
//! which is distinct from which actually have data, and merges their
//! classifications into one cell.

use crate::classify::{classify_record, CellOutcome, CellStatus, ReasonLimits};
use crate::domain::{Capability, ModelRecord};

/// The priced and free records of one router model.
///
/// `priced_defined` / `free_defined` come from the identity table and record
/// whether a variant was declared there, regardless of whether probing
/// produced data for it. A bundle with exactly one defined variant is a
/// single-variant model stored in bundle shape, not an empty pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantBundle {
    pub priced: Option<ModelRecord>,
    pub free: Option<ModelRecord>,
    pub priced_defined: bool,
    pub free_defined: bool,
}

fn rank(status: CellStatus) -> u8 {
    match status {
        CellStatus::Success => 3,
        CellStatus::Partial => 2,
        CellStatus::Failure => 1,
        CellStatus::None => 0,
    }
}

/// Classify a bundle for one provider and capability.
pub fn classify_bundle(
    bundle: &VariantBundle,
    provider: &str,
    capability: Capability,
    limits: &ReasonLimits,
) -> CellOutcome {
    let priced = classify_record(bundle.priced.as_ref(), provider, capability, limits);
    let free = classify_record(bundle.free.as_ref(), provider, capability, limits);

    // Single-variant models pass through untouched; the undefined variant's
    // (empty) data must not influence the result.
    if bundle.priced_defined && !bundle.free_defined {
        return priced;
    }
    if bundle.free_defined && !bundle.priced_defined {
        return free;
    }

    if !priced.has_data() && !free.has_data() {
        return CellOutcome::absent();
    }

    let mut label_parts = Vec::new();
    if priced.has_data() {
        label_parts.push(priced.label.clone());
    }
    if free.has_data() {
        label_parts.push(free.label.clone());
    }

    let status = if rank(priced.status) >= rank(free.status) {
        priced.status
    } else {
        free.status
    };

    let mut reasons = Vec::new();
    if let Some(r) = priced.reasons {
        reasons.extend(r);
    }
    if let Some(r) = free.reasons {
        reasons.extend(r);
    }

    CellOutcome {
        status,
        label: label_parts.join(" | "),
        reasons: if reasons.is_empty() {
            None
        } else {
            Some(reasons)
        },
    }
}
