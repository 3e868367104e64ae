//! Batch → project → class → credit type resolution.

use ecoledger_types::{Batch, LedgerError, Precision, Result};

use crate::store::StateReader;

/// A batch together with the precision of its credit type.
#[derive(Debug, Clone)]
pub struct ResolvedBatch {
    pub batch: Batch,
    pub precision: Precision,
}

/// Look a batch up by denom and resolve its precision.
///
/// # Errors
/// `BatchNotFound` if no batch has `denom`; otherwise see [`batch_precision`].
pub fn resolve_batch<S: StateReader + ?Sized>(store: &S, denom: &str) -> Result<ResolvedBatch> {
    let batch = store
        .batch_by_denom(denom)
        .ok_or_else(|| LedgerError::BatchNotFound {
            denom: denom.to_string(),
        })?;
    let precision = batch_precision(store, &batch)?;
    Ok(ResolvedBatch { batch, precision })
}

/// Walk the registry chain of `batch` to its credit type's precision.
///
/// # Errors
/// `ProjectNotFound`, `ClassNotFound` or `CreditTypeNotFound` for a broken
/// link; `InvalidPrecision` if the credit type carries an invalid precision.
pub fn batch_precision<S: StateReader + ?Sized>(store: &S, batch: &Batch) -> Result<Precision> {
    let project = store
        .project(batch.project_key)
        .ok_or(LedgerError::ProjectNotFound(batch.project_key))?;
    let class = store
        .class(project.class_key)
        .ok_or(LedgerError::ClassNotFound(project.class_key))?;
    let credit_type = store.credit_type(&class.credit_type_abbrev).ok_or_else(|| {
        LedgerError::CreditTypeNotFound {
            abbreviation: class.credit_type_abbrev.clone(),
        }
    })?;
    credit_type.precision()
}
