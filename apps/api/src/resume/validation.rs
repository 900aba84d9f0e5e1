use crate::errors::AppError;
use crate::models::resume::{ResumeRecord, ScalarField};

const REQUIRED_FIELDS: &[ScalarField] = &[ScalarField::FullName, ScalarField::Email];

/// Required scalars that are empty once trimmed.
pub fn missing_required(record: &ResumeRecord) -> Vec<ScalarField> {
    REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| record.scalar(*field).trim().is_empty())
        .collect()
}

/// Submit-time check. Runs before any store call so a rejected submit never
/// leaves the service.
pub fn validate_required(record: &ResumeRecord) -> Result<(), AppError> {
    let missing = missing_required(record);
    if missing.is_empty() {
        return Ok(());
    }
    let names: Vec<_> = missing.iter().map(ScalarField::as_str).collect();
    Err(AppError::Validation(format!(
        "Missing required fields: {}",
        names.join(", ")
    )))
}
