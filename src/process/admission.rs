/*!
 * Admission
 * Boundary validation for processes entering the simulation
 */

use super::types::{AdmissionError, AdmissionResult, ProcessSpec};

/// Reject specs the state machine cannot represent
///
/// `name_taken` answers whether a process with that name was already admitted.
pub fn validate<F>(spec: &ProcessSpec, name_taken: F) -> AdmissionResult<()>
where
    F: Fn(&str) -> bool,
{
    let name = spec.name.trim();
    if name.is_empty() {
        return Err(AdmissionError::EmptyName);
    }
    if spec.size == 0 {
        return Err(AdmissionError::InvalidSize {
            name: name.to_string(),
        });
    }
    if spec.time == 0 {
        return Err(AdmissionError::InvalidTime {
            name: name.to_string(),
        });
    }
    if name_taken(name) {
        return Err(AdmissionError::DuplicateName(name.to_string()));
    }
    Ok(())
}
