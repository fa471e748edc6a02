use crate::common::error::{PollError, Result};
use crate::config::models::PollerOptions;

/// Validate options for internal consistency.
pub fn validate_options(options: &PollerOptions) -> Result<()> {
    if let Some(hint) = options.size_hint_records {
        if hint == 0 {
            return Err(PollError::Options(
                "size_hint_records must be greater than 0".to_string(),
            ));
        }
    }

    if let Some(granularity) = options.allocation_granularity {
        if granularity == 0 {
            return Err(PollError::Options(
                "allocation_granularity must be greater than 0".to_string(),
            ));
        }
    }

    Ok(())
}
