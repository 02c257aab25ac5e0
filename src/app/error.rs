use thiserror::Error;

use crate::io::IoError;
use crate::pipeline::PipelineError;

/// Top-level application errors unifying all layer errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Input error: {0}")]
    Input(#[from] IoError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Input aborted after {0} records")]
    InputAborted(usize),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BranchFailure;

    #[test]
    fn error_display_formats_correctly() {
        assert_eq!(
            AppError::InvalidArguments("missing file".to_string()).to_string(),
            "Invalid arguments: missing file"
        );
        assert_eq!(
            AppError::InputAborted(4).to_string(),
            "Input aborted after 4 records"
        );
    }

    #[test]
    fn pipeline_error_conversion() {
        let pipeline_err = PipelineError::Branch {
            branch: 1,
            failure: BranchFailure::invalid_payload("nope"),
        };
        let app_err = AppError::from(pipeline_err);

        assert_eq!(
            app_err.to_string(),
            "Pipeline error: Branch 1 failed: invalid.payload: cannot handle: nope"
        );
    }

    #[test]
    fn input_error_conversion() {
        let app_err = AppError::from(IoError::InvalidIndex("x".to_string()));

        match app_err {
            AppError::Input(IoError::InvalidIndex(_)) => {}
            _ => panic!("Expected Input error variant"),
        }
    }
}
