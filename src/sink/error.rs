use std::io;
use thiserror::Error;

/// Destination-level errors
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Destination already finished")]
    Finished,

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        assert_eq!(SinkError::Finished.to_string(), "Destination already finished");

        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let sink_err = SinkError::from(io_err);
        assert!(sink_err.to_string().contains("I/O error"));
    }

    #[test]
    fn io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let sink_err = SinkError::from(io_err);

        match sink_err {
            SinkError::IoError(_) => {}
            _ => panic!("Expected IoError variant"),
        }
    }
}
