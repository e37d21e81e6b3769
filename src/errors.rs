use displaydoc::Display;
use std::io;
use thiserror::Error;

/// Errors raised while turning a program image into initial memory contents.
#[derive(Debug, Display, Error)]
pub enum LoadProgramError {
    /// Program is missing valid .ORIG header
    ProgramMissingOrigHeader,
    /// Could not read program image {path}: {source}
    ImageUnreadable {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Errors ending a program run before it reached the HALT trap.
#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum ExecutionError {
    /// Error during reading Stdin or writing program output to Stdout: {0}
    IOInputOutputError(String),
    /// Execution interrupted by operator
    Interrupted,
}

impl From<io::Error> for ExecutionError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::Interrupted {
            Self::Interrupted
        } else {
            Self::IOInputOutputError(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;

    #[gtest]
    pub fn test_io_error_conversion() {
        let e = ExecutionError::from(io::Error::other("broken pipe"));
        expect_that!(
            e.to_string(),
            eq("Error during reading Stdin or writing program output to Stdout: broken pipe")
        );
        let e = ExecutionError::from(io::Error::from(io::ErrorKind::Interrupted));
        expect_that!(e, eq(&ExecutionError::Interrupted));
    }
    #[gtest]
    pub fn test_load_error_messages() {
        expect_that!(
            LoadProgramError::ProgramMissingOrigHeader.to_string(),
            eq("Program is missing valid .ORIG header")
        );
        let e = LoadProgramError::ImageUnreadable {
            path: "rogue.obj".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        expect_that!(e.to_string(), starts_with("Could not read program image rogue.obj: "));
    }
}
