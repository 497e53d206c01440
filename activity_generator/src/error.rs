//! Errors produced by the generator

/// The errors that can occur while generating records
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum GeneratorError {
    /// One of the inputs to the generator is not usable
    #[error("invalid argument. argument: {argument} details: {details}")]
    InvalidArgument {
        /// the name of the offending argument
        argument: &'static str,
        /// what is wrong with it
        details: String,
    },
}

impl GeneratorError {
    pub(crate) fn invalid(argument: &'static str, details: impl Into<String>) -> Self {
        GeneratorError::InvalidArgument {
            argument,
            details: details.into(),
        }
    }
}
