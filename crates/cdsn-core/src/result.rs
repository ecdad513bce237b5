//! Result type alias for notation operations

use crate::error::NotationError;

/// Standard Result type for notation operations
pub type Result<T> = std::result::Result<T, NotationError>;

/// Separates problems with a document from failures of the toolchain
pub trait ResultExt<T> {
    /// Lift a document error into the inner result
    ///
    /// Lexical, syntax and semantic errors come back as `Ok(Err(_))` so a
    /// caller working through many documents can report them and carry on.
    /// Internal, configuration and I/O errors stay in the outer result.
    fn recoverable(self) -> Result<Result<T>>;
}

impl<T> ResultExt<T> for Result<T> {
    fn recoverable(self) -> Result<Result<T>> {
        match self {
            Ok(value) => Ok(Ok(value)),
            Err(err) if err.is_recoverable() => {
                tracing::warn!("Rejected document: {}", err);
                Ok(Err(err))
            }
            Err(err) => {
                tracing::error!("Toolchain failure: {}", err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn document_errors_are_lifted() {
        let semantic: Result<()> = Err(NotationError::semantic_error("missing"));
        let lifted = semantic.recoverable().unwrap();
        assert_eq!(lifted.unwrap_err().kind(), ErrorKind::Semantic);

        let fine: Result<u8> = Ok(3);
        assert_eq!(fine.recoverable().unwrap().unwrap(), 3);
    }

    #[test]
    fn toolchain_errors_stay_fatal() {
        let internal: Result<()> = Err(NotationError::internal_error(
            "The token stream ended before the end of the input.",
        ));
        assert_eq!(internal.recoverable().unwrap_err().kind(), ErrorKind::Internal);

        let config: Result<()> = Err(NotationError::config_error("bad"));
        assert!(config.recoverable().is_err());
    }
}
