//! Everything that can go wrong.
use thiserror::Error;

use crate::Mode;

/// Error used by the entire crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured mode is not one we know of.
    #[error("invalid mode `{0}`")]
    InvalidMode(String),

    /// The mode is known but not implemented.
    #[error("mode `{0}` is not supported")]
    UnsupportedMode(Mode),

    /// The site could not be resolved.
    #[error("invalid site `{site}`")]
    SiteInvalid {
        /// Site id as given in the configuration.
        site: String,
        /// What Graph said.
        #[source]
        source: graph_fs::Error,
    },

    /// No drive in the site has the requested name.
    #[error("no drive named `{drive}`")]
    DriveInvalid {
        /// Requested drive name.
        drive: String,
    },

    /// The path can't address an item.
    #[error("invalid path: {0}")]
    InvalidPath(#[from] graph_fs::path::InvalidItemPath),

    /// Upload session chunks must be multiples of 320 KiB.
    #[error("upload chunk size must be a positive multiple of 327680 bytes, got {0}")]
    InvalidChunkSize(usize),

    /// Every byte was sent but the upload session never produced an item.
    #[error("upload session did not complete after {0} bytes")]
    UploadIncomplete(u64),

    /// Error from the Graph client.
    #[error("{0}")]
    Fs(#[from] graph_fs::Error),

    /// Reading the upload source failed.
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// No plugin handles the method.
    #[error("unknown method `{0}`")]
    UnknownMethod(String),

    /// A plugin was called with the wrong number of arguments.
    #[error("`{method}` takes {expected} argument(s), got {got}")]
    InvalidArguments {
        /// Method called.
        method: String,
        /// Number of arguments the method takes.
        expected: usize,
        /// Number of arguments passed.
        got: usize,
    },

    /// A plugin argument has the wrong type.
    #[error("argument {index} of `{method}` must be a string")]
    ArgumentNotString {
        /// Method called.
        method: String,
        /// Zero-based position of the argument.
        index: usize,
    },
}

impl Error {
    /// Is this Graph reporting that something does not exist?
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Fs(graph_fs::Error::NotFound))
    }
}

/// Turn a not-found error into `None`.
pub(crate) fn found<T>(res: Result<T, graph_fs::Error>) -> crate::Result<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(graph_fs::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::{found, Error};

    #[test]
    fn only_not_found_is_swallowed() {
        assert_eq!(found(Ok(1)).unwrap(), Some(1));
        assert_eq!(found::<()>(Err(graph_fs::Error::NotFound)).unwrap(), None);

        let err = found::<()>(Err(graph_fs::Error::UploadOutOfSync {
            expected: 0,
            actual: 1,
        }))
        .unwrap_err();

        assert!(matches!(err, Error::Fs(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_is_recognized() {
        assert!(Error::from(graph_fs::Error::NotFound).is_not_found());
        assert!(!Error::DriveInvalid {
            drive: "x".into()
        }
        .is_not_found());
    }
}
