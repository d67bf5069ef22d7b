use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_format(element: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidFormat {
                element: element.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn collection_not_found(collection: impl Into<String>) -> Error {
        Error(
            ErrorKind::CollectionNotFound {
                collection: collection.into(),
            }
            .into(),
        )
    }

    pub fn document_not_found(document: impl Into<String>) -> Error {
        Error(
            ErrorKind::DocumentNotFound {
                document: document.into(),
            }
            .into(),
        )
    }

    pub fn index_not_found(
        index_no: u32,
        collection: impl Into<String>,
        document: impl Into<String>,
    ) -> Error {
        Error(
            ErrorKind::IndexNotFound {
                index_no,
                collection: collection.into(),
                document: document.into(),
            }
            .into(),
        )
    }

    pub fn invalid_index_type(
        index_no: u32,
        collection: impl Into<String>,
        document: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Error {
        Error(
            ErrorKind::InvalidIndexType {
                index_no,
                collection: collection.into(),
                document: document.into(),
                expected: expected.into(),
                actual: actual.into(),
            }
            .into(),
        )
    }

    pub fn filter_compilation(pattern: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::FilterCompilation {
                pattern: pattern.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn node_resolution(key: u64, document: impl Into<String>) -> Error {
        Error(
            ErrorKind::NodeResolution {
                key,
                document: document.into(),
            }
            .into(),
        )
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Error {
        Error(
            ErrorKind::Io {
                context: context.into(),
                source,
            }
            .into(),
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid storage format for '{element}': {message}")]
    InvalidFormat { element: String, message: String },

    #[error("collection not found: {collection}")]
    CollectionNotFound { collection: String },

    #[error("document not found: {document}")]
    DocumentNotFound { document: String },

    #[error("index no {index_no} for collection {collection} and document {document} not found")]
    IndexNotFound {
        index_no: u32,
        collection: String,
        document: String,
    },

    #[error(
        "index no {index_no} for collection {collection} and document {document} \
         is not a {expected} index (found {actual})"
    )]
    InvalidIndexType {
        index_no: u32,
        collection: String,
        document: String,
        expected: String,
        actual: String,
    },

    #[error("cannot compile path pattern '{pattern}': {message}")]
    FilterCompilation { pattern: String, message: String },

    #[error("cannot resolve node key {key} in document {document}")]
    NodeResolution { key: u64, document: String },

    #[error("IO error for '{context}': {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::io("", e)
    }
}

impl From<std::convert::Infallible> for Error {
    fn from(_: std::convert::Infallible) -> Self {
        Error::invalid_arg("conversion", "infallible")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_is_preserved() {
        let err = Error::document_not_found("missing-doc");
        match err.kind() {
            ErrorKind::DocumentNotFound { document } => assert_eq!(document, "missing-doc"),
            other => panic!("unexpected kind: {other:?}"),
        }
        assert_eq!(err.to_string(), "document not found: missing-doc");
    }

    #[test]
    fn index_errors_carry_context() {
        let err = Error::index_not_found(7, "store", "doc1");
        assert_eq!(
            err.to_string(),
            "index no 7 for collection store and document doc1 not found"
        );

        let err = Error::invalid_index_type(7, "store", "doc1", "path", "name");
        match err.into_kind() {
            ErrorKind::InvalidIndexType {
                index_no, expected, ..
            } => {
                assert_eq!(index_no, 7);
                assert_eq!(expected, "path");
            }
            other => panic!("unexpected kind: {other:?}"),
        }
    }
}
