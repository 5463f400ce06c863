use mongodb::error::{Error as MongoError, ErrorKind};
use thiserror::Error as ThisError;

/// Server error code for `NamespaceExists`, returned by `create` on an existing collection.
pub const NAMESPACE_EXISTS: i32 = 48;

#[derive(Debug, ThisError)]
pub enum BootstrapError {
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("MongoDB unreachable: {0}")]
    Connect(#[source] MongoError),

    #[error("Provisioning failed at {step}: {source}")]
    Provisioning {
        step: String,
        #[source]
        source: MongoError,
    },

    #[error("Declared collections or indexes missing after provisioning: {0:?}")]
    MissingIndexes(Vec<String>),
}

impl BootstrapError {
    pub fn provisioning(step: impl Into<String>, source: MongoError) -> Self {
        BootstrapError::Provisioning {
            step: step.into(),
            source,
        }
    }
}

impl From<figment::Error> for BootstrapError {
    fn from(e: figment::Error) -> Self {
        BootstrapError::Config(Box::new(e))
    }
}

/// Returns the server error code carried by a command failure, if any.
pub fn command_code(err: &MongoError) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(cmd) => Some(cmd.code),
        _ => None,
    }
}

/// True when a `create` failed only because the collection is already there.
pub fn is_namespace_exists(err: &MongoError) -> bool {
    command_code(err) == Some(NAMESPACE_EXISTS)
}
