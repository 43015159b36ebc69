use thiserror::Error;

pub type Result<T> = std::result::Result<T, HealthError>;

#[derive(Error, Debug)]
pub enum HealthError {
    #[error("Clone error: {0}")]
    Clone(String),
    #[error("HTTP error: {0}")]
    Http(#[from] Box<ureq::Error>),
    #[error("Registry error: {0}")]
    Registry(String),
    #[error("Manifest error: {0}")]
    Manifest(#[from] toml::de::Error),
    #[error("Export error: {0}")]
    Export(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
}

// Manual From implementations for unboxed to boxed conversions
impl From<ureq::Error> for HealthError {
    fn from(err: ureq::Error) -> Self {
        HealthError::Http(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for HealthError {
    fn from(err: gix::object::commit::Error) -> Self {
        HealthError::Commit(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for HealthError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        HealthError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for HealthError {
    fn from(err: gix::objs::decode::Error) -> Self {
        HealthError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for HealthError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        HealthError::RefFind(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for HealthError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        HealthError::HeadPeel(Box::new(err))
    }
}

impl From<gix::discover::Error> for HealthError {
    fn from(err: gix::discover::Error) -> Self {
        HealthError::GitDiscover(Box::new(err))
    }
}
