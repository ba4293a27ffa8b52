use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid regex in pattern `{id}`: {source}")]
    Regex {
        id: String,
        #[source]
        source: regex::Error,
    },

    #[error("pattern `{0}` captures a value but defines no capture group")]
    MissingCapture(String),
}
