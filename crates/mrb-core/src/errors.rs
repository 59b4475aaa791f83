/// Core error type for the relay bot.
///
/// Adapter crates map their specific errors into this type so the router
/// can handle failures consistently (user-facing notice vs fatal startup).
/// An admin reply that matches no recipient is not an error: the router
/// reports it as an outcome after notifying the admin.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("session store error: {0}")]
    Store(String),

    #[error("malformed update: {0}")]
    MalformedUpdate(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
