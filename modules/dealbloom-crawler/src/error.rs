use thiserror::Error;

pub type Result<T> = std::result::Result<T, CrawlError>;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(
        "Coupang Partners credentials are not set (COUPANG_PARTNERS_EMAIL / COUPANG_PARTNERS_PASSWORD)"
    )]
    MissingCredentials,

    #[error("login failed: {0}")]
    LoginFailed(String),

    #[error("events page navigation failed: {0}")]
    NavigationFailed(String),

    #[error(transparent)]
    Session(#[from] browser_session::SessionError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
