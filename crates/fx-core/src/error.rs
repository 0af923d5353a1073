pub type FxResult<T> = Result<T, FxError>;

#[derive(thiserror::Error, Debug)]
pub enum FxError {
    #[error("config error: {0}")]
    Config(String),

    #[error("color error: {0}")]
    Color(String),
}

impl FxError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn color(msg: impl Into<String>) -> Self {
        Self::Color(msg.into())
    }
}
