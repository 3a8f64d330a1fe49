use strum_macros::Display;

#[derive(Debug, Display)]
pub enum MotionError {
    Connect(String),
    Decode(String),
    Closed,
}

impl std::error::Error for MotionError {}

impl From<tokio_tungstenite::tungstenite::Error> for MotionError {
    fn from(value: tokio_tungstenite::tungstenite::Error) -> Self {
        match value {
            tokio_tungstenite::tungstenite::Error::ConnectionClosed
            | tokio_tungstenite::tungstenite::Error::AlreadyClosed => MotionError::Closed,
            other => MotionError::Connect(other.to_string()),
        }
    }
}
