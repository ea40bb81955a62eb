pub type UtilsResult<T> = Result<T, UtilsError>;

#[derive(thiserror::Error, Debug)]
pub enum UtilsError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("index {index} out of range for {len} frames")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UtilsError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(UtilsError::invalid_argument("x")
            .to_string()
            .starts_with("invalid argument:"));
        assert!(UtilsError::not_found("walk1.png")
            .to_string()
            .contains("walk1.png"));
        assert_eq!(
            UtilsError::IndexOutOfRange { index: 4, len: 3 }.to_string(),
            "index 4 out of range for 3 frames"
        );
    }

    #[test]
    fn other_preserves_source() {
        let err = UtilsError::from(anyhow::anyhow!("boom"));
        assert!(err.to_string().contains("boom"));
    }
}
