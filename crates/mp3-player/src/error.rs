//! Player errors.

/// Errors returned by `Mp3Player` operations.
///
/// `M` is the module error type, `U` the serial channel's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayerError<M, U> {
    /// Operation needs a successful `setup` first.
    NotInitialized,
    /// The module did not complete the handshake.
    HandshakeFailed(M),
    /// A module command failed after setup.
    Module(M),
    /// The serial channel could not be opened.
    Transport(U),
    /// Zero-based track number has no 1-based equivalent.
    TrackOutOfRange(u16),
}

#[cfg(feature = "std")]
impl<M, U> std::error::Error for PlayerError<M, U>
where
    M: core::fmt::Debug + core::fmt::Display,
    U: core::fmt::Debug + core::fmt::Display,
{
}

impl<M, U> core::fmt::Display for PlayerError<M, U>
where
    M: core::fmt::Display,
    U: core::fmt::Display,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotInitialized => f.write_str("player not initialised"),
            Self::HandshakeFailed(e) => write!(f, "module handshake failed: {e}"),
            Self::Module(e) => write!(f, "module command failed: {e}"),
            Self::Transport(e) => write!(f, "serial transport error: {e}"),
            Self::TrackOutOfRange(track) => write!(f, "track {track} out of range"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::UartError;

    type Error = PlayerError<UartError, UartError>;

    #[test]
    fn test_display() {
        assert_eq!(Error::NotInitialized.to_string(), "player not initialised");
        assert_eq!(
            Error::Transport(UartError::UnsupportedConfig).to_string(),
            "serial transport error: UART framing not supported by this channel"
        );
        assert_eq!(
            Error::TrackOutOfRange(65535).to_string(),
            "track 65535 out of range"
        );
    }
}
