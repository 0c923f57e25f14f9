use strum_macros::Display;

/// Feed connection indicator. Only the feed connector writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}
