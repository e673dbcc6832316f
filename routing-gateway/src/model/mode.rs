//! Transport modes served by the gateway.

use std::fmt;
use std::str::FromStr;

use crate::error::{ErrorKind, RoutingError};

/// A supported means of travel.
///
/// The set is closed: routing is dispatched either to the walking provider
/// or to the public transport provider. Requests for anything else are
/// rejected when the mode string is parsed, before any provider is touched.
///
/// # Examples
///
/// ```
/// use routing_gateway::model::TransportMode;
///
/// let mode: TransportMode = "walking".parse().unwrap();
/// assert_eq!(mode, TransportMode::Walking);
///
/// // Upper-case spellings are accepted too
/// let mode: TransportMode = "PUBLIC_TRANSPORT".parse().unwrap();
/// assert_eq!(mode, TransportMode::PublicTransport);
///
/// assert!("driving".parse::<TransportMode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportMode {
    /// On foot.
    Walking,
    /// Scheduled public transport (bus, tram, rail).
    PublicTransport,
}

impl TransportMode {
    /// Canonical lower-case name, as used in mode strings and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Walking => "walking",
            TransportMode::PublicTransport => "public_transport",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = RoutingError;

    /// Parse a mode name, case-insensitively.
    ///
    /// Unknown names fail with [`ErrorKind::InvalidTransportMode`] and a
    /// message naming both supported modes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "walking" => Ok(TransportMode::Walking),
            "public_transport" => Ok(TransportMode::PublicTransport),
            _ => Err(RoutingError::new(
                ErrorKind::InvalidTransportMode,
                format!(
                    "can not request transport mode \"{}\": only walking and public_transport are available",
                    s
                ),
            )),
        }
    }
}
