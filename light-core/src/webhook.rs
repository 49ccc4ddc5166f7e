//! Webhook-Wire-Format und Status-Codes des Transports
//!
//! Der Transport selbst (TCP, TLS, HTTP) lebt in der Firmware. Hier liegen
//! nur die testbaren Teile: Ziel-URL, Nachrichtentext, JSON-Body und die
//! Einordnung des Ergebnisses.

use core::fmt::Write;

use heapless::String;

use crate::types::MAX_SCALE;

/// Puffergröße für den Nachrichtentext
pub const MESSAGE_CAPACITY: usize = 160;


/// Transport-Fehler
///
/// Jeder Fehler hat einen festen, nicht-positiven Status-Code. Der Monitor
/// unterscheidet sie nicht: jeder Code ≤ 0 heißt "fehlgeschlagen, kein Retry".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    ConnectionRefused,
    SendFailed,
    NotConnected,
    ConnectionLost,
    InvalidResponse,
    Timeout,
    DnsFailed,
}

impl TransportError {
    pub fn code(self) -> i32 {
        match self {
            TransportError::ConnectionRefused => -1,
            TransportError::SendFailed => -3,
            TransportError::NotConnected => -4,
            TransportError::ConnectionLost => -5,
            TransportError::InvalidResponse => -7,
            TransportError::Timeout => -11,
            TransportError::DnsFailed => -12,
        }
    }
}

/// Klassifizierter Status-Code einer Zustellung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Code > 0: HTTP-Status vom Empfänger
    Delivered { status: u16 },
    /// Code ≤ 0: Transport-Fehler
    Failed { code: i32 },
}

impl Delivery {
    pub fn from_code(code: i32) -> Self {
        if code > 0 {
            Delivery::Delivered {
                status: code.min(u16::MAX as i32) as u16,
            }
        } else {
            Delivery::Failed { code }
        }
    }

    /// 2xx (Discord antwortet mit 204 No Content)
    pub fn is_accepted(self) -> bool {
        matches!(self, Delivery::Delivered { status } if (200..300).contains(&status))
    }
}

/// Fehler beim Aufbau eines Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    BufferTooSmall,
}

/// Menschenlesbarer Alarmtext
pub fn alert_message(sample: u16, threshold: u16) -> String<MESSAGE_CAPACITY> {
    let mut text = String::new();
    let _ = write!(
        text,
        "**Light Detection Alert!** Light level dropped below threshold - sensor reading: {} / {}, threshold: {}",
        sample, MAX_SCALE, threshold
    );
    text
}

/// JSON-Body für den Webhook
#[cfg(feature = "serde")]
#[derive(serde::Serialize)]
pub struct WebhookPayload<'a> {
    pub content: &'a str,
}

/// Serialisiert `{"content": "..."}` in `buf`, liefert die Länge
#[cfg(feature = "serde")]
pub fn encode_payload(sample: u16, threshold: u16, buf: &mut [u8]) -> Result<usize, PayloadError> {
    let message = alert_message(sample, threshold);
    let payload = WebhookPayload {
        content: message.as_str(),
    };
    serde_json_core::to_slice(&payload, buf).map_err(|_| PayloadError::BufferTooSmall)
}

/// Fehler in der Webhook-URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlError {
    /// Weder `http://` noch `https://`
    UnsupportedScheme,
    MissingHost,
    InvalidPort,
}

/// Zerlegte Webhook-URL, z.B. `https://discord.com/api/webhooks/<id>/<token>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookUrl<'a> {
    /// `https`: Zustellung über TLS
    pub secure: bool,
    pub host: &'a str,
    pub port: u16,
    pub path: &'a str,
}

impl<'a> WebhookUrl<'a> {
    pub fn parse(url: &'a str) -> Result<Self, UrlError> {
        let (secure, rest) = if let Some(rest) = url.strip_prefix("https://") {
            (true, rest)
        } else if let Some(rest) = url.strip_prefix("http://") {
            (false, rest)
        } else {
            return Err(UrlError::UnsupportedScheme);
        };

        let (authority, path) = match rest.find('/') {
            Some(slash) => rest.split_at(slash),
            None => (rest, "/"),
        };

        let (host, port) = match authority.split_once(':') {
            Some((host, port)) => (host, port.parse().map_err(|_| UrlError::InvalidPort)?),
            None => (authority, if secure { 443 } else { 80 }),
        };
        if host.is_empty() {
            return Err(UrlError::MissingHost);
        }

        Ok(Self {
            secure,
            host,
            port,
            path,
        })
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransportError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            TransportError::ConnectionRefused => defmt::write!(fmt, "Connection refused"),
            TransportError::SendFailed => defmt::write!(fmt, "Send failed"),
            TransportError::NotConnected => defmt::write!(fmt, "Not connected"),
            TransportError::ConnectionLost => defmt::write!(fmt, "Connection lost"),
            TransportError::InvalidResponse => defmt::write!(fmt, "Invalid response"),
            TransportError::Timeout => defmt::write!(fmt, "Timeout"),
            TransportError::DnsFailed => defmt::write!(fmt, "DNS failed"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for UrlError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            UrlError::UnsupportedScheme => defmt::write!(fmt, "unsupported scheme"),
            UrlError::MissingHost => defmt::write!(fmt, "missing host"),
            UrlError::InvalidPort => defmt::write!(fmt, "invalid port"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Delivery {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Delivery::Delivered { status } => defmt::write!(fmt, "HTTP {}", status),
            Delivery::Failed { code } => defmt::write!(fmt, "transport error {}", code),
        }
    }
}
