//! Core Types für den Licht-Alarm
//!
//! Datenstrukturen und Konstanten ohne Hardware-Dependencies

/// Obergrenze der Sensor-Skala (12-Bit ADC)
pub const MAX_SCALE: u16 = 4095;

/// Schwellwert nach dem Einschalten
pub const DEFAULT_THRESHOLD: u16 = 2000;

/// Mindestabstand zwischen zwei Alarm-Benachrichtigungen in Millisekunden
pub const ALERT_COOLDOWN_MS: u64 = 60_000;

/// Anzahl Messwerte pro Kalibrierung
pub const CALIBRATION_SAMPLES: usize = 10;

/// Laufzeit-Konfiguration des Monitors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Schwellwert vor der ersten Kalibrierung
    pub initial_threshold: u16,
    /// Sperrzeit zwischen zwei Benachrichtigungen
    pub cooldown_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            initial_threshold: DEFAULT_THRESHOLD,
            cooldown_ms: ALERT_COOLDOWN_MS,
        }
    }
}

/// Alarm-Zustand
///
/// `Active` nur solange der letzte Messwert unter dem Schwellwert liegt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AlertState {
    #[default]
    Normal,
    Active,
}

impl AlertState {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertState::Normal => "NORMAL",
            AlertState::Active => "ACTIVE",
        }
    }
}

/// Netzwerk-Zustand, gehört dem WiFi-Kollaborateur (für den Core read-only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Connectivity {
    pub connected: bool,
    pub ipv4: Option<[u8; 4]>,
}

impl Connectivity {
    pub const fn offline() -> Self {
        Self {
            connected: false,
            ipv4: None,
        }
    }

    pub const fn online(ipv4: [u8; 4]) -> Self {
        Self {
            connected: true,
            ipv4: Some(ipv4),
        }
    }
}

/// Alarm der an den Webhook gemeldet werden soll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertNotice {
    pub sample: u16,
    pub threshold: u16,
    pub at_ms: u64,
}

/// Operator-Kommando (ein Byte von der seriellen Konsole)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    /// `c` / `C`
    Calibrate,
    /// `t` / `T`
    SetThreshold,
    /// `s` / `S`
    Status,
    /// CR / LF
    LineEnding,
    Unknown(u8),
}

impl From<u8> for OperatorCommand {
    fn from(byte: u8) -> Self {
        match byte {
            b'c' | b'C' => Self::Calibrate,
            b't' | b'T' => Self::SetThreshold,
            b's' | b'S' => Self::Status,
            b'\r' | b'\n' => Self::LineEnding,
            other => Self::Unknown(other),
        }
    }
}

/// Fehler bei manueller Schwellwert-Eingabe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdError {
    /// Zahl gelesen, aber außerhalb von [0, MAX_SCALE]
    OutOfRange(i32),
    NotANumber,
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for AlertState {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AlertNotice {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "AlertNotice {{ sample: {}, threshold: {}, at: {}ms }}",
            self.sample,
            self.threshold,
            self.at_ms
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for OperatorCommand {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            OperatorCommand::Calibrate => defmt::write!(fmt, "Calibrate"),
            OperatorCommand::SetThreshold => defmt::write!(fmt, "SetThreshold"),
            OperatorCommand::Status => defmt::write!(fmt, "Status"),
            OperatorCommand::LineEnding => defmt::write!(fmt, "LineEnding"),
            OperatorCommand::Unknown(byte) => defmt::write!(fmt, "Unknown({=u8:#x})", byte),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ThresholdError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ThresholdError::OutOfRange(value) => defmt::write!(fmt, "out of range: {}", value),
            ThresholdError::NotANumber => defmt::write!(fmt, "not a number"),
        }
    }
}
