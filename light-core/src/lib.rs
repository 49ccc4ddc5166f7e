//! Light Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert die Traits für Sensor, Konsole und Anzeige sowie die
//! Zustandsmaschinen für Alarm, Kalibrierung und Kommandos.

#![no_std]

pub mod alert;
pub mod calibration;
pub mod command;
pub mod logic;
pub mod monitor;
pub mod sensor;
pub mod status;
pub mod traits;
pub mod types;
pub mod webhook;

// Re-exports für einfachen Zugriff
pub use alert::{AlertDecision, AlertStateMachine};
pub use calibration::{CalibrationProgress, Calibrator};
pub use command::{CommandOutcome, CommandProcessor, parse_threshold};
pub use logic::{clamp_sample, indicator_color, mean};
pub use monitor::{CyclePhase, CycleReport, Monitor, report_delivery};
pub use sensor::{HeldReading, SensorReader};
pub use status::StatusSnapshot;
pub use traits::{CommandInput, Console, DisplayError, LightSensor, StatusDisplay};
pub use types::{
    ALERT_COOLDOWN_MS, AlertNotice, AlertState, CALIBRATION_SAMPLES, Connectivity,
    DEFAULT_THRESHOLD, MAX_SCALE, MonitorConfig, OperatorCommand, ThresholdError,
};
pub use webhook::{Delivery, PayloadError, TransportError, UrlError, WebhookUrl};
