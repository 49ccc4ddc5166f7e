//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use rgb::RGB8;

use crate::status::StatusSnapshot;
use crate::types::{AlertState, MAX_SCALE};

/// Klemmt einen Rohwert auf die Sensor-Skala [0, MAX_SCALE]
///
/// # Beispiele
///
/// ```
/// # use light_core::clamp_sample;
/// assert_eq!(clamp_sample(-12), 0);
/// assert_eq!(clamp_sample(1234), 1234);
/// assert_eq!(clamp_sample(5000), 4095);
/// ```
pub fn clamp_sample(raw: i32) -> u16 {
    raw.clamp(0, MAX_SCALE as i32) as u16
}

/// Ganzzahliger Mittelwert (abgeschnitten), 0 für eine leere Liste
pub fn mean(samples: &[u16]) -> u16 {
    if samples.is_empty() {
        return 0;
    }
    let sum: u32 = samples.iter().map(|&s| s as u32).sum();
    (sum / samples.len() as u32) as u16
}

/// Farbe der Status-LED für einen Snapshot
///
/// Priorität: Eingabe ausstehend (Gelb) → Kalibrierung (Blau) →
/// Alarm aktiv (Rot) → Normal (Grün).
pub fn indicator_color(snapshot: &StatusSnapshot, brightness: u8) -> RGB8 {
    if snapshot.awaiting_input {
        RGB8 {
            r: brightness,
            g: brightness,
            b: 0,
        }
    } else if snapshot.calibration.is_some() {
        RGB8 {
            r: 0,
            g: 0,
            b: brightness,
        }
    } else {
        match snapshot.alert_state {
            AlertState::Active => RGB8 {
                r: brightness,
                g: 0,
                b: 0,
            },
            AlertState::Normal => RGB8 {
                r: 0,
                g: brightness,
                b: 0,
            },
        }
    }
}
