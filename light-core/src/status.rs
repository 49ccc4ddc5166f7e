//! Status-Snapshot für Anzeige, Konsole (`s`) und HTTP-Endpoint

use core::fmt::{self, Write};

use heapless::String;

use crate::types::{AlertState, CALIBRATION_SAMPLES, Connectivity, MAX_SCALE};

/// Puffergröße für den Text-Report
pub const REPORT_CAPACITY: usize = 256;

/// Momentaufnahme des Monitors
///
/// Reine Funktion des Zustands: zwei Snapshots ohne Zustandsänderung
/// dazwischen (und mit gleichem `now`) sind identisch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatusSnapshot {
    pub sample: u16,
    pub threshold: u16,
    pub alert_state: AlertState,
    pub connectivity: Connectivity,
    pub seconds_since_last_alert: Option<u64>,
    /// Gesammelte Kalibrier-Werte, `None` außerhalb einer Kalibrierung
    pub calibration: Option<usize>,
    /// Schwellwert-Eingabe an der Konsole offen
    pub awaiting_input: bool,
}

impl StatusSnapshot {
    /// Schreibt den mehrzeiligen Text-Report
    ///
    /// Die IP-Adresse erscheint nur bei bestehender Verbindung.
    pub fn write_report<W: Write>(&self, out: &mut W) -> fmt::Result {
        writeln!(out, "--- Status ---")?;
        writeln!(out, "Light level: {} / {}", self.sample, MAX_SCALE)?;
        writeln!(out, "Threshold: {}", self.threshold)?;
        writeln!(out, "Alert: {}", self.alert_state.as_str())?;
        if let Some(collected) = self.calibration {
            writeln!(out, "Calibration: {}/{}", collected, CALIBRATION_SAMPLES)?;
        }
        match (self.connectivity.connected, self.connectivity.ipv4) {
            (true, Some([a, b, c, d])) => writeln!(out, "WiFi: connected, IP: {}.{}.{}.{}", a, b, c, d)?,
            (true, None) => writeln!(out, "WiFi: connected")?,
            (false, _) => writeln!(out, "WiFi: disconnected")?,
        }
        match self.seconds_since_last_alert {
            Some(secs) => write!(out, "Last alert: {}s ago", secs),
            None => write!(out, "Last alert: never"),
        }
    }

    pub fn report(&self) -> String<REPORT_CAPACITY> {
        let mut text = String::new();
        // Passt bei maximalen Feldbreiten in REPORT_CAPACITY
        let _ = self.write_report(&mut text);
        text
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusSnapshot {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "StatusSnapshot {{ sample: {}, threshold: {}, alert: {}, connected: {}, calibrating: {}, awaiting_input: {} }}",
            self.sample,
            self.threshold,
            self.alert_state,
            self.connectivity.connected,
            self.calibration.is_some(),
            self.awaiting_input
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> StatusSnapshot {
        StatusSnapshot {
            sample: 1500,
            threshold: 2000,
            alert_state: AlertState::Active,
            connectivity: Connectivity::offline(),
            seconds_since_last_alert: None,
            calibration: None,
            awaiting_input: false,
        }
    }

    #[test]
    fn test_report_offline_hides_ip() {
        let report = snapshot().report();
        assert_eq!(
            report.as_str(),
            "--- Status ---\n\
             Light level: 1500 / 4095\n\
             Threshold: 2000\n\
             Alert: ACTIVE\n\
             WiFi: disconnected\n\
             Last alert: never"
        );
    }

    #[test]
    fn test_report_online_shows_ip() {
        let mut snap = snapshot();
        snap.connectivity = Connectivity::online([192, 168, 1, 42]);
        snap.seconds_since_last_alert = Some(12);
        let report = snap.report();
        assert!(report.contains("WiFi: connected, IP: 192.168.1.42"));
        assert!(report.ends_with("Last alert: 12s ago"));
    }

    #[test]
    fn test_report_ip_ignored_when_disconnected() {
        let mut snap = snapshot();
        snap.connectivity = Connectivity {
            connected: false,
            ipv4: Some([10, 0, 0, 1]),
        };
        assert!(!snap.report().contains("10.0.0.1"));
    }

    #[test]
    fn test_report_calibration_progress() {
        let mut snap = snapshot();
        snap.calibration = Some(4);
        assert!(snap.report().contains("Calibration: 4/10"));
    }

    #[test]
    fn test_report_fits_capacity_at_max_widths() {
        let snap = StatusSnapshot {
            sample: 4095,
            threshold: 4095,
            alert_state: AlertState::Normal,
            connectivity: Connectivity::online([255, 255, 255, 255]),
            seconds_since_last_alert: Some(u64::MAX),
            calibration: Some(10),
            awaiting_input: true,
        };
        let mut text: String<REPORT_CAPACITY> = String::new();
        assert!(snap.write_report(&mut text).is_ok());
    }
}
