//! Monitor-Kontext: ein Polling-Zyklus ohne globale Variablen
//!
//! Ablauf pro Zyklus:
//! Messwert → Operator-Kommandos → (Kalibrierung, beendet den Zyklus) →
//! Alarm-Auswertung → Snapshot für die Anzeige.
//!
//! Der Monitor ist synchron und blockiert nie. Das Senden der
//! Benachrichtigung, das Warten zwischen den Zyklen und die Anzeige
//! übernimmt der Aufrufer.

use core::fmt::Write;

use heapless::String;

use crate::alert::{AlertDecision, AlertStateMachine};
use crate::calibration::{CalibrationProgress, Calibrator};
use crate::command::{CommandOutcome, CommandProcessor};
use crate::status::StatusSnapshot;
use crate::traits::{CommandInput, Console};
use crate::types::{
    AlertNotice, AlertState, CALIBRATION_SAMPLES, Connectivity, MAX_SCALE, MonitorConfig,
};
use crate::webhook::Delivery;

/// Was der Zyklus mit dem Messwert gemacht hat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    /// Schwellwert-Eingabe offen, Auswertung pausiert
    AwaitingInput,
    /// Messwert ging in die Kalibrierung, Auswertung übersprungen
    Calibrating(CalibrationProgress),
    /// Normale Alarm-Auswertung
    Monitoring(AlertDecision),
}

/// Ergebnis eines Zyklus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub phase: CyclePhase,
    /// Zu sendende Benachrichtigung (nur bei bestehender Verbindung)
    pub notify: Option<AlertNotice>,
    pub snapshot: StatusSnapshot,
}

pub struct Monitor {
    threshold: u16,
    sample: u16,
    alerts: AlertStateMachine,
    calibrator: Calibrator,
    commands: CommandProcessor,
}

impl Monitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            threshold: config.initial_threshold.min(MAX_SCALE),
            sample: 0,
            alerts: AlertStateMachine::new(config.cooldown_ms),
            calibrator: Calibrator::new(),
            commands: CommandProcessor::new(),
        }
    }

    pub fn threshold(&self) -> u16 {
        self.threshold
    }

    pub fn sample(&self) -> u16 {
        self.sample
    }

    pub fn alert_state(&self) -> AlertState {
        self.alerts.state()
    }

    pub fn last_alert_ms(&self) -> Option<u64> {
        self.alerts.last_alert_ms()
    }

    pub fn is_calibrating(&self) -> bool {
        self.calibrator.is_collecting()
    }

    pub fn is_awaiting_input(&self) -> bool {
        self.commands.is_awaiting_input()
    }

    pub fn start_calibration<C: Console>(&mut self, console: &mut C) {
        self.calibrator.start();
        let mut line: String<64> = String::new();
        let _ = write!(line, "Starting calibration... collecting {} samples", CALIBRATION_SAMPLES);
        console.println(&line);
    }

    pub fn snapshot(&self, now_ms: u64, connectivity: Connectivity) -> StatusSnapshot {
        StatusSnapshot {
            sample: self.sample,
            threshold: self.threshold,
            alert_state: self.alerts.state(),
            connectivity,
            seconds_since_last_alert: self.alerts.seconds_since_last_alert(now_ms),
            calibration: self.calibrator.collected(),
            awaiting_input: self.commands.is_awaiting_input(),
        }
    }

    /// Führt einen Zyklus mit einem frischen Messwert aus
    pub fn run_cycle<I: CommandInput, C: Console>(
        &mut self,
        sample: u16,
        now_ms: u64,
        connectivity: Connectivity,
        input: &mut I,
        console: &mut C,
    ) -> CycleReport {
        self.sample = sample.min(MAX_SCALE);

        match self.commands.poll(input, console) {
            CommandOutcome::StartCalibration => self.start_calibration(console),
            CommandOutcome::StatusRequested => {
                console.println(&self.snapshot(now_ms, connectivity).report());
            }
            CommandOutcome::ThresholdAccepted(threshold) => self.commit_threshold(threshold),
            CommandOutcome::Idle
            | CommandOutcome::ThresholdPending
            | CommandOutcome::ThresholdRejected(_)
            | CommandOutcome::Unknown(_) => {}
        }

        let phase = if self.commands.is_awaiting_input() {
            CyclePhase::AwaitingInput
        } else if self.calibrator.is_collecting() {
            CyclePhase::Calibrating(self.calibration_tick(console))
        } else {
            CyclePhase::Monitoring(self.alerts.evaluate(self.sample, self.threshold, now_ms))
        };

        let mut notify = None;
        if phase == CyclePhase::Monitoring(AlertDecision::Triggered) {
            let mut line: String<64> = String::new();
            let _ = write!(
                line,
                "ALERT! Light level {} below threshold {}",
                self.sample, self.threshold
            );
            console.println(&line);

            if connectivity.connected {
                notify = Some(AlertNotice {
                    sample: self.sample,
                    threshold: self.threshold,
                    at_ms: now_ms,
                });
            } else {
                console.println("WiFi not connected - notification skipped");
            }
        }

        CycleReport {
            phase,
            notify,
            snapshot: self.snapshot(now_ms, connectivity),
        }
    }

    fn calibration_tick<C: Console>(&mut self, console: &mut C) -> CalibrationProgress {
        let progress = self.calibrator.tick(self.sample);
        let mut line: String<64> = String::new();
        match progress {
            CalibrationProgress::Collecting { collected } => {
                let _ = write!(
                    line,
                    "Calibration sample {}/{}: {}",
                    collected, CALIBRATION_SAMPLES, self.sample
                );
                console.println(&line);
            }
            CalibrationProgress::Complete { threshold } => {
                self.commit_threshold(threshold);
                let _ = write!(line, "Calibration complete! New threshold: {}", threshold);
                console.println(&line);
            }
            CalibrationProgress::Idle => {}
        }
        progress
    }

    fn commit_threshold(&mut self, threshold: u16) {
        self.threshold = threshold;
        self.alerts.reset();
    }
}

/// Meldet das Ergebnis einer Zustellung an der Konsole
///
/// Der Alarm-Zustand ist zu diesem Zeitpunkt bereits committed, ein Fehler
/// wird weder wiederholt noch zurückgerollt.
pub fn report_delivery<C: Console>(code: i32, console: &mut C) -> Delivery {
    let delivery = Delivery::from_code(code);
    let mut line: String<64> = String::new();
    let _ = match delivery {
        Delivery::Delivered { status } if delivery.is_accepted() => {
            write!(line, "Notification sent (HTTP {})", status)
        }
        Delivery::Delivered { status } => write!(line, "Notification rejected (HTTP {})", status),
        Delivery::Failed { code } => write!(line, "Notification failed (error {})", code),
    };
    console.println(&line);
    delivery
}

#[cfg(feature = "defmt")]
impl defmt::Format for CyclePhase {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CyclePhase::AwaitingInput => defmt::write!(fmt, "AwaitingInput"),
            CyclePhase::Calibrating(progress) => defmt::write!(fmt, "Calibrating({})", progress),
            CyclePhase::Monitoring(decision) => defmt::write!(fmt, "Monitoring({})", decision),
        }
    }
}
