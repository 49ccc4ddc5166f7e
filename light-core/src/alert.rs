//! Alarm-Zustandsmaschine mit Entprellung
//!
//! ```text
//!   NORMAL ──[sample < threshold, cooldown abgelaufen]──▶ ACTIVE  (Benachrichtigung)
//!     ▲  └──[sample < threshold, cooldown läuft]──▶ NORMAL (unterdrückt)
//!     │                                               │
//!     └────────────[sample >= threshold]──────────────┘
//! ```
//!
//! Nur der Eintritt in ACTIVE ist entprellt, die Rückkehr nach NORMAL
//! erfolgt sofort. Die Sperrzeit läuft ab dem letzten Alarm, auch über eine
//! zwischenzeitliche Erholung hinweg.

use crate::types::AlertState;

/// Ergebnis einer Auswertung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDecision {
    /// NORMAL → ACTIVE, Benachrichtigung senden
    Triggered,
    /// Unter dem Schwellwert, aber innerhalb der Sperrzeit
    Suppressed,
    /// Bereits ACTIVE und weiterhin unter dem Schwellwert
    Holding,
    /// ACTIVE → NORMAL
    Recovered,
    /// NORMAL und über dem Schwellwert
    Clear,
}

pub struct AlertStateMachine {
    state: AlertState,
    /// `None` solange noch nie alarmiert wurde
    last_alert_ms: Option<u64>,
    cooldown_ms: u64,
}

impl AlertStateMachine {
    pub fn new(cooldown_ms: u64) -> Self {
        Self {
            state: AlertState::Normal,
            last_alert_ms: None,
            cooldown_ms,
        }
    }

    pub fn state(&self) -> AlertState {
        self.state
    }

    pub fn last_alert_ms(&self) -> Option<u64> {
        self.last_alert_ms
    }

    /// Ganze Sekunden seit dem letzten Alarm
    pub fn seconds_since_last_alert(&self, now_ms: u64) -> Option<u64> {
        self.last_alert_ms
            .map(|last| now_ms.saturating_sub(last) / 1000)
    }

    fn cooldown_elapsed(&self, now_ms: u64) -> bool {
        match self.last_alert_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > self.cooldown_ms,
        }
    }

    /// Wertet einen Messwert aus und committed den Folgezustand
    ///
    /// Bei `Triggered` ist der Zustand bereits ACTIVE und der Zeitstempel
    /// gesetzt, unabhängig davon ob die Benachrichtigung später ankommt.
    pub fn evaluate(&mut self, sample: u16, threshold: u16, now_ms: u64) -> AlertDecision {
        if sample >= threshold {
            let decision = match self.state {
                AlertState::Active => AlertDecision::Recovered,
                AlertState::Normal => AlertDecision::Clear,
            };
            self.state = AlertState::Normal;
            return decision;
        }

        match self.state {
            AlertState::Active => AlertDecision::Holding,
            AlertState::Normal if self.cooldown_elapsed(now_ms) => {
                self.state = AlertState::Active;
                self.last_alert_ms = Some(now_ms);
                AlertDecision::Triggered
            }
            AlertState::Normal => AlertDecision::Suppressed,
        }
    }

    /// Erzwingt NORMAL (nach Schwellwert-Änderung), der Zeitstempel bleibt
    pub fn reset(&mut self) {
        self.state = AlertState::Normal;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AlertDecision {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            AlertDecision::Triggered => defmt::write!(fmt, "Triggered"),
            AlertDecision::Suppressed => defmt::write!(fmt, "Suppressed"),
            AlertDecision::Holding => defmt::write!(fmt, "Holding"),
            AlertDecision::Recovered => defmt::write!(fmt, "Recovered"),
            AlertDecision::Clear => defmt::write!(fmt, "Clear"),
        }
    }
}
