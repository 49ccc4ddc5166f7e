//! Kalibrierung: neuer Schwellwert aus dem Mittelwert von N Messwerten
//!
//! Zustände: Idle → Collecting → Idle. Das 500 ms Raster zwischen zwei
//! `tick()` Aufrufen ist Sache des Aufrufers (ein Aufruf pro Zyklus).

use heapless::Vec;

use crate::logic::mean;
use crate::types::CALIBRATION_SAMPLES;

/// Ergebnis eines `tick()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationProgress {
    /// Keine Kalibrierung aktiv, Messwert verworfen
    Idle,
    /// Messwert gespeichert, `collected` von CALIBRATION_SAMPLES
    Collecting { collected: usize },
    /// Alle Messwerte gesammelt, Session beendet
    Complete { threshold: u16 },
}

#[derive(Default)]
pub struct Calibrator {
    samples: Vec<u16, CALIBRATION_SAMPLES>,
    in_progress: bool,
}

impl Calibrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Startet eine neue Session (eine laufende wird verworfen)
    pub fn start(&mut self) {
        self.samples.clear();
        self.in_progress = true;
    }

    pub fn is_collecting(&self) -> bool {
        self.in_progress
    }

    /// Anzahl bereits gesammelter Werte, `None` außerhalb einer Session
    pub fn collected(&self) -> Option<usize> {
        self.in_progress.then_some(self.samples.len())
    }

    pub fn tick(&mut self, sample: u16) -> CalibrationProgress {
        if !self.in_progress {
            return CalibrationProgress::Idle;
        }

        // Kapazität == CALIBRATION_SAMPLES, die Session endet beim Erreichen
        let _ = self.samples.push(sample);

        if self.samples.len() < CALIBRATION_SAMPLES {
            return CalibrationProgress::Collecting {
                collected: self.samples.len(),
            };
        }

        let threshold = mean(&self.samples);
        self.samples.clear();
        self.in_progress = false;
        CalibrationProgress::Complete { threshold }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CalibrationProgress {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CalibrationProgress::Idle => defmt::write!(fmt, "Idle"),
            CalibrationProgress::Collecting { collected } => {
                defmt::write!(fmt, "Collecting {}/{}", collected, CALIBRATION_SAMPLES)
            }
            CalibrationProgress::Complete { threshold } => {
                defmt::write!(fmt, "Complete (threshold {})", threshold)
            }
        }
    }
}
