//! Sensor-Leser mit optionaler Mittelwertbildung
//!
//! Mehrere Rohwerte direkt hintereinander gelesen und gemittelt
//! unterdrücken elektrisches Rauschen am ADC.

use crate::logic::clamp_sample;
use crate::traits::LightSensor;
use crate::types::MAX_SCALE;

pub struct SensorReader<S> {
    sensor: S,
    sub_reads: u8,
}

impl<S: LightSensor> SensorReader<S> {
    /// `sub_reads` = Anzahl Rohwerte pro Messung (0 wird wie 1 behandelt)
    pub fn new(sensor: S, sub_reads: u8) -> Self {
        Self {
            sensor,
            sub_reads: sub_reads.max(1),
        }
    }

    /// Liefert einen Messwert in [0, MAX_SCALE]
    ///
    /// Jeder Rohwert wird vor der Mittelung geklemmt, der Mittelwert wird
    /// abgeschnitten.
    pub fn read(&mut self) -> u16 {
        let mut sum: u32 = 0;
        for _ in 0..self.sub_reads {
            sum += clamp_sample(self.sensor.read_raw()) as u32;
        }
        (sum / self.sub_reads as u32) as u16
    }
}

/// Letzter gültiger Rohwert für Sensoren, deren Wandlung ausbleiben kann
///
/// Startet auf `MAX_SCALE` (hell), damit ein Ausfall vor der ersten
/// Messung keinen Alarm auslöst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeldReading {
    last: i32,
}

impl HeldReading {
    pub const fn new() -> Self {
        Self {
            last: MAX_SCALE as i32,
        }
    }

    /// Übernimmt einen frischen Wert oder wiederholt den letzten
    pub fn resolve(&mut self, fresh: Option<i32>) -> i32 {
        if let Some(raw) = fresh {
            self.last = raw;
        }
        self.last
    }
}

impl Default for HeldReading {
    fn default() -> Self {
        Self::new()
    }
}
