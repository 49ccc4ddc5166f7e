//! Hardware Abstraction Traits
//!
//! Diese Traits definieren die Schnittstellen zu den externen
//! Kollaborateuren (Sensor, Anzeige, Konsole) ohne konkrete Implementierung.

use crate::status::StatusSnapshot;

/// Fehler-Typ für Anzeige-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    RenderFailed,
}

/// Analoger Lichtsensor
///
/// # Implementierungen
/// - **Production:** AdcLightSensor (ESP32 ADC1)
/// - **Testing:** MockSensor (feste Wertefolge)
pub trait LightSensor {
    /// Liest einen Rohwert. Kein Fehlerpfad: Werte außerhalb der Skala
    /// werden vom `SensorReader` geklemmt.
    fn read_raw(&mut self) -> i32;
}

/// Eingabeseite der Operator-Konsole
pub trait CommandInput {
    /// Nächstes anstehendes Byte, `None` wenn nichts im Puffer liegt
    fn read_byte(&mut self) -> Option<u8>;

    /// Verwirft alles was noch im Eingangspuffer liegt
    fn drain(&mut self) {
        while self.read_byte().is_some() {}
    }
}

/// Ausgabeseite der Operator-Konsole
pub trait Console {
    fn println(&mut self, text: &str);
}

/// Status-Anzeige
///
/// Genau eine Implementierung wird zur Build-Zeit gewählt.
pub trait StatusDisplay {
    /// Zeigt den aktuellen Snapshot an
    ///
    /// # Fehlerbehandlung
    /// Der Monitor ignoriert das Ergebnis (fire-and-forget), die Firmware loggt es.
    fn render(&mut self, snapshot: &StatusSnapshot) -> Result<(), DisplayError>;
}

#[cfg(feature = "defmt")]
impl defmt::Format for DisplayError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            DisplayError::RenderFailed => defmt::write!(fmt, "Render failed"),
        }
    }
}
