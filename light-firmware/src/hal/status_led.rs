// Status-LED (WS2812 über RMT)
//
// Zeigt den Monitor-Zustand als Farbe:
// grün = NORMAL, rot = ACTIVE, blau = Kalibrierung, gelb = wartet auf Eingabe

use defmt::info;
use esp_hal::Blocking;
use esp_hal::peripherals::{GPIO8, RMT};
use esp_hal::rmt::{PulseCode, Rmt};
use esp_hal::time::Rate;
use esp_hal_smartled::SmartLedsAdapter;
use light_core::{DisplayError, StatusDisplay, StatusSnapshot, indicator_color};
use rgb::RGB8;
use smart_leds_trait::SmartLedsWrite;

use crate::config::LED_BRIGHTNESS;

// Buffer-Größe für 1 LED (3 Farben * 8 Bits + 1 Reset)
pub const LED_BUFFER_SIZE: usize = 25;

/// Der Buffer muss den Adapter überleben, daher wird er vom Task
/// angelegt und hier nur ausgeliehen.
pub struct LedStatusDisplay<'a> {
    led: SmartLedsAdapter<'a, LED_BUFFER_SIZE>,
    shown: Option<RGB8>,
}

impl<'a> LedStatusDisplay<'a> {
    pub fn new(
        gpio8: GPIO8<'a>,
        rmt_peripheral: RMT<'a>,
        rmt_clock_mhz: u32,
        buffer: &'a mut [PulseCode; LED_BUFFER_SIZE],
    ) -> Result<Self, DisplayError> {
        let rmt: Rmt<'a, Blocking> = Rmt::new(rmt_peripheral, Rate::from_mhz(rmt_clock_mhz))
            .map_err(|_| DisplayError::RenderFailed)?;
        let led = SmartLedsAdapter::new(rmt.channel0, gpio8, buffer);

        Ok(Self { led, shown: None })
    }
}

impl StatusDisplay for LedStatusDisplay<'_> {
    fn render(&mut self, snapshot: &StatusSnapshot) -> Result<(), DisplayError> {
        let color = indicator_color(snapshot, LED_BRIGHTNESS);
        if self.shown == Some(color) {
            return Ok(());
        }

        self.led
            .write([color].into_iter())
            .map_err(|_| DisplayError::RenderFailed)?;
        self.shown = Some(color);

        info!(
            "Display: LED -> ({}, {}, {}) [{}]",
            color.r, color.g, color.b, snapshot.alert_state
        );
        Ok(())
    }
}
