// Lichtsensor am ADC1
//
// Fotowiderstand im Spannungsteiler an GPIO0, 11 dB Dämpfung für den vollen
// 0-3.3 V Bereich. Der ADC liefert 12 Bit (0-4095).

use defmt::warn;
use esp_hal::Blocking;
use esp_hal::analog::adc::{Adc, AdcPin};
use esp_hal::peripherals::{ADC1, GPIO0};
use light_core::{HeldReading, LightSensor};

use crate::config::SENSOR_READ_RETRIES;

pub type LightAdc = Adc<'static, ADC1<'static>, Blocking>;
pub type LightAdcPin = AdcPin<GPIO0<'static>, ADC1<'static>>;

pub struct AdcLightSensor {
    adc: LightAdc,
    pin: LightAdcPin,
    /// Wird bei ausbleibender Wandlung wiederholt
    held: HeldReading,
}

impl AdcLightSensor {
    pub fn new(adc: LightAdc, pin: LightAdcPin) -> Self {
        Self {
            adc,
            pin,
            held: HeldReading::new(),
        }
    }
}

impl LightSensor for AdcLightSensor {
    fn read_raw(&mut self) -> i32 {
        // read_oneshot liefert WouldBlock bis die Wandlung fertig ist
        let fresh = (0..SENSOR_READ_RETRIES)
            .find_map(|_| self.adc.read_oneshot(&mut self.pin).ok())
            .map(i32::from);

        let raw = self.held.resolve(fresh);
        if fresh.is_none() {
            warn!("Sensor: ADC conversion did not finish, repeating {}", raw);
        }
        raw
    }
}
