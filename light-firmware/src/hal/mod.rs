// Hardware Abstraction Layer (HAL) Module
//
// Implementiert die Traits aus light-core für die ESP32-C6 Peripherie.

pub mod console;
pub mod light_sensor;
pub mod status_led;

pub use console::{SerialCommandInput, SerialConsole};
pub use light_sensor::{AdcLightSensor, LightAdc, LightAdcPin};
pub use status_led::LedStatusDisplay;
