// Operator-Konsole über USB-Serial-JTAG
//
// Eingabe: Bytes vom RX-Teil des USB-Serial-JTAG, nicht-blockierend.
// Ausgabe: Klartext-Zeilen über esp_println, getrennt vom defmt-Log.

use esp_hal::Blocking;
use esp_hal::usb_serial_jtag::UsbSerialJtagRx;
use light_core::{CommandInput, Console};

pub struct SerialCommandInput {
    rx: UsbSerialJtagRx<'static, Blocking>,
}

impl SerialCommandInput {
    pub fn new(rx: UsbSerialJtagRx<'static, Blocking>) -> Self {
        Self { rx }
    }
}

impl CommandInput for SerialCommandInput {
    fn read_byte(&mut self) -> Option<u8> {
        self.rx.read_byte()
    }
}

/// Zeilen-Ausgabe für Operator-Meldungen
pub struct SerialConsole;

impl Console for SerialConsole {
    fn println(&mut self, text: &str) {
        esp_println::println!("{}", text);
    }
}
