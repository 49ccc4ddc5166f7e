//! Operator-Kommandos von der seriellen Konsole
//!
//! Ein Byte pro Kommando. `t` öffnet eine Eingabe für den Schwellwert, die
//! über mehrere Zyklen offen bleiben kann: solange keine Zeile abgeschlossen
//! ist, liefert `poll()` `ThresholdPending` und der Zyklus pausiert.

use core::fmt::Write;

use heapless::String;

use crate::traits::{CommandInput, Console};
use crate::types::{MAX_SCALE, OperatorCommand, ThresholdError};

/// Maximale Länge einer Schwellwert-Eingabe in Zeichen
const ENTRY_CAPACITY: usize = 12;

/// Polls ohne neue Bytes, nach denen eine Eingabe ohne Zeilenende als
/// abgeschlossen gilt (bei 500 ms Zyklus ca. 1 s)
pub const ENTRY_IDLE_POLLS: u8 = 2;

/// Ergebnis eines `poll()`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Keine Eingabe (oder nur Zeilenenden)
    Idle,
    StartCalibration,
    StatusRequested,
    /// Schwellwert-Eingabe offen, im nächsten Zyklus erneut pollen
    ThresholdPending,
    ThresholdAccepted(u16),
    ThresholdRejected(ThresholdError),
    Unknown(u8),
}

/// Parst eine Schwellwert-Eingabe und prüft den Bereich [0, MAX_SCALE]
pub fn parse_threshold(text: &str) -> Result<u16, ThresholdError> {
    let value: i32 = text
        .trim()
        .parse()
        .map_err(|_| ThresholdError::NotANumber)?;
    if (0..=MAX_SCALE as i32).contains(&value) {
        Ok(value as u16)
    } else {
        Err(ThresholdError::OutOfRange(value))
    }
}

#[derive(Default)]
struct ThresholdEntry {
    buffer: String<ENTRY_CAPACITY>,
    overflowed: bool,
    idle_polls: u8,
}

impl ThresholdEntry {
    fn is_empty(&self) -> bool {
        self.buffer.is_empty() && !self.overflowed
    }

    fn push(&mut self, byte: u8) {
        if self.buffer.push(byte as char).is_err() {
            self.overflowed = true;
        }
    }

    fn parse(&self) -> Result<u16, ThresholdError> {
        if self.overflowed {
            return Err(ThresholdError::NotANumber);
        }
        parse_threshold(&self.buffer)
    }
}

#[derive(Default)]
pub struct CommandProcessor {
    entry: Option<ThresholdEntry>,
}

impl CommandProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_awaiting_input(&self) -> bool {
        self.entry.is_some()
    }

    /// Verarbeitet anstehende Eingaben
    ///
    /// Außerhalb einer Schwellwert-Eingabe wird höchstens ein Kommando pro
    /// Aufruf ausgeführt, führende Zeilenenden werden übersprungen.
    pub fn poll<I: CommandInput, C: Console>(
        &mut self,
        input: &mut I,
        console: &mut C,
    ) -> CommandOutcome {
        if self.entry.is_some() {
            return self.continue_entry(input, console);
        }

        while let Some(byte) = input.read_byte() {
            match OperatorCommand::from(byte) {
                OperatorCommand::LineEnding => continue,
                OperatorCommand::Calibrate => return CommandOutcome::StartCalibration,
                OperatorCommand::Status => return CommandOutcome::StatusRequested,
                OperatorCommand::SetThreshold => {
                    console.println("Enter new threshold (0-4095):");
                    self.entry = Some(ThresholdEntry::default());
                    return self.continue_entry(input, console);
                }
                OperatorCommand::Unknown(other) => {
                    console.println(
                        "Unknown command. Use 'c' to calibrate, 't' to set threshold, 's' for status",
                    );
                    return CommandOutcome::Unknown(other);
                }
            }
        }

        CommandOutcome::Idle
    }

    fn continue_entry<I: CommandInput, C: Console>(
        &mut self,
        input: &mut I,
        console: &mut C,
    ) -> CommandOutcome {
        let Some(entry) = self.entry.as_mut() else {
            return CommandOutcome::Idle;
        };

        let mut complete = false;
        let mut received = false;
        while let Some(byte) = input.read_byte() {
            received = true;
            match byte {
                // Rest der `t`-Zeile und führende Leerzeichen
                b'\r' | b'\n' | b' ' if entry.is_empty() => continue,
                b'\r' | b'\n' => {
                    complete = true;
                    break;
                }
                other => entry.push(other),
            }
        }

        if !complete {
            // Leere Eingabe wartet weiter, angefangene Zahl läuft aus
            if received || entry.is_empty() {
                entry.idle_polls = 0;
                return CommandOutcome::ThresholdPending;
            }
            entry.idle_polls += 1;
            if entry.idle_polls < ENTRY_IDLE_POLLS {
                return CommandOutcome::ThresholdPending;
            }
        }

        let result = entry.parse();
        self.entry = None;
        input.drain();

        let mut line: String<64> = String::new();
        match result {
            Ok(threshold) => {
                let _ = write!(line, "Threshold set to: {}", threshold);
                console.println(&line);
                CommandOutcome::ThresholdAccepted(threshold)
            }
            Err(ThresholdError::OutOfRange(value)) => {
                let _ = write!(
                    line,
                    "Invalid threshold {}! Must be between 0 and {}",
                    value, MAX_SCALE
                );
                console.println(&line);
                CommandOutcome::ThresholdRejected(ThresholdError::OutOfRange(value))
            }
            Err(ThresholdError::NotANumber) => {
                console.println("Invalid threshold! Please enter a number between 0 and 4095");
                CommandOutcome::ThresholdRejected(ThresholdError::NotANumber)
            }
        }
    }
}
