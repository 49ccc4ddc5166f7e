// Library-Root: Hardware-Adapter, Tasks und geteilte Typen der Firmware
#![no_std]

// Heap für WiFi und HTTP-Antworten
extern crate alloc;

pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von light-core
pub use light_core::{
    AlertNotice, CommandInput, Connectivity, Console, Monitor, MonitorConfig, StatusDisplay,
    StatusSnapshot,
};

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::watch::{Sender, Watch};

use crate::config::STATUS_WATCH_RECEIVERS;

// ============================================================================
// Type-Aliase für den Status-Watch
// ============================================================================
//
// Der Monitor-Task veröffentlicht nach jedem Zyklus einen Snapshot,
// die HTTP-Tasks lesen jeweils den zuletzt veröffentlichten.

/// Watch für den aktuellen Monitor-Zustand
pub type StatusWatch = Watch<NoopRawMutex, StatusSnapshot, STATUS_WATCH_RECEIVERS>;

/// Sender-Seite (Monitor-Task)
pub type StatusSender = Sender<'static, NoopRawMutex, StatusSnapshot, STATUS_WATCH_RECEIVERS>;
