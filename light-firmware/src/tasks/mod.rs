// Task-Modul: Embassy Tasks der Firmware
//
// Der Monitor-Task ist der einzige Schreiber des Monitor-Zustands und
// veröffentlicht Snapshots über den StatusWatch (Monitor → HTTP).

pub mod http;
pub mod mdns;
pub mod monitor;
pub mod webhook;
pub mod wifi;

pub use http::http_server_task;
pub use mdns::mdns_responder_task;
pub use monitor::monitor_task;
pub use wifi::{connection_task, dhcp_task, net_task};
