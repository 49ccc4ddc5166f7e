// Firmware-Einstiegspunkt: Licht-Alarm-Monitor für den ESP32-C6
#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

extern crate alloc;

use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Stack, StackResources};
use embassy_time::{Duration, Timer};

use esp_hal::analog::adc::{Adc, AdcConfig, Attenuation};
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;
use esp_hal::usb_serial_jtag::UsbSerialJtag;

use {esp_backtrace as _, esp_println as _};

use light_alert_monitor::StatusWatch;
use light_alert_monitor::config::{EXTRA_HEAP_SIZE, HTTP_SERVER_TASKS, WIFI_HEAP_SIZE};
use light_alert_monitor::tasks::{
    connection_task, dhcp_task, http_server_task, mdns_responder_task, monitor_task, net_task,
};

esp_bootloader_esp_idf::esp_app_desc!();

/// Initialisiert Hardware und Netzwerk, spawnt die Tasks und schläft danach.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // Lichtsensor: GPIO0 an ADC1, 11 dB für den vollen Spannungsbereich
    let mut adc_config = AdcConfig::new();
    let sensor_pin = adc_config.enable_pin(peripherals.GPIO0, Attenuation::_11dB);
    let adc = Adc::new(peripherals.ADC1, adc_config);

    // Operator-Konsole: nur RX wird gebraucht, Ausgabe läuft über esp_println
    let (console_rx, _console_tx) = UsbSerialJtag::new(peripherals.USB_DEVICE).split();

    // WiFi
    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));
    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // Sockets: DHCP, DNS, Webhook-TCP, 2x HTTP, mDNS-UDP (+ Reserve)
    static RESOURCES: static_cell::StaticCell<StackResources<8>> = static_cell::StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());
    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        resources,
        seed,
    );
    static STACK: static_cell::StaticCell<Stack<'static>> = static_cell::StaticCell::new();
    let stack = &*STACK.init(stack);

    // Status-Watch: Monitor → HTTP
    static STATUS_WATCH: static_cell::StaticCell<StatusWatch> = static_cell::StaticCell::new();
    let status_watch = &*STATUS_WATCH.init(StatusWatch::new());

    spawner.spawn(connection_task(wifi_controller)).unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(dhcp_task(stack)).unwrap();

    spawner
        .spawn(monitor_task(
            stack,
            adc,
            sensor_pin,
            console_rx,
            peripherals.GPIO8,
            peripherals.RMT,
            status_watch.sender(),
        ))
        .unwrap();

    for task_id in 0..HTTP_SERVER_TASKS {
        spawner
            .spawn(http_server_task(task_id, stack, status_watch))
            .unwrap();
    }

    spawner.spawn(mdns_responder_task(stack)).unwrap();

    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
