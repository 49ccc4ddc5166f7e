// Monitor Task - Polling-Schleife für Sensor, Konsole, Alarm und Anzeige
use defmt::{error, info, warn};
use embassy_net::Stack;
use embassy_time::{Duration, Instant, Timer};
use esp_hal::Blocking;
use esp_hal::peripherals::{GPIO8, RMT};
use esp_hal::usb_serial_jtag::UsbSerialJtagRx;
use esp_hal_smartled::smart_led_buffer;
use light_core::{
    AlertDecision, CalibrationProgress, CommandInput, CyclePhase, LightSensor, Monitor,
    MonitorConfig, SensorReader, StatusDisplay, report_delivery,
};

use crate::StatusSender;
use crate::config::{CYCLE_INTERVAL_MS, RMT_CLOCK_MHZ, SENSOR_SUB_READS};
use crate::hal::{
    AdcLightSensor, LedStatusDisplay, LightAdc, LightAdcPin, SerialCommandInput, SerialConsole,
};
use crate::tasks::webhook::WebhookClient;
use crate::tasks::wifi::connectivity;

/// Monitor Task
///
/// Baut die Hardware-Adapter und übergibt an [`monitor_logic`].
#[embassy_executor::task]
pub async fn monitor_task(
    stack: &'static Stack<'static>,
    adc: LightAdc,
    sensor_pin: LightAdcPin,
    console_rx: UsbSerialJtagRx<'static, Blocking>,
    gpio8: GPIO8<'static>,
    rmt: RMT<'static>,
    status_sender: StatusSender,
) {
    info!("Monitor: Task started");

    let mut rmt_buffer = smart_led_buffer!(1);
    let display = match LedStatusDisplay::new(gpio8, rmt, RMT_CLOCK_MHZ, &mut rmt_buffer) {
        Ok(display) => Some(display),
        Err(e) => {
            error!("Display: Status LED unavailable: {}", e);
            None
        }
    };

    let reader = SensorReader::new(AdcLightSensor::new(adc, sensor_pin), SENSOR_SUB_READS);
    let input = SerialCommandInput::new(console_rx);
    let webhook = WebhookClient::new(stack);

    monitor_logic(reader, display, input, webhook, stack, status_sender).await;
}

/// Polling-Schleife, generisch über die Hardware
///
/// Pro Zyklus: Messwert lesen, Monitor-Zyklus ausführen, ggf. Webhook senden,
/// Anzeige aktualisieren, Snapshot veröffentlichen, warten.
/// Die Benachrichtigung wird im Zyklus abgewartet; die Konsole ist solange
/// nicht bedienbar.
pub async fn monitor_logic<S, D, I>(
    mut reader: SensorReader<S>,
    mut display: Option<D>,
    mut input: I,
    mut webhook: WebhookClient,
    stack: &'static Stack<'static>,
    status_sender: StatusSender,
) where
    S: LightSensor,
    D: StatusDisplay,
    I: CommandInput,
{
    let mut monitor = Monitor::new(MonitorConfig::default());
    let mut console = SerialConsole;

    info!(
        "Monitor: Threshold {}, cycle {}ms",
        monitor.threshold(),
        CYCLE_INTERVAL_MS
    );
    esp_println::println!("Light alert monitor ready");
    esp_println::println!("Commands: c = calibrate, t = set threshold, s = status");

    loop {
        let sample = reader.read();
        let now_ms = Instant::now().as_millis();
        let report = monitor.run_cycle(
            sample,
            now_ms,
            connectivity(stack),
            &mut input,
            &mut console,
        );

        match report.phase {
            CyclePhase::Monitoring(AlertDecision::Triggered) => {
                warn!("Monitor: Alert (sample {} < threshold {})", sample, monitor.threshold())
            }
            CyclePhase::Monitoring(AlertDecision::Suppressed) => {
                info!("Monitor: Below threshold, cooldown still running")
            }
            CyclePhase::Monitoring(AlertDecision::Recovered) => {
                info!("Monitor: Light level back to normal ({})", sample)
            }
            CyclePhase::Calibrating(CalibrationProgress::Complete { threshold }) => {
                info!("Monitor: Calibrated threshold {}", threshold)
            }
            _ => {}
        }

        if let Some(notice) = report.notify {
            let code = webhook.post_alert(&notice).await;
            let delivery = report_delivery(code, &mut console);
            if delivery.is_accepted() {
                info!("Webhook: Delivered ({})", delivery);
            } else {
                warn!("Webhook: Not delivered ({})", delivery);
            }
        }

        if let Some(display) = display.as_mut() {
            if let Err(e) = display.render(&report.snapshot) {
                error!("Display: {}", e);
            }
        }

        status_sender.send(report.snapshot);

        Timer::after(Duration::from_millis(CYCLE_INTERVAL_MS)).await;
    }
}
