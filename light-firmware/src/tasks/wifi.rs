// WiFi Tasks - Verbindung zum Access Point, Netzwerk-Stack, DHCP
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{
    ClientConfig, ModeConfig, ScanConfig, WifiController, WifiDevice, WifiError, WifiEvent,
};
use light_core::Connectivity;

use crate::config::{WIFI_PASSWORD, WIFI_RETRY_DELAY_SECS, WIFI_SSID};

/// WiFi Connection Task
///
/// Startet den Controller im Station-Modus, verbindet und wartet auf den
/// Verbindungsabbruch. Danach beginnt alles von vorn. Der Monitor läuft
/// unabhängig davon weiter und liest den Zustand über [`connectivity`].
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>) {
    info!("WiFi: Starting connection task");

    loop {
        if let Err(e) = connect_once(&mut controller).await {
            error!("WiFi: {}", Debug2Format(&e));
            Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
            continue;
        }

        controller.wait_for_event(WifiEvent::StaDisconnected).await;
        warn!("WiFi: Disconnected from AP, will retry...");
        Timer::after(Duration::from_secs(2)).await;
    }
}

async fn connect_once(controller: &mut WifiController<'static>) -> Result<(), WifiError> {
    if matches!(controller.is_started(), Ok(false)) {
        info!("WiFi: Configuring station mode...");
        let client_config = ModeConfig::Client(
            ClientConfig::default()
                .with_ssid(WIFI_SSID.into())
                .with_password(WIFI_PASSWORD.into()),
        );
        controller.set_config(&client_config)?;
        controller.start_async().await?;
        info!("WiFi: Started");
    }

    // Nur zur Diagnose: Signalstärke des Ziel-APs
    match controller
        .scan_with_config_async(ScanConfig::default())
        .await
    {
        Ok(ap_infos) => {
            if let Some(ap) = ap_infos.iter().find(|ap| ap.ssid.as_str() == WIFI_SSID) {
                info!("WiFi: '{}' visible at {} dBm", WIFI_SSID, ap.signal_strength);
            } else {
                warn!("WiFi: '{}' not in scan ({} APs)", WIFI_SSID, ap_infos.len());
            }
        }
        Err(e) => warn!("WiFi: Scan failed: {}", Debug2Format(&e)),
    }

    info!("WiFi: Connecting to '{}'...", WIFI_SSID);
    controller.connect_async().await?;
    info!("WiFi: Connected");
    Ok(())
}

/// Network Task: treibt den embassy-net Stack
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// DHCP Monitor Task
///
/// Loggt jede neue IP-Konfiguration, auch nach einem Reconnect.
#[embassy_executor::task]
pub async fn dhcp_task(stack: &'static Stack<'static>) {
    let mut last_ip = None;

    loop {
        let current = connectivity(stack).ipv4;
        if current != last_ip {
            match (current, stack.config_v4()) {
                (Some(ip), Some(config)) => {
                    info!(
                        "WiFi: Got IP {}.{}.{}.{}",
                        ip[0], ip[1], ip[2], ip[3]
                    );
                    info!("  Gateway: {}", Debug2Format(&config.gateway));
                    info!("  DNS:     {}", Debug2Format(&config.dns_servers));
                }
                _ => warn!("WiFi: Lost IP address"),
            }
            last_ip = current;
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}

/// Momentaufnahme der Verbindung
///
/// Verbunden heißt: Link oben und eine IPv4-Adresse per DHCP erhalten.
pub fn connectivity(stack: &Stack<'_>) -> Connectivity {
    if !stack.is_link_up() {
        return Connectivity::offline();
    }
    match stack.config_v4() {
        Some(config) => Connectivity::online(config.address.address().octets()),
        None => Connectivity::offline(),
    }
}

/// Wartet bis Link und IPv4-Konfiguration vorhanden sind
pub async fn wait_for_network(stack: &'static Stack<'static>) {
    while !connectivity(stack).connected {
        Timer::after(Duration::from_millis(500)).await;
    }
}
