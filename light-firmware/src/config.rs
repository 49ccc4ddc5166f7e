// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

// ============================================================================
// Sensor & Monitor
// ============================================================================

/// GPIO-Pin des Lichtsensors (ADC1, Kanal 0)
pub const LIGHT_SENSOR_GPIO_PIN: u8 = 0;

/// ADC-Messungen pro Messwert (werden gemittelt)
pub const SENSOR_SUB_READS: u8 = 3;

/// Versuche pro ADC-Messung bevor der letzte gültige Wert wiederholt wird
pub const SENSOR_READ_RETRIES: u32 = 100;

/// Pause zwischen zwei Monitor-Zyklen in Millisekunden
pub const CYCLE_INTERVAL_MS: u64 = 500;

// ============================================================================
// Status-LED
// ============================================================================

/// GPIO-Pin für die RGB LED (WS2812/Neopixel)
pub const STATUS_LED_GPIO_PIN: u8 = 8;

/// Helligkeits-Level für die LED (0-255)
pub const LED_BRIGHTNESS: u8 = 10;

/// RMT Taktfrequenz in MHz (WS2812-Timing)
pub const RMT_CLOCK_MHZ: u32 = 80;

/// Anzahl der LEDs im Strip
pub const LED_COUNT: usize = 1;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID, zur Build-Zeit aus WIFI_SSID (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort, zur Build-Zeit aus WIFI_PASSWORD
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Wartezeit nach einem fehlgeschlagenen Verbindungsversuch
pub const WIFI_RETRY_DELAY_SECS: u64 = 5;

/// Heap-Größe für WiFi (Bytes)
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// Webhook Konfiguration
// ============================================================================

/// Ziel der Alarm-Benachrichtigung, `https://` oder `http://`
pub const WEBHOOK_URL: &str = env!(
    "WEBHOOK_URL",
    "Webhook URL nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Gesamt-Timeout für eine Zustellung (DNS, Connect, TLS, Request, Antwort)
pub const WEBHOOK_TIMEOUT_SECS: u64 = 10;

/// Puffer für den JSON-Body
pub const WEBHOOK_BODY_BUFFER_SIZE: usize = 256;

/// Puffer für Status-Zeile und Header der Antwort
pub const WEBHOOK_RESPONSE_BUFFER_SIZE: usize = 4096;

/// TCP-Buffer für die Webhook-Verbindung
pub const WEBHOOK_TCP_BUFFER_SIZE: usize = 4096;

/// TLS Record-Buffer (lesen: max. Record 16 KB + Header)
pub const TLS_READ_BUFFER_SIZE: usize = 16640;
pub const TLS_WRITE_BUFFER_SIZE: usize = 4096;

// ============================================================================
// mDNS-Konfiguration
// ============================================================================

/// mDNS Hostname (ohne .local suffix)
pub const MDNS_HOSTNAME: &str = "light";

/// Cache-Dauer der mDNS-Antworten in Sekunden
pub const MDNS_TTL_SECS: u32 = 120;

/// Wartezeit nach Fehler vor erneutem Versuch
pub const MDNS_RECONNECT_DELAY_SECS: u64 = 5;

/// mDNS Port (RFC 6762)
pub const MDNS_PORT: u16 = 5353;

/// mDNS IPv4 Multicast-Gruppe
pub const MDNS_MULTICAST_ADDR: [u8; 4] = [224, 0, 0, 251];

/// UDP Buffer-Größen für mDNS (TX, RX)
pub const MDNS_UDP_BUFFER_SIZE: usize = 512;

/// mDNS Packet Buffer (Standard MTU)
pub const MDNS_PACKET_BUFFER_SIZE: usize = 1500;

// ============================================================================
// HTTP Status-Endpoint
// ============================================================================

/// Anzahl der HTTP-Server-Tasks (muss zu `pool_size` in `http_server_task` passen)
pub const HTTP_SERVER_TASKS: usize = 2;

/// HTTP-Port
pub const HTTP_PORT: u16 = 80;

/// HTTP Buffer-Größe für Request/Response
pub const HTTP_BUFFER_SIZE: usize = 1024;

/// TCP RX Buffer-Größe in Bytes
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP TX Buffer-Größe in Bytes
pub const TCP_TX_BUFFER_SIZE: usize = 1024;

/// Empfänger-Slots am Status-Watch (HTTP liest anonym)
pub const STATUS_WATCH_RECEIVERS: usize = 1;
