// Webhook-Zustellung - HTTP/1.1 POST, bei `https://` über TLS 1.3
//
// reqwless übernimmt DNS, Verbindungsaufbau und das Parsen der Antwort,
// embedded-tls die Verschlüsselung. Die großen Puffer liegen statisch.

use defmt::{Debug2Format, error, info};
use embassy_net::Stack;
use embassy_net::dns::DnsSocket;
use embassy_net::tcp::client::{TcpClient, TcpClientState};
use embassy_time::{Duration, with_timeout};
use esp_hal::rng::Rng;
use light_core::webhook::encode_payload;
use light_core::{AlertNotice, TransportError, UrlError, WebhookUrl};
use reqwless::client::{HttpClient, TlsConfig, TlsVerify};
use reqwless::headers::ContentType;
use reqwless::request::{Method, RequestBuilder};
use static_cell::{ConstStaticCell, StaticCell};

use crate::config::{
    TLS_READ_BUFFER_SIZE, TLS_WRITE_BUFFER_SIZE, WEBHOOK_BODY_BUFFER_SIZE,
    WEBHOOK_RESPONSE_BUFFER_SIZE, WEBHOOK_TCP_BUFFER_SIZE, WEBHOOK_TIMEOUT_SECS, WEBHOOK_URL,
};

type WebhookTcpState = TcpClientState<1, WEBHOOK_TCP_BUFFER_SIZE, WEBHOOK_TCP_BUFFER_SIZE>;

struct WebhookBuffers {
    tls_read: [u8; TLS_READ_BUFFER_SIZE],
    tls_write: [u8; TLS_WRITE_BUFFER_SIZE],
    response: [u8; WEBHOOK_RESPONSE_BUFFER_SIZE],
}

static BUFFERS: ConstStaticCell<WebhookBuffers> = ConstStaticCell::new(WebhookBuffers {
    tls_read: [0; TLS_READ_BUFFER_SIZE],
    tls_write: [0; TLS_WRITE_BUFFER_SIZE],
    response: [0; WEBHOOK_RESPONSE_BUFFER_SIZE],
});

static TCP_STATE: StaticCell<WebhookTcpState> = StaticCell::new();

/// Client für die Alarm-Benachrichtigung (genau eine Instanz)
pub struct WebhookClient {
    stack: &'static Stack<'static>,
    target: Result<WebhookUrl<'static>, UrlError>,
    tcp_state: &'static WebhookTcpState,
    buffers: &'static mut WebhookBuffers,
    rng: Rng,
}

impl WebhookClient {
    pub fn new(stack: &'static Stack<'static>) -> Self {
        let target = WebhookUrl::parse(WEBHOOK_URL);
        match target {
            Ok(url) => info!(
                "Webhook: Target {}:{} ({})",
                url.host,
                url.port,
                if url.secure { "TLS" } else { "plain HTTP" }
            ),
            Err(e) => error!("Webhook: Invalid WEBHOOK_URL: {}", e),
        }

        Self {
            stack,
            target,
            tcp_state: TCP_STATE.init(WebhookTcpState::new()),
            buffers: BUFFERS.take(),
            rng: Rng::new(),
        }
    }

    /// Sendet einen Alarm und liefert den Status-Code
    ///
    /// `> 0` ist der HTTP-Status des Empfängers, `≤ 0` ein Transport-Fehler
    /// (siehe [`TransportError::code`]). Es gibt genau einen Versuch.
    pub async fn post_alert(&mut self, notice: &AlertNotice) -> i32 {
        info!("Webhook: Sending {}", notice);

        let result = with_timeout(
            Duration::from_secs(WEBHOOK_TIMEOUT_SECS),
            self.send(notice),
        )
        .await;

        match result {
            Ok(Ok(status)) => status as i32,
            Ok(Err(e)) => {
                error!("Webhook: {}", e);
                e.code()
            }
            Err(_) => {
                error!("Webhook: No answer within {}s", WEBHOOK_TIMEOUT_SECS);
                TransportError::Timeout.code()
            }
        }
    }

    async fn send(&mut self, notice: &AlertNotice) -> Result<u16, TransportError> {
        let target = self.target.map_err(|_| TransportError::ConnectionRefused)?;
        if !self.stack.is_config_up() {
            return Err(TransportError::NotConnected);
        }

        let mut body = [0u8; WEBHOOK_BODY_BUFFER_SIZE];
        let body_len = encode_payload(notice.sample, notice.threshold, &mut body)
            .map_err(|_| TransportError::SendFailed)?;

        // Jede Verbindung bekommt einen frischen TLS-Seed
        let seed = u64::from(self.rng.random()) << 32 | u64::from(self.rng.random());
        let WebhookBuffers {
            tls_read,
            tls_write,
            response: rx_buffer,
        } = &mut *self.buffers;

        let tcp = TcpClient::new(*self.stack, self.tcp_state);
        let dns = DnsSocket::new(*self.stack);
        let mut client = if target.secure {
            let tls = TlsConfig::new(seed, tls_read, tls_write, TlsVerify::None);
            HttpClient::new_with_tls(&tcp, &dns, tls)
        } else {
            HttpClient::new(&tcp, &dns)
        };

        let mut request = client
            .request(Method::POST, WEBHOOK_URL)
            .await
            .map_err(transport_error)?
            .body(&body[..body_len])
            .content_type(ContentType::ApplicationJson);

        let response = request.send(rx_buffer).await.map_err(transport_error)?;
        Ok(response.status.0)
    }
}

fn transport_error(e: reqwless::Error) -> TransportError {
    error!("Webhook: {}", Debug2Format(&e));
    match e {
        reqwless::Error::Dns => TransportError::DnsFailed,
        reqwless::Error::Network(_) => TransportError::ConnectionLost,
        reqwless::Error::Codec => TransportError::InvalidResponse,
        _ => TransportError::ConnectionRefused,
    }
}
