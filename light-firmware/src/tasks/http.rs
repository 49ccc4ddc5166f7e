// HTTP Server Task - Status-Endpoint für den Monitor
//
// GET /        Klartext-Bericht (wie das `s`-Kommando)
// GET /status  Snapshot als JSON
use alloc::string::String;

use defmt::info;
use embassy_net::Stack;
use embassy_time::Duration;
use picoserve::io::embedded_io_async;
use picoserve::response::{IntoResponse, Json, Response, StatusCode};
use picoserve::routing::get;

use crate::config::*;
use crate::{StatusSnapshot, StatusWatch};

/// Antworten der Status-Routen
///
/// Der Content-Type kommt jeweils aus dem Body (`String` → text/plain,
/// `Json` → application/json).
enum StatusResponse {
    Report(String),
    Snapshot(StatusSnapshot),
    /// Noch kein Monitor-Zyklus gelaufen
    NotReady,
}

impl IntoResponse for StatusResponse {
    async fn write_to<
        R: embedded_io_async::Read,
        W: picoserve::response::ResponseWriter<Error = R::Error>,
    >(
        self,
        connection: picoserve::response::Connection<'_, R>,
        response_writer: W,
    ) -> Result<picoserve::ResponseSent, W::Error> {
        match self {
            StatusResponse::Report(text) => {
                Response::new(StatusCode::OK, text)
                    .with_header("Cache-Control", "no-store")
                    .write_to(connection, response_writer)
                    .await
            }
            StatusResponse::Snapshot(snapshot) => {
                Json(snapshot)
                    .into_response()
                    .with_header("Cache-Control", "no-store")
                    .write_to(connection, response_writer)
                    .await
            }
            StatusResponse::NotReady => {
                Response::new(StatusCode::new(503), "Monitor not ready")
                    .with_header("Retry-After", "1")
                    .write_to(connection, response_writer)
                    .await
            }
        }
    }
}

/// HTTP Server Task
///
/// Wird HTTP_SERVER_TASKS-mal gespawnt, jede Instanz bedient eine Verbindung.
#[embassy_executor::task(pool_size = 2)]
pub async fn http_server_task(
    task_id: usize,
    stack: &'static Stack<'static>,
    status_watch: &'static StatusWatch,
) {
    info!("HTTP: Server task {} starting on port {}...", task_id, HTTP_PORT);

    let app = picoserve::Router::new()
        .route("/", get(move || serve_report(status_watch)))
        .route("/status", get(move || serve_snapshot(status_watch)));

    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(5)),
    });

    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);
    let _ = server
        .listen_and_serve(task_id, *stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("HTTP: Server task {} ended", task_id);
}

/// Letzter veröffentlichter Snapshot, `None` vor dem ersten Monitor-Zyklus
fn latest(status_watch: &'static StatusWatch) -> Option<StatusSnapshot> {
    status_watch.anon_receiver().try_get()
}

async fn serve_report(status_watch: &'static StatusWatch) -> StatusResponse {
    match latest(status_watch) {
        Some(snapshot) => StatusResponse::Report(String::from(snapshot.report().as_str())),
        None => StatusResponse::NotReady,
    }
}

async fn serve_snapshot(status_watch: &'static StatusWatch) -> StatusResponse {
    latest(status_watch).map_or(StatusResponse::NotReady, StatusResponse::Snapshot)
}
