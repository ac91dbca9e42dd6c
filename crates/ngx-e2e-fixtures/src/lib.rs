// Fixture Server - local stand-in for ngx-admin and the UI Testing Playground
//
// Serves a single-page emulation of the ngx-admin screens the suites touch
// (sidebar menu, form layouts, datepicker, toastr, tooltip, smart table,
// theme switcher) plus the playground's AJAX page and its delayed data
// endpoint. This keeps the integration suites offline and deterministic.

use axum::{
    Router,
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::get,
};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Delay before `/ajaxdata` answers
pub const DEFAULT_AJAX_DELAY: Duration = Duration::from_millis(1500);

/// Body of the `/ajaxdata` response
pub const AJAX_RESPONSE: &str = "Data loaded with AJAX get request.";

const NGX_ADMIN_HTML: &str = include_str!("../assets/ngx_admin.html");
const PLAYGROUND_AJAX_HTML: &str = include_str!("../assets/playground_ajax.html");

/// Builds the fixture application.
///
/// Any path not listed here serves the ngx-admin shell, which renders the
/// section matching the path (e.g. `/pages/forms/layouts`).
pub fn router(ajax_delay: Duration) -> Router {
    Router::new()
        .route("/", get(ngx_admin))
        .route("/ajax", get(playground_ajax))
        .route("/ajaxdata", get(ajax_data))
        .fallback(ngx_admin)
        .with_state(ajax_delay)
}

/// Running fixture server handle
pub struct FixtureServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl FixtureServer {
    /// Start the fixture server on a random available port
    pub async fn start() -> io::Result<Self> {
        Self::bind(SocketAddr::from(([127, 0, 0, 1], 0)), DEFAULT_AJAX_DELAY).await
    }

    /// Start the fixture server on `addr`
    pub async fn bind(addr: SocketAddr, ajax_delay: Duration) -> io::Result<Self> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        let app = router(ajax_delay);

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Fixture server failed");
            }
        });

        tracing::info!(%addr, "Fixture server listening");
        Ok(FixtureServer { addr, handle })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get the base URL of the fixture server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Shutdown the fixture server
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

async fn ngx_admin() -> Html<&'static str> {
    Html(NGX_ADMIN_HTML)
}

async fn playground_ajax() -> Html<&'static str> {
    Html(PLAYGROUND_AJAX_HTML)
}

async fn ajax_data(State(delay): State<Duration>) -> impl IntoResponse {
    tracing::debug!(?delay, "Delaying AJAX response");
    tokio::time::sleep(delay).await;
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        AJAX_RESPONSE,
    )
}
