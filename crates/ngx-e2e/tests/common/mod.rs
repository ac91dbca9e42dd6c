// Shared setup for the browser suites
//
// Every suite starts its own fixture server on a random port, launches the
// configured browser (E2E_BROWSER / E2E_HEADLESS still apply) and opens one
// page in a fresh context.

#![allow(dead_code)]

use ngx_e2e::{BrowserPage, BrowserSession, E2eConfig, MenuRoute, NavigationPage, PageHandle};
use ngx_e2e_fixtures::FixtureServer;
use tracing_subscriber::EnvFilter;

/// Installs a test-friendly subscriber once per binary. `RUST_LOG` wins.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

/// Fixture server + browser + page for one test.
pub struct Harness {
    pub server: FixtureServer,
    pub config: E2eConfig,
    pub session: BrowserSession,
    pub page: BrowserPage,
}

impl Harness {
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(|_| {}).await
    }

    /// Like `start`, with a chance to adjust the config before launch.
    pub async fn start_with(configure: impl FnOnce(&mut E2eConfig)) -> anyhow::Result<Self> {
        init_tracing();
        let server = FixtureServer::start().await?;
        let mut config = E2eConfig::from_env()?.with_base_url(server.url());
        configure(&mut config);
        let session = BrowserSession::launch(&config).await?;
        let page = session.new_page().await?;
        Ok(Self {
            server,
            config,
            session,
            page,
        })
    }

    /// Starts and opens the application root.
    pub async fn at_app() -> anyhow::Result<Self> {
        let harness = Self::start().await?;
        harness.page.goto(&harness.config.app_url("")?).await?;
        Ok(harness)
    }

    /// Starts, opens the application root and follows the sidebar to `route`.
    pub async fn at(route: MenuRoute) -> anyhow::Result<Self> {
        let harness = Self::at_app().await?;
        NavigationPage::new(&harness.page).navigate(route).await?;
        Ok(harness)
    }

    pub async fn finish(self) -> anyhow::Result<()> {
        self.session.close().await?;
        self.server.shutdown();
        Ok(())
    }
}
