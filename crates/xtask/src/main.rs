// Developer tasks
//
//   cargo xtask serve                       # fixture app on :4200
//   cargo xtask navigate smart-table        # drive one sidebar route
//   cargo xtask routes                      # list the routes

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ngx_e2e::{BrowserKind, BrowserSession, E2eConfig, MenuRoute, NavigationPage, PageHandle};
use ngx_e2e_fixtures::FixtureServer;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "xtask", about = "ngx-e2e developer tasks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the offline ngx-admin / playground fixture app
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 4200)]
        port: u16,
        /// Delay before /ajaxdata answers, in milliseconds
        #[arg(long, default_value_t = 1500)]
        ajax_delay_ms: u64,
    },
    /// Open the app and navigate to one sidebar route
    Navigate {
        /// Route, e.g. `form-layouts` or "Smart Table"
        #[arg(value_parser = parse_route)]
        route: MenuRoute,
        /// Application root; defaults to E2E_BASE_URL or the config file
        #[arg(long)]
        base_url: Option<String>,
        /// JSON config file (E2E_* variables still apply on top)
        #[arg(long)]
        config: Option<PathBuf>,
        /// chromium, firefox or webkit
        #[arg(long)]
        browser: Option<String>,
        /// Show the browser window
        #[arg(long)]
        headed: bool,
    },
    /// List the sidebar routes
    Routes,
}

fn parse_route(name: &str) -> std::result::Result<MenuRoute, String> {
    MenuRoute::parse(name).ok_or_else(|| {
        let known: Vec<_> = MenuRoute::ALL.iter().map(|r| r.item()).collect();
        format!("unknown route '{}', expected one of: {}", name, known.join(", "))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Serve {
            port,
            ajax_delay_ms,
        } => serve(port, Duration::from_millis(ajax_delay_ms)).await,
        Command::Navigate {
            route,
            base_url,
            config,
            browser,
            headed,
        } => navigate(route, base_url, config, browser, headed).await,
        Command::Routes => {
            for route in MenuRoute::ALL {
                println!("{:<14} {}", route.item(), route);
            }
            Ok(())
        }
    }
}

async fn serve(port: u16, ajax_delay: Duration) -> Result<()> {
    let server = FixtureServer::bind(SocketAddr::from(([127, 0, 0, 1], port)), ajax_delay)
        .await
        .with_context(|| format!("binding fixture server to port {}", port))?;
    println!("ngx-admin fixture:   {}/", server.url());
    println!("AJAX playground:     {}/ajax", server.url());

    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl-C")?;
    tracing::info!("Shutting down fixture server");
    server.shutdown();
    Ok(())
}

async fn navigate(
    route: MenuRoute,
    base_url: Option<String>,
    config_path: Option<PathBuf>,
    browser: Option<String>,
    headed: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => E2eConfig::from_file(&path)?,
        None => E2eConfig::default(),
    }
    .with_overrides(|key| std::env::var(key).ok())?;
    if let Some(url) = base_url {
        config.base_url = url;
    }
    if let Some(name) = browser {
        config.browser = BrowserKind::parse(&name)?;
    }
    if headed {
        config.headless = false;
    }
    config.validate()?;

    let session = BrowserSession::launch(&config).await?;
    let page = session.new_page().await?;
    page.goto(&config.app_url("")?).await?;

    NavigationPage::new(&page).navigate(route).await?;
    println!("{} -> {}", route, page.url());

    session.close().await?;
    Ok(())
}
