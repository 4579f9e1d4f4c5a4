//! Web server for the contact relay.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::{missing, Config};
use crate::contact::Sender;
use crate::delivery::SmtpMailer;
use crate::template::HtmlTemplate;
use crate::{RelayError, Result};

use super::handlers::AppState;
use super::router::{create_health_router, create_router};

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Origins allowed by CORS.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(host: &str, port: u16, app_state: AppState, cors_origins: Vec<String>) -> Result<Self> {
        let addr = format!("{host}:{port}")
            .parse()
            .map_err(|e| RelayError::Config(format!("invalid listen address {host}:{port}: {e}")))?;

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            cors_origins,
        })
    }

    /// Create a web server delivering through the configured SMTP relay.
    ///
    /// A reply template that fails to load is not fatal; replies are then
    /// sent as plain text only.
    pub fn from_config(config: &Config) -> Result<Self> {
        let port = config
            .server
            .port
            .ok_or_else(|| missing("server.port", "PORT"))?;
        let mailer = SmtpMailer::new(&config.smtp)?;
        tracing::info!("Using SMTP relay {}", mailer.relay());

        let sender = Sender::new(&config.contact.operator_name, &config.smtp.username);
        let mut app_state = AppState::new(Arc::new(mailer), sender, &config.contact.forward_to);

        match HtmlTemplate::load(&config.contact.template_path) {
            Ok(template) => {
                tracing::info!("Reply template loaded from {}", template.name());
                app_state = app_state.with_reply_template(template);
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load reply template: {}. Replies will be plain text only.",
                    e
                );
            }
        }

        Self::new(
            &config.server.host,
            port,
            app_state,
            config.cors.allowed_origins.clone(),
        )
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn router(self) -> axum::Router {
        create_router(self.app_state, &self.cors_origins).merge(create_health_router())
    }

    /// Run the web server.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, self.router()).await?;
        Ok(())
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        let router = self.router();
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
