use crate::config::Configuration;
use crate::error::StartupError;
use crate::http::Request;
use crate::middleware::Pipeline;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// HTTP server: binds a listener and runs the pipeline for every request.
/// One tokio task per connection; requests never block each other.
pub struct Server {
    pipeline: Arc<Pipeline>,
    host: String,
    port: u16,
}

impl Server {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }

    /// Read host and port from the `Server` configuration section, keeping
    /// the defaults for missing keys.
    pub fn configure(mut self, config: &Configuration) -> Self {
        if let Some(host) = config.get("Server:Host") {
            self.host = host;
        }
        if let Some(port) = config.get("Server:Port").and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        self
    }

    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub async fn run(self) -> Result<(), StartupError> {
        let ip: std::net::IpAddr = self.host.parse().map_err(|_| {
            StartupError::Server(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid listen host '{}'", self.host),
            ))
        })?;
        let addr = SocketAddr::new(ip, self.port);
        let listener = TcpListener::bind(addr).await?;

        tracing::info!(%addr, stages = ?self.pipeline.stage_names(), "server listening");

        let pipeline = self.pipeline;
        loop {
            let (stream, _) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let pipeline = pipeline.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
                    let pipeline = pipeline.clone();
                    async move {
                        Ok::<_, Infallible>(handle_request(pipeline, req).await)
                    }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::debug!(error = ?err, "connection closed with error");
                }
            });
        }
    }
}

async fn handle_request(
    pipeline: Arc<Pipeline>,
    req: hyper::Request<hyper::body::Incoming>,
) -> hyper::Response<http_body_util::Full<bytes::Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let request = Request::from_hyper(req);
    // Any Err left after the error stages still carries a renderable response.
    let response = pipeline.run(request).await.unwrap_or_else(|e| e);

    tracing::info!(%method, %path, status = response.status_code(), "request completed");
    response.into_hyper()
}
