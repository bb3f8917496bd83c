//! HTTP front end for the sandbox site.
//!
//! Each connection carries one request and is handled on its own task.
//! Handlers share the [`Site`] read-only; every page view rebuilds its
//! index from disk.

pub mod http;
pub mod router;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::site::Site;
use http::{read_request, HttpError, Method, Response};

pub use http::Request;
pub use router::{resolve, respond, Route};

/// Bind `address` and serve until the process is stopped
pub async fn serve(site: Site, address: &str) -> Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!(address = %listener.local_addr()?, "Serving sandbox");
    run(listener, Arc::new(site)).await
}

/// Accept loop on an already bound listener
pub async fn run(listener: TcpListener, site: Arc<Site>) -> Result<()> {
    let read_timeout = site.config().server.read_timeout;

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Failed to accept connection: {}", e);
                continue;
            }
        };

        let site = Arc::clone(&site);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer, &site, read_timeout).await {
                warn!(%peer, "Connection error: {}", e);
            }
        });
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    site: &Site,
    read_timeout: Duration,
) -> Result<(), HttpError> {
    let (read_half, mut write_half) = stream.split();
    let mut reader = BufReader::new(read_half);

    let Ok(read) = timeout(read_timeout, read_request(&mut reader)).await else {
        debug!(%peer, "Request head not received within {:?}", read_timeout);
        Response::text(408, "Request Timeout").write_to(&mut write_half, true).await?;
        return Ok(());
    };

    let request = match read {
        Ok(request) => request,
        Err(HttpError::BadRequestLine(line)) => {
            warn!(%peer, "Bad request line: {}", line);
            Response::text(400, "Bad Request").write_to(&mut write_half, true).await?;
            return Ok(());
        }
        Err(HttpError::HeadTooLarge) => {
            Response::text(431, "Request Header Fields Too Large")
                .write_to(&mut write_half, true)
                .await?;
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let response = respond(site, &request).await;
    info!(
        method = %request.method_name,
        path = %request.path,
        status = response.status,
        "Handled request"
    );

    response
        .write_to(&mut write_half, request.method != Method::Head)
        .await?;
    Ok(())
}
