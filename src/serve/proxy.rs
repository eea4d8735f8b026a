//! HTTPS reverse proxy with reload-script injection.
//!
//! Browsers talk TLS to this server; it forwards every request to the
//! upstream site (`https://{host}`) and streams the answer back. HTML
//! responses get the live-reload client script injected before `</body>`,
//! so the upstream markup never has to know about the session.
//!
//! The upstream runs its own self-signed dev certificate, so certificate
//! verification is disabled on the forwarding client only. The browser
//! still verifies the certificate this server presents.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tiny_http::{Header, Request, Response, Server, SslConfig, StatusCode};

use super::tls::TlsMaterial;
use crate::reload;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Request/response headers that are connection-scoped and never forwarded.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Bound HTTPS proxy, ready to enter the request loop.
pub struct ProxyServer {
    server: Arc<Server>,
    addr: SocketAddr,
    host: String,
    ws_port: u16,
    client: reqwest::blocking::Client,
}

impl ProxyServer {
    /// Bind the TLS listener, with automatic port retry, and register it
    /// for graceful shutdown.
    pub fn bind(host: &str, base_port: u16, ws_port: u16, tls: &TlsMaterial) -> Result<Self> {
        let (server, addr) = bind_with_retry(base_port, tls)?;
        let server = Arc::new(server);
        crate::core::register_server(Arc::clone(&server));

        let client = reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            server,
            addr,
            host: host.to_string(),
            ws_port,
            client,
        })
    }

    /// Bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Request loop (blocking). Returns when the server is unblocked by
    /// the shutdown handler.
    pub fn run(&self) {
        crate::log!("serve"; "https://{} -> https://{}", self.addr, self.host);

        for request in self.server.incoming_requests() {
            if crate::core::is_shutdown() {
                break;
            }
            if let Err(e) = self.handle_request(request) {
                crate::log!("serve"; "request error: {e}");
            }
        }
    }

    fn handle_request(&self, request: Request) -> Result<()> {
        if request.url() == reload::CLIENT_PATH {
            return respond_client_js(request, self.ws_port);
        }
        self.forward(request)
    }

    /// Forward one request upstream and relay the answer.
    fn forward(&self, mut request: Request) -> Result<()> {
        let url = format!("https://{}{}", self.host, request.url());
        let method: reqwest::Method = request.method().as_str().parse()?;
        crate::debug!("serve"; "{} {}", request.method(), request.url());

        let mut body = Vec::new();
        request.as_reader().read_to_end(&mut body)?;

        let mut upstream = self.client.request(method, &url);
        for header in request.headers() {
            let field = header.field.as_str().as_str();
            if is_skipped_request_header(field) {
                continue;
            }
            upstream = upstream.header(field, header.value.as_str());
        }
        // Compressed bodies would defeat the HTML injection below
        upstream = upstream.header("accept-encoding", "identity");
        if !body.is_empty() {
            upstream = upstream.body(body);
        }

        let response = match upstream.send() {
            Ok(response) => response,
            Err(e) => {
                crate::log!("serve"; "upstream {} unreachable: {}", self.host, e);
                return respond_bad_gateway(request, &self.host);
            }
        };

        let status = StatusCode(response.status().as_u16());
        let mut headers = Vec::new();
        let mut is_html = false;
        for (name, value) in response.headers() {
            let field = name.as_str();
            if is_skipped_response_header(field) {
                continue;
            }
            if field.eq_ignore_ascii_case("content-type") {
                is_html = value.as_bytes().starts_with(b"text/html");
            }
            if let Ok(header) = Header::from_bytes(field.as_bytes(), value.as_bytes()) {
                headers.push(header);
            }
        }

        let mut payload = response.bytes()?.to_vec();
        if is_html {
            payload = inject_reload_script(&payload);
        }

        let len = payload.len();
        request.respond(Response::new(
            status,
            headers,
            std::io::Cursor::new(payload),
            Some(len),
            None,
        ))?;
        Ok(())
    }
}

fn bind_with_retry(base_port: u16, tls: &TlsMaterial) -> Result<(Server, SocketAddr)> {
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::from(([127, 0, 0, 1], port));
        let ssl = SslConfig {
            certificate: tls.certificate.clone(),
            private_key: tls.private_key.clone(),
        };

        match Server::https(addr, ssl) {
            Ok(server) => {
                if offset > 0 {
                    crate::log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < MAX_PORT_RETRIES => continue,
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Failed to bind after {} attempts (ports {}-{}): {}",
                    MAX_PORT_RETRIES,
                    base_port,
                    port,
                    e
                ));
            }
        }
    }
    unreachable!()
}

/// Serve the live-reload client from memory.
fn respond_client_js(request: Request, ws_port: u16) -> Result<()> {
    let body = reload::render_client_js(ws_port);
    let mut response = Response::from_string(body);
    if let Ok(header) =
        Header::from_bytes("Content-Type", "application/javascript; charset=utf-8")
    {
        response = response.with_header(header);
    }
    if let Ok(header) = Header::from_bytes("Cache-Control", "no-cache") {
        response = response.with_header(header);
    }
    request.respond(response)?;
    Ok(())
}

fn respond_bad_gateway(request: Request, host: &str) -> Result<()> {
    let body = format!("502 Bad Gateway: https://{host} is not answering\n");
    let response = Response::from_string(body).with_status_code(StatusCode(502));
    request.respond(response)?;
    Ok(())
}

fn is_skipped_request_header(field: &str) -> bool {
    // Host follows the upstream URL; encoding is forced to identity
    HOP_BY_HOP.iter().any(|h| field.eq_ignore_ascii_case(h))
        || field.eq_ignore_ascii_case("host")
        || field.eq_ignore_ascii_case("accept-encoding")
}

fn is_skipped_response_header(field: &str) -> bool {
    // Length changes with injection; encoding is identity by request
    HOP_BY_HOP.iter().any(|h| field.eq_ignore_ascii_case(h))
        || field.eq_ignore_ascii_case("content-length")
        || field.eq_ignore_ascii_case("content-encoding")
}

/// Inject the reload script tag before `</body>`.
fn inject_reload_script(content: &[u8]) -> Vec<u8> {
    let script = reload::client_script_tag();
    let script_bytes = script.as_bytes();

    const PATTERN: &[u8] = b"</body>";

    // Reverse search for </body> using byte windows
    if let Some(pos) = content
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))
    {
        let mut result = Vec::with_capacity(content.len() + script_bytes.len());
        result.extend_from_slice(&content[..pos]);
        result.extend_from_slice(script_bytes);
        result.extend_from_slice(&content[pos..]);
        return result;
    }

    // No </body> found, append to end (browsers handle this gracefully)
    let mut result = Vec::with_capacity(content.len() + script_bytes.len());
    result.extend_from_slice(content);
    result.extend_from_slice(script_bytes);
    result
}
