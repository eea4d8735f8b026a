//! Live-reload session.
//!
//! An explicitly constructed, explicitly passed handle around the
//! WebSocket broadcast state. Created by the watch orchestrator after the
//! one-shot build, stopped on shutdown; nothing here is ambient global
//! state.
//!
//! ```text
//! task body --inject_css/reload--> ReloadSession --broadcast--> clients
//! ```

pub mod message;

mod server;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use tungstenite::protocol::Message;

use message::ReloadMessage;
use server::ClientList;

/// Browser client script, served by the proxy at a reserved path.
pub const CLIENT_JS: &str = include_str!("client.js");

/// Reserved proxy path for the client script.
pub const CLIENT_PATH: &str = "/__pipewright/reload.js";

/// Render the client script for a given WebSocket port.
pub fn render_client_js(ws_port: u16) -> String {
    CLIENT_JS.replace("__WS_PORT__", &ws_port.to_string())
}

/// HTML tag that loads the client script through the proxy.
pub fn client_script_tag() -> String {
    format!(r#"<script src="{CLIENT_PATH}"></script>"#)
}

/// A live dev-server session: one WebSocket server, zero or more
/// connected browser clients.
pub struct ReloadSession {
    clients: ClientList,
    stopped: Arc<AtomicBool>,
    port: u16,
}

impl ReloadSession {
    /// Bind the WebSocket server and start accepting clients.
    pub fn start(base_port: u16) -> Result<Self> {
        let (listener, port) = server::bind(base_port)?;
        let clients: ClientList = Arc::default();
        let stopped = Arc::new(AtomicBool::new(false));

        server::spawn_acceptor(listener, Arc::clone(&clients), Arc::clone(&stopped))?;
        crate::debug!("reload"; "ws://localhost:{}", port);

        Ok(Self {
            clients,
            stopped,
            port,
        })
    }

    /// Actual bound port (may differ from the configured one).
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Number of connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.lock().len()
    }

    /// Push an updated stylesheet to every client (no page navigation).
    pub fn inject_css(&self, target: &str, content: &str) {
        self.broadcast(ReloadMessage::css(target, content));
    }

    /// Trigger a full page reload on every client.
    pub fn reload(&self, reason: &str) {
        self.broadcast(ReloadMessage::reload(reason));
    }

    /// Surface a transform error to every client (console/overlay).
    pub fn notify_error(&self, path: &str, error: &str) {
        self.broadcast(ReloadMessage::error(path, error));
    }

    /// Stop accepting clients and close existing connections.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        let mut clients = self.clients.lock();
        for mut client in clients.drain(..) {
            let _ = client.close(None);
        }
    }

    /// Broadcast a message to all connected clients, dropping the ones
    /// that went away.
    fn broadcast(&self, msg: ReloadMessage) {
        let text = msg.to_json();
        let mut clients = self.clients.lock();

        if clients.is_empty() {
            crate::debug!("reload"; "no clients connected");
            return;
        }

        let count = clients.len();
        clients.retain_mut(|client| match client.send(Message::Text(text.clone().into())) {
            Ok(_) => true,
            Err(e) => {
                crate::debug!("reload"; "client disconnected: {}", e);
                false
            }
        });
        crate::debug!("reload"; "broadcast to {} clients", count);
    }
}

impl Drop for ReloadSession {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_client_js_substitutes_port() {
        let js = render_client_js(35729);
        assert!(js.contains("35729"));
        assert!(!js.contains("__WS_PORT__"));
    }

    #[test]
    fn test_session_lifecycle() {
        let session = ReloadSession::start(0).unwrap();
        assert!(session.port() > 0);
        assert_eq!(session.client_count(), 0);
        // Broadcasts without clients are no-ops
        session.inject_css("style.css", "a{color:red}");
        session.reload("scripts changed");
        session.stop();
    }

    #[test]
    fn test_client_receives_messages() {
        use std::net::TcpStream;

        let session = ReloadSession::start(0).unwrap();
        let url = format!("ws://127.0.0.1:{}", session.port());
        let stream = TcpStream::connect(format!("127.0.0.1:{}", session.port())).unwrap();
        let (mut ws, _) =
            tungstenite::client(url.as_str(), stream).expect("client handshake");

        // First frame is the connected handshake
        let frame = ws.read().unwrap();
        let text = frame.into_text().unwrap();
        assert!(text.contains("\"connected\""));

        // Wait for the acceptor to register the client, then broadcast
        for _ in 0..50 {
            if session.client_count() > 0 {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        session.reload("scripts changed");

        let frame = ws.read().unwrap();
        let text = frame.into_text().unwrap();
        assert!(text.contains("\"reload\""));
        session.stop();
    }
}
