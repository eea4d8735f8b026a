//! WebSocket acceptor for the live-reload session.

use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use parking_lot::Mutex;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::message::ReloadMessage;

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

pub(super) type ClientList = Arc<Mutex<Vec<WebSocket<TcpStream>>>>;

/// Bind the listener, retrying on the next port when one is in use.
pub(super) fn bind(base_port: u16) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(format!("127.0.0.1:{}", port)) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                return Ok((listener, actual_port));
            }
            Err(e) => {
                last_error = Some(e);
                continue;
            }
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind WebSocket server after {} attempts: {}",
        MAX_PORT_RETRIES,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Spawn the acceptor thread: handshake each client, send the connected
/// message, register it for broadcasts. Stops when `stopped` flips.
pub(super) fn spawn_acceptor(
    listener: TcpListener,
    clients: ClientList,
    stopped: Arc<AtomicBool>,
) -> Result<()> {
    listener.set_nonblocking(true)?;

    std::thread::spawn(move || {
        loop {
            if stopped.load(Ordering::SeqCst) {
                break;
            }
            match listener.accept() {
                Ok((stream, addr)) => {
                    crate::debug!("reload"; "client connected: {}", addr);
                    let _ = stream.set_nonblocking(false);
                    add_client(stream, &clients);
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
                Err(e) => {
                    crate::log!("reload"; "accept error: {}", e);
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
        }
    });

    Ok(())
}

/// Perform the WebSocket handshake and register the client.
fn add_client(stream: TcpStream, clients: &ClientList) {
    match tungstenite::accept(stream) {
        Ok(mut ws) => {
            let connected = ReloadMessage::connected();
            if let Err(e) = ws.send(Message::Text(connected.to_json().into())) {
                crate::log!("reload"; "failed to send connected message: {}", e);
                return;
            }
            let mut clients = clients.lock();
            crate::debug!("reload"; "client registered (total: {})", clients.len() + 1);
            clients.push(ws);
        }
        Err(e) => {
            crate::log!("reload"; "handshake failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_retries_busy_ports() {
        // Occupy a port, then ask bind() to start there: it must retry
        // onto a free one
        let (_first, port) = bind(0).expect("ephemeral bind");
        let (second, actual) = bind(port).expect("retry bind");
        assert_ne!(port, actual);
        drop(second);
    }
}
