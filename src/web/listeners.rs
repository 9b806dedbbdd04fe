// TCP listener setup. A host of "*" binds a wildcard listener, preferring an
// IPv6 dual-stack socket and falling back to IPv4-only where dual-stack is
// unavailable.

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tracing::{info, warn};

pub async fn create_listener(
    host: &str,
    port: u16,
) -> std::io::Result<(String, tokio::net::TcpListener)> {
    if host == "*" {
        match bind_dual_stack_wildcard(port) {
            Ok(bound) => return Ok(bound),
            Err(err) => {
                warn!("Failed to bind IPv6 dual-stack listener ({}), trying IPv4 only", err);
                return bind_ipv4_wildcard(port);
            }
        }
    }

    let addr = format!("{}:{}", host, port);
    info!("Binding server to {}...", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    Ok((addr, listener))
}

fn bind_dual_stack_wildcard(port: u16) -> std::io::Result<(String, tokio::net::TcpListener)> {
    let str_addr = format!("[::]:{}", port);
    let addr: SocketAddr = str_addr
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    info!("Binding server to {}... (IPv6 + IPv4 dual-stack)", str_addr);

    let socket = Socket::new(Domain::IPV6, Type::STREAM, Some(Protocol::TCP))?;
    if let Err(e) = socket.set_only_v6(false) {
        // Some systems refuse dual-stack mode but still accept IPv6 traffic.
        warn!("Failed to set dual-stack mode for IPv6 socket: {}", e);
    }

    into_tokio_listener(socket, &addr).map(|listener| (str_addr, listener))
}

fn bind_ipv4_wildcard(port: u16) -> std::io::Result<(String, tokio::net::TcpListener)> {
    let str_addr = format!("0.0.0.0:{}", port);
    let addr: SocketAddr = str_addr
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    info!("Binding server to {}... (IPv4)", str_addr);

    let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))?;
    into_tokio_listener(socket, &addr).map(|listener| (str_addr, listener))
}

fn into_tokio_listener(
    socket: Socket,
    addr: &SocketAddr,
) -> std::io::Result<tokio::net::TcpListener> {
    socket.set_reuse_address(true)?;
    socket.bind(&(*addr).into())?;
    socket.listen(1024)?;
    // Tokio requires the socket in non-blocking mode.
    socket.set_nonblocking(true)?;

    let std_listener: std::net::TcpListener = socket.into();
    tokio::net::TcpListener::from_std(std_listener)
}
