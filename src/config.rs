use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use log::debug;
use tokio::net::lookup_host;

use crate::client::Error;
use crate::DNS_PORT;

/// Settings for a `UdpClient`
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub server: SocketAddr,
    /// How long to wait for a response to each attempt
    pub timeout: Duration,
    pub attempts: u32,
    pub recv_buffer_size: usize,
    pub recursion_desired: bool,
}

impl Default for ClientConfig {
    fn default() -> ClientConfig {
        ClientConfig {
            server: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DNS_PORT),
            timeout: Duration::from_secs(5),
            attempts: 3,
            recv_buffer_size: 2048,
            recursion_desired: false,
        }
    }
}

async fn lookup(server: &str) -> Result<SocketAddr, Error> {
    let invalid = || Error::InvalidServer(server.to_owned());
    let (host, port) = match server.rsplit_once(':') {
        Some((host, port)) => (host, port.parse::<u16>().map_err(|_| invalid())?),
        None => (server, DNS_PORT),
    };
    if host.is_empty() || host.contains(':') {
        return Err(invalid());
    }
    match lookup_host((host, port)).await {
        Ok(mut addrs) => addrs.next().ok_or_else(invalid),
        Err(err) => {
            debug!("lookup of {:?} failed: {}", host, err);
            Err(invalid())
        }
    }
}

impl ClientConfig {
    /// Parses `host`, `host:port` or `[v6addr]:port`
    ///
    /// Literal addresses are taken as they are; anything else is looked up
    /// through the system resolver. The port defaults to 53.
    pub async fn for_server(server: &str) -> Result<ClientConfig, Error> {
        let server = match server.parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(_) => match server.parse::<IpAddr>() {
                Ok(ip) => SocketAddr::new(ip, DNS_PORT),
                Err(_) => lookup(server).await?,
            },
        };
        Ok(ClientConfig {
            server,
            ..ClientConfig::default()
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> ClientConfig {
        self.timeout = timeout;
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> ClientConfig {
        self.attempts = attempts.max(1);
        self
    }

    pub fn with_recv_buffer_size(mut self, size: usize) -> ClientConfig {
        self.recv_buffer_size = size;
        self
    }

    pub fn with_recursion_desired(mut self, recursion: bool) -> ClientConfig {
        self.recursion_desired = recursion;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::ClientConfig;
    use crate::client::Error;
    use std::time::Duration;

    #[tokio::test]
    async fn server_port_defaults_to_53() {
        let config = ClientConfig::for_server("8.8.8.8").await.unwrap();
        assert_eq!(config.server, "8.8.8.8:53".parse().unwrap());
        assert_eq!(config.attempts, 3);

        let config = ClientConfig::for_server("[::1]:5300").await.unwrap();
        assert_eq!(config.server, "[::1]:5300".parse().unwrap());

        let config = ClientConfig::for_server("::1").await.unwrap();
        assert_eq!(config.server.port(), 53);
    }

    #[tokio::test]
    async fn resolves_hostnames() {
        let config = ClientConfig::for_server("localhost").await.unwrap();
        assert!(config.server.ip().is_loopback());
        assert_eq!(config.server.port(), 53);

        let config = ClientConfig::for_server("localhost:5300").await.unwrap();
        assert!(config.server.ip().is_loopback());
        assert_eq!(config.server.port(), 5300);
    }

    #[tokio::test]
    async fn rejects_malformed_servers() {
        for server in &["localhost:dns", ":53", "localhost:70000"] {
            match ClientConfig::for_server(server).await {
                Err(Error::InvalidServer(ref s)) if s == server => (),
                other => panic!("unexpected result for {}: {:?}", server, other),
            }
        }
    }

    #[test]
    fn setters() {
        let config = ClientConfig::default()
            .with_timeout(Duration::from_millis(250))
            .with_attempts(0)
            .with_recursion_desired(true)
            .with_recv_buffer_size(512);
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.attempts, 1);
        assert!(config.recursion_desired);
        assert_eq!(config.recv_buffer_size, 512);
    }
}
