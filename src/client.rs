use std::io;

use log::{debug, trace, warn};
use rand::Rng;
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::time::timeout;

use crate::address_family;
use crate::config::ClientConfig;
use crate::dns_parser::{self, decode_response, encode_query, Header, Name, Response};

/// Error performing a lookup
#[derive(Debug, Error)]
pub enum Error {
    #[error("socket error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed message: {0}")]
    Parse(#[from] dns_parser::Error),
    #[error("no response after {0} attempt(s)")]
    Timeout(u32),
    #[error("can't resolve server {0:?}")]
    InvalidServer(String),
}

/// Sends single-question queries to one server over UDP
pub struct UdpClient {
    socket: UdpSocket,
    config: ClientConfig,
}

impl UdpClient {
    // Will panic if called from outside the context of a runtime
    pub fn bind(config: ClientConfig) -> Result<UdpClient, Error> {
        let std_socket = address_family::bind_for(&config.server)?;
        let socket = UdpSocket::from_std(std_socket)?;
        Ok(UdpClient { socket, config })
    }

    pub async fn send(&self, packet: &[u8]) -> io::Result<usize> {
        self.socket.send_to(packet, self.config.server).await
    }

    /// Waits for the next datagram from the configured server
    ///
    /// Datagrams from other sources are dropped.
    pub async fn receive(&self, max_size: usize) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; max_size];
        loop {
            let (len, addr) = self.socket.recv_from(&mut buf).await?;
            if addr != self.config.server {
                warn!("dropping packet from unexpected source {:?}", addr);
                continue;
            }
            debug!("received {} bytes from {:?}", len, addr);
            buf.truncate(len);
            return Ok(buf);
        }
    }

    /// Looks up the A records of `qname`
    ///
    /// The query id is drawn from `rng`. Each attempt waits up to the
    /// configured timeout; responses carrying another id are discarded.
    pub async fn query<R: Rng + ?Sized>(
        &self,
        qname: &Name,
        rng: &mut R,
    ) -> Result<Response, Error> {
        let packet = encode_query(qname, self.config.recursion_desired, rng)?;
        let id = Header::parse(&packet)?.id;
        debug!("query id {} for {}", id, qname);

        for attempt in 1..=self.config.attempts.max(1) {
            let sent = self.send(&packet).await?;
            if sent != packet.len() {
                warn!("failed to send entire packet");
            }
            debug!(
                "sent {} bytes to {:?} (attempt {})",
                sent, self.config.server, attempt
            );

            match timeout(self.config.timeout, self.wait_for(id)).await {
                Ok(result) => return result,
                Err(_) => warn!(
                    "no response from {:?} within {:?}",
                    self.config.server, self.config.timeout
                ),
            }
        }

        Err(Error::Timeout(self.config.attempts.max(1)))
    }

    async fn wait_for(&self, id: u16) -> Result<Response, Error> {
        loop {
            let data = self.receive(self.config.recv_buffer_size).await?;
            let header = match Header::parse(&data) {
                Ok(header) => header,
                Err(error) => {
                    warn!("couldn't parse packet header: {}", error);
                    continue;
                }
            };
            if header.query || header.id != id {
                warn!(
                    "discarding packet with id {} (query: {}), waiting for {}",
                    header.id, header.query, id
                );
                continue;
            }
            trace!("response header {:?}", header);
            return Ok(decode_response(&data)?);
        }
    }
}
