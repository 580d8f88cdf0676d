//! A small DNS lookup client
//!
//! [`dns_parser`] holds the RFC 1035 message codec. [`UdpClient`] sends a
//! single-question query to one server and decodes what comes back.

pub mod dns_parser;

mod address_family;
pub mod client;
mod config;

pub use crate::client::{Error, UdpClient};
pub use crate::config::ClientConfig;
pub use crate::dns_parser::{Name, Packet, Response};

pub const DNS_PORT: u16 = 53;
