use std::fmt;
use std::io;
use std::net::Ipv4Addr;

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use super::{Error, Type};

/// The data of a resource record
///
/// Only A records are interpreted. Everything else, SOA included, keeps its
/// RDATA as raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RRData {
    A(Vec<Ipv4Addr>),
    /// Start of authority; the MNAME/RNAME/serial/timer fields are left
    /// undecoded
    SOA(Vec<u8>),
    // Anything that can't be parsed yet
    Unknown {
        typ: Type,
        data: Vec<u8>,
    },
}

impl RRData {
    pub fn typ(&self) -> Type {
        match *self {
            RRData::A(..) => Type::A,
            RRData::SOA(..) => Type::SOA,
            RRData::Unknown { typ, .. } => typ,
        }
    }

    pub fn write_to<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        match *self {
            RRData::A(ref addrs) => {
                for ip in addrs {
                    writer.write_u32::<BigEndian>((*ip).into())?;
                }
                Ok(())
            }
            RRData::SOA(ref data) => writer.write_all(data),
            RRData::Unknown { ref data, .. } => writer.write_all(data),
        }
    }

    pub fn parse(typ: Type, rdata: &[u8]) -> Result<RRData, Error> {
        match typ {
            Type::A => {
                if rdata.is_empty() || rdata.len() % 4 != 0 {
                    return Err(Error::WrongRdataLength);
                }
                Ok(RRData::A(
                    rdata
                        .chunks(4)
                        .map(|quad| Ipv4Addr::from(BigEndian::read_u32(quad)))
                        .collect(),
                ))
            }
            Type::SOA => Ok(RRData::SOA(rdata.to_vec())),
            typ => Ok(RRData::Unknown {
                typ: typ,
                data: rdata.to_vec(),
            }),
        }
    }
}

impl fmt::Display for RRData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RRData::A(ref addrs) => {
                for (i, ip) in addrs.iter().enumerate() {
                    if i != 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", ip)?;
                }
                Ok(())
            }
            // RFC 3597 generic notation
            RRData::SOA(ref data) | RRData::Unknown { ref data, .. } => {
                write!(f, "\\# {}", data.len())?;
                if !data.is_empty() {
                    f.write_str(" ")?;
                    for byte in data {
                        write!(f, "{:02x}", byte)?;
                    }
                }
                Ok(())
            }
        }
    }
}
