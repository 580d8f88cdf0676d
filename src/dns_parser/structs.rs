use super::{Class, Header, Name, RRData, Type};

/// Parsed DNS packet
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub nameservers: Vec<ResourceRecord>,
    pub additional: Vec<ResourceRecord>,
}

/// A parsed chunk of data in the Query section of the packet
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub qname: Name,
    pub qtype: Type,
    pub qclass: Class,
}

/// A single DNS record
///
/// Records of types other than A keep their data as an unparsed slice of
/// bytes, see `RRData`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRecord {
    pub name: Name,
    pub cls: Class,
    /// Unsigned, as received
    pub ttl: u32,
    pub data: RRData,
}

impl ResourceRecord {
    pub fn typ(&self) -> Type {
        self.data.typ()
    }
}
