//! RFC 1035 message codec

mod builder;
mod cursor;
mod enums;
mod error;
mod header;
mod name;
mod parser;
mod rrdata;
mod structs;

pub use self::builder::{encode_query, Additional, Answers, Builder, Nameservers, Questions};
pub use self::cursor::Cursor;
pub use self::enums::{Class, Opcode, ResponseCode, Type};
pub use self::error::Error;
pub use self::header::Header;
pub use self::name::Name;
pub use self::parser::{decode_response, Response};
pub use self::rrdata::RRData;
pub use self::structs::{Packet, Question, ResourceRecord};
