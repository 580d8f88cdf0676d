use std::io;

use byteorder::{BigEndian, WriteBytesExt};
use log::trace;

use super::{Class, Cursor, Error, Header, Name, Packet, Question, RRData, ResourceRecord, Type};

impl Question {
    /// Reads one question entry at the cursor
    pub fn read(cursor: &mut Cursor) -> Result<Question, Error> {
        let qname = Name::read(cursor)?;
        if cursor.remaining() < 4 {
            return Err(Error::TruncatedMessage);
        }
        let qtype = cursor.read_u16()?.into();
        let qclass = cursor.read_u16()?.into();
        Ok(Question {
            qname,
            qtype,
            qclass,
        })
    }

    pub fn write_to<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        self.qname.write_to(writer)?;
        writer.write_u16::<BigEndian>(self.qtype.into())?;
        writer.write_u16::<BigEndian>(self.qclass.into())
    }
}

impl ResourceRecord {
    /// Reads one resource record at the cursor
    ///
    /// Exactly RDLENGTH bytes of data are consumed, whatever the type, so
    /// the cursor stays aligned on the next record.
    pub fn read(cursor: &mut Cursor) -> Result<ResourceRecord, Error> {
        let name = Name::read(cursor)?;
        if cursor.remaining() < 10 {
            return Err(Error::TruncatedMessage);
        }
        let typ: Type = cursor.read_u16()?.into();
        let cls: Class = cursor.read_u16()?.into();
        let ttl = cursor.read_u32()?;
        let rdlength = cursor.read_u16()? as usize;
        if cursor.remaining() < rdlength {
            return Err(Error::TruncatedMessage);
        }
        let rdata = cursor.read_bytes(rdlength)?;
        trace!("record {} {} {} rdlength {}", name, cls, typ, rdlength);
        Ok(ResourceRecord {
            name,
            cls,
            ttl,
            data: RRData::parse(typ, rdata)?,
        })
    }
}

fn read_records(cursor: &mut Cursor, count: u16) -> Result<Vec<ResourceRecord>, Error> {
    let mut records = Vec::new();
    for _ in 0..count {
        records.push(ResourceRecord::read(cursor)?);
    }
    Ok(records)
}

impl Packet {
    /// Parses a whole message
    ///
    /// Every section is read for exactly the number of entries its header
    /// count declares. A buffer that ends early yields
    /// `Error::TruncatedMessage`.
    pub fn parse(data: &[u8]) -> Result<Packet, Error> {
        let mut cursor = Cursor::new(data);
        let header = Header::read(&mut cursor)?;
        Packet::read_sections(header, &mut cursor).map_err(Error::into_truncated)
    }

    fn read_sections(header: Header, cursor: &mut Cursor) -> Result<Packet, Error> {
        let mut questions = Vec::new();
        for _ in 0..header.questions {
            questions.push(Question::read(cursor)?);
        }
        let answers = read_records(cursor, header.answers)?;
        let nameservers = read_records(cursor, header.nameservers)?;
        let additional = read_records(cursor, header.additional)?;
        if cursor.remaining() > 0 {
            trace!("ignoring {} trailing bytes", cursor.remaining());
        }
        Ok(Packet {
            header,
            questions,
            answers,
            nameservers,
            additional,
        })
    }

    /// `true` when the answer, authority and additional sections are all
    /// empty
    pub fn is_no_data(&self) -> bool {
        self.answers.is_empty() && self.nameservers.is_empty() && self.additional.is_empty()
    }
}

/// Outcome of decoding a response
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// At least one record was present in some section
    Answer(Packet),
    /// Well-formed but carrying no records at all; a recursive lookup
    /// elsewhere may still find an answer
    NoData(Packet),
}

impl Response {
    pub fn packet(&self) -> &Packet {
        match *self {
            Response::Answer(ref packet) | Response::NoData(ref packet) => packet,
        }
    }
}

pub fn decode_response(data: &[u8]) -> Result<Response, Error> {
    let packet = Packet::parse(data)?;
    if packet.is_no_data() {
        Ok(Response::NoData(packet))
    } else {
        Ok(Response::Answer(packet))
    }
}

#[cfg(test)]
mod test {
    use std::net::Ipv4Addr;

    use super::{decode_response, Response};
    use crate::dns_parser::{Class, Cursor, Error, Packet, Question, RRData, ResponseCode, Type};

    const EXAMPLE_COM_RESPONSE: &[u8] = b"\x06%\x81\x80\x00\x01\x00\x01\x00\x00\x00\x00\
        \x07example\x03com\x00\x00\x01\x00\x01\
        \xc0\x0c\x00\x01\x00\x01\x00\x00\x0e\x10\x00\x04]\xb8\xd8\x22";

    #[test]
    fn parse_example_com_response() {
        let packet = Packet::parse(EXAMPLE_COM_RESPONSE).unwrap();
        assert_eq!(packet.header.id, 1573);
        assert!(!packet.header.query);
        assert_eq!(packet.header.response_code, ResponseCode::NoError);
        assert_eq!(packet.questions.len(), 1);
        assert_eq!(packet.questions[0].qname.to_string(), "example.com");
        assert_eq!(packet.questions[0].qtype, Type::A);
        assert_eq!(packet.questions[0].qclass, Class::IN);

        assert_eq!(packet.answers.len(), 1);
        let answer = &packet.answers[0];
        assert_eq!(answer.name.to_string(), "example.com");
        assert_eq!(answer.cls, Class::IN);
        assert_eq!(answer.ttl, 3600);
        assert_eq!(answer.data, RRData::A(vec![Ipv4Addr::new(93, 184, 216, 34)]));
    }

    #[test]
    fn answer_outcome() {
        match decode_response(EXAMPLE_COM_RESPONSE).unwrap() {
            Response::Answer(packet) => assert_eq!(packet.answers.len(), 1),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn no_data_outcome() {
        let data = b"\x00\x07\x81\x83\x00\x01\x00\x00\x00\x00\x00\x00\
            \x07example\x03com\x00\x00\x01\x00\x01";
        let response = decode_response(data).unwrap();
        match response {
            Response::NoData(ref packet) => {
                assert_eq!(packet.header.response_code, ResponseCode::NameError);
                assert_eq!(packet.questions.len(), 1);
            }
            ref other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(response.packet().header.id, 7);
    }

    #[test]
    fn every_question_is_consumed() {
        let data = b"\x00\x01\x81\x80\x00\x02\x00\x01\x00\x00\x00\x00\
            \x01a\x00\x00\x01\x00\x01\
            \x01b\x00\x00\x01\x00\x01\
            \xc0\x13\x00\x01\x00\x01\x00\x00\x00\x3c\x00\x04\x0a\x00\x00\x02";
        let packet = Packet::parse(data).unwrap();
        assert_eq!(packet.questions.len(), 2);
        assert_eq!(packet.questions[1].qname.to_string(), "b");
        assert_eq!(packet.answers[0].name.to_string(), "b");
        assert_eq!(packet.answers[0].data, RRData::A(vec![Ipv4Addr::new(10, 0, 0, 2)]));
    }

    #[test]
    fn missing_second_question_is_truncated() {
        let data = b"\x00\x01\x81\x80\x00\x02\x00\x00\x00\x00\x00\x00\
            \x01a\x00\x00\x01\x00\x01";
        match Packet::parse(data) {
            Err(Error::TruncatedMessage) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn short_rdata_is_truncated() {
        let data = b"\x00\x01\x81\x80\x00\x00\x00\x01\x00\x00\x00\x00\
            \x01a\x00\x00\x01\x00\x01\x00\x00\x00\x3c\x00\x04\x0a\x00";
        match Packet::parse(data) {
            Err(Error::TruncatedMessage) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn short_record_fields_are_truncated() {
        let data = b"\x00\x01\x81\x80\x00\x00\x00\x01\x00\x00\x00\x00\
            \x01a\x00\x00\x01\x00\x01\x00";
        match Packet::parse(data) {
            Err(Error::TruncatedMessage) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn records_stay_aligned_across_sections() {
        // authority SOA (opaque, 6 bytes), then an additional record of
        // unknown type 99
        let data = b"\x00\x01\x81\x80\x00\x00\x00\x00\x00\x01\x00\x01\
            \x03com\x00\x00\x06\x00\x01\x00\x00\x01\x00\x00\x06\x01a\x00\x01b\x00\
            \xc0\x0c\x00\x63\x00\x01\xff\xff\xff\xff\x00\x02\xbe\xef";
        let packet = Packet::parse(data).unwrap();
        assert_eq!(packet.nameservers.len(), 1);
        assert_eq!(packet.nameservers[0].typ(), Type::SOA);
        assert_eq!(packet.nameservers[0].ttl, 256);
        assert_eq!(packet.additional.len(), 1);
        let extra = &packet.additional[0];
        assert_eq!(extra.name.to_string(), "com");
        assert_eq!(extra.ttl, u32::max_value());
        assert_eq!(
            extra.data,
            RRData::Unknown {
                typ: Type::Unknown(99),
                data: vec![0xbe, 0xef],
            }
        );
        assert!(!packet.is_no_data());
    }

    #[test]
    fn loops_surface_from_packet_parse() {
        let data = b"\x00\x01\x81\x80\x00\x01\x00\x00\x00\x00\x00\x00\
            \xc0\x0c\x00\x01\x00\x01";
        match Packet::parse(data) {
            Err(Error::CompressionLoop(12)) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn question_write_matches_read() {
        let question = Question {
            qname: "example.com".parse().unwrap(),
            qtype: Type::A,
            qclass: Class::IN,
        };
        let mut buf = Vec::new();
        question.write_to(&mut buf).unwrap();
        assert_eq!(buf, b"\x07example\x03com\x00\x00\x01\x00\x01");

        let mut cur = Cursor::new(&buf);
        assert_eq!(Question::read(&mut cur).unwrap(), question);
        assert_eq!(cur.remaining(), 0);
    }
}
