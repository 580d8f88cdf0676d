use std::marker::PhantomData;

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use rand::Rng;

use super::{Class, Error, Header, Name, Opcode, Question, RRData, ResponseCode, Type};

pub enum Questions {}
pub enum Answers {}
pub enum Nameservers {}
pub enum Additional {}

pub trait MoveTo<T> {}
impl<T> MoveTo<T> for T {}

impl MoveTo<Answers> for Questions {}

impl MoveTo<Nameservers> for Questions {}
impl MoveTo<Nameservers> for Answers {}

impl MoveTo<Additional> for Questions {}
impl MoveTo<Additional> for Answers {}
impl MoveTo<Additional> for Nameservers {}

/// Allows to build a DNS packet
///
/// Sections can only be filled in wire order: questions, answers,
/// nameservers, then additional records.
pub struct Builder<S> {
    buf: Vec<u8>,
    max_size: Option<usize>,
    _state: PhantomData<S>,
}

impl Builder<Questions> {
    /// Creates a new query
    ///
    /// Initially all sections are empty. You're expected to fill
    /// the questions section with `add_question`
    pub fn new_query(id: u16, recursion: bool) -> Builder<Questions> {
        Builder::with_header(Header {
            id: id,
            query: true,
            opcode: Opcode::StandardQuery,
            authoritative: false,
            truncated: false,
            recursion_desired: recursion,
            recursion_available: false,
            reserved: 0,
            response_code: ResponseCode::NoError,
            questions: 0,
            answers: 0,
            nameservers: 0,
            additional: 0,
        })
    }

    pub fn new_response(id: u16, recursion: bool, authoritative: bool) -> Builder<Questions> {
        Builder::with_header(Header {
            id: id,
            query: false,
            opcode: Opcode::StandardQuery,
            authoritative: authoritative,
            truncated: false,
            recursion_desired: recursion,
            recursion_available: false,
            reserved: 0,
            response_code: ResponseCode::NoError,
            questions: 0,
            answers: 0,
            nameservers: 0,
            additional: 0,
        })
    }

    fn with_header(head: Header) -> Builder<Questions> {
        let mut buf = Vec::with_capacity(512);
        buf.extend_from_slice(&head.encode());
        Builder {
            buf: buf,
            max_size: Some(512),
            _state: PhantomData,
        }
    }
}

impl<T> Builder<T> {
    fn write_rr(&mut self, name: &Name, cls: Class, ttl: u32, data: &RRData) -> Result<(), Error> {
        name.write_to(&mut self.buf)?;
        self.buf.write_u16::<BigEndian>(data.typ().into())?;
        self.buf.write_u16::<BigEndian>(cls.into())?;
        self.buf.write_u32::<BigEndian>(ttl)?;

        let size_offset = self.buf.len();
        self.buf.write_u16::<BigEndian>(0)?;

        let data_offset = self.buf.len();
        data.write_to(&mut self.buf)?;
        let data_size = self.buf.len() - data_offset;
        if data_size > u16::max_value() as usize {
            return Err(Error::WrongRdataLength);
        }

        BigEndian::write_u16(
            &mut self.buf[size_offset..size_offset + 2],
            data_size as u16,
        );
        Ok(())
    }

    /// Returns the final packet
    ///
    /// When packet is not truncated method returns `Ok(packet)`. If
    /// packet is truncated the method returns `Err(packet)`. In both
    /// cases the packet is fully valid.
    pub fn build(mut self) -> Result<Vec<u8>, Vec<u8>> {
        match self.max_size {
            Some(max_size) if self.buf.len() > max_size => {
                Header::set_truncated(&mut self.buf[..12]);
                Err(self.buf)
            }
            _ => Ok(self.buf),
        }
    }

    pub fn move_to<U>(self) -> Builder<U>
    where
        T: MoveTo<U>,
    {
        Builder {
            buf: self.buf,
            max_size: self.max_size,
            _state: PhantomData,
        }
    }

    pub fn set_response_code(&mut self, code: ResponseCode) {
        let flags = BigEndian::read_u16(&self.buf[2..4]) & !0x000F | u8::from(code) as u16;
        BigEndian::write_u16(&mut self.buf[2..4], flags);
    }
}

impl<T: MoveTo<Questions>> Builder<T> {
    /// Adds a question to the packet
    pub fn add_question(
        self,
        qname: &Name,
        qtype: Type,
        qclass: Class,
    ) -> Result<Builder<Questions>, Error> {
        let mut builder = self.move_to::<Questions>();

        let question = Question {
            qname: qname.clone(),
            qtype,
            qclass,
        };
        question.write_to(&mut builder.buf)?;
        Header::inc_questions(&mut builder.buf).ok_or(Error::SectionFull)?;
        Ok(builder)
    }
}

impl<T: MoveTo<Answers>> Builder<T> {
    pub fn add_answer(
        self,
        name: &Name,
        cls: Class,
        ttl: u32,
        data: &RRData,
    ) -> Result<Builder<Answers>, Error> {
        let mut builder = self.move_to::<Answers>();

        builder.write_rr(name, cls, ttl, data)?;
        Header::inc_answers(&mut builder.buf).ok_or(Error::SectionFull)?;

        Ok(builder)
    }
}

impl<T: MoveTo<Nameservers>> Builder<T> {
    pub fn add_nameserver(
        self,
        name: &Name,
        cls: Class,
        ttl: u32,
        data: &RRData,
    ) -> Result<Builder<Nameservers>, Error> {
        let mut builder = self.move_to::<Nameservers>();

        builder.write_rr(name, cls, ttl, data)?;
        Header::inc_nameservers(&mut builder.buf).ok_or(Error::SectionFull)?;

        Ok(builder)
    }
}

impl<T: MoveTo<Additional>> Builder<T> {
    pub fn add_additional(
        self,
        name: &Name,
        cls: Class,
        ttl: u32,
        data: &RRData,
    ) -> Result<Builder<Additional>, Error> {
        let mut builder = self.move_to::<Additional>();

        builder.write_rr(name, cls, ttl, data)?;
        Header::inc_additional(&mut builder.buf).ok_or(Error::SectionFull)?;

        Ok(builder)
    }
}

/// Builds a single-question A/IN query
///
/// The message id is drawn from `rng`.
pub fn encode_query<R: Rng + ?Sized>(
    qname: &Name,
    recursion: bool,
    rng: &mut R,
) -> Result<Vec<u8>, Error> {
    let builder =
        Builder::new_query(rng.gen(), recursion).add_question(qname, Type::A, Class::IN)?;
    // a single name can't exceed 512 bytes
    Ok(builder.build().unwrap_or_else(|x| x))
}

#[cfg(test)]
mod test {
    use std::net::Ipv4Addr;

    use rand::rngs::mock::StepRng;

    use super::{encode_query, Builder};
    use crate::dns_parser::{Class, Header, Name, Packet, RRData, ResponseCode, Type};

    #[test]
    fn build_query() {
        let mut bld = Builder::new_query(1573, true);
        let name = "example.com".parse::<Name>().unwrap();
        bld = bld.add_question(&name, Type::A, Class::IN).unwrap();
        let result = b"\x06%\x01\x00\x00\x01\x00\x00\x00\x00\x00\x00\
                      \x07example\x03com\x00\x00\x01\x00\x01";
        assert_eq!(&bld.build().unwrap()[..], &result[..]);
    }

    #[test]
    fn build_mx_query() {
        let mut bld = Builder::new_query(23513, true);
        let name = "_xmpp-server._tcp.gmail.com".parse::<Name>().unwrap();
        bld = bld.add_question(&name, Type::MX, Class::IN).unwrap();
        let result = b"[\xd9\x01\x00\x00\x01\x00\x00\x00\x00\x00\x00\
            \x0c_xmpp-server\x04_tcp\x05gmail\x03com\x00\x00\x0f\x00\x01";
        assert_eq!(&bld.build().unwrap()[..], &result[..]);
    }

    #[test]
    fn encode_query_uses_injected_id() {
        let mut rng = StepRng::new(0xabcd, 0);
        let name = "example.com".parse::<Name>().unwrap();
        let query = encode_query(&name, false, &mut rng).unwrap();
        let result = b"\xab\xcd\x00\x00\x00\x01\x00\x00\x00\x00\x00\x00\
                      \x07example\x03com\x00\x00\x01\x00\x01";
        assert_eq!(&query[..], &result[..]);

        let header = Header::parse(&query).unwrap();
        assert!(header.query);
        assert!(!header.recursion_desired);
        assert_eq!(header.questions, 1);
    }

    #[test]
    fn encode_query_with_recursion() {
        let name = "example.com".parse::<Name>().unwrap();
        let query = encode_query(&name, true, &mut StepRng::new(1573, 0)).unwrap();
        assert_eq!(&query[..4], b"\x06%\x01\x00");
        assert!(Header::parse(&query).unwrap().recursion_desired);
    }

    #[test]
    fn build_response_and_parse_it_back() {
        let name = "example.com".parse::<Name>().unwrap();
        let mut bld = Builder::new_response(7, false, true)
            .add_question(&name, Type::A, Class::IN)
            .unwrap()
            .add_answer(
                &name,
                Class::IN,
                300,
                &RRData::A(vec![Ipv4Addr::new(93, 184, 216, 34)]),
            )
            .unwrap()
            .add_nameserver(&name, Class::IN, 60, &RRData::SOA(vec![0, 0]))
            .unwrap()
            .add_additional(
                &name,
                Class::IN,
                60,
                &RRData::Unknown {
                    typ: Type::TXT,
                    data: b"\x02hi".to_vec(),
                },
            )
            .unwrap();
        bld.set_response_code(ResponseCode::Refused);

        let packet = Packet::parse(&bld.build().unwrap()).unwrap();
        assert!(!packet.header.query);
        assert!(packet.header.authoritative);
        assert_eq!(packet.header.response_code, ResponseCode::Refused);
        assert_eq!(packet.questions.len(), 1);
        assert_eq!(packet.answers[0].ttl, 300);
        assert_eq!(packet.nameservers[0].data, RRData::SOA(vec![0, 0]));
        assert_eq!(packet.additional[0].typ(), Type::TXT);
    }

    #[test]
    fn oversized_packet_is_truncated() {
        let name = "example.com".parse::<Name>().unwrap();
        let mut bld = Builder::new_response(1, false, false).move_to::<super::Answers>();
        for i in 0..40 {
            bld = bld
                .add_answer(&name, Class::IN, 60, &RRData::A(vec![Ipv4Addr::new(10, 0, 0, i)]))
                .unwrap();
        }
        let packet = match bld.build() {
            Err(packet) => packet,
            Ok(_) => panic!("packet should be truncated"),
        };
        assert!(Header::parse(&packet).unwrap().truncated);
    }
}
