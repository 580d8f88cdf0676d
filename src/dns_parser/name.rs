use std::collections::HashSet;
use std::fmt;
use std::io;
use std::str::FromStr;

use byteorder::WriteBytesExt;
use log::trace;

use super::{Cursor, Error};

const POINTER_MASK: u8 = 0b1100_0000;
const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 255;

/// A domain name, as an owned sequence of labels
///
/// The root label is implicit; `Name::root()` has no labels at all. Labels
/// decoded from a packet are copied out of it, so a `Name` never borrows
/// the buffer it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    labels: Vec<Vec<u8>>,
}

impl Name {
    pub fn root() -> Name {
        Name { labels: Vec::new() }
    }

    /// Builds a name from raw labels, checking RFC 1035 size limits
    pub fn from_labels(labels: Vec<Vec<u8>>) -> Result<Name, Error> {
        let mut len = 1;
        for label in &labels {
            if label.is_empty() {
                return Err(Error::InvalidLabel);
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(Error::LabelTooLong);
            }
            len += label.len() + 1;
        }
        if len > MAX_NAME_LEN {
            return Err(Error::NameTooLong);
        }
        Ok(Name { labels })
    }

    pub fn labels(&self) -> &[Vec<u8>] {
        &self.labels
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// Size of the uncompressed wire form, terminator included
    pub fn wire_len(&self) -> usize {
        self.labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1
    }

    /// Reads a name at the cursor, following compression pointers
    ///
    /// On success the cursor is left right after the name as it appears at
    /// the original position: after the zero terminator, or after the first
    /// pointer met. Jumps only affect where labels are collected from.
    pub fn read(cursor: &mut Cursor) -> Result<Name, Error> {
        let mut labels = Vec::new();
        let mut visited = HashSet::new();
        let mut pos = cursor.position();
        let mut resume = None;
        let mut len = 1;

        loop {
            visited.insert(pos);
            let byte = cursor.peek_at(pos, 1)?[0];
            match byte & POINTER_MASK {
                0 if byte == 0 => {
                    pos += 1;
                    break;
                }
                0 => {
                    let size = byte as usize;
                    let label = cursor.peek_at(pos + 1, size)?;
                    len += size + 1;
                    if len > MAX_NAME_LEN {
                        return Err(Error::NameTooLong);
                    }
                    labels.push(label.to_vec());
                    pos += size + 1;
                }
                POINTER_MASK => {
                    let low = cursor.peek_at(pos + 1, 1)?[0];
                    let target = ((byte & !POINTER_MASK) as usize) << 8 | low as usize;
                    if visited.contains(&target) {
                        return Err(Error::CompressionLoop(target));
                    }
                    if target >= pos {
                        return Err(Error::CompressionPointerForward { at: pos, target });
                    }
                    trace!("following name pointer at {} to {}", pos, target);
                    if resume.is_none() {
                        resume = Some(pos + 2);
                    }
                    pos = target;
                }
                _ => return Err(Error::InvalidLabelLength(byte)),
            }
        }

        cursor.set_position(resume.unwrap_or(pos))?;
        Ok(Name { labels })
    }

    /// Reads a name starting at an absolute offset of a packet
    ///
    /// Returns the name and the offset right after it.
    pub fn scan(data: &[u8], offset: usize) -> Result<(Name, usize), Error> {
        let mut cursor = Cursor::new(data);
        cursor.set_position(offset)?;
        let name = Name::read(&mut cursor)?;
        Ok((name, cursor.position()))
    }

    pub fn write_to<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        for label in &self.labels {
            writer.write_u8(label.len() as u8)?;
            writer.write_all(label)?;
        }
        writer.write_u8(0)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.wire_len());
        for label in &self.labels {
            buf.push(label.len() as u8);
            buf.extend_from_slice(label);
        }
        buf.push(0);
        buf
    }
}

impl FromStr for Name {
    type Err = Error;

    /// Parses a dotted name; a single trailing dot is accepted
    fn from_str(name: &str) -> Result<Name, Error> {
        let name = name.strip_suffix('.').unwrap_or(name);
        if name.is_empty() {
            return Ok(Name::root());
        }
        let mut labels = Vec::new();
        for part in name.split('.') {
            if part.is_empty() || !part.is_ascii() {
                return Err(Error::InvalidLabel);
            }
            labels.push(part.as_bytes().to_vec());
        }
        Name::from_labels(labels)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        if self.labels.is_empty() {
            return fmt.write_str(".");
        }
        for (i, label) in self.labels.iter().enumerate() {
            if i != 0 {
                fmt.write_str(".")?;
            }
            for &byte in label {
                match byte {
                    b'.' | b'\\' => write!(fmt, "\\{}", byte as char)?,
                    0x21..=0x7e => write!(fmt, "{}", byte as char)?,
                    _ => write!(fmt, "\\{:03}", byte)?,
                }
            }
        }
        Ok(())
    }
}
