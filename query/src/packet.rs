//! A2S packet framing: request construction, split-response reassembly and
//! a little-endian field reader for payloads.

use crate::error::{QueryError, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use log::trace;
use std::io::{Cursor, Read};

/// Prefix of an unsplit datagram (`FF FF FF FF`)
pub const SINGLE_PACKET: i32 = -1;
/// Prefix of one fragment of a split response (`FE FF FF FF`)
pub const MULTI_PACKET: i32 = -2;

pub const A2S_INFO: u8 = 0x54;
pub const A2S_INFO_PAYLOAD: &[u8] = b"Source Engine Query\0";
pub const S2A_INFO: u8 = 0x49;
pub const S2C_CHALLENGE: u8 = 0x41;

/// Largest datagram a Source server sends before splitting
pub const MAX_PACKET_SIZE: usize = 1400;

/// Fragment ids with the high bit set carry bzip2-compressed payloads
const COMPRESSED_FLAG: u32 = 0x8000_0000;

/// Builds an A2S_INFO request, appending the challenge when the server asked
/// for one.
pub fn info_request(challenge: Option<i32>) -> Vec<u8> {
    let mut request = Vec::with_capacity(4 + 1 + A2S_INFO_PAYLOAD.len() + 4);
    request.extend_from_slice(&SINGLE_PACKET.to_le_bytes());
    request.push(A2S_INFO);
    request.extend_from_slice(A2S_INFO_PAYLOAD);
    if let Some(challenge) = challenge {
        request.extend_from_slice(&challenge.to_le_bytes());
    }
    request
}

/// One received datagram, after its 4-byte prefix has been inspected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Datagram {
    /// Complete message, prefix stripped. First byte is the message header.
    Single(Vec<u8>),
    Fragment(Fragment),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub id: i32,
    pub total: u8,
    pub number: u8,
    pub payload: Vec<u8>,
}

impl Datagram {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = PacketReader::new(bytes);
        match reader.read_i32("packet prefix")? {
            SINGLE_PACKET => Ok(Datagram::Single(reader.remaining().to_vec())),
            MULTI_PACKET => {
                let id = reader.read_i32("fragment id")?;
                if id as u32 & COMPRESSED_FLAG != 0 {
                    return Err(QueryError::Compressed);
                }
                let total = reader.read_u8("fragment total")?;
                let number = reader.read_u8("fragment number")?;
                let _size = reader.read_u16("fragment size")?;

                if total == 0 || number >= total {
                    return Err(QueryError::Malformed(format!(
                        "fragment {} of {} is out of range",
                        number, total
                    )));
                }

                Ok(Datagram::Fragment(Fragment {
                    id,
                    total,
                    number,
                    payload: reader.remaining().to_vec(),
                }))
            }
            other => Err(QueryError::Malformed(format!(
                "unknown packet prefix 0x{:08X}",
                other as u32
            ))),
        }
    }
}

/// Collects the fragments of one split response
#[derive(Debug)]
pub struct Reassembler {
    id: i32,
    parts: Vec<Option<Vec<u8>>>,
}

impl Reassembler {
    pub fn new(id: i32, total: u8) -> Self {
        Self {
            id,
            parts: vec![None; total as usize],
        }
    }

    /// Stores a fragment. Returns the joined message, prefix stripped, once
    /// every fragment has arrived.
    pub fn push(&mut self, fragment: Fragment) -> Result<Option<Vec<u8>>> {
        if fragment.id != self.id {
            trace!(
                "Dropping fragment of response {} while assembling {}",
                fragment.id,
                self.id
            );
            return Ok(None);
        }
        if fragment.total as usize != self.parts.len() {
            return Err(QueryError::Malformed(format!(
                "fragment count changed from {} to {}",
                self.parts.len(),
                fragment.total
            )));
        }

        self.parts[fragment.number as usize] = Some(fragment.payload);
        if self.parts.iter().any(Option::is_none) {
            return Ok(None);
        }

        let joined: Vec<u8> = self
            .parts
            .iter_mut()
            .flat_map(|part| part.take().unwrap_or_default())
            .collect();
        let mut reader = PacketReader::new(&joined);
        match reader.read_i32("reassembled prefix")? {
            SINGLE_PACKET => Ok(Some(reader.remaining().to_vec())),
            other => Err(QueryError::Malformed(format!(
                "reassembled response has prefix 0x{:08X}",
                other as u32
            ))),
        }
    }
}

/// Cursor over a payload that names the field being read in its errors
pub struct PacketReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> PacketReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    fn truncated(field: &str) -> QueryError {
        QueryError::Malformed(format!("payload ends before {}", field))
    }

    pub fn read_u8(&mut self, field: &str) -> Result<u8> {
        self.cursor.read_u8().map_err(|_| Self::truncated(field))
    }

    pub fn read_u16(&mut self, field: &str) -> Result<u16> {
        self.cursor
            .read_u16::<LittleEndian>()
            .map_err(|_| Self::truncated(field))
    }

    pub fn read_i32(&mut self, field: &str) -> Result<i32> {
        self.cursor
            .read_i32::<LittleEndian>()
            .map_err(|_| Self::truncated(field))
    }

    pub fn read_u64(&mut self, field: &str) -> Result<u64> {
        self.cursor
            .read_u64::<LittleEndian>()
            .map_err(|_| Self::truncated(field))
    }

    /// Reads a NUL-terminated string, returning its bytes without the
    /// terminator. Bytes are not decoded.
    pub fn read_cstring(&mut self, field: &str) -> Result<Vec<u8>> {
        let rest = self.remaining();
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| Self::truncated(field))?;
        let mut value = vec![0u8; len];
        self.cursor
            .read_exact(&mut value)
            .map_err(|_| Self::truncated(field))?;
        self.cursor.set_position(self.cursor.position() + 1);
        Ok(value)
    }

    pub fn remaining(&self) -> &'a [u8] {
        let bytes = *self.cursor.get_ref();
        let pos = (self.cursor.position() as usize).min(bytes.len());
        &bytes[pos..]
    }

    pub fn is_empty(&self) -> bool {
        self.remaining().is_empty()
    }
}
