//! A2S_INFO response payload

use crate::error::{QueryError, Result};
use crate::packet::{PacketReader, S2A_INFO};

/// App id of The Ship, which inserts extra fields before the version string
const THE_SHIP_APP_ID: u16 = 2400;

const EDF_PORT: u8 = 0x80;
const EDF_STEAM_ID: u8 = 0x10;
const EDF_SPECTATOR: u8 = 0x40;
const EDF_KEYWORDS: u8 = 0x20;
const EDF_GAME_ID: u8 = 0x01;

/// Server status as reported by A2S_INFO.
///
/// Text fields are kept as the raw bytes the server sent, without the NUL
/// terminator. Servers are not consistent about encoding, so nothing is
/// decoded here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerInfo {
    pub protocol: u8,
    pub name: Vec<u8>,
    pub map: Vec<u8>,
    pub folder: Vec<u8>,
    pub game: Vec<u8>,
    /// Steam application id
    pub id: u16,
    pub players: u8,
    pub max_players: u8,
    pub bots: u8,
    pub server_type: ServerType,
    pub environment: Environment,
    /// Password protected
    pub visibility: bool,
    pub vac: bool,
    pub the_ship: Option<TheShip>,
    pub version: Vec<u8>,
    /// Empty when the server did not send the keywords extra field
    pub keywords: Vec<u8>,
    pub port: Option<u16>,
    pub steam_id: Option<u64>,
    pub spectator: Option<Spectator>,
    pub game_id: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ServerType {
    Dedicated,
    NonDedicated,
    SourceTv,
    #[default]
    Unknown,
}

impl From<u8> for ServerType {
    fn from(value: u8) -> Self {
        match value {
            b'd' | b'D' => ServerType::Dedicated,
            b'l' | b'L' => ServerType::NonDedicated,
            b'p' | b'P' => ServerType::SourceTv,
            _ => ServerType::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    Linux,
    Windows,
    Mac,
    #[default]
    Unknown,
}

impl From<u8> for Environment {
    fn from(value: u8) -> Self {
        match value {
            b'l' | b'L' => Environment::Linux,
            b'w' | b'W' => Environment::Windows,
            b'm' | b'o' | b'M' | b'O' => Environment::Mac,
            _ => Environment::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TheShip {
    pub mode: u8,
    pub witnesses: u8,
    pub duration: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spectator {
    pub port: u16,
    pub name: Vec<u8>,
}

impl ServerInfo {
    /// Parses a message whose single-packet prefix has already been removed.
    /// The first byte must be the `S2A_INFO` header.
    pub fn parse(message: &[u8]) -> Result<Self> {
        let mut reader = PacketReader::new(message);

        let header = reader.read_u8("header")?;
        if header != S2A_INFO {
            return Err(QueryError::UnexpectedHeader(header));
        }

        let mut info = ServerInfo {
            protocol: reader.read_u8("protocol")?,
            name: reader.read_cstring("name")?,
            map: reader.read_cstring("map")?,
            folder: reader.read_cstring("folder")?,
            game: reader.read_cstring("game")?,
            id: reader.read_u16("id")?,
            players: reader.read_u8("players")?,
            max_players: reader.read_u8("max players")?,
            bots: reader.read_u8("bots")?,
            server_type: ServerType::from(reader.read_u8("server type")?),
            environment: Environment::from(reader.read_u8("environment")?),
            visibility: reader.read_u8("visibility")? != 0,
            vac: reader.read_u8("vac")? != 0,
            ..ServerInfo::default()
        };

        if info.id == THE_SHIP_APP_ID {
            info.the_ship = Some(TheShip {
                mode: reader.read_u8("ship mode")?,
                witnesses: reader.read_u8("ship witnesses")?,
                duration: reader.read_u8("ship duration")?,
            });
        }

        info.version = reader.read_cstring("version")?;

        // Extra data is optional; older servers end the payload here
        if reader.is_empty() {
            return Ok(info);
        }

        let edf = reader.read_u8("extra data flag")?;
        if edf & EDF_PORT != 0 {
            info.port = Some(reader.read_u16("game port")?);
        }
        if edf & EDF_STEAM_ID != 0 {
            info.steam_id = Some(reader.read_u64("steam id")?);
        }
        if edf & EDF_SPECTATOR != 0 {
            info.spectator = Some(Spectator {
                port: reader.read_u16("spectator port")?,
                name: reader.read_cstring("spectator name")?,
            });
        }
        if edf & EDF_KEYWORDS != 0 {
            info.keywords = reader.read_cstring("keywords")?;
        }
        if edf & EDF_GAME_ID != 0 {
            info.game_id = Some(reader.read_u64("game id")?);
        }

        Ok(info)
    }
}
