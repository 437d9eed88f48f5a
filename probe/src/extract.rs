//! Named access to the fields of a successful query

use query::ServerInfo;

/// The text fields that can be written to output files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Name,
    Map,
    Folder,
    Game,
    Version,
    Keywords,
}

impl TextField {
    pub const ALL: [TextField; 6] = [
        TextField::Name,
        TextField::Map,
        TextField::Folder,
        TextField::Game,
        TextField::Version,
        TextField::Keywords,
    ];

    /// Human-readable name used in messages
    pub fn label(self) -> &'static str {
        match self {
            TextField::Name => "server name",
            TextField::Map => "server map",
            TextField::Folder => "game folder",
            TextField::Game => "game name",
            TextField::Version => "server version",
            TextField::Keywords => "game keywords",
        }
    }

    /// Long command-line flag selecting this field's output file
    pub fn flag(self) -> &'static str {
        match self {
            TextField::Name => "name-file",
            TextField::Map => "map-file",
            TextField::Folder => "folder-file",
            TextField::Game => "game-file",
            TextField::Version => "version-file",
            TextField::Keywords => "keywords-file",
        }
    }
}

/// Response record owned by the run.
///
/// Text values are the exact bytes the server sent; their length is the
/// slice length. Counters are widened to `i64` so derived statistics such
/// as players minus bots can go negative before clamping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub name: Vec<u8>,
    pub map: Vec<u8>,
    pub folder: Vec<u8>,
    pub game: Vec<u8>,
    pub version: Vec<u8>,
    pub keywords: Vec<u8>,
    pub id: i64,
    pub players: i64,
    pub max_players: i64,
    pub bots: i64,
}

impl QueryResult {
    pub fn text(&self, field: TextField) -> &[u8] {
        match field {
            TextField::Name => &self.name,
            TextField::Map => &self.map,
            TextField::Folder => &self.folder,
            TextField::Game => &self.game,
            TextField::Version => &self.version,
            TextField::Keywords => &self.keywords,
        }
    }
}

impl From<ServerInfo> for QueryResult {
    fn from(info: ServerInfo) -> Self {
        Self {
            name: info.name,
            map: info.map,
            folder: info.folder,
            game: info.game,
            version: info.version,
            keywords: info.keywords,
            id: i64::from(info.id),
            players: i64::from(info.players),
            max_players: i64::from(info.max_players),
            bots: i64::from(info.bots),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_server_info_keeps_bytes_verbatim() {
        let info = ServerInfo {
            name: vec![b'A', 0xFF, b'B'],
            map: b"cp_badlands".to_vec(),
            folder: b"tf".to_vec(),
            game: b"Team Fortress".to_vec(),
            version: b"8622567".to_vec(),
            keywords: b"alltalk,cp".to_vec(),
            id: 440,
            players: 12,
            max_players: 24,
            bots: 3,
            ..ServerInfo::default()
        };

        let result = QueryResult::from(info);
        assert_eq!(result.text(TextField::Name), &[b'A', 0xFF, b'B']);
        assert_eq!(result.text(TextField::Map), b"cp_badlands");
        assert_eq!(result.text(TextField::Folder), b"tf");
        assert_eq!(result.text(TextField::Game), b"Team Fortress");
        assert_eq!(result.text(TextField::Version), b"8622567");
        assert_eq!(result.text(TextField::Keywords), b"alltalk,cp");
        assert_eq!(result.id, 440);
        assert_eq!(result.players, 12);
        assert_eq!(result.max_players, 24);
        assert_eq!(result.bots, 3);
    }

    #[test]
    fn test_labels_and_flags_are_distinct() {
        let labels: std::collections::HashSet<_> =
            TextField::ALL.iter().map(|f| f.label()).collect();
        let flags: std::collections::HashSet<_> =
            TextField::ALL.iter().map(|f| f.flag()).collect();
        assert_eq!(labels.len(), 6);
        assert_eq!(flags.len(), 6);
        assert_eq!(TextField::Keywords.label(), "game keywords");
        assert_eq!(TextField::Folder.flag(), "folder-file");
    }
}
