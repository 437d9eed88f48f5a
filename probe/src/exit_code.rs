//! Maps a query result to the process exit status

use crate::extract::QueryResult;

/// Which statistic becomes the exit code (`-c`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReturnSelector {
    #[default]
    Nothing,
    Id,
    Players,
    MaxPlayers,
    Bots,
    PlayersMinusBots,
}

impl ReturnSelector {
    /// Unknown codes select nothing
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => ReturnSelector::Id,
            2 => ReturnSelector::Players,
            3 => ReturnSelector::MaxPlayers,
            4 => ReturnSelector::Bots,
            5 => ReturnSelector::PlayersMinusBots,
            _ => ReturnSelector::Nothing,
        }
    }

    fn raw_value(self, result: &QueryResult) -> i64 {
        match self {
            ReturnSelector::Nothing => 0,
            ReturnSelector::Id => result.id,
            ReturnSelector::Players => result.players,
            ReturnSelector::MaxPlayers => result.max_players,
            ReturnSelector::Bots => result.bots,
            ReturnSelector::PlayersMinusBots => result.players - result.bots,
        }
    }

    /// Selected value, never negative
    pub fn return_code(self, result: &QueryResult) -> i64 {
        self.raw_value(result).max(0)
    }
}

/// Low byte of the return code, as the OS reports an `int` exit status
pub fn process_status(code: i64) -> u8 {
    (code & 0xFF) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: i64, players: i64, max_players: i64, bots: i64) -> QueryResult {
        QueryResult {
            id,
            players,
            max_players,
            bots,
            ..QueryResult::default()
        }
    }

    #[test]
    fn test_each_selector() {
        let r = result(440, 7, 24, 2);
        assert_eq!(ReturnSelector::from_code(0).return_code(&r), 0);
        assert_eq!(ReturnSelector::from_code(1).return_code(&r), 440);
        assert_eq!(ReturnSelector::from_code(2).return_code(&r), 7);
        assert_eq!(ReturnSelector::from_code(3).return_code(&r), 24);
        assert_eq!(ReturnSelector::from_code(4).return_code(&r), 2);
        assert_eq!(ReturnSelector::from_code(5).return_code(&r), 5);
    }

    #[test]
    fn test_more_bots_than_players_clamps_to_zero() {
        let r = result(10, 3, 16, 5);
        assert_eq!(ReturnSelector::PlayersMinusBots.return_code(&r), 0);
    }

    #[test]
    fn test_unknown_selector_yields_zero() {
        let r = result(440, 7, 24, 2);
        for code in [-1, 6, 42, i64::MIN, i64::MAX] {
            assert_eq!(ReturnSelector::from_code(code), ReturnSelector::Nothing);
            assert_eq!(ReturnSelector::from_code(code).return_code(&r), 0);
        }
    }

    #[test]
    fn test_negative_id_clamps_to_zero() {
        let r = result(-1, 0, 0, 0);
        assert_eq!(ReturnSelector::Id.return_code(&r), 0);
    }

    #[test]
    fn test_process_status_takes_low_byte() {
        assert_eq!(process_status(0), 0);
        assert_eq!(process_status(7), 7);
        assert_eq!(process_status(255), 255);
        assert_eq!(process_status(440), 184);
    }
}
