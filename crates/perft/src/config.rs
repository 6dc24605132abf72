//! Perft suite configuration.
//!
//! A suite is a list of positions with their published node counts, read
//! from a TOML file:
//!
//! ```toml
//! [[position]]
//! name = "kiwipete"
//! fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -"
//! expected = [48, 2039, 97862]
//! max_depth = 2
//! ```

use chess_core::{parse_setup, FenError, FenParser, Setup};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or using a suite.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read suite file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("failed to parse suite: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("position {name}: {source}")]
    InvalidFen {
        name: String,
        #[source]
        source: FenError,
    },
}

/// One position of a suite.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SuiteEntry {
    pub name: String,
    pub fen: String,
    /// Node counts for depth 1, 2, 3, ...
    pub expected: Vec<u64>,
    /// Deepest depth to run. Defaults to 3; never deeper than `expected`.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

fn default_max_depth() -> u32 {
    3
}

impl SuiteEntry {
    fn new(name: &str, fen: &str, expected: &[u64]) -> Self {
        SuiteEntry {
            name: name.to_string(),
            fen: fen.to_string(),
            expected: expected.to_vec(),
            max_depth: default_max_depth(),
        }
    }

    /// Depth that will actually be searched.
    pub fn depth(&self) -> u32 {
        self.max_depth.min(self.expected.len() as u32)
    }

    pub fn setup(&self) -> Result<Setup, ConfigError> {
        parse_setup(&self.fen).map_err(|source| ConfigError::InvalidFen {
            name: self.name.clone(),
            source,
        })
    }
}

/// A list of perft positions.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct SuiteConfig {
    #[serde(default, rename = "position")]
    pub positions: Vec<SuiteEntry>,
}

impl SuiteConfig {
    /// Loads a suite.
    ///
    /// An explicit `path` must exist. Without one, [`Self::default_path()`]
    /// is used when present and the built-in suite otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read, or
    /// [`ConfigError::ParseError`] if it is not a valid suite.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = Self::default_path();
                if !default.exists() {
                    return Ok(Self::builtin());
                }
                default
            }
        };
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// `perft.toml` in the current working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("perft.toml")
    }

    /// The standard validation positions.
    pub fn builtin() -> Self {
        SuiteConfig {
            positions: vec![
                SuiteEntry::new(
                    "startpos",
                    FenParser::STARTPOS,
                    &[20, 400, 8_902, 197_281, 4_865_609],
                ),
                SuiteEntry::new(
                    "kiwipete",
                    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -",
                    &[48, 2_039, 97_862, 4_085_603],
                ),
                SuiteEntry::new(
                    "position3",
                    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -",
                    &[14, 191, 2_812, 43_238, 674_624],
                ),
                SuiteEntry::new(
                    "position4",
                    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq -",
                    &[6, 264, 9_467, 422_333],
                ),
                SuiteEntry::new(
                    "position5",
                    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ -",
                    &[44, 1_486, 62_379, 2_103_487],
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_suite_with_defaults() {
        let toml_content = r#"
[[position]]
name = "startpos"
fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
expected = [20, 400]

[[position]]
name = "kiwipete"
fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -"
expected = [48, 2039, 97862]
max_depth = 1
"#;
        let suite = SuiteConfig::from_toml(toml_content).unwrap();
        assert_eq!(suite.positions.len(), 2);
        assert_eq!(suite.positions[0].max_depth, 3);
        assert_eq!(suite.positions[0].depth(), 2);
        assert_eq!(suite.positions[1].depth(), 1);
    }

    #[test]
    fn empty_suite() {
        let suite = SuiteConfig::from_toml("").unwrap();
        assert!(suite.positions.is_empty());
    }

    #[test]
    fn missing_fields_are_parse_errors() {
        let result = SuiteConfig::from_toml("[[position]]\nname = \"x\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn bad_fen_names_the_position() {
        let entry = SuiteEntry::new("broken", "not a fen", &[1]);
        let err = entry.setup().unwrap_err();
        assert!(err.to_string().starts_with("position broken:"));
    }

    #[test]
    fn builtin_suite_parses() {
        let suite = SuiteConfig::builtin();
        assert_eq!(suite.positions.len(), 5);
        for entry in &suite.positions {
            assert!(entry.setup().is_ok(), "{}", entry.name);
            assert_eq!(entry.depth(), 3);
        }
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("suite.toml");
        let suite = SuiteConfig::builtin();
        std::fs::write(&path, toml::to_string(&suite).unwrap()).unwrap();
        assert_eq!(SuiteConfig::load(Some(&path)).unwrap(), suite);
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = SuiteConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }

    #[test]
    fn default_path_is_perft_toml() {
        assert_eq!(SuiteConfig::default_path(), PathBuf::from("perft.toml"));
    }
}
