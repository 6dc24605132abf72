//! Attack table data file.
//!
//! The file is a flat run of little-endian `u64` values with no header: every
//! rook entry (square 0 through 63, each square's slice in magic-index order)
//! followed by every bishop entry in the same layout.

use super::magics::{attack_tables, AttackTables, Slider};
use crate::{Bitboard, TableError};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Size in bytes of a complete table file.
pub const TABLE_FILE_LEN: usize = (Slider::Rook.table_len() + Slider::Bishop.table_len()) * 8;

impl AttackTables {
    /// Serializes both tables to `out`.
    pub fn write_to<W: Write>(&self, mut out: W) -> Result<(), TableError> {
        for slider in Slider::ALL {
            for entry in self.entries(slider) {
                out.write_all(&entry.0.to_le_bytes())?;
            }
        }
        out.flush()?;
        Ok(())
    }

    /// Reads and validates tables written by [`write_to`](Self::write_to).
    pub fn read_from<R: Read>(mut input: R) -> Result<Self, TableError> {
        let mut bytes = Vec::with_capacity(TABLE_FILE_LEN);
        input.read_to_end(&mut bytes)?;
        if bytes.len() != TABLE_FILE_LEN {
            return Err(TableError::Truncated {
                expected: TABLE_FILE_LEN,
                found: bytes.len(),
            });
        }

        let mut words = bytes.chunks_exact(8).map(|chunk| {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            Bitboard(u64::from_le_bytes(word))
        });
        let rook: Vec<Bitboard> = words.by_ref().take(Slider::Rook.table_len()).collect();
        let bishop: Vec<Bitboard> = words.collect();
        AttackTables::from_entries(rook, bishop)
    }

    pub fn store(&self, path: &Path) -> Result<(), TableError> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))?;
        info!(path = %path.display(), bytes = TABLE_FILE_LEN, "stored attack tables");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, TableError> {
        debug!(path = %path.display(), "loading attack tables");
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }
}

/// Writes the process-wide tables to `path`, generating them if needed.
pub fn store_attack_tables(path: &Path) -> Result<(), TableError> {
    attack_tables().store(path)
}
