//! Magic bitboard tables for rook and bishop attacks.
//!
//! For each square a slider has a mask of relevant blockers (the squares its
//! rays cross, board edges excluded), a magic multiplier and a shift. The
//! product `((occupied & mask) * magic) >> shift` is a perfect hash of the
//! blocker set into that square's slice of the attack table.
//!
//! The tables are built once per process and then shared read-only through a
//! [`OnceLock`]. Lookups build them on first use; a consumer that prefers to
//! load a precomputed data file calls [`init_attack_tables`] before generating
//! any moves.

use crate::{Bitboard, TableError};
use chess_core::Square;
use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Instant;
use tracing::{debug, info};

/// Rook magic multipliers, indexed by square.
const ROOK_MAGICS: [u64; 64] = [
    0x0a80_02c0_0010_8020, 0x06c0_0049_b000_2001, 0x0100_2000_1009_0040, 0x2480_0410_0080_0801,
    0x0280_0280_0400_0800, 0x0900_4100_0804_0022, 0x0280_0200_0100_1080, 0x2880_0020_4100_0080,
    0xa000_8000_8040_0034, 0x0004_8080_2000_4000, 0x2290_8020_0480_1000, 0x0411_000d_0010_0020,
    0x0402_8008_0004_0080, 0x000b_0004_0100_4208, 0x2409_0001_0004_0200, 0x0001_0021_0000_4082,
    0x0022_8780_01e2_4000, 0x1090_8100_2100_4010, 0x0801_0300_4020_0012, 0x0500_8080_0800_1000,
    0x0a08_0180_1400_0880, 0x8000_8080_0400_0200, 0x0201_0080_8001_0200, 0x0801_0200_0044_1091,
    0x0000_8000_8020_4005, 0x1040_2000_4010_0048, 0x0000_1202_0040_2082, 0x0d14_8804_8010_0080,
    0x0012_0402_8008_0080, 0x0100_0400_8002_0080, 0x9020_0100_8080_0200, 0x0813_2412_0014_8449,
    0x0491_6040_0180_0080, 0x0100_4010_0040_2001, 0x4820_0100_2100_1040, 0x0400_4022_0200_0812,
    0x0209_0090_0500_0802, 0x0810_8006_0180_0400, 0x4301_0832_1400_0150, 0x2040_2645_8e00_1401,
    0x0040_2040_0080_8000, 0x8001_0080_4001_0020, 0x8410_8208_2042_0010, 0x1003_0010_0009_0020,
    0x0804_0400_0800_8080, 0x0012_0008_1002_0004, 0x1000_1002_0004_0208, 0x4300_00a0_4402_0001,
    0x0280_0090_2341_0300, 0x00e0_1000_4000_2240, 0x0000_2001_0040_1700, 0x2244_1004_0800_8080,
    0x0008_0004_0080_1980, 0x0002_0008_1004_0200, 0x8010_1002_2881_0400, 0x2000_0090_4421_0200,
    0x4080_0080_4010_2101, 0x0040_0020_8041_1d01, 0x2005_5240_6000_0901, 0x0502_0010_0840_0422,
    0x489a_0008_1020_0402, 0x0001_0044_0008_0a13, 0x4000_0110_0802_0084, 0x0026_0021_1405_8042,
];

/// Bishop magic multipliers, indexed by square.
const BISHOP_MAGICS: [u64; 64] = [
    0x89a1_1218_9604_0240, 0x2004_8448_0200_2010, 0x2068_0800_5192_1000, 0x6288_0a02_2020_0808,
    0x0004_0420_0400_0000, 0x0100_8220_2020_0011, 0xc004_4422_2012_000a, 0x0028_8088_0121_6001,
    0x0400_4920_8840_8100, 0x0201_c401_040c_0084, 0x0084_0800_910a_0010, 0x0000_0820_8024_0060,
    0x2000_8405_0400_6000, 0x3001_0c41_0840_5004, 0x1008_0054_1008_0802, 0x8144_0422_0910_0900,
    0x0208_0810_2001_4400, 0x0048_0020_1208_ca00, 0x0f18_1404_0801_2008, 0x1004_0028_0210_2001,
    0x0841_0008_2008_0811, 0x0040_2002_00a4_2008, 0x0000_8000_5404_2000, 0x8801_0400_410c_9000,
    0x0520_0404_7010_4290, 0x1004_0400_5150_0081, 0x2002_0818_3308_0021, 0x0004_00c0_0c01_0142,
    0x9414_0820_0c00_2000, 0x0658_8100_0080_6011, 0x0188_0710_4044_0a00, 0x4800_4040_0201_1c00,
    0x0104_4420_4040_4200, 0x0302_0910_0021_0220, 0x0004_0224_0112_0400, 0x80c0_0404_0008_0120,
    0x8040_0100_4082_0802, 0x0480_8107_0002_0090, 0x0102_008e_0004_0242, 0x0809_0052_0205_0100,
    0x8002_0242_2010_4080, 0x0431_0088_0414_2000, 0x0019_0018_0208_1400, 0x0200_0142_0804_0080,
    0x3308_0820_0820_0100, 0x0410_1050_0040_c020, 0x4012_020c_0421_0308, 0x2082_20a2_0200_4080,
    0x0111_0401_2008_2000, 0x6803_0401_4128_0a00, 0x2101_0042_0241_0000, 0x8200_0000_4110_8022,
    0x0000_0210_8208_8000, 0x0002_4102_0401_0040, 0x0040_1004_0080_9000, 0x0822_0882_2082_0214,
    0x0040_8080_9001_2004, 0x0091_0224_0402_18c9, 0x0402_8144_2201_5008, 0x0090_0140_0484_2410,
    0x0001_0000_4230_4105, 0x0010_0088_3041_2a00, 0x2520_0810_9000_8908, 0x4010_2000_a0a6_0140,
];

/// Relevant-blocker bit counts for rooks.
#[rustfmt::skip]
const ROOK_BITS: [u8; 64] = [
    12, 11, 11, 11, 11, 11, 11, 12,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    11, 10, 10, 10, 10, 10, 10, 11,
    12, 11, 11, 11, 11, 11, 11, 12,
];

/// Relevant-blocker bit counts for bishops.
#[rustfmt::skip]
const BISHOP_BITS: [u8; 64] = [
    6, 5, 5, 5, 5, 5, 5, 6,
    5, 5, 5, 5, 5, 5, 5, 5,
    5, 5, 7, 7, 7, 7, 5, 5,
    5, 5, 7, 9, 9, 7, 5, 5,
    5, 5, 7, 9, 9, 7, 5, 5,
    5, 5, 7, 7, 7, 7, 5, 5,
    5, 5, 5, 5, 5, 5, 5, 5,
    6, 5, 5, 5, 5, 5, 5, 6,
];

const fn table_len(bits: &[u8; 64]) -> usize {
    let mut len = 0;
    let mut i = 0;
    while i < 64 {
        len += 1usize << bits[i];
        i += 1;
    }
    len
}

/// Squares on the outer ring of the board.
const EDGES: Bitboard =
    Bitboard(Bitboard::RANK_1.0 | Bitboard::RANK_8.0 | Bitboard::FILE_A.0 | Bitboard::FILE_H.0);

/// A sliding piece with its own magic table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slider {
    Rook,
    Bishop,
}

impl Slider {
    pub const ALL: [Slider; 2] = [Slider::Rook, Slider::Bishop];

    /// Number of entries in this slider's attack table.
    pub const fn table_len(self) -> usize {
        match self {
            Slider::Rook => table_len(&ROOK_BITS),
            Slider::Bishop => table_len(&BISHOP_BITS),
        }
    }

    const fn directions(self) -> [(i8, i8); 4] {
        match self {
            Slider::Rook => [(0, 1), (1, 0), (0, -1), (-1, 0)],
            Slider::Bishop => [(1, 1), (1, -1), (-1, -1), (-1, 1)],
        }
    }

    const fn bits(self, sq: Square) -> u8 {
        match self {
            Slider::Rook => ROOK_BITS[sq.index() as usize],
            Slider::Bishop => BISHOP_BITS[sq.index() as usize],
        }
    }

    const fn magic(self, sq: Square) -> u64 {
        match self {
            Slider::Rook => ROOK_MAGICS[sq.index() as usize],
            Slider::Bishop => BISHOP_MAGICS[sq.index() as usize],
        }
    }

    /// Relevant blockers for a slider on `sq`.
    ///
    /// The rook's file component is the rank mask of the transposed square
    /// mirrored back across the a1-h8 diagonal.
    pub fn mask(self, sq: Square) -> Bitboard {
        match self {
            Slider::Rook => {
                let file = sq.file().index();
                let rank = sq.rank().index();
                inner_rank(rank, file) | inner_rank(file, rank).flip_diagonal()
            }
            Slider::Bishop => self.ray_attacks(sq, Bitboard::EMPTY) & !EDGES,
        }
    }

    /// Attack set found by walking each ray until it leaves the board or
    /// hits a blocker (the blocker's square is included).
    pub fn ray_attacks(self, sq: Square, blockers: Bitboard) -> Bitboard {
        let mut attacks = Bitboard::EMPTY;
        for (df, dr) in self.directions() {
            let mut current = sq;
            while let Some(next) = current.offset(df, dr) {
                attacks.set(next);
                if blockers.contains(next) {
                    break;
                }
                current = next;
            }
        }
        attacks
    }
}

impl fmt::Display for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Slider::Rook => "rook",
            Slider::Bishop => "bishop",
        })
    }
}

/// Squares b..g of `rank`, minus `except_file`.
fn inner_rank(rank: u8, except_file: u8) -> Bitboard {
    Bitboard((0x7Eu64 & !(1u64 << except_file)) << (rank * 8))
}

/// Hashing parameters for one square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Magic {
    pub mask: Bitboard,
    pub magic: u64,
    pub shift: u8,
    /// Start of this square's slice in the slider's table.
    pub offset: usize,
}

impl Magic {
    #[inline]
    pub fn index(&self, occupied: Bitboard) -> usize {
        self.offset + (((occupied & self.mask).0.wrapping_mul(self.magic)) >> self.shift) as usize
    }
}

fn magics_for(slider: Slider) -> [Magic; 64] {
    let mut offset = 0;
    std::array::from_fn(|i| {
        let sq = Square::from_index_masked(i as u8);
        let bits = slider.bits(sq);
        let magic = Magic {
            mask: slider.mask(sq),
            magic: slider.magic(sq),
            shift: 64 - bits,
            offset,
        };
        offset += 1usize << bits;
        magic
    })
}

/// Where the tables installed by [`init_attack_tables`] come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableSource {
    /// Enumerate every blocker subset and ray-march it.
    Generate,
    /// Read a data file written by [`store_attack_tables`](crate::store_attack_tables).
    File(PathBuf),
}

/// Rook and bishop attack tables.
pub struct AttackTables {
    rook_magics: [Magic; 64],
    bishop_magics: [Magic; 64],
    rook_attacks: Vec<Bitboard>,
    bishop_attacks: Vec<Bitboard>,
}

impl AttackTables {
    /// Builds both tables from the constant magics.
    ///
    /// Fails with [`TableError::MagicCollision`] if a magic sends two blocker
    /// sets with different attack sets to the same slot.
    pub fn generate() -> Result<Self, TableError> {
        let rook_magics = magics_for(Slider::Rook);
        let bishop_magics = magics_for(Slider::Bishop);
        let rook_attacks = fill_table(Slider::Rook, &rook_magics)?;
        let bishop_attacks = fill_table(Slider::Bishop, &bishop_magics)?;
        Ok(AttackTables {
            rook_magics,
            bishop_magics,
            rook_attacks,
            bishop_attacks,
        })
    }

    /// Wraps previously stored entries after spot-checking them.
    ///
    /// For every square the empty-board entry and the fully blocked entry
    /// must match the ray-marched attack sets, otherwise the data is
    /// [`TableError::Corrupt`].
    pub fn from_entries(
        rook_attacks: Vec<Bitboard>,
        bishop_attacks: Vec<Bitboard>,
    ) -> Result<Self, TableError> {
        for (slider, entries) in [(Slider::Rook, &rook_attacks), (Slider::Bishop, &bishop_attacks)] {
            if entries.len() != slider.table_len() {
                return Err(TableError::Truncated {
                    expected: slider.table_len() * 8,
                    found: entries.len() * 8,
                });
            }
        }

        let tables = AttackTables {
            rook_magics: magics_for(Slider::Rook),
            bishop_magics: magics_for(Slider::Bishop),
            rook_attacks,
            bishop_attacks,
        };
        for slider in Slider::ALL {
            for sq in Square::all() {
                let mask = tables.magic(slider, sq).mask;
                for blockers in [Bitboard::EMPTY, mask] {
                    if tables.attacks(slider, sq, blockers) != slider.ray_attacks(sq, blockers) {
                        return Err(TableError::Corrupt { slider, square: sq });
                    }
                }
            }
        }
        Ok(tables)
    }

    #[inline]
    pub fn magic(&self, slider: Slider, sq: Square) -> &Magic {
        match slider {
            Slider::Rook => &self.rook_magics[sq.index() as usize],
            Slider::Bishop => &self.bishop_magics[sq.index() as usize],
        }
    }

    /// Every entry of one slider's table, in storage order.
    pub fn entries(&self, slider: Slider) -> &[Bitboard] {
        match slider {
            Slider::Rook => &self.rook_attacks,
            Slider::Bishop => &self.bishop_attacks,
        }
    }

    #[inline]
    pub fn attacks(&self, slider: Slider, sq: Square, occupied: Bitboard) -> Bitboard {
        let index = self.magic(slider, sq).index(occupied);
        self.entries(slider)[index]
    }
}

impl fmt::Debug for AttackTables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttackTables")
            .field("rook_entries", &self.rook_attacks.len())
            .field("bishop_entries", &self.bishop_attacks.len())
            .finish()
    }
}

fn fill_table(slider: Slider, magics: &[Magic; 64]) -> Result<Vec<Bitboard>, TableError> {
    let mut slots: Vec<Option<Bitboard>> = vec![None; slider.table_len()];
    for sq in Square::all() {
        let magic = &magics[sq.index() as usize];
        // Carry-rippler walk over every subset of the mask, starting at empty.
        let mut blockers = Bitboard::EMPTY;
        loop {
            let attacks = slider.ray_attacks(sq, blockers);
            let slot = &mut slots[magic.index(blockers)];
            match *slot {
                Some(existing) if existing != attacks => {
                    return Err(TableError::MagicCollision { slider, square: sq });
                }
                _ => *slot = Some(attacks),
            }
            blockers = Bitboard(blockers.0.wrapping_sub(magic.mask.0) & magic.mask.0);
            if blockers.is_empty() {
                break;
            }
        }
    }
    debug!(%slider, entries = slots.len(), "filled attack table");
    Ok(slots.into_iter().map(|slot| slot.unwrap_or_default()).collect())
}

static ATTACK_TABLES: OnceLock<AttackTables> = OnceLock::new();

/// The process-wide tables, generated on first use.
///
/// # Panics
///
/// Panics if the built-in magics fail to generate, which means the constant
/// data in this module is wrong.
pub fn attack_tables() -> &'static AttackTables {
    ATTACK_TABLES.get_or_init(|| {
        let started = Instant::now();
        match AttackTables::generate() {
            Ok(tables) => {
                debug!(elapsed = ?started.elapsed(), "generated attack tables");
                tables
            }
            Err(err) => panic!("built-in magic tables are unusable: {err}"),
        }
    })
}

/// Installs the process-wide tables from `source`.
///
/// Must run before anything else touches the tables; afterwards it returns
/// [`TableError::AlreadyInitialized`].
pub fn init_attack_tables(source: TableSource) -> Result<&'static AttackTables, TableError> {
    if ATTACK_TABLES.get().is_some() {
        return Err(TableError::AlreadyInitialized);
    }
    let started = Instant::now();
    let tables = match &source {
        TableSource::Generate => AttackTables::generate()?,
        TableSource::File(path) => AttackTables::load(path)?,
    };
    ATTACK_TABLES
        .set(tables)
        .map_err(|_| TableError::AlreadyInitialized)?;
    info!(?source, elapsed = ?started.elapsed(), "attack tables installed");
    Ok(attack_tables())
}

#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    attack_tables().attacks(Slider::Rook, sq, occupied)
}

#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    attack_tables().attacks(Slider::Bishop, sq, occupied)
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}
