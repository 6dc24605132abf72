//! Perft results in text and JSON form.

use crate::config::{ConfigError, SuiteConfig};
use chess_movegen::{perft, perft_divide, Board};
use serde::Serialize;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Node count for one root move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DivideLine {
    #[serde(rename = "move")]
    pub mv: String,
    pub nodes: u64,
}

/// Outcome of a single perft run.
#[derive(Debug, Clone, Serialize)]
pub struct PerftReport {
    pub fen: String,
    pub depth: u32,
    pub nodes: u64,
    pub elapsed_ms: u128,
    pub nps: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub divide: Option<Vec<DivideLine>>,
}

impl PerftReport {
    /// Runs perft on `board`, optionally split by root move.
    pub fn measure(board: &mut Board, fen: &str, depth: u32, divide: bool) -> Self {
        let start = Instant::now();
        let (nodes, lines) = if divide {
            let lines: Vec<DivideLine> = perft_divide(board, depth)
                .into_iter()
                .map(|(m, nodes)| DivideLine {
                    mv: m.to_uci(),
                    nodes,
                })
                .collect();
            let nodes = if depth == 0 {
                1
            } else {
                lines.iter().map(|l| l.nodes).sum()
            };
            (nodes, Some(lines))
        } else {
            (perft(board, depth), None)
        };
        let elapsed = start.elapsed();
        let nps = if elapsed.as_secs_f64() > 0.0 {
            (nodes as f64 / elapsed.as_secs_f64()) as u64
        } else {
            0
        };
        debug!(depth, nodes, ?elapsed, "perft finished");

        PerftReport {
            fen: fen.to_string(),
            depth,
            nodes,
            elapsed_ms: elapsed.as_millis(),
            nps,
            divide: lines,
        }
    }
}

impl fmt::Display for PerftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(lines) = &self.divide {
            for line in lines {
                writeln!(f, "{}: {}", line.mv, line.nodes)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "position: {}", self.fen)?;
        writeln!(f, "depth:    {}", self.depth)?;
        writeln!(f, "nodes:    {}", self.nodes)?;
        write!(f, "time:     {} ms ({} nps)", self.elapsed_ms, self.nps)
    }
}

/// Outcome of one suite position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteResult {
    pub name: String,
    pub depth: u32,
    pub expected: u64,
    pub nodes: u64,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    pub positions: Vec<SuiteResult>,
    pub passed: bool,
}

impl SuiteReport {
    /// Runs every suite position to its configured depth.
    ///
    /// Positions whose FEN does not parse abort the run; node mismatches
    /// are recorded and reported. A run that checks no position fails.
    pub fn run(suite: &SuiteConfig) -> Result<Self, ConfigError> {
        let mut positions = Vec::with_capacity(suite.positions.len());
        for entry in &suite.positions {
            let depth = entry.depth();
            if depth == 0 {
                warn!(name = %entry.name, "no expected counts, skipping");
                continue;
            }
            let mut board = Board::from_setup(&entry.setup()?);
            let expected = entry.expected[depth as usize - 1];
            let nodes = perft(&mut board, depth);
            let passed = nodes == expected;
            if passed {
                info!(name = %entry.name, depth, nodes, "ok");
            } else {
                warn!(name = %entry.name, depth, nodes, expected, "node count mismatch");
            }
            positions.push(SuiteResult {
                name: entry.name.clone(),
                depth,
                expected,
                nodes,
                passed,
            });
        }
        if positions.is_empty() {
            warn!("suite checked no positions");
        }
        let passed = !positions.is_empty() && positions.iter().all(|p| p.passed);
        Ok(SuiteReport { positions, passed })
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.positions {
            let mark = if p.passed { "ok" } else { "FAIL" };
            writeln!(
                f,
                "{:<12} depth {} {:>12} / {:<12} {}",
                p.name, p.depth, p.nodes, p.expected, mark
            )?;
        }
        if self.positions.is_empty() {
            return f.write_str("no positions checked");
        }
        let failed = self.positions.iter().filter(|p| !p.passed).count();
        write!(
            f,
            "{} positions, {} failed",
            self.positions.len(),
            failed
        )
    }
}
