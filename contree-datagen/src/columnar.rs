//! Column-major dataset partitions.
//!
//! Each partition file holds a small header plus one `Vec` per schema
//! column, serialized with postcard. A corpus is a directory of
//! `part-NNNNN.bin` files; every generation batch appends a fresh
//! partition and no two writers ever share a file. Transient IO errors
//! are retried with exponential backoff before surfacing.

use crate::bidding::BiddingSample;
use crate::gameplay::GameplaySample;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use thiserror::Error;

const MAGIC: u32 = 0x43_54_52_45; // "CTRE"
const VERSION: u16 = 1;

/// Write retry schedule: 5 attempts, 100ms doubling.
const RETRY_ATTEMPTS: u32 = 5;
const RETRY_BASE_MS: u64 = 100;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("postcard codec error: {0}")]
    Codec(#[from] postcard::Error),
    #[error("not a dataset partition (bad magic 0x{0:08x})")]
    BadMagic(u32),
    #[error("unsupported partition version {0}")]
    BadVersion(u16),
    #[error("column lengths disagree in partition")]
    RaggedColumns,
}

/// Container written to disk: header fields first, then the columns.
#[derive(Serialize, Deserialize)]
struct Partition<C> {
    magic: u32,
    version: u16,
    rows: u32,
    columns: C,
}

/// Column set of the bidding corpus.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BiddingColumns {
    pub hand: Vec<u32>,
    pub score_hearts: Vec<i32>,
    pub score_diamonds: Vec<i32>,
    pub score_clubs: Vec<i32>,
    pub score_spades: Vec<i32>,
    pub pimc_n: Vec<i32>,
    pub bias_mode: Vec<u8>,
}

impl BiddingColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: &BiddingSample) {
        self.hand.push(sample.hand);
        self.score_hearts.push(sample.scores[0]);
        self.score_diamonds.push(sample.scores[1]);
        self.score_clubs.push(sample.scores[2]);
        self.score_spades.push(sample.scores[3]);
        self.pimc_n.push(sample.pimc_n);
        self.bias_mode.push(sample.bias_mode);
    }

    pub fn len(&self) -> usize {
        self.hand.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hand.is_empty()
    }

    fn is_rectangular(&self) -> bool {
        let n = self.hand.len();
        self.score_hearts.len() == n
            && self.score_diamonds.len() == n
            && self.score_clubs.len() == n
            && self.score_spades.len() == n
            && self.pimc_n.len() == n
            && self.bias_mode.len() == n
    }
}

impl FromIterator<BiddingSample> for BiddingColumns {
    fn from_iter<T: IntoIterator<Item = BiddingSample>>(iter: T) -> Self {
        let mut columns = BiddingColumns::new();
        for sample in iter {
            columns.push(&sample);
        }
        columns
    }
}

/// Column set of the gameplay corpus.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct GameplayColumns {
    pub hand_0: Vec<u32>,
    pub hand_1: Vec<u32>,
    pub hand_2: Vec<u32>,
    pub hand_3: Vec<u32>,
    pub trump: Vec<u8>,
    pub declarer: Vec<u8>,
    pub starter: Vec<u8>,
    pub trick_cards: Vec<[u8; 4]>,
    pub ns_points: Vec<i16>,
    pub ew_points: Vec<i16>,
    pub best_card: Vec<u8>,
    pub best_value: Vec<i32>,
    pub second_best_value: Vec<i32>,
    pub perturbed: Vec<bool>,
}

impl GameplayColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: &GameplaySample) {
        self.hand_0.push(sample.hands[0]);
        self.hand_1.push(sample.hands[1]);
        self.hand_2.push(sample.hands[2]);
        self.hand_3.push(sample.hands[3]);
        self.trump.push(sample.trump);
        self.declarer.push(sample.declarer);
        self.starter.push(sample.starter);
        self.trick_cards.push(sample.trick_cards);
        self.ns_points.push(sample.ns_points);
        self.ew_points.push(sample.ew_points);
        self.best_card.push(sample.best_card);
        self.best_value.push(sample.best_value);
        self.second_best_value.push(sample.second_best_value);
        self.perturbed.push(sample.perturbed);
    }

    pub fn len(&self) -> usize {
        self.hand_0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hand_0.is_empty()
    }

    fn is_rectangular(&self) -> bool {
        let n = self.hand_0.len();
        self.hand_1.len() == n
            && self.hand_2.len() == n
            && self.hand_3.len() == n
            && self.trump.len() == n
            && self.declarer.len() == n
            && self.starter.len() == n
            && self.trick_cards.len() == n
            && self.ns_points.len() == n
            && self.ew_points.len() == n
            && self.best_card.len() == n
            && self.best_value.len() == n
            && self.second_best_value.len() == n
            && self.perturbed.len() == n
    }
}

impl FromIterator<GameplaySample> for GameplayColumns {
    fn from_iter<T: IntoIterator<Item = GameplaySample>>(iter: T) -> Self {
        let mut columns = GameplayColumns::new();
        for sample in iter {
            columns.push(&sample);
        }
        columns
    }
}

/// Path of partition `index` inside a corpus directory.
pub fn partition_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("part-{:05}.bin", index))
}

fn write_with_retry(path: &Path, bytes: &[u8]) -> Result<(), DatasetError> {
    let mut delay = Duration::from_millis(RETRY_BASE_MS);
    let mut last_err = None;
    for attempt in 0..RETRY_ATTEMPTS {
        match fs::write(path, bytes) {
            Ok(()) => return Ok(()),
            Err(err) => {
                last_err = Some(err);
                if attempt + 1 < RETRY_ATTEMPTS {
                    thread::sleep(delay);
                    delay *= 2;
                }
            }
        }
    }
    Err(DatasetError::Io(last_err.expect("at least one attempt")))
}

fn write_partition<C: Serialize>(
    dir: &Path,
    index: usize,
    rows: u32,
    columns: &C,
) -> Result<PathBuf, DatasetError> {
    fs::create_dir_all(dir)?;
    let partition = Partition {
        magic: MAGIC,
        version: VERSION,
        rows,
        columns,
    };
    let bytes = postcard::to_allocvec(&partition)?;
    let path = partition_path(dir, index);
    write_with_retry(&path, &bytes)?;
    Ok(path)
}

fn read_partition<C: DeserializeOwned>(path: &Path) -> Result<(u32, C), DatasetError> {
    let bytes = fs::read(path)?;
    let partition: Partition<C> = postcard::from_bytes(&bytes)?;
    if partition.magic != MAGIC {
        return Err(DatasetError::BadMagic(partition.magic));
    }
    if partition.version != VERSION {
        return Err(DatasetError::BadVersion(partition.version));
    }
    Ok((partition.rows, partition.columns))
}

/// Append one bidding partition to a corpus directory.
pub fn write_bidding_partition(
    dir: &Path,
    index: usize,
    columns: &BiddingColumns,
) -> Result<PathBuf, DatasetError> {
    debug_assert!(columns.is_rectangular());
    write_partition(dir, index, columns.len() as u32, columns)
}

/// Read one bidding partition back.
pub fn read_bidding_partition(path: &Path) -> Result<BiddingColumns, DatasetError> {
    let (rows, columns): (u32, BiddingColumns) = read_partition(path)?;
    if !columns.is_rectangular() || columns.len() as u32 != rows {
        return Err(DatasetError::RaggedColumns);
    }
    Ok(columns)
}

/// Append one gameplay partition to a corpus directory.
pub fn write_gameplay_partition(
    dir: &Path,
    index: usize,
    columns: &GameplayColumns,
) -> Result<PathBuf, DatasetError> {
    debug_assert!(columns.is_rectangular());
    write_partition(dir, index, columns.len() as u32, columns)
}

/// Read one gameplay partition back.
pub fn read_gameplay_partition(path: &Path) -> Result<GameplayColumns, DatasetError> {
    let (rows, columns): (u32, GameplayColumns) = read_partition(path)?;
    if !columns.is_rectangular() || columns.len() as u32 != rows {
        return Err(DatasetError::RaggedColumns);
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bidding_fixture() -> BiddingColumns {
        [
            BiddingSample {
                hand: 0x0000_00FF,
                scores: [162, 80, -20, 0],
                pimc_n: 1,
                bias_mode: 0,
            },
            BiddingSample {
                hand: 0xFF00_0000,
                scores: [10, 20, 30, 40],
                pimc_n: 50,
                bias_mode: 2,
            },
        ]
        .into_iter()
        .collect()
    }

    fn gameplay_fixture() -> GameplayColumns {
        [GameplaySample {
            hands: [1, 2, 4, 8],
            trump: 3,
            declarer: 1,
            starter: 2,
            trick_cards: [5, 255, 255, 255],
            ns_points: 42,
            ew_points: 17,
            best_card: 5,
            best_value: 101,
            second_best_value: 88,
            perturbed: true,
        }]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_bidding_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let columns = bidding_fixture();

        let path = write_bidding_partition(dir.path(), 0, &columns).unwrap();
        assert_eq!(path, partition_path(dir.path(), 0));

        let loaded = read_bidding_partition(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.hand, columns.hand);
        assert_eq!(loaded.score_hearts, columns.score_hearts);
        assert_eq!(loaded.score_spades, columns.score_spades);
        assert_eq!(loaded.pimc_n, columns.pimc_n);
        assert_eq!(loaded.bias_mode, columns.bias_mode);
    }

    #[test]
    fn test_gameplay_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let columns = gameplay_fixture();

        let path = write_gameplay_partition(dir.path(), 3, &columns).unwrap();
        let loaded = read_gameplay_partition(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.hand_0, columns.hand_0);
        assert_eq!(loaded.trick_cards, columns.trick_cards);
        assert_eq!(loaded.best_value, columns.best_value);
        assert_eq!(loaded.perturbed, columns.perturbed);
    }

    #[test]
    fn test_partitions_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_bidding_partition(dir.path(), 0, &bidding_fixture()).unwrap();
        let b = write_bidding_partition(dir.path(), 1, &bidding_fixture()).unwrap();
        assert_ne!(a, b);
        assert!(a.exists() && b.exists());
    }

    #[test]
    fn test_rejects_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("part-00000.bin");
        fs::write(&path, b"not a partition").unwrap();
        assert!(read_bidding_partition(&path).is_err());
    }
}
