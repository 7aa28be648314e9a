//! Dataset generation for the contrée solver.
//!
//! Two corpora come out of this crate: bidding samples (a dealt hand and
//! its four per-trump declarer scores) and gameplay samples (a mid-deal
//! state, the best legal move and its value). Both are labeled by the
//! double-dummy solver, reproducible from seeds, and written as columnar
//! partition files.

pub mod bias;
pub mod bidding;
pub mod columnar;
pub mod gameplay;

pub use bias::{biased_deal, pick_bias_mode, BiasMode, HandBuilder};
pub use bidding::{bidding_sample, generate_bidding_batch, BiddingConfig, BiddingSample};
pub use columnar::{
    partition_path, read_bidding_partition, read_gameplay_partition, write_bidding_partition,
    write_gameplay_partition, BiddingColumns, DatasetError, GameplayColumns,
};
pub use gameplay::{
    gameplay_sample, generate_gameplay_batch, label_state, GameplayConfig, GameplaySample,
    MoveLabel, PlayoutPolicy,
};
