//! Domain types: score table, clip addressing, warmup progress.

pub mod clip;
pub mod score;
pub mod warmup;

pub use clip::{
    CLIP_ADDRESS_COUNT, ClipAddress, MAX_HONBA, PayerRole, WinType, all_clip_addresses,
    locate,
};
pub use score::{
    HONBA_RON_BONUS, HONBA_TSUMO_BONUS, Payment, SCORE_COUNT, SCORE_TABLE, ScoreEntry, score_by_id,
    visible_scores,
};
pub use warmup::{WarmupProgress, WarmupState};
