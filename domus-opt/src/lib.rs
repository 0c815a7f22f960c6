//! Search for the optional cabin features with the best energy and comfort
//! trade-off.
//!
//! A candidate switches radiant panels, seat heater, windshield heater and
//! fresh-air mode on or off. For every candidate proposed by a [`Minimizer`],
//! [`Loss`] fine-tunes a pretrained agent on the candidate cabin, replays the
//! evaluation scenarios and adds the energy cost of the extra mass.
//! [`SearchLoop`] checkpoints the history after every evaluation and can resume
//! from a checkpoint.
pub mod checkpoint;
mod cache;
mod loss;
mod optimizer;
mod search;
mod space;
pub use cache::PolicyCache;
pub use checkpoint::CheckpointSaver;
pub use loss::{
    configuration_loss, summarise, Artifacts, Loss, Pretrained, BASE_MASS, RADIANT_MASS,
    SEARCHED_FEATURES, SEAT_MASS,
};
pub use optimizer::{Minimizer, RandomSearch};
pub use search::{SearchConfig, SearchLoop, SearchState};
pub use space::{OptimizeResult, SearchSpace};
