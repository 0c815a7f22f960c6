//! Policy for the Domus gym without a deep-learning backend.
//!
//! [`MlpAgent`] is a small deterministic MLP policy with running observation
//! normalisation. It plays the role of the pretrained agent that the
//! configuration optimiser fine-tunes for every candidate cabin.
mod agent;
mod config;
mod mat;
mod mlp;
mod normalizer;
pub use agent::MlpAgent;
pub use config::MlpAgentConfig;
pub use mat::Mat;
pub use mlp::Mlp;
pub use normalizer::ObsNormalizer;
