//! Transition emitted by an environment.
use super::Env;

/// Side information attached to a [`Step`].
pub trait Info {}

impl Info for () {}

/// One transition of an episode.
///
/// Holds the action that was applied, the observation reached with it, the
/// reward of the transition and whether the episode stops there.
pub struct Step<E: Env> {
    /// Applied action.
    pub act: E::Act,

    /// Observation after the action.
    pub obs: E::Obs,

    /// Reward of the transition.
    pub reward: f32,

    /// The simulated system reached a terminal state.
    pub is_terminated: bool,

    /// The episode ran out of steps.
    pub is_truncated: bool,

    /// Environment specific information.
    pub info: E::Info,
}

impl<E: Env> Step<E> {
    /// Constructs a transition.
    pub fn new(
        obs: E::Obs,
        act: E::Act,
        reward: f32,
        is_terminated: bool,
        is_truncated: bool,
        info: E::Info,
    ) -> Self {
        Self {
            act,
            obs,
            reward,
            is_terminated,
            is_truncated,
            info,
        }
    }

    /// `true` if no further step may follow in this episode.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}
