use crate::state::DraftState;

/// The value of an action from Blue's perspective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Payoff {
	/// Blue side utility minus Red side utility.
	pub utility: f64,

	/// The optimal state reachable from the action this payoff describes.
	pub next_state: DraftState,
}
