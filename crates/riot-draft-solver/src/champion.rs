use std::num::NonZeroU32;

/// Identifies a champion. Backed by `NonZeroU32` so "no champion" is
/// represented as `Option<ChampionId>` rather than a reserved zero value,
/// matching the role the zero sentinel plays in the source data this toolkit
/// models without smuggling a magic number into the type itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChampionId(NonZeroU32);

impl ChampionId {
	/// Returns `None` if `id` is zero.
	#[must_use]
	pub fn new(id: u32) -> Option<Self> {
		NonZeroU32::new(id).map(Self)
	}

	#[must_use]
	pub const fn get(self) -> u32 {
		self.0.get()
	}
}

impl std::fmt::Display for ChampionId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}
