/// Identifies a call-site for quota purposes.
///
/// Equality is field-wise, which is what makes `Invocation` usable as a map
/// key for both the window-set map and the cooldown map: two invocations
/// that describe the same call-site collide onto the same quota state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Invocation {
	/// Typically the Riot API key provided by the developer portal.
	pub application_key: String,

	/// Normalized upper-case region. Limits are enforced on a per-region basis.
	pub region: String,

	/// Lower-case path template with path parameters stripped, e.g.
	/// `/lol/match/v4/matches`. Empty denotes the application-level aggregate.
	pub method: String,

	/// Disambiguates multiple logical operations sharing a method template.
	pub uniquifier: String,

	/// When set, this invocation charges only its method-level window, not
	/// the application aggregate.
	pub no_app_quota: bool,
}

impl Invocation {
	/// Builds an Invocation, normalizing `region` to upper-case and `method`
	/// to lower-case, matching the normalization the limiter service applies
	/// to untrusted wire input.
	#[must_use]
	pub fn new(application_key: impl Into<String>, region: impl AsRef<str>, method: impl AsRef<str>, uniquifier: impl Into<String>, no_app_quota: bool) -> Self {
		Self {
			application_key: application_key.into(),
			region: region.as_ref().to_uppercase(),
			method: method.as_ref().to_lowercase(),
			uniquifier: uniquifier.into(),
			no_app_quota,
		}
	}

	/// Returns the application-level projection of this invocation: the
	/// method, uniquifier, and `no_app_quota` fields are zeroed out, so every
	/// invocation sharing an application key and region collapses onto the
	/// same aggregate quota.
	#[must_use]
	pub fn app(&self) -> Self {
		Self {
			application_key: self.application_key.clone(),
			region: self.region.clone(),
			method: String::new(),
			uniquifier: String::new(),
			no_app_quota: false,
		}
	}
}
