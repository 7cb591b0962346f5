use reqwest::Client;
use riot_ratelimit::{Invocation, ResponseHeaders};
use url::Url;

/// Errors returned by [`LimiterClient`].
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
	#[error("request to rate limit service failed: {0}")]
	Request(#[from] reqwest::Error),

	#[error("rate limit service returned {status}: {body}")]
	BadResponse { status: reqwest::StatusCode, body: String },

	#[error("invalid base URL: {0}")]
	InvalidUrl(#[from] url::ParseError),
}

/// Connects to a remote rate limit service, implementing the same
/// acquire/done/cancel protocol as [`riot_ratelimit::Limiter`] but over HTTP
/// so many processes can share one pool of quota.
#[derive(Debug, Clone)]
pub struct LimiterClient {
	http: Client,
	base: Url,
}

impl LimiterClient {
	/// # Errors
	///
	/// Returns an error if `base` is not a valid URL.
	pub fn new(base: &str) -> Result<Self, ClientError> {
		Ok(Self::with_client(Client::new(), Url::parse(base)?))
	}

	#[must_use]
	pub fn with_client(http: Client, base: Url) -> Self {
		Self { http, base }
	}

	/// Reserves quota for `invocation`, returning a handle that must be
	/// resolved with [`RemoteReservation::done`] or
	/// [`RemoteReservation::cancel`] within the server's idle timeout.
	///
	/// # Errors
	///
	/// Returns an error if the request fails or the server rejects it.
	pub async fn acquire(&self, invocation: &Invocation) -> Result<RemoteReservation, ClientError> {
		let address = self.base.join(&format!("acquire/{}/{}", invocation.application_key, invocation.region))?;

		let mut form = vec![];
		if !invocation.method.is_empty() {
			form.push(("method", invocation.method.clone()));
		}
		if !invocation.uniquifier.is_empty() {
			form.push(("uniquifier", invocation.uniquifier.clone()));
		}
		if invocation.no_app_quota {
			form.push(("noappquota", "T".to_string()));
		}

		let response = self.http.post(address).form(&form).send().await?;
		let token = Self::body_or_error(response).await?;

		Ok(RemoteReservation {
			http: self.http.clone(),
			base: self.base.clone(),
			token,
		})
	}

	async fn body_or_error(response: reqwest::Response) -> Result<String, ClientError> {
		let status = response.status();
		let body = response.text().await?;
		if status.is_success() {
			Ok(body)
		} else {
			Err(ClientError::BadResponse { status, body })
		}
	}
}

/// A quota reservation held by a remote rate limit service.
#[derive(Debug)]
pub struct RemoteReservation {
	http: Client,
	base: Url,
	token: String,
}

impl RemoteReservation {
	/// Finalizes the acquisition as successful, forwarding the Riot
	/// rate-limit headers observed on the real API response so the server
	/// can reconcile its accounting.
	///
	/// # Errors
	///
	/// Returns an error if the request fails or the server rejects it.
	pub async fn done(self, headers: &ResponseHeaders) -> Result<(), ClientError> {
		let address = self.base.join(&format!("done/{}", self.token))?;
		let mut request = self.http.post(address);
		request = forward(request, "x-app-rate-limit", &headers.app_rate_limit);
		request = forward(request, "x-app-rate-limit-count", &headers.app_rate_limit_count);
		request = forward(request, "x-method-rate-limit", &headers.method_rate_limit);
		request = forward(request, "x-method-rate-limit-count", &headers.method_rate_limit_count);
		request = forward(request, "retry-after", &headers.retry_after);
		request = forward(request, "x-rate-limit-type", &headers.rate_limit_type);

		let response = request.send().await?;
		LimiterClient::body_or_error(response).await?;
		Ok(())
	}

	/// Finalizes the acquisition as cancelled, releasing its quota
	/// immediately.
	///
	/// # Errors
	///
	/// Returns an error if the request fails or the server rejects it.
	pub async fn cancel(self) -> Result<(), ClientError> {
		let address = self.base.join(&format!("cancel/{}", self.token))?;
		let response = self.http.post(address).send().await?;
		LimiterClient::body_or_error(response).await?;
		Ok(())
	}
}

fn forward(request: reqwest::RequestBuilder, name: &'static str, value: &Option<String>) -> reqwest::RequestBuilder {
	match value {
		Some(value) => request.header(name, value.clone()),
		None => request,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_invalid_base_url() {
		assert!(LimiterClient::new("not a url").is_err());
	}
}
