//! Request dispatcher
//!
//! Maps a built [`Request`] onto the method-specific [`Call`] shape the
//! transport executes. Stateless.

use log::debug;

use crate::api::error::{ConfigError, Error};
use crate::api::request::{IF_MATCH, Method, Request};
use crate::api::session::{Call, Envelope, Response, Transport};

/// Convert a request into its call shape
///
/// The resource id is folded into the path, and the `If-Match` header is
/// lifted out into the PATCH etag. The method set is closed, so unknown
/// method names are rejected earlier, by [`Method::from_str`](std::str::FromStr).
pub fn to_call(request: &Request) -> Result<Call, ConfigError> {
    let method = request.method();

    let envelope = Envelope {
        service: request.service(),
        endpoint: request.endpoint(),
        path: request.wire_path(),
        query: request.params().clone(),
        headers: request
            .headers()
            .iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case(IF_MATCH))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
    };

    let payload = || {
        request
            .payload()
            .cloned()
            .ok_or(ConfigError::MissingPayload { method })
    };

    let call = match method {
        Method::Get => Call::Get { envelope },
        Method::Post => Call::Post {
            envelope,
            payload: payload()?,
        },
        Method::Patch => {
            let etag = request
                .etag()
                .filter(|etag| !etag.is_empty())
                .ok_or(ConfigError::MissingETag)?
                .to_string();
            Call::Patch {
                envelope,
                payload: payload()?,
                etag,
            }
        }
        Method::Put => Call::Put {
            envelope,
            payload: payload()?,
        },
        Method::Delete => Call::Delete { envelope },
    };

    Ok(call)
}

/// Validate the endpoint against the transport, then execute the request
///
/// The response is returned whatever its status; callers decide how to treat
/// non-2xx answers.
pub async fn dispatch<T>(transport: &T, request: &Request) -> Result<Response, Error>
where
    T: Transport + ?Sized,
{
    transport.validate(request.service(), request.endpoint())?;

    let call = to_call(request)?;
    debug!(
        "Dispatching {} {}/{}",
        call.method(),
        request.service(),
        call.path()
    );

    Ok(transport.execute(call).await?)
}
