//! Authenticated HTTP session against one tenant

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use std::collections::BTreeMap;

use super::transport::{Call, Envelope, Transport};
use super::{Response, SessionConfig};
use crate::api::dispatch::dispatch;
use crate::api::error::{Error, TransportError};
use crate::api::request::{IF_MATCH, Request};

/// A long-lived connection to the Sales/Service Cloud V2 REST API
///
/// Credentials, TLS verification and timeout come from the [`SessionConfig`]
/// and are fixed for the lifetime of the session. The underlying client is
/// released on [`Transport::close`] or when the session is dropped.
pub struct Session {
    config: SessionConfig,
    client: ArcSwapOption<Client>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, Error> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|e| TransportError::Request(Box::new(e)))?;

        info!(
            "Opened session to {} as {} (verify_ssl: {})",
            config.host, config.user, config.verify_ssl
        );

        Ok(Self {
            config,
            client: ArcSwapOption::from_pointee(client),
        })
    }

    /// Session configured from `SCV2_*` environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let config = SessionConfig::from_env()?;
        Ok(Self::new(config)?)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Replace the headers sent with every request
    pub fn set_default_headers(&mut self, headers: BTreeMap<String, String>) {
        self.config.default_headers = headers;
    }

    pub fn is_closed(&self) -> bool {
        self.client.load().is_none()
    }

    /// `https://{host}/{api_base_path}/{service}/{path}`
    pub fn url_for(&self, envelope: &Envelope) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url(),
            envelope.service,
            envelope.path.trim_start_matches('/')
        )
    }

    /// Validate, dispatch and execute one built request
    pub async fn send(&self, request: &Request) -> Result<Response, Error> {
        dispatch(self, request).await
    }
}

#[async_trait]
impl Transport for Session {
    async fn execute(&self, call: Call) -> Result<Response, TransportError> {
        let client = self
            .client
            .load_full()
            .ok_or_else(|| TransportError::Connection("session is closed".into()))?;

        let url = self.url_for(call.envelope());
        let envelope = call.envelope();

        let mut builder = client
            .request(call.method().into(), &url)
            .basic_auth(&self.config.user, Some(&self.config.password));

        for (name, value) in self.config.default_headers.iter().chain(&envelope.headers) {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if !envelope.query.is_empty() {
            builder = builder.query(&envelope.query);
        }

        builder = match &call {
            Call::Patch { payload, etag, .. } => {
                builder.header(IF_MATCH, etag.as_str()).json(payload)
            }
            Call::Post { payload, .. } | Call::Put { payload, .. } => builder.json(payload),
            Call::Get { .. } | Call::Delete { .. } => builder,
        };

        debug!("{} {}", call.method(), url);

        let response = builder.send().await.map_err(translate_error)?;
        debug!("{} {} -> {}", call.method(), url, response.status());

        Response::from_reqwest(response).await
    }

    fn close(&self) {
        if self.client.swap(None).is_some() {
            info!("Closed session to {}", self.config.host);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        Transport::close(self);
    }
}

fn translate_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(Box::new(error))
    } else if error.is_connect() {
        TransportError::Connection(Box::new(error))
    } else {
        TransportError::Request(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::catalog::{EndpointId, ServiceId};
    use crate::api::error::ConfigError;
    use crate::api::request::RequestBuilder;
    use serde_json::json;

    fn session() -> Session {
        let config = SessionConfig::new("my1122334.de1.test.crm.cloud.sap", "user", "secret");
        Session::new(config).unwrap()
    }

    fn envelope(service: ServiceId, endpoint: EndpointId, path: &str) -> Envelope {
        Envelope {
            service,
            endpoint,
            path: path.to_string(),
            query: BTreeMap::new(),
            headers: BTreeMap::new(),
        }
    }

    #[test]
    fn test_url_for() {
        let session = session();

        assert_eq!(
            session.url_for(&envelope(ServiceId::Account, EndpointId::Accounts, "accounts/A-1")),
            "https://my1122334.de1.test.crm.cloud.sap/sap/c4c/api/v1/account-service/accounts/A-1"
        );
        assert_eq!(
            session.url_for(&envelope(ServiceId::Survey, EndpointId::SurveyDesign, "designs/7")),
            "https://my1122334.de1.test.crm.cloud.sap/sap/c4c/api/v1/survey-service/designs/7"
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let err = Session::new(SessionConfig::new("", "user", "secret")).err().unwrap();

        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidSessionConfig(_))
        ));
    }

    #[test]
    fn test_close_is_idempotent() {
        let session = session();
        assert!(!session.is_closed());

        session.close();
        assert!(session.is_closed());

        session.close();
        assert!(session.is_closed());
    }

    #[test]
    fn test_set_default_headers() {
        let mut session = session();
        session.set_default_headers(BTreeMap::from([(
            "Accept-Language".to_string(),
            "de".to_string(),
        )]));

        assert_eq!(session.config().default_headers["Accept-Language"], "de");
    }

    #[tokio::test]
    async fn test_closed_session_fails_with_connection_error() {
        let session = session();
        session.close();

        let request = RequestBuilder::new()
            .post(ServiceId::Lead, EndpointId::Leads)
            .unwrap()
            .with_payload(json!({"name": "Lead"}))
            .build()
            .unwrap();

        let err = session.send(&request).await.unwrap_err();
        assert!(matches!(err, Error::Transport(TransportError::Connection(_))));
    }
}
