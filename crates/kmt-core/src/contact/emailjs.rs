use crate::{BoxFuture, Map, bail, error::Error, extension::TomlTableExt};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use toml::Table;

/// Default endpoint of the EmailJS REST API.
const DEFAULT_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// A client delivering template emails.
pub trait EmailClient: Send + Sync {
    /// Sends an email rendered from the template params.
    fn send<'a>(&'a self, template_params: &'a Map) -> BoxFuture<'a, Result<(), Error>>;
}

/// Settings of the EmailJS service, read from the `[emailjs]` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailJsConfig {
    /// REST endpoint.
    pub endpoint: String,
    /// Service ID.
    pub service_id: String,
    /// Template ID.
    pub template_id: String,
    /// Public key sent as the user ID.
    pub public_key: String,
    /// Address shown when the delivery fails.
    pub fallback_email: String,
    /// Request timeout.
    pub request_timeout: Duration,
}

impl Default for EmailJsConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            service_id: "service_35mr6kh".to_owned(),
            template_id: "template_jzrpi6e".to_owned(),
            public_key: String::new(),
            fallback_email: "kmttracker96@gmail.com".to_owned(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl EmailJsConfig {
    /// Reads the settings from the config, using the defaults for missing values.
    pub fn from_config(config: &Table) -> Self {
        let defaults = Self::default();
        let get = |key: &str, default: String| {
            config
                .get_str(key)
                .map(|value| value.to_owned())
                .unwrap_or(default)
        };
        Self {
            endpoint: get("endpoint", defaults.endpoint),
            service_id: get("service-id", defaults.service_id),
            template_id: get("template-id", defaults.template_id),
            public_key: get("public-key", defaults.public_key),
            fallback_email: get("fallback-email", defaults.fallback_email),
            request_timeout: config
                .get_duration("request-timeout")
                .unwrap_or(defaults.request_timeout),
        }
    }
}

/// Request body of the EmailJS `send` API.
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a Map,
}

/// An [`EmailClient`] backed by the EmailJS REST API.
#[derive(Debug, Clone)]
pub struct EmailJsClient {
    /// HTTP client.
    client: Client,
    /// Service settings.
    config: EmailJsConfig,
}

impl EmailJsClient {
    /// Creates a new instance.
    pub fn try_new(config: EmailJsConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(concat!("kmt-tracker/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .gzip(true)
            .build()
            .map_err(|err| Error::with_source("fail to create the HTTP client", err))?;
        Ok(Self { client, config })
    }

    /// Returns the service settings.
    #[inline]
    pub fn config(&self) -> &EmailJsConfig {
        &self.config
    }

    async fn deliver(&self, template_params: &Map) -> Result<(), Error> {
        let config = &self.config;
        if config.public_key.is_empty() {
            bail!("the EmailJS public key is not configured");
        }

        let body = SendEmailRequest {
            service_id: &config.service_id,
            template_id: &config.template_id,
            user_id: &config.public_key,
            template_params,
        };
        let response = self
            .client
            .post(&config.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|err| Error::with_source("fail to reach the EmailJS service", err))?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("the EmailJS service responded with {status}: {text}");
        }
        tracing::info!(
            service_id = config.service_id.as_str(),
            template_id = config.template_id.as_str(),
            "contact email sent"
        );
        Ok(())
    }
}

impl EmailClient for EmailJsClient {
    #[inline]
    fn send<'a>(&'a self, template_params: &'a Map) -> BoxFuture<'a, Result<(), Error>> {
        Box::pin(self.deliver(template_params))
    }
}

#[cfg(test)]
mod tests {
    use super::{EmailClient, EmailJsClient, EmailJsConfig, SendEmailRequest};
    use crate::Map;
    use toml::Table;

    #[test]
    fn it_reads_emailjs_config() {
        let config = r#"
            public-key = "pk_demo"
            request-timeout = "5s"
        "#
        .parse::<Table>()
        .unwrap();
        let config = EmailJsConfig::from_config(&config);
        assert_eq!(config.public_key, "pk_demo");
        assert_eq!(config.service_id, "service_35mr6kh");
        assert_eq!(config.template_id, "template_jzrpi6e");
        assert_eq!(config.request_timeout.as_secs(), 5);
        assert!(config.endpoint.starts_with("https://api.emailjs.com/"));
    }

    #[test]
    fn it_serializes_send_requests() {
        let mut params = Map::new();
        params.insert("from_name".to_owned(), "Asha Patil".into());
        let body = SendEmailRequest {
            service_id: "service_35mr6kh",
            template_id: "template_jzrpi6e",
            user_id: "pk_demo",
            template_params: &params,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["user_id"], "pk_demo");
        assert_eq!(json["template_params"]["from_name"], "Asha Patil");
    }

    #[tokio::test]
    async fn it_requires_a_public_key() {
        let client = EmailJsClient::try_new(EmailJsConfig::default()).unwrap();
        let err = client.send(&Map::new()).await.unwrap_err();
        assert!(err.message().contains("public key"));
    }
}
