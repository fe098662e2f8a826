//! Shared services of the site.

use kmt_axum::Cluster;
use kmt_core::{
    Map, bail,
    application::Application,
    contact::{EmailClient, EmailJsClient, EmailJsConfig},
    error::Error,
    extension::TomlTableExt,
    i18n::{DEFAULT_LANGUAGE, Dictionary, Translator},
    simulation::SimulationDelays,
    view::ViewEngine,
};
use std::{sync::Arc, time::Duration};

pub mod session;

use session::SessionStore;

/// Default time after which an idle session is evicted.
const DEFAULT_MAX_IDLE: Duration = Duration::from_secs(60 * 60);

/// State shared by the controllers.
#[derive(Clone)]
pub struct AppState {
    /// Visitor sessions.
    sessions: Arc<SessionStore>,
    /// Template engine.
    views: Arc<ViewEngine>,
    /// Delivery of the contact emails.
    email_client: Option<Arc<dyn EmailClient>>,
    /// Address shown when an email cannot be delivered.
    fallback_email: Arc<str>,
}

impl AppState {
    /// Creates a new instance.
    pub fn new(
        sessions: SessionStore,
        views: ViewEngine,
        email_client: Option<Arc<dyn EmailClient>>,
        fallback_email: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            sessions: Arc::new(sessions),
            views: Arc::new(views),
            email_client,
            fallback_email: fallback_email.into(),
        }
    }

    /// Creates a new instance from the application config.
    pub fn from_config() -> Self {
        let i18n = Cluster::get_config("i18n");
        let locale_dir = i18n
            .and_then(|config| config.get_str("locale-dir"))
            .unwrap_or("config/locale");
        let default_locale = i18n
            .and_then(|config| config.get_str("default-locale"))
            .unwrap_or(DEFAULT_LANGUAGE);
        let translator = match Dictionary::load(&Cluster::parse_path(locale_dir), default_locale) {
            Ok(dictionary) => {
                let languages = dictionary.languages().collect::<Vec<_>>().join(", ");
                tracing::info!(languages, "translation dictionary loaded");
                Translator::new(Arc::new(dictionary))
            }
            Err(err) => {
                tracing::error!("fail to load the translation dictionary: {err}");
                Translator::default()
            }
        };
        let delays = Cluster::get_config("simulation")
            .map(SimulationDelays::from_config)
            .unwrap_or_default();
        let max_idle = Cluster::get_config("session")
            .and_then(|config| config.get_duration("max-idle"))
            .unwrap_or(DEFAULT_MAX_IDLE);
        let sessions = SessionStore::new(translator, delays, max_idle);

        let template_dir = Cluster::get_config("view")
            .and_then(|config| config.get_str("template-dir"))
            .unwrap_or("templates");
        let views = ViewEngine::new(&Cluster::parse_path(template_dir), Cluster::env());

        let emailjs_config = Cluster::get_config("emailjs")
            .map(EmailJsConfig::from_config)
            .unwrap_or_default();
        let fallback_email = emailjs_config.fallback_email.clone();
        let email_client = match EmailJsClient::try_new(emailjs_config) {
            Ok(client) => Some(Arc::new(client) as Arc<dyn EmailClient>),
            Err(err) => {
                tracing::error!("fail to create the EmailJS client: {err}");
                None
            }
        };
        Self::new(sessions, views, email_client, fallback_email)
    }

    /// Returns a reference to the session store.
    #[inline]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Returns a reference to the template engine.
    #[inline]
    pub fn views(&self) -> &ViewEngine {
        &self.views
    }

    /// Returns the address shown when an email cannot be delivered.
    #[inline]
    pub fn fallback_email(&self) -> &str {
        &self.fallback_email
    }

    /// Sends the contact email.
    pub async fn send_email(&self, template_params: &Map) -> Result<(), Error> {
        let Some(client) = self.email_client.as_deref() else {
            bail!("email delivery is not available");
        };
        client.send(template_params).await
    }
}
