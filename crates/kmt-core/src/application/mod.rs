//! High level abstractions for the application.
//!
//! # Examples
//!
//! ```rust,ignore
//! use kmt_core::application::Application;
//!
//! fn main() {
//!     kmt_axum::Cluster::boot()
//!         .register(router::routes())
//!         .run()
//! }
//! ```

use crate::{
    LazyLock,
    extension::TomlTableExt,
    state::{Env, State},
};
use std::{
    env,
    path::{Component, Path, PathBuf},
};
use toml::Table;

mod tracing_subscriber;

/// Application interfaces.
pub trait Application {
    /// Routes.
    type Routes;

    /// Registers default routes.
    fn register(self, routes: Self::Routes) -> Self;

    /// Runs the application.
    fn run(self);

    /// Boots the application with the default initialization.
    fn boot() -> Self
    where
        Self: Default,
    {
        tracing_subscriber::init::<Self>();
        tracing::info!(
            app_env = Self::env().as_str(),
            app_name = Self::name(),
            app_version = Self::version(),
            "boot the application",
        );
        Self::default()
    }

    /// Returns a reference to the shared application state.
    #[inline]
    fn shared_state() -> &'static State {
        &SHARED_APP_STATE
    }

    /// Returns the application env.
    #[inline]
    fn env() -> Env {
        SHARED_APP_STATE.env()
    }

    /// Returns a reference to the shared application config.
    #[inline]
    fn config() -> &'static Table {
        SHARED_APP_STATE.config()
    }

    /// Returns a reference to the config table with the key.
    #[inline]
    fn get_config(key: &str) -> Option<&'static Table> {
        SHARED_APP_STATE.get_config(key)
    }

    /// Returns the application name.
    #[inline]
    fn name() -> &'static str {
        APP_NAME.as_ref()
    }

    /// Returns the application version.
    #[inline]
    fn version() -> &'static str {
        APP_VERSION.as_ref()
    }

    /// Returns the project directory for the application.
    #[inline]
    fn project_dir() -> &'static PathBuf {
        &PROJECT_DIR
    }

    /// Returns the config directory for the application.
    ///
    /// # Note
    ///
    /// The default config directory is `${PROJECT_DIR}/config`.
    /// It can also be specified by the environment variable `KMT_APP_CONFIG_DIR`.
    #[inline]
    fn config_dir() -> &'static PathBuf {
        &CONFIG_DIR
    }

    /// Parses an absolute path, or a path relative to the home dir `~/` or project dir.
    #[inline]
    fn parse_path(path: &str) -> PathBuf {
        join_path(&PROJECT_DIR, path)
    }

    /// Handles the graceful shutdown.
    #[inline]
    async fn shutdown() {}
}

/// Joins a path to the specific dir.
fn join_path(dir: &Path, path: &str) -> PathBuf {
    fn join_path_components(mut full_path: PathBuf, path: &str) -> PathBuf {
        for component in Path::new(path).components() {
            match component {
                Component::CurDir => (),
                Component::ParentDir => {
                    full_path.pop();
                }
                _ => {
                    full_path.push(component);
                }
            }
        }
        full_path
    }

    if path.starts_with('/') {
        path.into()
    } else if let Some(path) = path.strip_prefix("~/") {
        if let Some(home_dir) = dirs::home_dir() {
            join_path_components(home_dir, path)
        } else {
            join_path_components(dir.to_path_buf(), path)
        }
    } else {
        join_path_components(dir.to_path_buf(), path)
    }
}

/// App name.
static APP_NAME: LazyLock<&'static str> = LazyLock::new(|| {
    SHARED_APP_STATE
        .config()
        .get_str("name")
        .map(|name| name.to_owned())
        .or_else(|| env::var("CARGO_PKG_NAME").ok())
        .map(|name| &*name.leak())
        .unwrap_or("kmt-tracker")
});

/// App version.
static APP_VERSION: LazyLock<&'static str> = LazyLock::new(|| {
    SHARED_APP_STATE
        .config()
        .get_str("version")
        .map(|version| version.to_owned())
        .or_else(|| env::var("CARGO_PKG_VERSION").ok())
        .map(|version| &*version.leak())
        .unwrap_or(env!("CARGO_PKG_VERSION"))
});

/// Project directory.
static PROJECT_DIR: LazyLock<PathBuf> = LazyLock::new(|| {
    env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .or_else(|_| env::current_dir())
        .unwrap_or_default()
});

/// Config directory.
static CONFIG_DIR: LazyLock<PathBuf> = LazyLock::new(|| {
    env::var("KMT_APP_CONFIG_DIR")
        .map(|dir| join_path(&PROJECT_DIR, &dir))
        .unwrap_or_else(|_| PROJECT_DIR.join("config"))
});

/// Shared app state.
static SHARED_APP_STATE: LazyLock<State> = LazyLock::new(|| {
    let app_env = match env::var("KMT_APP_ENV") {
        Ok(env) => env.parse::<Env>().unwrap_or_else(|err| {
            // No tracing subscriber exists before the config is loaded.
            eprintln!("{err}; falling back to the `dev` environment");
            Env::Dev
        }),
        Err(_) => Env::default(),
    };
    let mut state = State::new(app_env);
    if let Err(err) = state.load_config(&CONFIG_DIR) {
        eprintln!("{err}; falling back to the default config");
    }
    state
});
