//! Application scoped state.

use crate::{error::Error, extension::TomlTableExt};
use std::{
    fs,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::Path,
    str::FromStr,
};
use toml::Table;

/// Default port of the main listener.
const DEFAULT_PORT: u16 = 8080;

/// Application running environment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Env {
    /// The `dev` environment.
    #[default]
    Dev,
    /// The `prod` environment.
    Prod,
}

impl Env {
    /// Returns `true` if `self` is the `dev` environment.
    #[inline]
    pub fn is_dev(self) -> bool {
        self == Self::Dev
    }

    /// Returns the name of the environment.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Prod => "prod",
        }
    }
}

impl FromStr for Env {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            _ => Err(Error::new(format!("unsupported app env `{s}`"))),
        }
    }
}

/// A state is a record of the env and the config.
#[derive(Debug, Clone, Default)]
pub struct State {
    /// Environment.
    env: Env,
    /// Configuration.
    config: Table,
}

impl State {
    /// Creates a new instance.
    #[inline]
    pub fn new(env: Env) -> Self {
        Self {
            env,
            config: Table::new(),
        }
    }

    /// Creates a new instance with the config.
    #[inline]
    pub fn with_config(env: Env, config: Table) -> Self {
        Self { env, config }
    }

    /// Loads the config file `config.{env}.toml` in the directory.
    pub fn load_config(&mut self, config_dir: &Path) -> Result<(), Error> {
        let env = self.env.as_str();
        let config_file = config_dir.join(format!("config.{env}.toml"));
        let config = fs::read_to_string(&config_file).map_err(|err| {
            let config_file = config_file.display();
            Error::with_source(format!("fail to read the config file `{config_file}`"), err)
        })?;
        self.config = config
            .parse::<Table>()
            .map_err(|err| Error::with_source("fail to parse the config file", err))?;
        Ok(())
    }

    /// Returns the env.
    #[inline]
    pub fn env(&self) -> Env {
        self.env
    }

    /// Returns a reference to the config.
    #[inline]
    pub fn config(&self) -> &Table {
        &self.config
    }

    /// Returns a reference to the config table with the key.
    #[inline]
    pub fn get_config(&self, key: &str) -> Option<&Table> {
        self.config.get_table(key)
    }

    /// Returns the socket address of the main listener.
    pub fn listener(&self) -> SocketAddr {
        let main = self.get_config("main");
        let host = main
            .and_then(|config| config.get_str("host"))
            .and_then(|s| {
                s.parse::<IpAddr>()
                    .inspect_err(|err| tracing::warn!("invalid `main.host` value `{s}`: {err}"))
                    .ok()
            })
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        let port = main
            .and_then(|config| config.get_u16("port"))
            .unwrap_or(DEFAULT_PORT);
        (host, port).into()
    }
}
