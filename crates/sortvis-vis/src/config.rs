//! Visualizer configuration.
//!
//! Settings that a browser front end would otherwise keep in global state
//! (theme, last algorithm, speed) are carried here explicitly and handed
//! to the server at construction.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sortvis_kernels::{AlgorithmKind, Value, MAX_SEQUENCE_LEN};
use sortvis_playback::{PlaybackConfig, Speed};

use crate::error::{Error, Result};

/// Color theme reported to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    pub const fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

impl FromStr for Theme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(Error::InvalidConfig(format!("unknown theme: {other}"))),
        }
    }
}

/// Configuration for the visualizer server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisConfig {
    /// Port the HTTP server listens on
    pub port: u16,
    /// Seed for the sequence generator; `None` seeds from the OS
    pub seed: Option<u64>,
    /// Generated sequences have a length in `min_len..max_len`
    pub min_len: usize,
    pub max_len: usize,
    /// Generated values lie in `min_value..max_value`
    pub min_value: Value,
    pub max_value: Value,
    /// Algorithm selected when the server starts
    pub default_algorithm: AlgorithmKind,
    /// Speed selected when the server starts
    pub default_speed: Speed,
    pub theme: Theme,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            seed: None,
            min_len: 10,
            max_len: MAX_SEQUENCE_LEN,
            min_value: 10,
            max_value: 300,
            default_algorithm: AlgorithmKind::Bubble,
            default_speed: Speed::default(),
            theme: Theme::Light,
        }
    }
}

impl VisConfig {
    /// Defaults overridden by `SORTVIS_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each
    /// `SORTVIS_*` key.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is present but cannot be parsed, or if
    /// the resulting configuration fails [`VisConfig::validate`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(port) = lookup("SORTVIS_PORT") {
            config.port = parse_field("SORTVIS_PORT", &port)?;
        }
        if let Some(seed) = lookup("SORTVIS_SEED") {
            config.seed = Some(parse_field("SORTVIS_SEED", &seed)?);
        }
        if let Some(algorithm) = lookup("SORTVIS_ALGORITHM") {
            config.default_algorithm = algorithm.parse()?;
        }
        if let Some(index) = lookup("SORTVIS_SPEED_INDEX") {
            config.default_speed = Speed::from_index(parse_field("SORTVIS_SPEED_INDEX", &index)?)?;
        }
        if let Some(theme) = lookup("SORTVIS_THEME") {
            config.theme = theme.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply positional command line arguments: `[port] [seed]`.
    ///
    /// # Errors
    ///
    /// Returns an error if an argument is present but cannot be parsed.
    pub fn with_args<I, S>(mut self, args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        if let Some(port) = args.next() {
            self.port = parse_field("port", port.as_ref())?;
        }
        if let Some(seed) = args.next() {
            self.seed = Some(parse_field("seed", seed.as_ref())?);
        }
        Ok(self)
    }

    /// Check that the generator ranges are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for empty ranges or a length
    /// bound above the controller limit.
    pub fn validate(&self) -> Result<()> {
        if self.min_len >= self.max_len {
            return Err(Error::InvalidConfig(format!(
                "length range {}..{} is empty",
                self.min_len, self.max_len
            )));
        }
        if self.max_len > MAX_SEQUENCE_LEN {
            return Err(Error::InvalidConfig(format!(
                "max_len {} exceeds {MAX_SEQUENCE_LEN}",
                self.max_len
            )));
        }
        if self.min_value >= self.max_value {
            return Err(Error::InvalidConfig(format!(
                "value range {}..{} is empty",
                self.min_value, self.max_value
            )));
        }
        Ok(())
    }

    /// Controller settings derived from this configuration.
    pub fn playback(&self) -> PlaybackConfig {
        PlaybackConfig::default()
            .with_max_len(self.max_len)
            .with_speed(self.default_speed)
    }
}

fn parse_field<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("{name}: cannot parse {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = VisConfig::default();
        config.validate().unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.playback().max_len, 350);
    }

    #[test]
    fn env_overrides() {
        let config = VisConfig::from_lookup(lookup(&[
            ("SORTVIS_PORT", "8080"),
            ("SORTVIS_SEED", "7"),
            ("SORTVIS_ALGORITHM", "merge"),
            ("SORTVIS_SPEED_INDEX", "9"),
            ("SORTVIS_THEME", "Dark"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.default_algorithm, AlgorithmKind::Merge);
        assert_eq!(config.default_speed.millis(), 400);
        assert_eq!(config.theme, Theme::Dark);
    }

    #[test]
    fn bad_env_value_is_reported() {
        assert!(matches!(
            VisConfig::from_lookup(lookup(&[("SORTVIS_PORT", "eighty")])),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            VisConfig::from_lookup(lookup(&[("SORTVIS_ALGORITHM", "bogo")])),
            Err(Error::Kernel(_))
        ));
        assert!(matches!(
            VisConfig::from_lookup(lookup(&[("SORTVIS_SPEED_INDEX", "10")])),
            Err(Error::Playback(_))
        ));
    }

    #[test]
    fn positional_args() {
        let config = VisConfig::default().with_args(["4000", "99"]).unwrap();
        assert_eq!(config.port, 4000);
        assert_eq!(config.seed, Some(99));

        let config = VisConfig::default().with_args(Vec::<String>::new()).unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn inverted_ranges_fail_validation() {
        let config = VisConfig {
            min_value: 300,
            max_value: 10,
            ..VisConfig::default()
        };
        assert!(config.validate().is_err());

        let config = VisConfig {
            max_len: 400,
            ..VisConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn theme_toggle_and_parse() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("blue".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.to_string(), "dark");
    }
}
