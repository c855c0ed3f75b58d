use crate::auth::MAX_LEEWAY_SECONDS;
use clap::{Arg, ArgMatches, Command};

pub const ARG_SAASFORM_SERVER: &str = "saasform-server";
pub const ARG_LOGIN_URL: &str = "login-url";
pub const ARG_LOGOUT_URL: &str = "logout-url";
pub const ARG_PROFILE_URL: &str = "profile-url";
pub const ARG_KEY_TIMEOUT: &str = "key-timeout";
pub const ARG_KEY_ATTEMPTS: &str = "key-attempts";
pub const ARG_LEEWAY: &str = "leeway";

#[derive(Debug, Clone)]
pub struct Options {
    pub server: String,
    pub login_url: Option<String>,
    pub logout_url: Option<String>,
    pub profile_url: Option<String>,
    pub key_timeout_seconds: u64,
    pub key_attempts: u32,
    pub leeway_seconds: u64,
}

impl Options {
    /// Parse Saasform arguments from matches.
    ///
    /// # Errors
    /// Returns an error if `--saasform-server` is missing or empty.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let server = match matches.get_one::<String>(ARG_SAASFORM_SERVER).cloned() {
            Some(value) if !value.trim().is_empty() => value.trim().to_string(),
            _ => anyhow::bail!("missing required argument: --{ARG_SAASFORM_SERVER}"),
        };

        // env vars set to "" reach us as empty strings
        let get_non_empty = |id: &str| {
            matches
                .get_one::<String>(id)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Ok(Self {
            server,
            login_url: get_non_empty(ARG_LOGIN_URL),
            logout_url: get_non_empty(ARG_LOGOUT_URL),
            profile_url: get_non_empty(ARG_PROFILE_URL),
            key_timeout_seconds: matches
                .get_one::<u64>(ARG_KEY_TIMEOUT)
                .copied()
                .unwrap_or(10),
            key_attempts: matches
                .get_one::<u32>(ARG_KEY_ATTEMPTS)
                .copied()
                .unwrap_or(3),
            leeway_seconds: matches.get_one::<u64>(ARG_LEEWAY).copied().unwrap_or(0),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SAASFORM_SERVER)
                .long(ARG_SAASFORM_SERVER)
                .help("Saasform base URL, e.g. https://app.example.com")
                .long_help(
                    "Saasform base URL. The token signing key is fetched once at startup from\n`{server}/api/v1/public-key`; the service exits if it cannot be loaded.",
                )
                .env("SAASFORM_SERVER"),
        )
        .arg(
            Arg::new(ARG_LOGIN_URL)
                .long(ARG_LOGIN_URL)
                .help("Where unauthenticated users are redirected (default: {server}/login)")
                .env("SAASFORM_USER_LOGIN"),
        )
        .arg(
            Arg::new(ARG_LOGOUT_URL)
                .long(ARG_LOGOUT_URL)
                .help("Saasform logout page (default: {server}/logout)")
                .env("SAASFORM_USER_LOGOUT"),
        )
        .arg(
            Arg::new(ARG_PROFILE_URL)
                .long(ARG_PROFILE_URL)
                .help("Saasform profile page (default: {server}/user)")
                .env("SAASFORM_USER_PROFILE"),
        )
        .arg(
            Arg::new(ARG_KEY_TIMEOUT)
                .long(ARG_KEY_TIMEOUT)
                .help("Timeout in seconds for each public key request")
                .default_value("10")
                .env("SAASGATE_KEY_TIMEOUT")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_KEY_ATTEMPTS)
                .long(ARG_KEY_ATTEMPTS)
                .help("Attempts to fetch the public key before giving up")
                .default_value("3")
                .env("SAASGATE_KEY_ATTEMPTS")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new(ARG_LEEWAY)
                .long(ARG_LEEWAY)
                .help("Clock skew in seconds tolerated when checking token expiry")
                .default_value("0")
                .env("SAASGATE_LEEWAY")
                .value_parser(clap::value_parser!(u64).range(0..=MAX_LEEWAY_SECONDS)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> Command {
        with_args(Command::new("saasgate"))
    }

    fn with_cleared_env<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        temp_env::with_vars(
            [
                ("SAASFORM_SERVER", None::<&str>),
                ("SAASFORM_USER_LOGIN", None::<&str>),
                ("SAASFORM_USER_LOGOUT", None::<&str>),
                ("SAASFORM_USER_PROFILE", None::<&str>),
                ("SAASGATE_KEY_TIMEOUT", None::<&str>),
                ("SAASGATE_KEY_ATTEMPTS", None::<&str>),
                ("SAASGATE_LEEWAY", None::<&str>),
            ],
            f,
        )
    }

    #[test]
    fn server_is_required() {
        with_cleared_env(|| {
            let matches = command().get_matches_from(vec!["saasgate"]);
            let result = Options::parse(&matches);
            assert!(result.is_err());
            if let Err(err) = result {
                assert!(err
                    .to_string()
                    .contains("missing required argument: --saasform-server"));
            }
        });
    }

    #[test]
    fn defaults() -> anyhow::Result<()> {
        with_cleared_env(|| {
            let matches = command().try_get_matches_from(vec![
                "saasgate",
                "--saasform-server",
                "http://localhost:7000",
            ])?;
            let options = Options::parse(&matches)?;

            assert_eq!(options.server, "http://localhost:7000");
            assert_eq!(options.login_url, None);
            assert_eq!(options.logout_url, None);
            assert_eq!(options.profile_url, None);
            assert_eq!(options.key_timeout_seconds, 10);
            assert_eq!(options.key_attempts, 3);
            assert_eq!(options.leeway_seconds, 0);
            Ok(())
        })
    }

    #[test]
    fn reads_env() -> anyhow::Result<()> {
        temp_env::with_vars(
            [
                ("SAASFORM_SERVER", Some("https://saasform.tld")),
                ("SAASFORM_USER_LOGIN", Some("https://saasform.tld/signin")),
                ("SAASFORM_USER_LOGOUT", Some("")),
                ("SAASFORM_USER_PROFILE", Some("  ")),
                ("SAASGATE_KEY_TIMEOUT", Some("5")),
                ("SAASGATE_KEY_ATTEMPTS", Some("1")),
                ("SAASGATE_LEEWAY", Some("30")),
            ],
            || {
                let matches = command().try_get_matches_from(vec!["saasgate"])?;
                let options = Options::parse(&matches)?;

                assert_eq!(options.server, "https://saasform.tld");
                assert_eq!(
                    options.login_url.as_deref(),
                    Some("https://saasform.tld/signin")
                );
                assert_eq!(options.logout_url, None);
                assert_eq!(options.profile_url, None);
                assert_eq!(options.key_timeout_seconds, 5);
                assert_eq!(options.key_attempts, 1);
                assert_eq!(options.leeway_seconds, 30);
                Ok(())
            },
        )
    }

    #[test]
    fn out_of_range_leeway_rejected() {
        with_cleared_env(|| {
            let too_large = (MAX_LEEWAY_SECONDS + 1).to_string();
            let result = command().try_get_matches_from(vec![
                "saasgate",
                "--saasform-server",
                "http://localhost:7000",
                "--leeway",
                too_large.as_str(),
            ]);
            assert_eq!(
                result.map_err(|e| e.kind()).err(),
                Some(clap::error::ErrorKind::ValueValidation)
            );
        });
    }

    #[test]
    fn max_leeway_accepted() -> anyhow::Result<()> {
        with_cleared_env(|| {
            let max = MAX_LEEWAY_SECONDS.to_string();
            let matches = command().try_get_matches_from(vec![
                "saasgate",
                "--saasform-server",
                "http://localhost:7000",
                "--leeway",
                max.as_str(),
            ])?;
            assert_eq!(Options::parse(&matches)?.leeway_seconds, MAX_LEEWAY_SECONDS);
            Ok(())
        })
    }

    #[test]
    fn zero_attempts_rejected() {
        with_cleared_env(|| {
            let result = command().try_get_matches_from(vec![
                "saasgate",
                "--saasform-server",
                "http://localhost:7000",
                "--key-attempts",
                "0",
            ]);
            assert_eq!(
                result.map_err(|e| e.kind()).err(),
                Some(clap::error::ErrorKind::ValueValidation)
            );
        });
    }
}
