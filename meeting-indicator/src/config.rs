use anyhow::{bail, Context, Result};
use chrono::NaiveTime;
use chrono_tz::Tz;
use std::env;
use std::time::Duration;

const DEFAULT_GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";
const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";
const DEFAULT_PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Daily working window in the operator's timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingHours {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub timezone: Tz,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
            timezone: Tz::UTC,
        }
    }
}

/// Client-credentials app registration used to read the calendar
#[derive(Debug, Clone)]
pub struct GraphCredentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub authority_host: String,
    pub api_base: String,
}

#[derive(Debug, Clone)]
pub struct PushoverConfig {
    pub token: String,
    pub user: String,
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct IndicatorConfig {
    pub calendar_id: String,
    pub graph: GraphCredentials,
    pub working_hours: WorkingHours,
    pub tick_interval: Duration,
    pub lookahead: chrono::Duration,
    pub request_timeout: Duration,
    pub pushover: Option<PushoverConfig>,
}

impl IndicatorConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .with_context(|| format!("{} must be set", key))
        };

        let working_hours = WorkingHours {
            start: parse_time_of_day(&lookup("WORK_START").unwrap_or_else(|| "09:00".to_string()))
                .context("WORK_START must be a time like 09:00")?,
            end: parse_time_of_day(&lookup("WORK_END").unwrap_or_else(|| "17:00".to_string()))
                .context("WORK_END must be a time like 17:00")?,
            timezone: lookup("WORK_TIMEZONE")
                .unwrap_or_else(|| "UTC".to_string())
                .trim()
                .parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("{}", e))
                .context("WORK_TIMEZONE must be an IANA time zone name")?,
        };
        if working_hours.start > working_hours.end {
            bail!(
                "WORK_START ({}) must not be later than WORK_END ({})",
                working_hours.start,
                working_hours.end
            );
        }

        let tick_interval_secs: u64 = lookup("TICK_INTERVAL_SECS")
            .unwrap_or_else(|| "900".to_string())
            .parse()
            .context("TICK_INTERVAL_SECS must be a valid number")?;
        let lookahead_minutes: i64 = lookup("LOOKAHEAD_MINUTES")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .context("LOOKAHEAD_MINUTES must be a valid number")?;
        let request_timeout_secs: u64 = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .context("REQUEST_TIMEOUT_SECS must be a valid number")?;

        if tick_interval_secs == 0 {
            bail!("TICK_INTERVAL_SECS must be greater than zero");
        }
        if lookahead_minutes <= 0 {
            bail!("LOOKAHEAD_MINUTES must be greater than zero");
        }
        if request_timeout_secs == 0 || request_timeout_secs >= tick_interval_secs {
            bail!(
                "REQUEST_TIMEOUT_SECS must be between 1 and the tick interval ({}s)",
                tick_interval_secs
            );
        }

        let pushover = match (lookup("PUSHOVER_TOKEN"), lookup("PUSHOVER_USER")) {
            (Some(token), Some(user)) if !token.is_empty() && !user.is_empty() => {
                Some(PushoverConfig {
                    token,
                    user,
                    api_url: lookup("PUSHOVER_API_URL")
                        .unwrap_or_else(|| DEFAULT_PUSHOVER_API_URL.to_string()),
                })
            }
            _ => None,
        };

        Ok(Self {
            calendar_id: required("OUTLOOK_CALENDAR_ID")?,
            graph: GraphCredentials {
                tenant_id: required("AZURE_TENANT_ID")?,
                client_id: required("AZURE_CLIENT_ID")?,
                client_secret: required("AZURE_CLIENT_SECRET")?,
                authority_host: lookup("AUTHORITY_HOST")
                    .unwrap_or_else(|| DEFAULT_AUTHORITY_HOST.to_string()),
                api_base: lookup("GRAPH_API_BASE")
                    .unwrap_or_else(|| DEFAULT_GRAPH_API_BASE.to_string()),
            },
            working_hours,
            tick_interval: Duration::from_secs(tick_interval_secs),
            lookahead: chrono::Duration::minutes(lookahead_minutes),
            request_timeout: Duration::from_secs(request_timeout_secs),
            pushover,
        })
    }
}

fn parse_time_of_day(value: &str) -> Result<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .with_context(|| format!("invalid time of day {:?}", value))
}
