use crate::flight_control::{FailurePolicy, TransitionPolicy};
use crate::warn;
use std::{env, time::Duration};

/// Runtime settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct PitConfig {
    leap_url: String,
    drone_url: Option<String>,
    transition_policy: TransitionPolicy,
}

impl PitConfig {
    const LEAP_URL_VAR: &'static str = "PIT_LEAP_URL";
    const DRONE_URL_VAR: &'static str = "PIT_DRONE_URL";
    const TIMEOUT_VAR: &'static str = "PIT_TRANSITION_TIMEOUT_SECS";
    const REVERT_VAR: &'static str = "PIT_REVERT_ON_FAILURE";
    const DEFAULT_LEAP_URL: &'static str = "ws://127.0.0.1:6437/v6.json";

    /// Reads all `PIT_*` variables. Empty variables count as unset.
    ///
    /// Unparsable timeouts are logged and ignored, so the transition policy
    /// falls back to waiting without limit.
    pub fn from_env() -> Self {
        let var = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self::from_vars(
            var(Self::LEAP_URL_VAR),
            var(Self::DRONE_URL_VAR),
            var(Self::TIMEOUT_VAR).as_deref(),
            var(Self::REVERT_VAR).as_deref(),
        )
    }

    fn from_vars(
        leap_url: Option<String>,
        drone_url: Option<String>,
        timeout: Option<&str>,
        revert: Option<&str>,
    ) -> Self {
        let failure = if revert.is_some_and(parse_flag) { FailurePolicy::Revert } else { FailurePolicy::Hold };
        Self {
            leap_url: leap_url.unwrap_or_else(|| String::from(Self::DEFAULT_LEAP_URL)),
            drone_url,
            transition_policy: TransitionPolicy { failure, timeout: timeout.and_then(parse_timeout) },
        }
    }

    pub fn leap_url(&self) -> &str { &self.leap_url }
    pub fn drone_url(&self) -> Option<&str> { self.drone_url.as_deref() }
    pub fn transition_policy(&self) -> TransitionPolicy { self.transition_policy }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn parse_timeout(value: &str) -> Option<Duration> {
    let parsed = value.trim().parse::<f64>().ok().filter(|secs| *secs > 0.0);
    match parsed.and_then(|secs| Duration::try_from_secs_f64(secs).ok()) {
        Some(timeout) => Some(timeout),
        None => {
            warn!("Ignoring invalid transition timeout '{value}', waiting without limit");
            None
        }
    }
}
