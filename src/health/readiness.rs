//! Readiness polling against a running gateway.
//!
//! Used by the `gateway-probe` binary. A target is ready once it answers
//! with a 2xx status; anything else, including transport errors, counts
//! as a failed attempt.

use std::time::Duration;

/// Result of [`wait_ready`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub ready: bool,
    pub attempts: u32,
    /// Reason the last failed attempt failed. Empty when the first attempt
    /// succeeded.
    pub last_error: String,
}

/// Poll `target` up to `retries` times, sleeping `delay` between attempts.
///
/// `retries` below one is treated as one. `on_failure` is called after each
/// failed attempt with the attempt number, the attempt limit and the reason.
pub async fn wait_ready<F>(
    client: &reqwest::Client,
    target: &str,
    retries: u32,
    delay: Duration,
    mut on_failure: F,
) -> ProbeOutcome
where
    F: FnMut(u32, u32, &str),
{
    let limit = retries.max(1);
    let mut last_error = String::new();

    for attempt in 1..=limit {
        match client.get(target).send().await {
            Ok(res) if res.status().is_success() => {
                return ProbeOutcome {
                    ready: true,
                    attempts: attempt,
                    last_error,
                };
            }
            Ok(res) => last_error = format!("status {}", res.status()),
            Err(e) => last_error = e.to_string(),
        }

        on_failure(attempt, limit, &last_error);
        if attempt < limit {
            tokio::time::sleep(delay).await;
        }
    }

    ProbeOutcome {
        ready: false,
        attempts: limit,
        last_error,
    }
}
