// SPDX-FileCopyrightText: 2026 Pacelog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile resolution: map a LINE user id to a stored profile row.

use std::time::Duration;

use tracing::{debug, warn};

use pacelog_core::{MessagingPort, PacelogError, Profile, RunStore};

/// Used when the platform will not give us a display name (blocked bot,
/// transient API failure). A profile row is still created.
const FALLBACK_DISPLAY_NAME: &str = "Runner";

/// Returns the profile for a LINE user id, creating it on first contact.
///
/// The display name is fetched from the platform only when the profile does
/// not exist yet; the fetch is best-effort and bounded by `fetch_timeout`.
/// Creation is an atomic upsert in the store, so concurrent first-contact
/// events converge on one row.
pub async fn resolve_profile(
    channel: &dyn MessagingPort,
    store: &dyn RunStore,
    line_user_id: &str,
    fetch_timeout: Duration,
) -> Result<Profile, PacelogError> {
    if let Some(profile) = store.get_profile(line_user_id).await? {
        return Ok(profile);
    }

    let fetch = tokio::time::timeout(fetch_timeout, channel.fetch_display_name(line_user_id));
    let display_name = match fetch.await {
        Ok(Ok(name)) => name,
        Ok(Err(err)) => {
            warn!(line_user_id, error = %err, "display name fetch failed, using fallback");
            FALLBACK_DISPLAY_NAME.to_string()
        }
        Err(_) => {
            warn!(
                line_user_id,
                timeout_secs = fetch_timeout.as_secs(),
                "display name fetch timed out, using fallback"
            );
            FALLBACK_DISPLAY_NAME.to_string()
        }
    };

    let profile = store.resolve_profile(line_user_id, &display_name).await?;
    debug!(line_user_id, profile_id = profile.id, "profile created");
    Ok(profile)
}
