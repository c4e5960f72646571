//! Remote status lookup for a batch of ticket keys.

use std::collections::HashMap;

use tracing::{debug, error};

use super::{key_in_query, IssueSearch, JiraError, SearchRequest};

/// Query the tracker for `keys` and return `{key: status name}`.
///
/// Issues without a status are left out of the map. Failures are logged
/// together with the request payload and returned as-is.
pub async fn fetch_statuses<S>(
    search: &S,
    keys: &[String],
) -> Result<HashMap<String, String>, JiraError>
where
    S: IssueSearch + ?Sized,
{
    let request = SearchRequest::new(key_in_query(keys), &["status"], keys.len() as u32);

    let response = match search.search(&request).await {
        Ok(response) => response,
        Err(e) => {
            if e.is_http_status() {
                error!(error = %e, payload = ?request, "Tracker HTTP error");
            } else {
                error!(error = %e, payload = ?request, "Network error talking to tracker");
            }
            return Err(e);
        }
    };

    let returned = response.issues.len();
    let statuses: HashMap<String, String> = response
        .issues
        .into_iter()
        .filter_map(|issue| {
            let name = issue.fields.status?.name?;
            Some((issue.key, name))
        })
        .collect();

    debug!(
        requested = keys.len(),
        returned,
        with_status = statuses.len(),
        "Fetched ticket statuses"
    );

    Ok(statuses)
}
