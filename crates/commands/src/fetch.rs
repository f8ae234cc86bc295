//! Remote fetch of the definitions a label needs

use mgw_runtime::deps::ManagementApi;
use mgw_runtime::{AccessToken, CliError, RemoteDefinitions, RemoteResource, Result};

fn fetch_error(resource: RemoteResource) -> impl FnOnce(anyhow::Error) -> CliError {
    move |source| CliError::RemoteFetch { resource, source }
}

/// Fetch the label's APIs and both policy lists, in that order.
///
/// The first failure aborts the fetch so that nothing is generated from an
/// incomplete snapshot.
pub async fn fetch_definitions(
    api: &dyn ManagementApi,
    label: &str,
    token: &AccessToken,
) -> Result<RemoteDefinitions> {
    let apis = api
        .list_apis(label, token)
        .await
        .map_err(fetch_error(RemoteResource::Apis))?;
    tracing::debug!(count = apis.len(), %label, "Fetched APIs");

    let application_policies = api
        .list_application_policies(token)
        .await
        .map_err(fetch_error(RemoteResource::ApplicationPolicies))?;
    tracing::debug!(count = application_policies.len(), "Fetched application policies");

    let subscription_policies = api
        .list_subscription_policies(token)
        .await
        .map_err(fetch_error(RemoteResource::SubscriptionPolicies))?;
    tracing::debug!(count = subscription_policies.len(), "Fetched subscription policies");

    Ok(RemoteDefinitions {
        apis,
        application_policies,
        subscription_policies,
    })
}
