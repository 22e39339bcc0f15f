//! Cloud-service entitlements.

use super::paths;
use crate::client::ConsoleClient;
use crate::error::ConsoleResult;
use crate::model::{
    AccountType, CloudService, CloudServiceConfirmation, CloudServiceUpdate, ServiceStatus,
};
use crate::transport::{HttpRequest, Transport};
use log::{info, warn};
use serde_json::json;

impl<T: Transport> ConsoleClient<T> {
    /// Enable or disable a cloud service for a batch of accounts.
    ///
    /// The batch is sent as one request. Success yields one confirmation per
    /// identity; any failure yields a single [`CloudServiceUpdate::Failed`]
    /// for the whole batch, whatever the cause.
    pub async fn set_cloud_service<S: AsRef<str>>(
        &self,
        identities: &[S],
        account_type: AccountType,
        service: CloudService,
        status: ServiceStatus,
    ) -> ConsoleResult<CloudServiceUpdate> {
        self.session()?;
        let identities: Vec<&str> = identities.iter().map(|i| i.as_ref()).collect();
        if identities.is_empty() {
            return Ok(CloudServiceUpdate::Updated {
                confirmations: Vec::new(),
            });
        }

        let request = HttpRequest::post(paths::cloud_services(account_type)).json(json!({
            "identities": identities,
            "service": service.as_str(),
            "status": status.as_str(),
        }));

        match self.fetch(request).await {
            Ok(_) => {
                info!(
                    "{} {} for {} {} account(s)",
                    status,
                    service,
                    identities.len(),
                    account_type
                );
                Ok(CloudServiceUpdate::Updated {
                    confirmations: identities
                        .iter()
                        .map(|identity| CloudServiceConfirmation {
                            identity: identity.to_string(),
                            account_type,
                            service,
                            status,
                        })
                        .collect(),
                })
            }
            Err(e) => {
                warn!("Cloud service update failed: {}", e);
                Ok(CloudServiceUpdate::Failed {
                    message: format!("failed to update {} for the selected accounts", service),
                })
            }
        }
    }
}
