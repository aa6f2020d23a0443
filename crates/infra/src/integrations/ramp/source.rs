//! [`ExpenseDataSource`] backed by the Ramp developer API

use async_trait::async_trait;
use serde_json::Value;
use spendview_core::ExpenseDataSource;
use spendview_domain::{ProviderConfig, ProviderDataset, ProviderEnvironment, Result};
use tracing::{info, warn};

use super::client::{Paged, RampClient, Resource};

#[derive(Debug, Clone)]
pub struct RampDataSource {
    client: RampClient,
    environment: ProviderEnvironment,
}

impl RampDataSource {
    pub fn new(client: RampClient, environment: ProviderEnvironment) -> Self {
        Self { client, environment }
    }

    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        Ok(Self::new(RampClient::from_config(config)?, config.environment))
    }

    pub fn environment(&self) -> ProviderEnvironment {
        self.environment
    }

    /// One token, then every listing concurrently.
    ///
    /// Only a failed token request is an error. A failed primary listing
    /// becomes an empty list plus a warning; a failed auxiliary listing
    /// becomes an empty list.
    pub async fn fetch(&self) -> Result<ProviderDataset> {
        let token = self.client.access_token().await?;

        let (transactions, reimbursements, spend_categories, spend_programs, receipts, memos) =
            tokio::join!(
                self.client.fetch_paged(Resource::Transactions, &token),
                self.client.fetch_paged(Resource::Reimbursements, &token),
                self.client.fetch_paged(Resource::SpendCategories, &token),
                self.client.fetch_paged(Resource::SpendPrograms, &token),
                self.client.fetch_paged(Resource::Receipts, &token),
                self.client.fetch_paged(Resource::Memos, &token),
            );

        let mut warnings = Vec::new();
        let dataset = ProviderDataset {
            transactions: settle(Resource::Transactions, transactions, &mut warnings),
            reimbursements: settle(Resource::Reimbursements, reimbursements, &mut warnings),
            spend_categories: settle(Resource::SpendCategories, spend_categories, &mut warnings),
            spend_programs: settle(Resource::SpendPrograms, spend_programs, &mut warnings),
            receipts: settle(Resource::Receipts, receipts, &mut warnings),
            memos: settle(Resource::Memos, memos, &mut warnings),
            warnings,
        };

        info!(
            environment = %self.environment,
            transactions = dataset.transactions.len(),
            reimbursements = dataset.reimbursements.len(),
            warnings = dataset.warnings.len(),
            "provider dataset fetched"
        );
        Ok(dataset)
    }
}

fn settle(resource: Resource, result: Result<Paged>, warnings: &mut Vec<String>) -> Vec<Value> {
    match result {
        Ok(paged) => {
            if paged.truncated {
                warnings.push(format!(
                    "{resource}: stopped after {} pages; older records were not loaded",
                    paged.pages
                ));
            }
            paged.records
        }
        Err(err) => {
            warn!(%resource, error = %err, "listing failed; continuing without it");
            if resource.is_primary() {
                warnings.push(format!("{resource}: {err}"));
            }
            Vec::new()
        }
    }
}

#[async_trait]
impl ExpenseDataSource for RampDataSource {
    async fn fetch_dataset(&self) -> Result<ProviderDataset> {
        self.fetch().await
    }
}
