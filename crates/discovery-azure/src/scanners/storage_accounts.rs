use crate::clients::{tags_to_map, StorageAccountDto, StorageClient};
use crate::resource_id::build_resource_id;
use crate::types::resolve_type;
use async_trait::async_trait;
use discovery_ratelimit::RateLimiterError;
use discovery_scanner::{
    collect_all, create_resource, get_name_from_tags, paginate, ScanBuffer, ScanOutcome, ScannerContext,
    ServiceScanner,
};
use discovery_types::{NewResource, ScanError};
use std::sync::Arc;

/// Scans Azure storage accounts. ARM's list call is subscription-wide rather than
/// region-scoped; this scanner keeps only the accounts whose `location` matches
/// `ctx.region`, so the orchestrator's region×service matrix still produces one
/// region's worth of resources per invocation, same as a natively regional API.
#[derive(Debug)]
pub struct StorageAccountsScanner {
    client: Arc<dyn StorageClient>,
}

impl StorageAccountsScanner {
    /// Build a scanner over the given Storage client.
    pub fn new(client: Arc<dyn StorageClient>) -> Self {
        Self { client }
    }

    fn map(&self, dto: StorageAccountDto, ctx: &ScannerContext) -> discovery_types::DiscoveredResource {
        let subscription_id = ctx.account.subscription_id.clone().unwrap_or_default();
        let id = build_resource_id(&subscription_id, &dto.resource_group, "Microsoft.Storage", "storageAccounts", &dto.name);
        let tags = tags_to_map(&dto.tags);
        let name = get_name_from_tags(&tags, &dto.name);
        let new = NewResource::new(dto.name.clone(), id, "Microsoft.Storage/storageAccounts", self.service_name(), ctx.region.clone())
            .with_name(Some(name))
            .with_resource_group(Some(dto.resource_group))
            .with_tags(tags)
            .with_status(Some(dto.provisioning_state));
        create_resource(new, resolve_type)
    }
}

#[async_trait]
impl ServiceScanner for StorageAccountsScanner {
    fn service_name(&self) -> &str {
        "storage_accounts"
    }

    fn is_global(&self) -> bool {
        false
    }

    async fn scan(&self, ctx: &ScannerContext) -> ScanOutcome {
        let mut buffer = ScanBuffer::new(self.service_name(), ctx.region.clone());

        let client = self.client.clone();
        let fetch_ctx = ctx.clone();
        let stream = paginate(move |token: Option<String>| {
            let client = client.clone();
            let ctx = fetch_ctx.clone();
            async move {
                if ctx.is_cancelled() {
                    return Err(RateLimiterError::Cancelled);
                }
                ctx.rate_limiter
                    .with_backoff(|| client.list_storage_accounts(token.clone()))
                    .await
                    .map(|page| (page.items, page.next_token))
            }
        });
        let (dtos, error) = collect_all(stream).await;
        let resources = dtos
            .into_iter()
            .filter(|dto| dto.location == ctx.region)
            .map(|dto| self.map(dto, ctx))
            .collect();
        match error {
            None => {}
            Some(RateLimiterError::Cancelled) => {
                buffer.record_error(ScanError::CANCEL_OPERATION, "cancelled by user");
            }
            Some(RateLimiterError::Terminal(inner)) | Some(RateLimiterError::RetriesExhausted(inner)) => {
                buffer.record_error_with_code("StorageAccounts.List", inner.message, inner.code);
            }
        }

        let (errors, _warnings) = buffer.into_parts();
        (resources, errors)
    }

    fn resource_types(&self) -> Vec<String> {
        vec![resolve_type("Microsoft.Storage/storageAccounts")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{AzureCallError, Page};
    use discovery_ratelimit::RateLimiter;
    use discovery_scanner::Credential;
    use discovery_types::AccountContext;
    use tokio_util::sync::CancellationToken;

    #[derive(Debug)]
    struct FakeStorage {
        accounts: Vec<StorageAccountDto>,
    }

    #[async_trait]
    impl StorageClient for FakeStorage {
        async fn list_storage_accounts(&self, _next_token: Option<String>) -> Result<Page<StorageAccountDto>, AzureCallError> {
            Ok(Page { items: self.accounts.clone(), next_token: None })
        }
    }

    #[tokio::test]
    async fn filters_by_requested_region() {
        let client = Arc::new(FakeStorage {
            accounts: vec![
                StorageAccountDto {
                    name: "westaccount".to_string(),
                    resource_group: "rg-1".to_string(),
                    location: "westus".to_string(),
                    tags: Vec::new(),
                    provisioning_state: "Succeeded".to_string(),
                },
                StorageAccountDto {
                    name: "eastaccount".to_string(),
                    resource_group: "rg-1".to_string(),
                    location: "eastus".to_string(),
                    tags: Vec::new(),
                    provisioning_state: "Succeeded".to_string(),
                },
            ],
        });
        let scanner = StorageAccountsScanner::new(client);
        let cancellation = CancellationToken::new();
        let ctx = ScannerContext::new(
            "eastus",
            Credential::new(()),
            Arc::new(RateLimiter::new(cancellation.clone())),
            AccountContext { account_id: None, subscription_id: Some("sub-1".to_string()) },
            cancellation,
        );
        let (resources, errors) = scanner.scan(&ctx).await;
        assert!(errors.is_empty());
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].name.as_deref(), Some("eastaccount"));
        assert_eq!(resources[0].resource_group.as_deref(), Some("rg-1"));
    }
}
