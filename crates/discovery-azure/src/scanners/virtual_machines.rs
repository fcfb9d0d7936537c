use crate::clients::{tags_to_map, ComputeClient, VirtualMachineDto};
use crate::resource_id::build_resource_id;
use crate::types::resolve_type;
use async_trait::async_trait;
use discovery_ratelimit::RateLimiterError;
use discovery_scanner::{
    collect_all, create_resource, get_name_from_tags, paginate, ScanBuffer, ScanOutcome, ScannerContext,
    ServiceScanner,
};
use discovery_types::{push_relationship, NewResource, RelationshipType, ResourceRelationship, ScanError};
use std::sync::Arc;

/// Scans Azure virtual machines, recording a `References` edge to the VM's own
/// resource group and `Contains` edges to its attached managed disks, exercising
/// both relationship kinds on the Azure side.
#[derive(Debug)]
pub struct VirtualMachinesScanner {
    client: Arc<dyn ComputeClient>,
}

impl VirtualMachinesScanner {
    /// Build a scanner over the given Compute client.
    pub fn new(client: Arc<dyn ComputeClient>) -> Self {
        Self { client }
    }

    fn map(&self, dto: VirtualMachineDto, ctx: &ScannerContext) -> discovery_types::DiscoveredResource {
        let subscription_id = ctx.account.subscription_id.clone().unwrap_or_default();
        let id = build_resource_id(&subscription_id, &dto.resource_group, "Microsoft.Compute", "virtualMachines", &dto.name);
        let tags = tags_to_map(&dto.tags);

        let mut relationships: Vec<ResourceRelationship> = Vec::new();
        let rg_id = format!("/subscriptions/{subscription_id}/resourceGroups/{}", dto.resource_group);
        push_relationship(
            &mut relationships,
            &id,
            ResourceRelationship::new(RelationshipType::References, rg_id, Some("azure_resource_group".to_string())),
        );
        for disk_id in &dto.disk_resource_ids {
            push_relationship(
                &mut relationships,
                &id,
                ResourceRelationship::new(RelationshipType::Contains, disk_id.clone(), Some(resolve_type("Microsoft.Compute/disks"))),
            );
        }

        let name = get_name_from_tags(&tags, &dto.name);
        let new = NewResource::new(dto.name.clone(), id, "Microsoft.Compute/virtualMachines", self.service_name(), ctx.region.clone())
            .with_name(Some(name))
            .with_resource_group(Some(dto.resource_group))
            .with_tags(tags)
            .with_relationships(relationships)
            .with_status(Some(dto.provisioning_state));
        create_resource(new, resolve_type)
    }
}

#[async_trait]
impl ServiceScanner for VirtualMachinesScanner {
    fn service_name(&self) -> &str {
        "virtual_machines"
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
                    .with_backoff(|| client.list_virtual_machines(token.clone()))
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
                buffer.record_error_with_code("VirtualMachines.List", inner.message, inner.code);
            }
        }

        let (errors, _warnings) = buffer.into_parts();
        (resources, errors)
    }

    fn resource_types(&self) -> Vec<String> {
        vec![resolve_type("Microsoft.Compute/virtualMachines")]
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
    struct FakeCompute {
        vms: Vec<VirtualMachineDto>,
    }

    #[async_trait]
    impl ComputeClient for FakeCompute {
        async fn list_virtual_machines(&self, _next_token: Option<String>) -> Result<Page<VirtualMachineDto>, AzureCallError> {
            Ok(Page { items: self.vms.clone(), next_token: None })
        }
    }

    #[tokio::test]
    async fn maps_vm_with_resource_group_and_disk_relationships() {
        let client = Arc::new(FakeCompute {
            vms: vec![VirtualMachineDto {
                name: "vm-1".to_string(),
                resource_group: "rg-1".to_string(),
                location: "eastus".to_string(),
                tags: Vec::new(),
                disk_resource_ids: vec!["/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.Compute/disks/vm-1-disk".to_string()],
                provisioning_state: "Succeeded".to_string(),
            }],
        });
        let scanner = VirtualMachinesScanner::new(client);
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
        let vm = &resources[0];
        assert_eq!(vm.relationships.len(), 2);
        assert!(vm.relationships.iter().any(|r| r.relationship_type == RelationshipType::References));
        assert!(vm.relationships.iter().any(|r| r.relationship_type == RelationshipType::Contains));
    }
}
