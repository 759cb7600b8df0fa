//! Reconciliation tests: refreshed state planned against declared input
//!
//! A host reads the rule, then plans the declared record against what was
//! observed. Anything but a no-op on an unchanged rule is drift noise.

use std::sync::Arc;

use fmc_access_rule::{
    plan_change, AccessRuleResource, AccessRuleResourceConfig, MissingRulePolicy,
};
use fmc_orch_common::{PlannedChange, Resource, SessionContext, Severity};
use fmc_test::{end_to_end_input, full_rule_input, minimal_input, MemoryAccessRuleClient};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_refreshed_state_plans_no_op() {
    let res = AccessRuleResource::new(MemoryAccessRuleClient::new());
    let ctx = SessionContext::default();

    for input in [end_to_end_input(), full_rule_input("p1", "full"), minimal_input("p1", "bare")] {
        let desired = res.validate(&input).unwrap();
        let mut data = desired.clone();
        assert!(res.create(&ctx, &mut data).await.is_empty());
        assert!(res.read(&ctx, &mut data).await.is_empty());

        let change = plan_change(&data.record, &desired.record).unwrap();
        assert_eq!(change, PlannedChange::NoOp, "drift for {}", desired.record.name);
    }
}

#[tokio::test]
async fn test_empty_lists_stay_empty() {
    let res = AccessRuleResource::new(MemoryAccessRuleClient::new());
    let ctx = SessionContext::default();
    let mut data = res.validate(&minimal_input("p1", "bare")).unwrap();
    assert!(res.create(&ctx, &mut data).await.is_empty());

    assert!(data.record.source_zones.is_empty());
    assert!(data.record.urls.is_empty());
    assert_eq!(data.record.ips_policy, "");
    assert_eq!(data.record.action, None);
}

#[tokio::test]
async fn test_policy_change_plans_replacement() {
    let res = AccessRuleResource::new(MemoryAccessRuleClient::new());
    let ctx = SessionContext::default();
    let mut data = res.validate(&end_to_end_input()).unwrap();
    assert!(res.create(&ctx, &mut data).await.is_empty());

    let mut moved = data.record.clone();
    moved.acp = "p2".to_string();
    moved.enabled = false;
    let change = plan_change(&data.record, &moved).unwrap();
    assert!(change.requires_replace());
    assert_eq!(
        change,
        PlannedChange::Replace {
            fields: vec!["acp".to_string()]
        }
    );
}

#[tokio::test]
async fn test_in_place_change_plans_update() {
    let res = AccessRuleResource::new(MemoryAccessRuleClient::new());
    let ctx = SessionContext::default();
    let mut data = res.validate(&end_to_end_input()).unwrap();
    assert!(res.create(&ctx, &mut data).await.is_empty());

    let mut edited = data.record.clone();
    edited.source_zones.reverse();
    let change = plan_change(&data.record, &edited).unwrap();
    assert_eq!(
        change,
        PlannedChange::Update {
            fields: vec!["source_zones".to_string()]
        }
    );
}

#[tokio::test]
async fn test_out_of_band_delete_is_an_error_by_default() {
    let client = Arc::new(MemoryAccessRuleClient::new().with_next_ids(["id-123"]));
    let res = AccessRuleResource::new(Arc::clone(&client));
    let ctx = SessionContext::default();
    let mut data = res.validate(&end_to_end_input()).unwrap();
    assert!(res.create(&ctx, &mut data).await.is_empty());

    client.remove_out_of_band("p1", "id-123").unwrap();
    let diags = res.read(&ctx, &mut data).await;
    assert!(diags.has_error());
    assert_eq!(data.id(), Some("id-123"));
}

#[tokio::test]
async fn test_out_of_band_delete_forgotten_then_recreated() {
    let client = Arc::new(MemoryAccessRuleClient::new().with_next_ids(["id-1", "id-2"]));
    let config = AccessRuleResourceConfig {
        missing_rule_policy: MissingRulePolicy::Forget,
        ..Default::default()
    };
    let res = AccessRuleResource::with_config(Arc::clone(&client), config);
    let ctx = SessionContext::default();
    let mut data = res.validate(&end_to_end_input()).unwrap();
    assert!(res.create(&ctx, &mut data).await.is_empty());

    client.remove_out_of_band("p1", "id-1").unwrap();
    let diags = res.read(&ctx, &mut data).await;
    assert!(!diags.has_error());
    assert_eq!(diags.iter().next().map(|d| d.severity), Some(Severity::Warning));
    assert_eq!(data.id(), None);

    // The host sees an unmanaged record and creates it again.
    assert!(res.create(&ctx, &mut data).await.is_empty());
    assert_eq!(data.id(), Some("id-2"));
    assert_eq!(client.rule_count(), 1);
}
