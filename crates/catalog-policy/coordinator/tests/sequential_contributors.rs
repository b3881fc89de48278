//! Several contributors in one scope share the remote policy without losing
//! each other's statements when run in chain order.

use catalog_policy_coordinator::{CoordinatorError, DeploymentPlan, DeploymentScope, StatementDeclarer};
use catalog_policy_reconciler::{PolicyReconciler, ReconcileError, ReconcileOutcome};
use catalog_policy_store::{InMemoryPolicyStore, StoreError, StoreOperation};
use catalog_policy_types::{PolicyDocument, Statement, StatementId};
use serde_json::json;
use std::sync::Arc;

fn grant(account: &str, action: &str) -> Statement {
    Statement::from_value(json!({
        "Effect": "Allow",
        "Principal": {"AWS": format!("arn:aws:iam::{}:root", account)},
        "Action": action,
        "Resource": "*"
    }))
    .unwrap()
}

fn declare_three(declarer: &StatementDeclarer, scope: &DeploymentScope) {
    let grants = [
        ("Analytics", "111111111111", "glue:GetTable"),
        ("Reporting", "222222222222", "glue:GetDatabase"),
        ("Sharing", "333333333333", "glue:*"),
    ];
    for (name, account, action) in grants {
        declarer
            .declare(scope, name, StatementId::new(name).unwrap(), &grant(account, action))
            .unwrap();
    }
}

async fn current(store: &InMemoryPolicyStore) -> Option<PolicyDocument> {
    store
        .current()
        .await
        .map(|json| PolicyDocument::from_json(&json).unwrap())
}

#[tokio::test]
async fn chain_applies_every_statement() {
    let declarer = StatementDeclarer::new();
    let scope = DeploymentScope::new("DataLakeStack");
    declare_three(&declarer, &scope);

    let store = Arc::new(InMemoryPolicyStore::new());
    let reconciler = PolicyReconciler::new(store.clone());

    let plan = DeploymentPlan::for_scope(&declarer, &scope).unwrap();
    let applied = plan.apply(&reconciler).await.unwrap();

    assert_eq!(applied.len(), 3);
    assert_eq!(applied[0].physical_id.as_str(), "glue-policy-Analytics");
    assert_eq!(applied[2].outcome, ReconcileOutcome::Written { statements: 3 });

    let doc = current(&store).await.unwrap();
    assert_eq!(doc.sids(), vec!["Analytics", "Reporting", "Sharing"]);

    // get/put pairs, never interleaved
    let journal = store.journal().await;
    assert_eq!(journal.len(), 6);
    for pair in journal.chunks(2) {
        assert_eq!(pair[0], StoreOperation::Get);
        assert!(matches!(pair[1], StoreOperation::Put { .. }));
    }
}

#[tokio::test]
async fn chain_preserves_statements_of_other_scopes() {
    let store = Arc::new(InMemoryPolicyStore::with_policy(
        r#"{"Version":"2012-10-17","Statement":[{"Sid":"ManagedElsewhere","Effect":"Allow","Action":"glue:GetPartition","Resource":"*"}]}"#,
    ));
    let reconciler = PolicyReconciler::new(store.clone());

    let declarer = StatementDeclarer::new();
    let scope = DeploymentScope::new("DataLakeStack");
    declare_three(&declarer, &scope);
    let plan = DeploymentPlan::for_scope(&declarer, &scope).unwrap();

    plan.apply(&reconciler).await.unwrap();
    plan.destroy(&reconciler).await.unwrap();

    let doc = current(&store).await.unwrap();
    assert_eq!(doc.sids(), vec!["ManagedElsewhere"]);
}

#[tokio::test]
async fn destroy_removes_policy_after_last_contributor() {
    let declarer = StatementDeclarer::new();
    let scope = DeploymentScope::new("DataLakeStack");
    declare_three(&declarer, &scope);

    let store = Arc::new(InMemoryPolicyStore::new());
    let reconciler = PolicyReconciler::new(store.clone());
    let plan = DeploymentPlan::for_scope(&declarer, &scope).unwrap();

    plan.apply(&reconciler).await.unwrap();
    let removed = plan.destroy(&reconciler).await.unwrap();

    let order: Vec<_> = removed.iter().map(|a| a.contributor.name()).collect();
    assert_eq!(order, vec!["Sharing", "Reporting", "Analytics"]);
    assert_eq!(removed[2].outcome, ReconcileOutcome::Deleted);
    assert!(store.current().await.is_none());
    assert_eq!(store.journal().await.last(), Some(&StoreOperation::Delete));
}

#[tokio::test]
async fn update_rewrites_in_place() {
    let declarer = StatementDeclarer::new();
    let scope = DeploymentScope::new("DataLakeStack");
    declare_three(&declarer, &scope);

    let store = Arc::new(InMemoryPolicyStore::new());
    let reconciler = PolicyReconciler::new(store.clone());
    let plan = DeploymentPlan::for_scope(&declarer, &scope).unwrap();

    let created = plan.apply(&reconciler).await.unwrap();
    let before = current(&store).await.unwrap();
    let updated = plan.update(&reconciler).await.unwrap();

    let created_ids: Vec<_> = created.iter().map(|a| a.physical_id.clone()).collect();
    let updated_ids: Vec<_> = updated.iter().map(|a| a.physical_id.clone()).collect();
    assert_eq!(created_ids, updated_ids);
    assert_eq!(current(&store).await.unwrap(), before);
}

#[tokio::test]
async fn failure_stops_later_contributors() {
    let declarer = StatementDeclarer::new();
    let scope = DeploymentScope::new("DataLakeStack");
    declare_three(&declarer, &scope);

    // second contributor carries a statement that is not valid JSON
    let mut declarations = declarer.declarations(scope.id());
    declarations[1].properties.statement = Some(json!("{not json"));
    let plan = DeploymentPlan::from_declarations(scope.id().clone(), declarations).unwrap();

    let store = Arc::new(InMemoryPolicyStore::new());
    let reconciler = PolicyReconciler::new(store.clone());

    let err = plan.apply(&reconciler).await.unwrap_err();
    match err {
        CoordinatorError::ContributorFailed {
            contributor,
            completed,
            source,
        } => {
            assert_eq!(contributor.name(), "Reporting");
            assert_eq!(completed, 1);
            assert!(matches!(source, ReconcileError::InvalidStatement { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }

    // Sharing never ran
    let doc = current(&store).await.unwrap();
    assert_eq!(doc.sids(), vec!["Analytics"]);
    assert_eq!(store.write_count().await, 1);
}

#[tokio::test]
async fn store_failure_reported_with_contributor() {
    let declarer = StatementDeclarer::new();
    let scope = DeploymentScope::new("DataLakeStack");
    declare_three(&declarer, &scope);

    let store = Arc::new(InMemoryPolicyStore::new());
    let reconciler = PolicyReconciler::new(store.clone());
    let plan = DeploymentPlan::for_scope(&declarer, &scope).unwrap();

    store
        .fail_next_get(StoreError::AccessDenied("glue:GetResourcePolicy".to_string()))
        .await;

    let err = plan.apply(&reconciler).await.unwrap_err();
    match err {
        CoordinatorError::ContributorFailed {
            contributor,
            completed,
            source,
        } => {
            assert_eq!(contributor.name(), "Analytics");
            assert_eq!(completed, 0);
            assert!(matches!(source, ReconcileError::Store(StoreError::AccessDenied(_))));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.write_count().await, 0);
    assert!(store.current().await.is_none());
}

#[tokio::test]
async fn independent_scopes_keep_separate_chains() {
    let declarer = StatementDeclarer::new();
    let ingest = DeploymentScope::new("IngestStack");
    let serve = DeploymentScope::new("ServeStack");

    declarer
        .declare(&ingest, "Writer", StatementId::new("Writer").unwrap(), &grant("111111111111", "glue:CreateTable"))
        .unwrap();
    declarer
        .declare(&serve, "Reader", StatementId::new("Reader").unwrap(), &grant("222222222222", "glue:GetTable"))
        .unwrap();

    let store = Arc::new(InMemoryPolicyStore::new());
    let reconciler = PolicyReconciler::new(store.clone());

    for scope in [&ingest, &serve] {
        let plan = DeploymentPlan::for_scope(&declarer, scope).unwrap();
        assert_eq!(plan.steps().len(), 1);
        assert!(plan.steps()[0].depends_on.is_none());
        plan.apply(&reconciler).await.unwrap();
    }

    assert_ne!(
        declarer.endpoint(ingest.id()).unwrap().service_token,
        declarer.endpoint(serve.id()).unwrap().service_token
    );
    assert_eq!(current(&store).await.unwrap().sids(), vec!["Writer", "Reader"]);
}
