//! Ordered execution of a scope's declarations
//!
//! A plan walks the scope's dependency chain from its root and runs each
//! contributor's reconciliation only after the previous one has finished.
//! The first failure stops the plan; later contributors never start.

use crate::declare::{DeclaredStatement, StatementDeclarer};
use crate::error::{CoordinatorError, Result};
use crate::scope::{ContributorId, DeploymentScope, ScopeId};
use catalog_policy_reconciler::{PolicyReconciler, ReconcileOutcome};
use catalog_policy_types::{PhysicalResourceId, RequestKind};
use tracing::{info, instrument, warn};

/// A contributor whose reconciliation completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedStatement {
    pub contributor: ContributorId,
    pub physical_id: PhysicalResourceId,
    pub outcome: ReconcileOutcome,
}

/// Declarations of one scope in dependency order
#[derive(Debug, Clone)]
pub struct DeploymentPlan {
    scope: ScopeId,
    steps: Vec<DeclaredStatement>,
}

impl DeploymentPlan {
    /// Build the plan for `scope` from the declarer's registrations.
    pub fn for_scope(declarer: &StatementDeclarer, scope: &DeploymentScope) -> Result<Self> {
        Self::from_declarations(scope.id().clone(), declarer.declarations(scope.id()))
    }

    /// Order `declarations` along their `depends_on` links.
    ///
    /// Exactly one declaration may lack a dependency and every other one must
    /// depend on a distinct predecessor, so the result is a single chain.
    pub fn from_declarations(scope: ScopeId, declarations: Vec<DeclaredStatement>) -> Result<Self> {
        if declarations.is_empty() {
            return Err(CoordinatorError::EmptyScope(scope));
        }

        let broken = |reason: String| CoordinatorError::BrokenChain {
            scope: scope.clone(),
            reason,
        };

        let mut remaining = declarations;
        let mut steps = Vec::with_capacity(remaining.len());
        let mut previous: Option<ContributorId> = None;

        while !remaining.is_empty() {
            let next: Vec<usize> = remaining
                .iter()
                .enumerate()
                .filter(|(_, d)| d.depends_on == previous)
                .map(|(i, _)| i)
                .collect();

            let index = match next.as_slice() {
                [index] => *index,
                [] => {
                    return Err(broken(format!(
                        "no contributor follows {}",
                        previous.map(|p| p.to_string()).unwrap_or_else(|| "the root".to_string())
                    )))
                }
                _ => {
                    return Err(broken(format!(
                        "{} contributors follow {}",
                        next.len(),
                        previous.map(|p| p.to_string()).unwrap_or_else(|| "the root".to_string())
                    )))
                }
            };

            let step = remaining.remove(index);
            if step.contributor.scope() != &scope {
                return Err(broken(format!("{} belongs to another scope", step.contributor)));
            }
            previous = Some(step.contributor.clone());
            steps.push(step);
        }

        Ok(Self { scope, steps })
    }

    pub fn scope(&self) -> &ScopeId {
        &self.scope
    }

    pub fn steps(&self) -> &[DeclaredStatement] {
        &self.steps
    }

    /// Create every statement, first declared first.
    pub async fn apply(&self, reconciler: &PolicyReconciler) -> Result<Vec<AppliedStatement>> {
        self.run(reconciler, RequestKind::Create, self.steps.iter().collect())
            .await
    }

    /// Re-send every statement as an update, first declared first.
    pub async fn update(&self, reconciler: &PolicyReconciler) -> Result<Vec<AppliedStatement>> {
        self.run(reconciler, RequestKind::Update, self.steps.iter().collect())
            .await
    }

    /// Delete every statement, last declared first.
    pub async fn destroy(&self, reconciler: &PolicyReconciler) -> Result<Vec<AppliedStatement>> {
        self.run(reconciler, RequestKind::Delete, self.steps.iter().rev().collect())
            .await
    }

    #[instrument(skip_all, fields(scope = %self.scope, kind = %kind))]
    async fn run(
        &self,
        reconciler: &PolicyReconciler,
        kind: RequestKind,
        order: Vec<&DeclaredStatement>,
    ) -> Result<Vec<AppliedStatement>> {
        let mut applied = Vec::with_capacity(order.len());

        for step in order {
            let event = step.lifecycle_event(kind);
            let result = match event.to_request() {
                Ok(request) => reconciler.reconcile_with_outcome(&request).await,
                Err(e) => Err(e),
            };

            match result {
                Ok(done) => applied.push(AppliedStatement {
                    contributor: step.contributor.clone(),
                    physical_id: done.physical_id,
                    outcome: done.outcome,
                }),
                Err(e) => {
                    warn!(contributor = %step.contributor, error = %e, "Contributor failed, stopping");
                    return Err(CoordinatorError::ContributorFailed {
                        contributor: step.contributor.clone(),
                        completed: applied.len(),
                        source: e,
                    });
                }
            }
        }

        info!(count = applied.len(), "Scope reconciled");
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_policy_types::{Statement, StatementId};
    use serde_json::json;

    fn declare(declarer: &StatementDeclarer, scope: &DeploymentScope, name: &str) {
        declarer
            .declare(
                scope,
                name,
                StatementId::new(name).unwrap(),
                &Statement::from_value(json!({"Effect": "Allow", "Action": "glue:GetTable"})).unwrap(),
            )
            .unwrap();
    }

    #[test]
    fn test_plan_follows_chain() {
        let declarer = StatementDeclarer::new();
        let scope = DeploymentScope::new("Stack");
        for name in ["A", "B", "C"] {
            declare(&declarer, &scope, name);
        }

        let mut shuffled = declarer.declarations(scope.id());
        shuffled.reverse();
        let plan = DeploymentPlan::from_declarations(scope.id().clone(), shuffled).unwrap();

        let names: Vec<_> = plan.steps().iter().map(|s| s.contributor.name()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_empty_scope_rejected() {
        let declarer = StatementDeclarer::new();
        let scope = DeploymentScope::new("Nothing");
        assert!(matches!(
            DeploymentPlan::for_scope(&declarer, &scope),
            Err(CoordinatorError::EmptyScope(_))
        ));
    }

    #[test]
    fn test_forked_chain_rejected() {
        let declarer = StatementDeclarer::new();
        let scope = DeploymentScope::new("Stack");
        declare(&declarer, &scope, "A");
        declare(&declarer, &scope, "B");

        let mut declarations = declarer.declarations(scope.id());
        declarations[1].depends_on = None;

        assert!(matches!(
            DeploymentPlan::from_declarations(scope.id().clone(), declarations),
            Err(CoordinatorError::BrokenChain { .. })
        ));
    }
}
