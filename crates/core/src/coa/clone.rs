//! Two-pass clone planner for chart-of-accounts templates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use balanza_shared::types::AccountId;

/// Account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    /// Asset account.
    Asset,
    /// Liability account.
    Liability,
    /// Equity account.
    Equity,
    /// Revenue account.
    Revenue,
    /// Expense account.
    Expense,
}

/// One row of a chart-of-accounts template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateAccount {
    /// Account code, unique within the template (e.g. `1.1.2`).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub kind: AccountKind,
    /// Code of the parent account, if any.
    pub parent_code: Option<String>,
}

/// A cloned account planned for creation (pass 1: parent not yet linked).
#[derive(Debug, Clone)]
pub struct PlannedAccount {
    /// The id the new account will be created with.
    pub id: AccountId,
    /// Account code, copied from the template.
    pub code: String,
    /// Account name, copied from the template.
    pub name: String,
    /// Account classification.
    pub kind: AccountKind,
}

/// The executable clone plan: create everything, then link parents.
#[derive(Debug, Clone)]
pub struct ClonePlan {
    /// Pass 1: accounts to create, all with null parent.
    pub creates: Vec<PlannedAccount>,
    /// Pass 2: `(child, parent)` links to resolve afterwards.
    pub links: Vec<(AccountId, AccountId)>,
}

/// Errors found while planning a clone.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CloneError {
    /// Two template rows share a code.
    #[error("Template has duplicate account code '{0}'")]
    DuplicateCode(String),

    /// A template row names a parent code that does not exist.
    #[error("Template account '{code}' references missing parent '{parent_code}'")]
    MissingParent {
        /// The child account's code.
        code: String,
        /// The nonexistent parent code it references.
        parent_code: String,
    },
}

/// Plans the clone of a template for one tenant.
///
/// Pass 1 assigns a fresh id to every template row, in template order.
/// Pass 2 resolves each row's `parent_code` against the id map, so the
/// plan is correct regardless of the order parents and children appear in
/// the template.
///
/// # Errors
///
/// Fails before planning anything if the template has duplicate codes or
/// a dangling parent reference.
pub fn plan_clone(template: &[TemplateAccount]) -> Result<ClonePlan, CloneError> {
    let mut ids_by_code: HashMap<&str, AccountId> = HashMap::with_capacity(template.len());
    let mut creates = Vec::with_capacity(template.len());

    for row in template {
        let id = AccountId::new();
        if ids_by_code.insert(row.code.as_str(), id).is_some() {
            return Err(CloneError::DuplicateCode(row.code.clone()));
        }
        creates.push(PlannedAccount {
            id,
            code: row.code.clone(),
            name: row.name.clone(),
            kind: row.kind,
        });
    }

    let mut links = Vec::new();
    for row in template {
        if let Some(parent_code) = &row.parent_code {
            let parent = ids_by_code.get(parent_code.as_str()).copied().ok_or_else(|| {
                CloneError::MissingParent {
                    code: row.code.clone(),
                    parent_code: parent_code.clone(),
                }
            })?;
            let child = ids_by_code[row.code.as_str()];
            links.push((child, parent));
        }
    }

    Ok(ClonePlan { creates, links })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(code: &str, parent: Option<&str>) -> TemplateAccount {
        TemplateAccount {
            code: code.to_string(),
            name: format!("Account {code}"),
            kind: AccountKind::Asset,
            parent_code: parent.map(str::to_string),
        }
    }

    /// Template `1`, `1.1`, `1.1.1` clones into a three-level tree with
    /// each child linked to its own clone's parent.
    #[test]
    fn test_three_level_tree() {
        let template = vec![
            account("1", None),
            account("1.1", Some("1")),
            account("1.1.1", Some("1.1")),
        ];
        let plan = plan_clone(&template).unwrap();

        assert_eq!(plan.creates.len(), 3);
        assert_eq!(plan.links.len(), 2);

        let id_of = |code: &str| plan.creates.iter().find(|a| a.code == code).unwrap().id;
        assert!(plan.links.contains(&(id_of("1.1"), id_of("1"))));
        assert!(plan.links.contains(&(id_of("1.1.1"), id_of("1.1"))));
    }

    /// Children listed before their parents still link correctly; this is
    /// the reason the plan is two-pass.
    #[test]
    fn test_child_before_parent_order() {
        let template = vec![
            account("1.1.1", Some("1.1")),
            account("1.1", Some("1")),
            account("1", None),
        ];
        let plan = plan_clone(&template).unwrap();

        let id_of = |code: &str| plan.creates.iter().find(|a| a.code == code).unwrap().id;
        assert!(plan.links.contains(&(id_of("1.1.1"), id_of("1.1"))));
        assert!(plan.links.contains(&(id_of("1.1"), id_of("1"))));
    }

    /// Every row with a parent code ends up with exactly one link.
    #[test]
    fn test_clone_completeness() {
        let template = vec![
            account("1", None),
            account("2", None),
            account("1.1", Some("1")),
            account("2.1", Some("2")),
            account("2.2", Some("2")),
        ];
        let plan = plan_clone(&template).unwrap();

        let with_parent = template.iter().filter(|t| t.parent_code.is_some()).count();
        assert_eq!(plan.links.len(), with_parent);

        // Every linked child id exists in the creates list.
        for (child, parent) in &plan.links {
            assert!(plan.creates.iter().any(|a| a.id == *child));
            assert!(plan.creates.iter().any(|a| a.id == *parent));
        }
    }

    #[test]
    fn test_missing_parent_rejected() {
        let template = vec![account("1.1", Some("1"))];
        assert_eq!(
            plan_clone(&template),
            Err(CloneError::MissingParent {
                code: "1.1".to_string(),
                parent_code: "1".to_string(),
            })
        );
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let template = vec![account("1", None), account("1", None)];
        assert_eq!(
            plan_clone(&template),
            Err(CloneError::DuplicateCode("1".to_string()))
        );
    }

    #[test]
    fn test_fresh_ids_per_clone() {
        let template = vec![account("1", None)];
        let first = plan_clone(&template).unwrap();
        let second = plan_clone(&template).unwrap();
        assert_ne!(first.creates[0].id, second.creates[0].id);
    }
}
