//! Issue tracker service
//!
//! Create, list, update and delete issues within a project.

use std::collections::HashMap;
use std::fmt;

use crate::db::Database;
use crate::models::{Issue, IssueCreate, IssueFilter, IssueUpdate};

use super::{parse_id, present};

/// Result of submitting a new issue
#[derive(Debug)]
pub enum CreateIssueOutcome {
    Created(Issue),
    MissingRequiredFields,
}

/// Result of updating an issue
#[derive(Debug, PartialEq, Eq)]
pub enum UpdateIssueOutcome {
    Updated(String),
    NoUpdatedField,
    MissingId,
    CouldNotUpdate(String),
}

impl fmt::Display for UpdateIssueOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateIssueOutcome::Updated(id) => write!(f, "successfully updated {}", id),
            UpdateIssueOutcome::NoUpdatedField => f.write_str("no updated field sent"),
            UpdateIssueOutcome::MissingId => f.write_str("_id error"),
            UpdateIssueOutcome::CouldNotUpdate(id) => write!(f, "could not update {}", id),
        }
    }
}

/// Result of deleting an issue
#[derive(Debug, PartialEq, Eq)]
pub enum DeleteIssueOutcome {
    Deleted(String),
    MissingId,
    CouldNotDelete(String),
}

impl fmt::Display for DeleteIssueOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeleteIssueOutcome::Deleted(id) => write!(f, "deleted {}", id),
            DeleteIssueOutcome::MissingId => f.write_str("_id error"),
            DeleteIssueOutcome::CouldNotDelete(id) => write!(f, "could not delete {}", id),
        }
    }
}

/// Build a filter from query parameters; unknown keys are ignored
///
/// A value that cannot match its column (a non-numeric `_id`, an `open`
/// other than true/false) yields `None`, meaning nothing can match.
pub fn filter_from_query(query: &HashMap<String, String>) -> Option<IssueFilter> {
    let mut filter = IssueFilter::default();

    for (key, value) in query {
        match key.as_str() {
            "_id" => filter.id = Some(parse_id(value)?),
            "issue_title" => filter.issue_title = Some(value.clone()),
            "issue_text" => filter.issue_text = Some(value.clone()),
            "created_by" => filter.created_by = Some(value.clone()),
            "assigned_to" => filter.assigned_to = Some(value.clone()),
            "status_text" => filter.status_text = Some(value.clone()),
            "created_on" => filter.created_on = Some(value.clone()),
            "updated_on" => filter.updated_on = Some(value.clone()),
            "open" => {
                filter.open = Some(match value.as_str() {
                    "true" => true,
                    "false" => false,
                    _ => return None,
                })
            }
            _ => {}
        }
    }

    Some(filter)
}

/// List a project's issues matching the query parameters
pub fn list_issues(
    db: &Database,
    project: &str,
    query: &HashMap<String, String>,
) -> Result<Vec<Issue>, String> {
    let filter = match filter_from_query(query) {
        Some(filter) => filter,
        None => return Ok(Vec::new()),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Issue::list(&conn, project, &filter).map_err(|e| format!("Failed to list issues: {}", e))
}

/// Submit a new issue
pub fn create_issue(
    db: &Database,
    project: &str,
    data: IssueCreate,
) -> Result<CreateIssueOutcome, String> {
    if present(Some(data.issue_title.as_str())).is_none()
        || present(Some(data.issue_text.as_str())).is_none()
        || present(Some(data.created_by.as_str())).is_none()
    {
        return Ok(CreateIssueOutcome::MissingRequiredFields);
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let issue = Issue::create(&conn, project, &data)
        .map_err(|e| format!("Failed to create issue: {}", e))?;

    tracing::info!("Created issue {} in project '{}'", issue.id, project);
    Ok(CreateIssueOutcome::Created(issue))
}

/// Update an issue
pub fn update_issue(
    db: &Database,
    project: &str,
    id: Option<&str>,
    data: IssueUpdate,
) -> Result<UpdateIssueOutcome, String> {
    let raw_id = match present(id) {
        Some(raw) => raw,
        None => return Ok(UpdateIssueOutcome::MissingId),
    };

    if data.is_empty() {
        return Ok(UpdateIssueOutcome::NoUpdatedField);
    }

    let id = match parse_id(raw_id) {
        Some(id) => id,
        None => return Ok(UpdateIssueOutcome::CouldNotUpdate(raw_id.to_string())),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let updated = Issue::update(&conn, project, id, &data)
        .map_err(|e| format!("Failed to update issue: {}", e))?;

    match updated {
        Some(issue) => Ok(UpdateIssueOutcome::Updated(issue.id.to_string())),
        None => Ok(UpdateIssueOutcome::CouldNotUpdate(raw_id.to_string())),
    }
}

/// Delete an issue
pub fn delete_issue(
    db: &Database,
    project: &str,
    id: Option<&str>,
) -> Result<DeleteIssueOutcome, String> {
    let raw_id = match present(id) {
        Some(raw) => raw,
        None => return Ok(DeleteIssueOutcome::MissingId),
    };

    let id = match parse_id(raw_id) {
        Some(id) => id,
        None => return Ok(DeleteIssueOutcome::CouldNotDelete(raw_id.to_string())),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Issue::delete(&conn, project, id)
        .map_err(|e| format!("Failed to delete issue: {}", e))?;

    if deleted {
        tracing::info!("Deleted issue {} from project '{}'", id, project);
        Ok(DeleteIssueOutcome::Deleted(id.to_string()))
    } else {
        Ok(DeleteIssueOutcome::CouldNotDelete(raw_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit(db: &Database, project: &str) -> Issue {
        let data = IssueCreate {
            issue_title: "Title".to_string(),
            issue_text: "text".to_string(),
            created_by: "Functional Test".to_string(),
            assigned_to: "Chai".to_string(),
            status_text: "In QA".to_string(),
        };
        match create_issue(db, project, data).unwrap() {
            CreateIssueOutcome::Created(issue) => issue,
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_create_requires_fields() {
        let db = Database::in_memory().unwrap();
        let data = IssueCreate {
            issue_title: "Title".to_string(),
            issue_text: "   ".to_string(),
            created_by: "me".to_string(),
            assigned_to: String::new(),
            status_text: String::new(),
        };
        assert!(matches!(
            create_issue(&db, "p", data).unwrap(),
            CreateIssueOutcome::MissingRequiredFields
        ));
    }

    #[test]
    fn test_update_outcomes() {
        let db = Database::in_memory().unwrap();
        let issue = submit(&db, "p");
        let id = issue.id.to_string();

        let text_update = IssueUpdate {
            issue_text: Some("changed".to_string()),
            ..Default::default()
        };

        assert_eq!(
            update_issue(&db, "p", Some(&id), IssueUpdate::default()).unwrap(),
            UpdateIssueOutcome::NoUpdatedField
        );
        assert_eq!(
            update_issue(&db, "p", None, text_update.clone()).unwrap(),
            UpdateIssueOutcome::MissingId
        );
        assert_eq!(
            update_issue(&db, "p", Some("nope"), text_update.clone()).unwrap(),
            UpdateIssueOutcome::CouldNotUpdate("nope".to_string())
        );
        assert_eq!(
            update_issue(&db, "p", Some(&id), text_update).unwrap().to_string(),
            format!("successfully updated {}", id)
        );
    }

    #[test]
    fn test_update_keeps_open_unless_sent() {
        let db = Database::in_memory().unwrap();
        let issue = submit(&db, "p");
        let id = issue.id.to_string();

        let close = IssueUpdate {
            open: Some(false),
            ..Default::default()
        };
        update_issue(&db, "p", Some(&id), close).unwrap();

        let retitle = IssueUpdate {
            issue_title: Some("New title".to_string()),
            ..Default::default()
        };
        update_issue(&db, "p", Some(&id), retitle).unwrap();

        let issues = list_issues(&db, "p", &HashMap::new()).unwrap();
        assert!(!issues[0].open);
        assert_eq!(issues[0].issue_title, "New title");
    }

    #[test]
    fn test_delete_outcomes() {
        let db = Database::in_memory().unwrap();
        let issue = submit(&db, "p");
        let id = issue.id.to_string();

        assert_eq!(delete_issue(&db, "p", None).unwrap().to_string(), "_id error");
        assert_eq!(
            delete_issue(&db, "p", Some(&id)).unwrap(),
            DeleteIssueOutcome::Deleted(id.clone())
        );
        assert_eq!(
            delete_issue(&db, "p", Some(&id)).unwrap().to_string(),
            format!("could not delete {}", id)
        );
    }

    #[test]
    fn test_list_with_query_filters() {
        let db = Database::in_memory().unwrap();
        submit(&db, "p");
        submit(&db, "p");

        let mut query = HashMap::new();
        query.insert("assigned_to".to_string(), "Chai".to_string());
        query.insert("utm_source".to_string(), "ignored".to_string());
        assert_eq!(list_issues(&db, "p", &query).unwrap().len(), 2);

        query.insert("open".to_string(), "false".to_string());
        assert!(list_issues(&db, "p", &query).unwrap().is_empty());

        query.insert("open".to_string(), "maybe".to_string());
        assert!(list_issues(&db, "p", &query).unwrap().is_empty());
    }
}
