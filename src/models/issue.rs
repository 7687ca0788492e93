//! Issue model
//!
//! Represents an issue filed against a project.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{now_timestamp, DbResult};

/// An issue as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(skip)]
    pub project: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
    pub created_on: String,
    pub updated_on: String,
    pub open: bool,
}

/// Data for creating a new issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueCreate {
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub status_text: String,
}

/// Data for updating an issue; `None` leaves the column untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueUpdate {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<bool>,
}

impl IssueUpdate {
    pub fn is_empty(&self) -> bool {
        self.issue_title.is_none()
            && self.issue_text.is_none()
            && self.created_by.is_none()
            && self.assigned_to.is_none()
            && self.status_text.is_none()
            && self.open.is_none()
    }
}

/// Equality filters for listing issues
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    pub id: Option<i64>,
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub created_on: Option<String>,
    pub updated_on: Option<String>,
    pub open: Option<bool>,
}

impl Issue {
    /// Create an Issue from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            project: row.get("project")?,
            issue_title: row.get("issue_title")?,
            issue_text: row.get("issue_text")?,
            created_by: row.get("created_by")?,
            assigned_to: row.get("assigned_to")?,
            status_text: row.get("status_text")?,
            created_on: row.get("created_on")?,
            updated_on: row.get("updated_on")?,
            open: row.get("open")?,
        })
    }

    /// Insert a new issue into the database
    pub fn create(conn: &Connection, project: &str, data: &IssueCreate) -> DbResult<Self> {
        let now = now_timestamp();
        conn.execute(
            r#"
            INSERT INTO issues (
                project, issue_title, issue_text, created_by, assigned_to, status_text,
                open, created_on, updated_on
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)
            "#,
            params![
                project,
                data.issue_title,
                data.issue_text,
                data.created_by,
                data.assigned_to,
                data.status_text,
                now,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, project, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get an issue by ID within a project
    pub fn get_by_id(conn: &Connection, project: &str, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM issues WHERE project = ?1 AND id = ?2")?;

        let result = stmt.query_row(params![project, id], Self::from_row);
        match result {
            Ok(issue) => Ok(Some(issue)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List a project's issues matching every set filter, oldest first
    pub fn list(conn: &Connection, project: &str, filter: &IssueFilter) -> DbResult<Vec<Self>> {
        let mut sql = String::from("SELECT * FROM issues WHERE project = ?1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(project.to_string())];

        macro_rules! add_filter {
            ($field:ident, $col:expr) => {
                if let Some(ref val) = filter.$field {
                    params_vec.push(Box::new(val.clone()));
                    sql.push_str(&format!(" AND {} = ?{}", $col, params_vec.len()));
                }
            };
        }

        add_filter!(id, "id");
        add_filter!(issue_title, "issue_title");
        add_filter!(issue_text, "issue_text");
        add_filter!(created_by, "created_by");
        add_filter!(assigned_to, "assigned_to");
        add_filter!(status_text, "status_text");
        add_filter!(created_on, "created_on");
        add_filter!(updated_on, "updated_on");
        add_filter!(open, "open");

        sql.push_str(" ORDER BY id ASC");

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

        let issues = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(issues)
    }

    /// Update an issue, always refreshing `updated_on`
    ///
    /// Returns `Ok(None)` when the issue does not exist in the project.
    pub fn update(
        conn: &Connection,
        project: &str,
        id: i64,
        data: &IssueUpdate,
    ) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        macro_rules! add_update {
            ($field:ident, $col:expr) => {
                if let Some(ref val) = data.$field {
                    params_vec.push(Box::new(val.clone()));
                    updates.push(format!("{} = ?{}", $col, params_vec.len()));
                }
            };
        }

        add_update!(issue_title, "issue_title");
        add_update!(issue_text, "issue_text");
        add_update!(created_by, "created_by");
        add_update!(assigned_to, "assigned_to");
        add_update!(status_text, "status_text");
        add_update!(open, "open");

        params_vec.push(Box::new(now_timestamp()));
        updates.push(format!("updated_on = ?{}", params_vec.len()));

        params_vec.push(Box::new(project.to_string()));
        let project_param = params_vec.len();
        params_vec.push(Box::new(id));
        let id_param = params_vec.len();

        let sql = format!(
            "UPDATE issues SET {} WHERE project = ?{} AND id = ?{}",
            updates.join(", "),
            project_param,
            id_param
        );

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let rows = conn.execute(&sql, params_refs.as_slice())?;
        if rows == 0 {
            return Ok(None);
        }

        Self::get_by_id(conn, project, id)
    }

    /// Delete an issue
    /// Returns Ok(true) if deleted, Ok(false) if not found
    pub fn delete(conn: &Connection, project: &str, id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM issues WHERE project = ?1 AND id = ?2",
            params![project, id],
        )?;
        Ok(rows > 0)
    }
}
