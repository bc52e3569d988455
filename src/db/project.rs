//! Project-related database queries.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Local};
use rusqlite::{Connection, Row, params};

use crate::core::tree::check_reparent;
use crate::types::Project;

const PROJECT_COLUMNS: &str = "id, name, parent, created_at";

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    let created_at: String = row.get(3)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|err| super::conversion_error(3, err))?;
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        parent: row.get(2)?,
        created_at,
    })
}

pub fn create_project(arg: &Project, conn: &Connection) -> Result<()> {
    if let Some(parent) = arg.parent.as_deref() {
        if query_project_by_id(parent, conn)?.is_none() {
            return Err(anyhow!("parent project '{parent}' does not exist"));
        }
    }
    conn.execute(
        "INSERT INTO projects (id, name, parent, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![arg.id, arg.name, arg.parent, arg.created_at.to_rfc3339()],
    )?;
    tracing::info!(id = %arg.id, name = %arg.name, "project created");
    Ok(())
}

pub fn query_projects(conn: &Connection) -> Result<Vec<Project>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at"
    ))?;
    let rows = stmt.query_map([], project_from_row)?;
    let mut projects = Vec::new();
    for row in rows {
        projects.push(row?);
    }
    Ok(projects)
}

pub fn query_project_by_id(id: &str, conn: &Connection) -> Result<Option<Project>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"
    ))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(project_from_row(row)?))
    } else {
        Ok(None)
    }
}

pub fn rename_project(id: &str, name: &str, conn: &Connection) -> Result<()> {
    let changed = conn.execute("UPDATE projects SET name = ?1 WHERE id = ?2", params![name, id])?;
    if changed == 0 {
        return Err(anyhow!("project '{id}' not found"));
    }
    Ok(())
}

/// Moves a project under `parent` (or to the root), refusing moves that would create a cycle.
pub fn set_project_parent(id: &str, parent: Option<&str>, conn: &Connection) -> Result<()> {
    let projects = query_projects(conn)?;
    if !projects.iter().any(|p| p.id == id) {
        return Err(anyhow!("project '{id}' not found"));
    }
    check_reparent(id, parent, &projects)?;
    conn.execute(
        "UPDATE projects SET parent = ?1 WHERE id = ?2",
        params![parent, id],
    )?;
    tracing::info!(id, parent = ?parent, "project moved");
    Ok(())
}

/// Deletes a project. Its children move up to its parent and its entries lose their project.
pub fn delete_project(id: &str, conn: &Connection) -> Result<()> {
    let project = query_project_by_id(id, conn)?.ok_or_else(|| anyhow!("project '{id}' not found"))?;
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE projects SET parent = ?1 WHERE parent = ?2",
        params![project.parent, id],
    )?;
    let orphaned = tx.execute("UPDATE entries SET project = NULL WHERE project = ?1", [id])?;
    tx.execute("DELETE FROM projects WHERE id = ?1", [id])?;
    tx.commit()?;
    tracing::info!(id, orphaned, "project deleted");
    Ok(())
}
