//! Ancestry queries and display names over the flat project list.
//!
//! Projects reference their parent by id and form a forest. Every walk here is
//! iterative and remembers the ids it has seen, so a dangling parent or a cycle
//! in stored data ends the walk instead of looping.

use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::types::{Project, ProjectId};

pub const NO_PROJECT_LABEL: &str = "No project";
pub const TREE_SEPARATOR: &str = " > ";

/// A project together with the names of its lineage, root first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectTreeNode {
    pub id: Option<ProjectId>,
    pub name: String,
    pub parent: Option<ProjectId>,
    pub name_tree: Vec<String>,
}

impl ProjectTreeNode {
    /// The synthetic node entries without a project are grouped under.
    pub fn no_project() -> Self {
        Self {
            id: None,
            name: NO_PROJECT_LABEL.to_string(),
            parent: None,
            name_tree: vec![NO_PROJECT_LABEL.to_string()],
        }
    }

    pub fn depth(&self) -> usize {
        self.name_tree.len().saturating_sub(1)
    }
}

fn by_id(projects: &[Project]) -> HashMap<&str, &Project> {
    projects.iter().map(|p| (p.id.as_str(), p)).collect()
}

/// True when `ancestor` appears in the parent chain above `candidate`.
///
/// The walk starts at the candidate's parent, so outside a cycle a project is never its own
/// descendant, and `None` (no project) is never a descendant of anything.
pub fn is_descendant(candidate: Option<&str>, ancestor: &str, projects: &[Project]) -> bool {
    let Some(candidate) = candidate else {
        return false;
    };
    let index = by_id(projects);
    let mut seen = HashSet::new();
    let mut current = index.get(candidate).and_then(|p| p.parent.as_deref());
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        if !seen.insert(id) {
            return false;
        }
        current = index.get(id).and_then(|p| p.parent.as_deref());
    }
    false
}

/// Validates moving `project` under `new_parent`.
pub fn check_reparent(project: &str, new_parent: Option<&str>, projects: &[Project]) -> Result<()> {
    let Some(parent) = new_parent else {
        return Ok(());
    };
    if !projects.iter().any(|p| p.id == parent) {
        return Err(Error::UnknownProject(parent.to_string()));
    }
    if parent == project {
        return Err(Error::SelfParent(project.to_string()));
    }
    if is_descendant(Some(parent), project, projects) {
        return Err(Error::Cycle {
            project: project.to_string(),
            parent: parent.to_string(),
        });
    }
    Ok(())
}

/// Names from the root down to `project`.
///
/// A dangling parent yields the partial chain that could be resolved; a cycle
/// is cut at the first repeated id.
pub fn name_tree(project: &Project, projects: &[Project]) -> Vec<String> {
    let index = by_id(projects);
    let mut names = vec![project.name.clone()];
    let mut seen = HashSet::from([project.id.as_str()]);
    let mut current = project.parent.as_deref();
    while let Some(id) = current {
        if !seen.insert(id) {
            tracing::warn!(project = %project.id, at = id, "project ancestry loops, truncating");
            break;
        }
        let Some(parent) = index.get(id) else {
            tracing::warn!(project = %project.id, missing = id, "project parent not found, truncating");
            break;
        };
        names.push(parent.name.clone());
        current = parent.parent.as_deref();
    }
    names.reverse();
    names
}

pub fn tree_node(project: &Project, projects: &[Project]) -> ProjectTreeNode {
    ProjectTreeNode {
        id: Some(project.id.clone()),
        name: project.name.clone(),
        parent: project.parent.clone(),
        name_tree: name_tree(project, projects),
    }
}

/// Lineage joined for display, e.g. `Client > Website > Design`.
pub fn tree_display_name(node: &ProjectTreeNode) -> String {
    if node.id.is_none() {
        return NO_PROJECT_LABEL.to_string();
    }
    node.name_tree.join(TREE_SEPARATOR)
}

fn sort_key(project: &Project) -> (String, &str) {
    (project.name.to_lowercase(), project.id.as_str())
}

/// Projects in depth-first tree order, siblings sorted by name.
///
/// Projects whose parent is missing are listed as roots. Projects that can
/// only be reached through a cycle come last.
pub fn sorted_projects(projects: &[Project]) -> Vec<ProjectTreeNode> {
    let index = by_id(projects);
    let mut children: HashMap<&str, Vec<&Project>> = HashMap::new();
    let mut roots = Vec::new();
    for project in projects {
        match project.parent.as_deref() {
            Some(parent) if index.contains_key(parent) => {
                children.entry(parent).or_default().push(project)
            }
            _ => roots.push(project),
        }
    }
    for list in children.values_mut() {
        list.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
    }
    roots.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));

    let mut ordered = Vec::with_capacity(projects.len());
    let mut seen = HashSet::new();
    let mut stack: Vec<&Project> = roots.into_iter().rev().collect();
    while let Some(project) = stack.pop() {
        if !seen.insert(project.id.as_str()) {
            continue;
        }
        ordered.push(tree_node(project, projects));
        if let Some(kids) = children.get(project.id.as_str()) {
            stack.extend(kids.iter().rev());
        }
    }

    let mut stranded: Vec<&Project> = projects
        .iter()
        .filter(|p| !seen.contains(p.id.as_str()))
        .collect();
    if !stranded.is_empty() {
        tracing::warn!(count = stranded.len(), "projects unreachable from any root");
        stranded.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
        ordered.extend(stranded.into_iter().map(|p| tree_node(p, projects)));
    }
    ordered
}

/// Ids of every project below `project`, at any depth.
pub fn descendant_ids(project: &str, projects: &[Project]) -> Vec<ProjectId> {
    let mut found = Vec::new();
    let mut seen = HashSet::from([project.to_string()]);
    let mut queue = vec![project.to_string()];
    while let Some(current) = queue.pop() {
        for child in projects
            .iter()
            .filter(|p| p.parent.as_deref() == Some(current.as_str()))
        {
            if seen.insert(child.id.clone()) {
                found.push(child.id.clone());
                queue.push(child.id.clone());
            }
        }
    }
    found
}
