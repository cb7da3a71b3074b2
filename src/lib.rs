use octocrab::models::{JobId, RunId};

pub mod client;
pub mod csv;
pub mod report;
pub mod time;

/// One execution of a CI workflow. Timestamps are kept as the raw strings
/// returned by the API; parsing happens at aggregation time so that a
/// malformed value degrades to a zero duration instead of a failure.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct WorkflowRun {
    pub id: RunId,
    pub name: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub status: Option<String>,
}

/// One unit of work within a run.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Job {
    pub id: JobId,
    pub run_id: RunId,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Repository {
    pub name: String,
    pub description: Option<String>,
    pub updated_at: Option<String>,
    pub owner: Option<RepositoryOwner>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Member {
    pub login: String,
}

/// Repository collaborator; only ever fetched with the admin permission filter.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Collaborator {
    pub login: String,
    pub html_url: String,
}

/// Repository contributor. Anonymous contributors have no login and are
/// identified only by a free-text name.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Contributor {
    pub login: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct OrgInfo {
    pub name: Option<String>,
    pub created_at: Option<String>,
    pub public_repos: Option<u64>,
    pub total_private_repos: Option<u64>,
}
