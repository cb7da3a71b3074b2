use std::collections::HashSet;

use octocrab::models::RunId;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{Collaborator, Contributor, Job, Member, OrgInfo, Repository, WorkflowRun};

/// Page size for every paginated endpoint.
pub const PER_PAGE: u8 = 100;

pub struct GitHubApi {
    client: Octocrab,
}

/// Envelope returned by the workflow run list endpoint. `total_count` covers
/// the whole filtered set, not just the returned page.
#[derive(Debug, serde::Deserialize)]
pub struct RunPage {
    pub total_count: u64,
    pub workflow_runs: Vec<WorkflowRun>,
}

#[derive(Debug, serde::Deserialize)]
struct JobPage {
    jobs: Vec<Job>,
}

impl GitHubApi {
    pub fn new(token: String) -> anyhow::Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token)
            .build()
            .map_err(|error| anyhow::anyhow!("Cannot build GitHub client: {error:?}"))?;
        Ok(Self { client })
    }

    pub async fn org_info(&self, org: &str) -> anyhow::Result<OrgInfo> {
        self.get(&format!("/orgs/{org}"), None::<&()>).await
    }

    /// All repositories of an organization, sorted by full name.
    pub async fn org_repositories(&self, org: &str) -> anyhow::Result<Vec<Repository>> {
        self.collect_pages(&format!("/orgs/{org}/repos"), |page| RepoListParams {
            sort: "full_name",
            per_page: PER_PAGE,
            page,
        })
        .await
    }

    /// Logins of every organization member with the admin role.
    pub async fn org_admin_logins(&self, org: &str) -> anyhow::Result<HashSet<String>> {
        let admins: Vec<Member> = self
            .collect_pages(&format!("/orgs/{org}/members"), |page| MemberListParams {
                role: "admin",
                per_page: PER_PAGE,
                page,
            })
            .await?;
        Ok(admins.into_iter().map(|member| member.login).collect())
    }

    /// One page of successful workflow runs, optionally restricted to a
    /// `start..end` creation range.
    pub async fn successful_runs_page(
        &self,
        org: &str,
        repo: &str,
        created: Option<&str>,
        page: u32,
    ) -> anyhow::Result<RunPage> {
        self.get(
            &format!("/repos/{org}/{repo}/actions/runs"),
            Some(&RunListParams {
                status: "success",
                created,
                per_page: PER_PAGE,
                page,
            }),
        )
        .await
    }

    /// Total number of workflow runs matching the given filters, via a single
    /// minimal-page request.
    pub async fn run_count(
        &self,
        org: &str,
        repo: &str,
        status: Option<&str>,
        created: Option<&str>,
    ) -> anyhow::Result<u64> {
        let page: RunPage = self
            .get(
                &format!("/repos/{org}/{repo}/actions/runs"),
                Some(&RunCountParams {
                    status,
                    created,
                    per_page: 1,
                }),
            )
            .await?;
        Ok(page.total_count)
    }

    /// All jobs belonging to one workflow run.
    pub async fn run_jobs(&self, org: &str, repo: &str, run_id: RunId) -> anyhow::Result<Vec<Job>> {
        let route = format!("/repos/{org}/{repo}/actions/runs/{run_id}/jobs");
        let mut jobs = Vec::new();
        let mut page = 1u32;
        loop {
            let batch: JobPage = self
                .get(&route, Some(&PageParams { per_page: PER_PAGE, page }))
                .await?;
            let last_page = batch.jobs.len() < usize::from(PER_PAGE);
            jobs.extend(batch.jobs);
            if last_page {
                break;
            }
            page += 1;
        }
        Ok(jobs)
    }

    /// Repository collaborators holding admin permission.
    pub async fn repo_admins(&self, org: &str, repo: &str) -> anyhow::Result<Vec<Collaborator>> {
        self.collect_pages(&format!("/repos/{org}/{repo}/collaborators"), |page| {
            CollaboratorListParams {
                permission: "admin",
                per_page: PER_PAGE,
                page,
            }
        })
        .await
    }

    /// Repository contributors, anonymous ones included.
    pub async fn repo_contributors(
        &self,
        org: &str,
        repo: &str,
    ) -> anyhow::Result<Vec<Contributor>> {
        self.collect_pages(&format!("/repos/{org}/{repo}/contributors"), |page| {
            ContributorListParams {
                anon: 1,
                per_page: PER_PAGE,
                page,
            }
        })
        .await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        route: &str,
        parameters: Option<&impl Serialize>,
    ) -> anyhow::Result<T> {
        self.client
            .get(route, parameters)
            .await
            .map_err(|error| anyhow::anyhow!("Cannot download {route}: {error:?}"))
    }

    /// Drains a paginated array endpoint with an explicit page cursor. A page
    /// shorter than `PER_PAGE` is the last one.
    async fn collect_pages<T, P>(
        &self,
        route: &str,
        params_for: impl Fn(u32) -> P,
    ) -> anyhow::Result<Vec<T>>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        let mut items: Vec<T> = Vec::new();
        let mut page = 1u32;
        loop {
            let batch: Vec<T> = self.get(route, Some(&params_for(page))).await?;
            log::debug!("{route}: page {page} returned {} items", batch.len());
            let last_page = batch.len() < usize::from(PER_PAGE);
            items.extend(batch);
            if last_page {
                break;
            }
            page += 1;
        }
        Ok(items)
    }
}

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

#[derive(Serialize)]
struct RepoListParams<'a> {
    sort: &'a str,
    per_page: u8,
    page: u32,
}

#[derive(Serialize)]
struct MemberListParams<'a> {
    role: &'a str,
    per_page: u8,
    page: u32,
}

#[derive(Serialize)]
struct RunListParams<'a> {
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    created: Option<&'a str>,
    per_page: u8,
    page: u32,
}

#[derive(Serialize)]
struct RunCountParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created: Option<&'a str>,
    per_page: u8,
}

#[derive(Serialize)]
struct CollaboratorListParams<'a> {
    permission: &'a str,
    per_page: u8,
    page: u32,
}

#[derive(Serialize)]
struct ContributorListParams {
    anon: u8,
    per_page: u8,
    page: u32,
}
