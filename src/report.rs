use std::collections::HashSet;

use futures_util::future;
use octocrab::models::RunId;

use crate::client::{GitHubApi, PER_PAGE};
use crate::csv::{sanitize, Row};
use crate::{time, Collaborator, Contributor, Repository, WorkflowRun};

const USAGE_HEADER: &str = "repo-name, workflow-runs";
const ROSTER_HEADER: &str =
    "repo-name, description, last-updated, owner, admin, admin-url, contributors";
const ROSTER_COLUMNS: usize = 7;

/// Accumulated measurements for one repository invocation.
#[derive(Debug, Default)]
pub struct RepoSummary {
    pub run_count: u64,
    pub job_time_ms: i64,
    pub run_time_ms: i64,
}

impl RepoSummary {
    pub fn record_run(&mut self, run: &WorkflowRun, job_time_ms: i64) {
        self.run_count += 1;
        self.job_time_ms += job_time_ms;
        self.run_time_ms +=
            time::duration_ms(run.created_at.as_deref(), run.updated_at.as_deref());
    }
}

/// Summed duration of every job belonging to one run, in milliseconds.
/// An empty job set is not an error and yields zero.
pub async fn collect_job_time(
    api: &GitHubApi,
    org: &str,
    repo: &str,
    run_id: RunId,
) -> anyhow::Result<i64> {
    let jobs = api.run_jobs(org, repo, run_id).await?;
    Ok(time::sum_ms(
        jobs.iter()
            .map(|job| (job.started_at.as_deref(), job.completed_at.as_deref())),
    ))
}

/// Workflow details for one repository: optional per-run lines while the runs
/// are walked, then the four-line summary block.
pub async fn repo_details(
    api: &GitHubApi,
    org: &str,
    repo: &str,
    start: Option<&str>,
    end: Option<&str>,
    verbose: bool,
) -> anyhow::Result<()> {
    let created = created_filter(start, end);
    let total_successful = api.run_count(org, repo, Some("success"), None).await?;

    let mut summary = RepoSummary::default();
    let mut page = 1u32;
    loop {
        let batch = api
            .successful_runs_page(org, repo, created.as_deref(), page)
            .await?
            .workflow_runs;
        if batch.is_empty() {
            break;
        }
        // Job fetches for one page are issued together; results come back in
        // run order, so printing and accumulation stay ordered.
        let job_times = future::join_all(
            batch
                .iter()
                .map(|run| collect_job_time(api, org, repo, run.id)),
        )
        .await
        .into_iter()
        .collect::<anyhow::Result<Vec<_>>>()?;

        for (run, job_time_ms) in batch.iter().zip(job_times) {
            if verbose {
                println!("{}", run_detail_line(run, job_time_ms));
            }
            summary.record_run(run, job_time_ms);
        }

        if batch.len() < usize::from(PER_PAGE) {
            break;
        }
        page += 1;
    }

    println!("---");
    for line in summary_lines(repo, start, end, &summary, total_successful) {
        println!("{line}");
    }
    Ok(())
}

/// Sequential `repo_details` over a list of repository names.
pub async fn repo_details_batch(
    api: &GitHubApi,
    org: &str,
    repos: &[String],
    start: Option<&str>,
    end: Option<&str>,
) -> anyhow::Result<()> {
    for repo in repos {
        repo_details(api, org, repo, start, end, false).await?;
    }
    Ok(())
}

/// Org-wide usage CSV: one row per repository with a nonzero run count in the
/// optional date range. Run counts only, to keep the cost at one call per
/// repository.
pub async fn org_usage(
    api: &GitHubApi,
    org: &str,
    start: Option<&str>,
    end: Option<&str>,
) -> anyhow::Result<()> {
    let created = created_filter(start, end);
    println!("{USAGE_HEADER}");
    for repo in api.org_repositories(org).await? {
        let runs = api.run_count(org, &repo.name, None, created.as_deref()).await?;
        if runs > 0 {
            println!(
                "{}",
                Row::new(2)
                    .field(0, repo.name.as_str())
                    .field(1, runs.to_string())
                    .render()
            );
        }
    }
    Ok(())
}

/// Repo/admin/contributor roster CSV for an organization.
pub async fn roster(api: &GitHubApi, org: &str) -> anyhow::Result<()> {
    let org_admins = api.org_admin_logins(org).await?;
    log::debug!("{org}: {} organization admins", org_admins.len());

    println!("{ROSTER_HEADER}");
    for repo in api.org_repositories(org).await? {
        println!("{}", repo_row(&repo));

        let admins = api.repo_admins(org, &repo.name).await?;
        for line in admin_rows(&admins, &org_admins) {
            println!("{line}");
        }

        let contributors = api.repo_contributors(org, &repo.name).await?;
        for line in contributor_rows(&contributors) {
            println!("{line}");
        }
    }
    Ok(())
}

/// Organization metadata, printed as plain text.
pub async fn org_info(api: &GitHubApi, org: &str) -> anyhow::Result<()> {
    let info = api.org_info(org).await?;
    println!("{}", info.name.as_deref().unwrap_or(org));
    println!("Created at: {}", info.created_at.as_deref().unwrap_or(""));
    println!("Public Repo Count: {}", info.public_repos.unwrap_or(0));
    println!("Private Repo Count: {}", info.total_private_repos.unwrap_or(0));
    Ok(())
}

/// `start..end` creation filter; only a complete range filters at all.
fn created_filter(start: Option<&str>, end: Option<&str>) -> Option<String> {
    match (start, end) {
        (Some(start), Some(end)) => Some(format!("{start}..{end}")),
        _ => None,
    }
}

fn run_detail_line(run: &WorkflowRun, job_time_ms: i64) -> String {
    format!(
        "{}, {}, {}",
        run.name.as_deref().unwrap_or(""),
        time::to_minutes(job_time_ms),
        run.created_at.as_deref().unwrap_or(""),
    )
}

fn summary_lines(
    repo: &str,
    start: Option<&str>,
    end: Option<&str>,
    summary: &RepoSummary,
    total_successful: u64,
) -> [String; 4] {
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => ("creation", "today"),
    };
    [
        format!(
            "{repo} - Successful run count from {start} - {end}: {}",
            summary.run_count
        ),
        format!(
            "{repo} - Job time (min) from {start} - {end}: {}",
            time::to_minutes(summary.job_time_ms)
        ),
        format!("{repo} - Successful workflow run count: {total_successful}"),
        format!(
            "{repo} - Workflow run time (min): {}",
            time::to_minutes(summary.run_time_ms)
        ),
    ]
}

fn repo_row(repo: &Repository) -> String {
    Row::new(ROSTER_COLUMNS)
        .field(0, repo.name.as_str())
        .text_field(1, repo.description.as_deref().unwrap_or("<blank>"))
        .field(2, repo.updated_at.as_deref().unwrap_or(""))
        .field(
            3,
            repo.owner.as_ref().map(|owner| owner.login.as_str()).unwrap_or(""),
        )
        .render()
}

/// Rows for repository admins that are not already organization admins.
fn admin_rows(admins: &[Collaborator], org_admins: &HashSet<String>) -> Vec<String> {
    admins
        .iter()
        .filter(|admin| !org_admins.contains(&admin.login))
        .map(|admin| {
            Row::new(ROSTER_COLUMNS)
                .field(4, admin.login.as_str())
                .field(5, admin.html_url.as_str())
                .render()
        })
        .collect()
}

/// Contributor rows. Logged-in contributors print their login as-is;
/// anonymous ones get a sanitized `<name> (anon)` label, deduplicated within
/// the current repository only.
fn contributor_rows(contributors: &[Contributor]) -> Vec<String> {
    let mut anon_seen = HashSet::new();
    let mut rows = Vec::new();
    for contributor in contributors {
        let label = match (&contributor.login, &contributor.name) {
            (Some(login), _) => login.clone(),
            (None, Some(name)) => {
                let label = sanitize(&format!("{name} (anon)"));
                if !anon_seen.insert(label.clone()) {
                    continue;
                }
                label
            }
            (None, None) => continue,
        };
        rows.push(Row::new(ROSTER_COLUMNS).field(6, label).render());
    }
    rows
}
