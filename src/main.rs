use anyhow::Context;

use gha_usage::client::GitHubApi;
use gha_usage::report;

const ORG: &str = "bcgov";
const PRIVATE_ORG: &str = "bcgov-c";

#[derive(Debug, PartialEq)]
enum Command {
    OrgInfo {
        org: &'static str,
    },
    OrgUsage {
        start: Option<String>,
        end: Option<String>,
    },
    RepoDetails {
        repo: String,
        start: Option<String>,
        end: Option<String>,
        verbose: bool,
    },
    Batch {
        path: String,
        start: Option<String>,
        end: Option<String>,
    },
    Roster,
}

/// Maps raw arguments onto a command. Presence checks only; anything that
/// does not match a recognized form falls through to the usage text.
fn parse_command(args: &[String]) -> Option<Command> {
    let flag = args.first()?;
    match flag.as_str() {
        "-o" => Some(Command::OrgInfo { org: ORG }),
        "-c" => Some(Command::OrgInfo { org: PRIVATE_ORG }),
        "-a" => Some(Command::OrgUsage {
            start: args.get(1).cloned(),
            end: args.get(2).cloned(),
        }),
        "-d" | "-dd" => Some(Command::RepoDetails {
            repo: args.get(1)?.clone(),
            start: args.get(2).cloned(),
            end: args.get(3).cloned(),
            verbose: flag == "-dd",
        }),
        "-f" => Some(Command::Batch {
            path: args.get(1)?.clone(),
            start: args.get(2).cloned(),
            end: args.get(3).cloned(),
        }),
        "-u" => Some(Command::Roster),
        _ => None,
    }
}

fn print_usage() {
    println!("usage:");
    println!("\t -o -- Display Organization info for {ORG}");
    println!("\t -a -- Display all repo workflow usage as csv");
    println!("\t -a 2023-05-15 2023-08-14 -- Display all repo workflow usage between specified dates as csv");
    println!("\t -d <repo name> -- Display workflow details for specified repo");
    println!("\t -d <repo name> 2023-05-15 2023-08-14 -- Display workflow details for specified repo between specified dates");
    println!("\t -dd -- Same as '-d' but will also display workflow run details");
    println!("\t -f <file name> -- Same as '-d' but will process a series of repos from a json file");
    println!("\t -c -- Display Organization info for {PRIVATE_ORG}");
    println!("\t -u -- Display repo & user info for {PRIVATE_ORG} as csv\n");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = parse_command(&args) else {
        print_usage();
        return Ok(());
    };

    let token = std::env::var("GITHUB_TOKEN").context("GITHUB_TOKEN must be set")?;
    let api = GitHubApi::new(token)?;

    match command {
        Command::OrgInfo { org } => report::org_info(&api, org).await,
        Command::OrgUsage { start, end } => {
            report::org_usage(&api, ORG, start.as_deref(), end.as_deref()).await
        }
        Command::RepoDetails {
            repo,
            start,
            end,
            verbose,
        } => {
            report::repo_details(&api, ORG, &repo, start.as_deref(), end.as_deref(), verbose).await
        }
        Command::Batch { path, start, end } => {
            let data = std::fs::read_to_string(&path)
                .with_context(|| format!("Cannot read repository list from {path}"))?;
            let repos: Vec<String> = serde_json::from_str(&data)
                .with_context(|| format!("{path} must contain a JSON array of repository names"))?;
            report::repo_details_batch(&api, ORG, &repos, start.as_deref(), end.as_deref()).await
        }
        Command::Roster => report::roster(&api, PRIVATE_ORG).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn no_arguments_is_not_a_command() {
        assert_eq!(parse_command(&[]), None);
    }

    #[test]
    fn unknown_flag_falls_through() {
        assert_eq!(parse_command(&args(&["-x"])), None);
        assert_eq!(parse_command(&args(&["details"])), None);
    }

    #[test]
    fn org_info_flags_pick_their_org() {
        assert_eq!(parse_command(&args(&["-o"])), Some(Command::OrgInfo { org: ORG }));
        assert_eq!(
            parse_command(&args(&["-c"])),
            Some(Command::OrgInfo { org: PRIVATE_ORG })
        );
    }

    #[test]
    fn usage_takes_an_optional_date_range() {
        assert_eq!(
            parse_command(&args(&["-a"])),
            Some(Command::OrgUsage { start: None, end: None })
        );
        assert_eq!(
            parse_command(&args(&["-a", "2023-05-15", "2023-08-14"])),
            Some(Command::OrgUsage {
                start: Some("2023-05-15".to_string()),
                end: Some("2023-08-14".to_string()),
            })
        );
    }

    #[test]
    fn details_require_a_repo_name() {
        assert_eq!(parse_command(&args(&["-d"])), None);
        assert_eq!(
            parse_command(&args(&["-d", "demo"])),
            Some(Command::RepoDetails {
                repo: "demo".to_string(),
                start: None,
                end: None,
                verbose: false,
            })
        );
        assert_eq!(
            parse_command(&args(&["-dd", "demo", "2023-05-15", "2023-08-14"])),
            Some(Command::RepoDetails {
                repo: "demo".to_string(),
                start: Some("2023-05-15".to_string()),
                end: Some("2023-08-14".to_string()),
                verbose: true,
            })
        );
    }

    #[test]
    fn batch_requires_a_file_name() {
        assert_eq!(parse_command(&args(&["-f"])), None);
        assert_eq!(
            parse_command(&args(&["-f", "repos.json"])),
            Some(Command::Batch {
                path: "repos.json".to_string(),
                start: None,
                end: None,
            })
        );
    }

    #[test]
    fn roster_flag_parses() {
        assert_eq!(parse_command(&args(&["-u"])), Some(Command::Roster));
    }
}
