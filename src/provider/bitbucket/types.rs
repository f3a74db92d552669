//! Typed payloads for the Bitbucket Server REST protocol.
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct NamedLink {
    pub name: Option<String>,
    pub href: String,
}

#[derive(Debug, Deserialize)]
pub struct SelfLink {
    pub href: String,
}

#[derive(Debug, Deserialize)]
pub struct RepoLinks {
    #[serde(default)]
    pub clone: Vec<NamedLink>,
    #[serde(rename = "self", default)]
    pub self_links: Vec<SelfLink>,
}

#[derive(Debug, Deserialize)]
pub struct BitbucketProject {
    pub key: String,
}

#[derive(Debug, Deserialize)]
pub struct BitbucketRepo {
    pub id: u64,
    pub slug: String,
    pub project: BitbucketProject,
    pub links: RepoLinks,
}

#[derive(Debug, Deserialize)]
pub struct ReviewerUser {
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct UserName {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct Reviewer {
    pub user: UserName,
}

#[derive(Debug, Serialize)]
pub struct ProjectKey {
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct RefRepository {
    pub slug: String,
    pub project: ProjectKey,
}

#[derive(Debug, Serialize)]
pub struct PullRequestRef {
    pub id: String,
    pub repository: RefRepository,
}

#[derive(Debug, Serialize)]
pub struct CreatePullRequest {
    pub title: String,
    pub description: String,
    pub state: String,
    #[serde(rename = "fromRef")]
    pub from_ref: PullRequestRef,
    #[serde(rename = "toRef")]
    pub to_ref: PullRequestRef,
    pub reviewers: Vec<Reviewer>,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestLinks {
    #[serde(rename = "self", default)]
    pub self_links: Vec<SelfLink>,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestResponse {
    pub links: PullRequestLinks,
}
