//! Tests for the GitHub queries and repository sorting

use super::*;
use crate::client::RetryConfig;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, token: Option<&str>) -> RegistryClient {
    let retry = RetryConfig {
        max_retries: 0,
        ..RetryConfig::default()
    };
    RegistryClient::with_config(retry, Duration::from_secs(5))
        .unwrap()
        .with_github_url(server.uri())
        .with_github_token(token.map(str::to_string))
}

fn repo_json(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "full_name": format!("durandtibo/{}", name),
        "html_url": format!("https://github.com/durandtibo/{}", name),
        "description": null,
        "stargazers_count": 12,
        "forks_count": 3,
        "language": "Python",
        "private": false,
        "default_branch": "main"
    })
}

#[tokio::test]
async fn test_fetch_github_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/durandtibo/feu"))
        .and(header("Accept", "application/vnd.github+json"))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_json("feu")))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("secret"));
    let repo = client.fetch_github_metadata("durandtibo", "feu").await.unwrap();
    assert_eq!(repo.full_name, "durandtibo/feu");
    assert_eq!(repo.stargazers_count, 12);
    assert_eq!(repo.description, None);
    assert_eq!(repo.extra.get("default_branch"), Some(&json!("main")));
}

#[tokio::test]
async fn test_fetch_github_metadata_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/durandtibo/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let err = client.fetch_github_metadata("durandtibo", "missing").await.unwrap_err();
    assert!(err.to_string().contains("Network or HTTP error"), "{err}");
}

#[tokio::test]
async fn test_fetch_github_repos_follows_pagination() {
    let server = MockServer::start().await;
    let next = format!("<{}/user/42/repos?page=2>; rel=\"next\", <{}/user/42/repos?page=2>; rel=\"last\"", server.uri(), server.uri());

    Mock::given(method("GET"))
        .and(path("/users/durandtibo/repos"))
        .and(query_param("per_page", "100"))
        .and(query_param("type", "all"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", next.as_str())
                .set_body_json(json!([repo_json("feu"), repo_json("arctix")])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/42/repos"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([repo_json("coola")])))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let repos = client.fetch_github_repos("durandtibo").await.unwrap();
    let names: Vec<&str> = repos.iter().map(|repo| repo.name.as_str()).collect();
    assert_eq!(names, vec!["feu", "arctix", "coola"]);
}

#[test]
fn test_next_page_link() {
    let header = "<https://api.github.com/user/1/repos?page=2>; rel=\"next\", \
                  <https://api.github.com/user/1/repos?page=5>; rel=\"last\"";
    assert_eq!(
        next_page_link(header),
        Some("https://api.github.com/user/1/repos?page=2".to_string())
    );
    assert_eq!(next_page_link("<https://api.github.com/x?page=1>; rel=\"prev\""), None);
    assert_eq!(next_page_link(""), None);
}

#[test]
fn test_sort_repos() {
    let repos = vec![
        GithubRepo::new("zoo", "owner/zoo"),
        GithubRepo::new("alpha", "other/alpha"),
        GithubRepo::new("mid", "another/mid"),
    ];

    let names = |repos: Vec<GithubRepo>| repos.into_iter().map(|repo| repo.name).collect::<Vec<_>>();
    assert_eq!(names(sort_repos_by_name(&repos, false)), vec!["alpha", "mid", "zoo"]);
    assert_eq!(names(sort_repos_by_name(&repos, true)), vec!["zoo", "mid", "alpha"]);
    assert_eq!(names(sort_repos_by_full_name(&repos, false)), vec!["mid", "alpha", "zoo"]);
    assert_eq!(names(sort_repos_by_full_name(&repos, true)), vec!["zoo", "alpha", "mid"]);
}
