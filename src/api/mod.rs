pub(crate) mod codeforces;
pub(crate) mod github;
pub(crate) mod leetcode;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{Result, StatsError};

/// `base` with each of `segments` appended as one percent-encoded path segment.
///
/// A `/` inside a segment is encoded, so a username can never change the request path.
/// An empty last segment leaves a trailing slash.
pub(crate) fn endpoint_url(base: &str, segments: &[&str]) -> Result<String> {
    let invalid = |reason: String| StatsError::InvalidUrl {
        url: base.to_owned(),
        reason,
    };
    let mut url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| invalid("cannot be a base".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.into())
}

/// Send a request, require a success status and return the body text.
pub(crate) async fn send(request: reqwest::RequestBuilder, url: &str) -> Result<String> {
    let response = request.send().await.map_err(|e| StatsError::Http {
        url: url.to_owned(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(StatsError::UnexpectedStatus {
            url: url.to_owned(),
            status,
        });
    }

    response.text().await.map_err(|e| StatsError::ResponseBody {
        url: url.to_owned(),
        source: e,
    })
}

/// Send a request and decode the JSON body into `T`.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    url: &str,
) -> Result<T> {
    debug!(url, "fetching json");
    let body = send(request, url).await?;
    decode_json(&body, url)
}

pub(crate) fn decode_json<T: DeserializeOwned>(body: &str, url: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| StatsError::Json {
        url: url.to_owned(),
        source: e,
    })
}

#[derive(Serialize)]
struct GraphQlRequest<'a, V> {
    query: &'a str,
    variables: V,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

/// POST a GraphQL query and return its `data`.
///
/// Responses carrying `errors` alongside partial `data` are accepted; it is up to the caller
/// to notice missing fields. A response without `data` is an error.
pub(crate) async fn post_graphql<V: Serialize, T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    url: &str,
    query: &str,
    variables: V,
) -> Result<T> {
    debug!(url, "posting graphql query");
    let request = request.json(&GraphQlRequest { query, variables });
    let body = send(request, url).await?;
    let response: GraphQlResponse<T> = decode_json(&body, url)?;

    match response.data {
        Some(data) => Ok(data),
        None => Err(StatsError::GraphQl {
            url: url.to_owned(),
            message: response
                .errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; "),
        }),
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_endpoint_url_encodes_username_segment() {
        assert_eq!(
            endpoint_url("https://atcoder.jp", &["users", "chokudai"]).unwrap(),
            "https://atcoder.jp/users/chokudai"
        );
        assert_eq!(
            endpoint_url("http://127.0.0.1:1234/", &["users", "a/../x"]).unwrap(),
            "http://127.0.0.1:1234/users/a%2F..%2Fx"
        );
        assert_eq!(
            endpoint_url("https://www.spoj.com", &["users", "bob", ""]).unwrap(),
            "https://www.spoj.com/users/bob/"
        );
    }

    #[test]
    fn test_endpoint_url_rejects_bad_base() {
        let result = endpoint_url("not a url", &["users", "x"]);
        assert!(matches!(result, Err(StatsError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_send_refused_connection_is_http_error() {
        let url = "http://127.0.0.1:1/users/x";
        let result = send(reqwest::Client::new().get(url), url).await;
        assert!(matches!(result, Err(StatsError::Http { .. })));
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Viewer {
        login: String,
    }

    #[tokio::test]
    async fn test_fetch_json_rejects_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/thing")
            .with_status(503)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/thing", server.url());
        let result = fetch_json::<Viewer>(client.get(&url), &url).await;
        assert!(matches!(
            result,
            Err(StatsError::UnexpectedStatus { status, .. }) if status.as_u16() == 503
        ));
    }

    #[tokio::test]
    async fn test_fetch_json_rejects_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/thing")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/thing", server.url());
        let result = fetch_json::<Viewer>(client.get(&url), &url).await;
        assert!(matches!(result, Err(StatsError::Json { .. })));
    }

    #[tokio::test]
    async fn test_post_graphql() {
        let mut server = mockito::Server::new_async().await;
        let _ok = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({"variables": {"login": "alice"}})))
            .with_status(200)
            .with_body(r#"{"data": {"login": "alice"}}"#)
            .create_async()
            .await;
        let _err = server
            .mock("POST", "/graphql")
            .match_body(Matcher::PartialJson(json!({"variables": {"login": "ghost"}})))
            .with_status(200)
            .with_body(r#"{"data": null, "errors": [{"message": "no such user"}]}"#)
            .create_async()
            .await;

        let client = reqwest::Client::new();
        let url = format!("{}/graphql", server.url());

        let viewer: Viewer = post_graphql(client.post(&url), &url, "query", json!({"login": "alice"}))
            .await
            .unwrap();
        assert_eq!(viewer.login, "alice");

        let missing =
            post_graphql::<_, Viewer>(client.post(&url), &url, "query", json!({"login": "ghost"}))
                .await;
        match missing {
            Err(StatsError::GraphQl { message, .. }) => assert_eq!(message, "no such user"),
            other => panic!("expected graphql error, got {other:?}"),
        }
    }
}
