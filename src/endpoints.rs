//! Endpoint dispatch table for the Cursor REST APIs.
//!
//! Every endpoint is declared exactly once in the [`endpoints!`]
//! invocation at the bottom of this file, which generates both the static
//! [`ENDPOINT_SPECS`] table and one typed accessor method per row on
//! [`CursorClient`]. Path parameters become leading `&str` arguments in
//! path order; endpoints that send a body take a trailing
//! `&serde_json::Value`.

use reqwest::Method;
use serde_json::Value;

use crate::client::CursorClient;
use crate::errors::CursorError;

/// One row of the endpoint table.
#[derive(Debug, Clone)]
pub struct EndpointSpec {
    pub method: Method,
    /// Path template. Parameter segments use either the `{id}` or the
    /// `:repoId` convention, as the upstream API documents them.
    pub path: &'static str,
    /// Accessor method name, derived from method and path.
    pub name: &'static str,
    /// Path parameter names, in path order.
    pub params: &'static [&'static str],
}

impl EndpointSpec {
    /// Renders the path template with positional arguments.
    pub fn render_path(&self, args: &[&str]) -> Result<String, CursorError> {
        render_path(self.path, args)
    }
}

/// Looks up an endpoint by its accessor name.
pub fn find(name: &str) -> Option<&'static EndpointSpec> {
    ENDPOINT_SPECS.iter().find(|spec| spec.name == name)
}

fn is_placeholder(segment: &str) -> bool {
    (segment.starts_with(':') && segment.len() > 1)
        || (segment.starts_with('{') && segment.ends_with('}') && segment.len() > 2)
}

/// Substitutes positional `args` into the placeholder segments of a path
/// template. Values are percent-encoded so they always stay one segment.
fn render_path(template: &str, args: &[&str]) -> Result<String, CursorError> {
    let mut args = args.iter();
    let mut segments = Vec::new();

    for segment in template.split('/') {
        if is_placeholder(segment) {
            let value = args.next().ok_or_else(|| {
                CursorError::InvalidRequest(format!("not enough path arguments for {}", template))
            })?;
            segments.push(urlencoding::encode(value).into_owned());
        } else {
            segments.push(segment.to_string());
        }
    }

    if args.next().is_some() {
        return Err(CursorError::InvalidRequest(format!(
            "too many path arguments for {}",
            template
        )));
    }

    Ok(segments.join("/"))
}

impl CursorClient {
    /// Invokes an endpoint through its table entry. `args` fill the path
    /// placeholders in order; `body` is sent as JSON when present.
    pub async fn call(
        &self,
        spec: &EndpointSpec,
        args: &[&str],
        body: Option<&Value>,
    ) -> Result<Value, CursorError> {
        let path = render_path(spec.path, args)?;
        self.request(spec.method.clone(), &path, body).await
    }
}

macro_rules! endpoint_method {
    ($(#[$doc:meta])* $name:ident : $method:ident $path:literal, [ $($arg:ident),* ], no_body) => {
        $(#[$doc])*
        pub async fn $name(&self $(, $arg: &str)*) -> Result<Value, CursorError> {
            let path = render_path($path, &[$($arg),*])?;
            self.request(Method::$method, &path, None).await
        }
    };
    ($(#[$doc:meta])* $name:ident : $method:ident $path:literal, [ $($arg:ident),* ], body) => {
        $(#[$doc])*
        pub async fn $name(&self $(, $arg: &str)*, body: &Value) -> Result<Value, CursorError> {
            let path = render_path($path, &[$($arg),*])?;
            self.request(Method::$method, &path, Some(body)).await
        }
    };
}

macro_rules! endpoints {
    ($(
        $(#[$doc:meta])*
        $name:ident : $method:ident $path:literal, [ $($arg:ident),* ], $kind:ident;
    )+) => {
        /// Every endpoint the client knows, one row per accessor method.
        pub static ENDPOINT_SPECS: &[EndpointSpec] = &[
            $(EndpointSpec {
                method: Method::$method,
                path: $path,
                name: stringify!($name),
                params: &[$(stringify!($arg)),*],
            }),+
        ];

        impl CursorClient {
            $(endpoint_method! { $(#[$doc])* $name : $method $path, [ $($arg),* ], $kind })+
        }
    };
}

endpoints! {
    /// Identifies the API key in use.
    get_v0_me: GET "/v0/me", [], no_body;
    /// Models recommended for background agents.
    get_v0_models: GET "/v0/models", [], no_body;
    /// GitHub repositories accessible to the authenticated user.
    get_v0_repositories: GET "/v0/repositories", [], no_body;
    /// Lists background agents.
    get_v0_agents: GET "/v0/agents", [], no_body;
    /// Launches a background agent.
    post_v0_agents: POST "/v0/agents", [], body;
    /// Status of one background agent.
    get_v0_agents_id: GET "/v0/agents/{id}", [id], no_body;
    /// Deletes a background agent.
    delete_v0_agents_id: DELETE "/v0/agents/{id}", [id], no_body;
    /// Adds a followup instruction to a running agent.
    post_v0_agents_id_followup: POST "/v0/agents/{id}/followup", [id], body;
    /// Conversation history of an agent.
    get_v0_agents_id_conversation: GET "/v0/agents/{id}/conversation", [id], no_body;
    /// Members of the team.
    get_teams_members: GET "/teams/members", [], no_body;
    /// Daily usage metrics for a date range.
    post_teams_daily_usage_data: POST "/teams/daily-usage-data", [], body;
    /// Spend data for the current billing cycle.
    post_teams_spend: POST "/teams/spend", [], body;
    /// Usage events matching the given filters.
    post_teams_filtered_usage_events: POST "/teams/filtered-usage-events", [], body;
    /// Groups defined for the team.
    get_teams_groups: GET "/teams/groups", [], no_body;
    /// Creates a group.
    post_teams_groups: POST "/teams/groups", [], body;
    /// Renames a group.
    patch_teams_groups_group_id: PATCH "/teams/groups/:groupId", [group_id], body;
    /// Deletes a group.
    delete_teams_groups_group_id: DELETE "/teams/groups/:groupId", [group_id], no_body;
    /// Adds a member to a group.
    post_teams_groups_group_id_members: POST "/teams/groups/:groupId/members", [group_id], body;
    /// Removes a member from a group.
    delete_teams_groups_group_id_members: DELETE "/teams/groups/:groupId/members", [group_id], no_body;
    /// Bugbot settings for a repository.
    get_bugbot_repo_repo_id: GET "/bugbot/repo/:repoId", [repo_id], no_body;
    /// Updates Bugbot settings for a repository.
    post_bugbot_repo_update: POST "/bugbot/repo/update", [], body;
    /// Repositories on the repo blocklist.
    get_settings_repo_blocklists_repos: GET "/settings/repo-blocklists/repos", [], no_body;
    /// Adds or updates repo blocklist entries.
    post_settings_repo_blocklists_repos_upsert: POST "/settings/repo-blocklists/repos/upsert", [], body;
    /// Removes a repository from the blocklist.
    delete_settings_repo_blocklists_repos_repo_id: DELETE "/settings/repo-blocklists/repos/:repoId", [repo_id], no_body;
}
