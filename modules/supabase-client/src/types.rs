use serde::Deserialize;

/// Rows returned by a table query, plus the exact total when the query asked
/// for one (parsed from the `Content-Range` header).
#[derive(Debug, Clone)]
pub struct Rows<T> {
    pub rows: Vec<T>,
    pub total: Option<u64>,
}

/// Sort direction for `order` clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Authenticated session returned by the identity endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: AuthUser,
}

/// The identity provider's view of a user.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl AuthUser {
    pub fn display_name(&self) -> Option<&str> {
        self.user_metadata
            .get("full_name")
            .and_then(|v| v.as_str())
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.user_metadata
            .get("avatar_url")
            .and_then(|v| v.as_str())
    }
}

/// Error body shape PostgREST returns on failed requests.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}
