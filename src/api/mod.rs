mod auth;
mod files;

pub use auth::{validate_login, validate_registration, AuthClient};
pub use files::{FilesClient, RemoteFile};

use crate::error::{ClientError, Result};
use crate::session::Session;

fn bearer(session: Option<&Session>) -> Result<String> {
    session.map(Session::bearer).ok_or(ClientError::MissingToken)
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
