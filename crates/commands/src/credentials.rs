//! Credential acquisition for `setup`
//!
//! Username and password come from flags, the cached config, or the console.
//! A blank console answer is asked for once more with a sharper prompt; a
//! second blank answer ends the run.

use mgw_common::TokenConfig;
use mgw_runtime::deps::{CredentialIssuer, UserInterface};
use mgw_runtime::{
    AccessToken, ClientCredentials, CredentialError, Credentials, Password, Result,
};

/// A field collected with the bounded re-prompt policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptField {
    /// Operator username, echoed
    Username,
    /// Operator password, masked
    Password,
}

impl PromptField {
    const fn name(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Password => "password",
        }
    }

    const fn first_prompt(self) -> &'static str {
        match self {
            Self::Username => "Enter Username: ",
            Self::Password => "Enter Password: ",
        }
    }

    const fn retry_prompt(self) -> &'static str {
        match self {
            Self::Username => "Username can't be empty; enter username: ",
            Self::Password => "Password can't be empty; enter password: ",
        }
    }

    fn empty_error(self) -> CredentialError {
        match self {
            Self::Username => CredentialError::EmptyUsername,
            Self::Password => CredentialError::EmptyPassword,
        }
    }
}

/// Progress of the bounded re-prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptState {
    /// Nothing asked yet
    NotAsked,
    /// The first answer was blank
    AskedOnce,
    /// The second answer was blank
    AskedTwice,
    /// No further prompts; the field is empty
    Failed,
}

impl PromptState {
    /// Prompt to show in this state, or `None` when prompting is over
    pub const fn prompt(self, field: PromptField) -> Option<&'static str> {
        match self {
            Self::NotAsked => Some(field.first_prompt()),
            Self::AskedOnce => Some(field.retry_prompt()),
            Self::AskedTwice | Self::Failed => None,
        }
    }

    /// State after a blank answer
    #[must_use]
    pub const fn after_blank(self) -> Self {
        match self {
            Self::NotAsked => Self::AskedOnce,
            Self::AskedOnce => Self::AskedTwice,
            Self::AskedTwice | Self::Failed => Self::Failed,
        }
    }
}

/// Ask for `field` until a non-blank answer or two blank ones
pub fn prompt_bounded(ui: &dyn UserInterface, field: PromptField) -> Result<String> {
    let mut state = PromptState::NotAsked;

    while let Some(prompt) = state.prompt(field) {
        let answer = match field {
            PromptField::Username => ui.prompt_input(prompt),
            PromptField::Password => ui.prompt_password(prompt),
        }
        .map_err(|source| CredentialError::Prompt {
            field: field.name(),
            source,
        })?;

        if !answer.trim().is_empty() {
            // Passwords are taken verbatim
            return Ok(match field {
                PromptField::Username => answer.trim().to_string(),
                PromptField::Password => answer,
            });
        }

        state = state.after_blank();
        tracing::debug!(field = field.name(), ?state, "Blank answer");
    }

    Err(field.empty_error().into())
}

/// Where the username of a run came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameSource {
    /// `--user`
    Flag,
    /// The global config
    Cache,
    /// The console
    Prompt,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `--user`, else the cached username, else the console
pub fn resolve_username(
    ui: &dyn UserInterface,
    flag: Option<&str>,
    cached: Option<&str>,
) -> Result<(String, UsernameSource)> {
    if let Some(user) = non_blank(flag) {
        return Ok((user.to_string(), UsernameSource::Flag));
    }
    if let Some(user) = non_blank(cached) {
        return Ok((user.to_string(), UsernameSource::Cache));
    }
    let user = prompt_bounded(ui, PromptField::Username)?;
    Ok((user, UsernameSource::Prompt))
}

/// `--password`, else the console (masked)
pub fn resolve_password(ui: &dyn UserInterface, flag: Option<&str>) -> Result<Password> {
    if let Some(password) = flag.filter(|p| !p.trim().is_empty()) {
        return Ok(Password::new(password.to_string()));
    }
    prompt_bounded(ui, PromptField::Password).map(Password::new)
}

/// Credential inputs taken from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialRequest<'a> {
    /// `--user`
    pub user: Option<&'a str>,
    /// `--password`
    pub password: Option<&'a str>,
}

/// Outcome of a successful credential flow
#[derive(Debug)]
pub struct AcquiredCredentials {
    /// Operator credentials for this run
    pub credentials: Credentials,
    /// Origin of the username
    pub username_source: UsernameSource,
    /// Client issued during this run; `None` when the cached one was used
    pub issued_client: Option<ClientCredentials>,
    /// Token authorizing the fetch stage
    pub token: AccessToken,
}

impl AcquiredCredentials {
    /// Whether the config needs updating once these credentials proved to work
    pub const fn needs_caching(&self) -> bool {
        matches!(self.username_source, UsernameSource::Prompt) || self.issued_client.is_some()
    }

    /// Record a prompted username and a newly issued client
    pub fn cache_into(&self, token: &mut TokenConfig) {
        if self.username_source == UsernameSource::Prompt {
            token.username.clone_from(&self.credentials.username);
        }
        if let Some(client) = &self.issued_client {
            token.cache_client(client);
        }
    }
}

/// Resolve credentials, register a client if none is cached, and exchange
/// the credentials for an access token
pub async fn acquire(
    ui: &dyn UserInterface,
    issuer: &dyn CredentialIssuer,
    token_config: &TokenConfig,
    request: CredentialRequest<'_>,
) -> Result<AcquiredCredentials> {
    let (username, username_source) =
        resolve_username(ui, request.user, token_config.cached_username())?;
    let password = resolve_password(ui, request.password)?;
    let credentials = Credentials { username, password };

    let (client, issued_client) = match token_config.cached_client() {
        Some(client) => (client, None),
        None => {
            tracing::debug!("No cached client; registering a new one");
            let client = issuer
                .issue_client_credentials(&credentials)
                .await
                .map_err(CredentialError::Issuance)?;
            (client.clone(), Some(client))
        }
    };

    let token = issuer
        .issue_access_token(&client, &credentials)
        .await
        .map_err(CredentialError::TokenExchange)?;
    tracing::debug!(username = %credentials.username, "Obtained access token");

    Ok(AcquiredCredentials {
        credentials,
        username_source,
        issued_client,
        token,
    })
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
