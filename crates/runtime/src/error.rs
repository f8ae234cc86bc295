//! Error taxonomy for the micro gateway CLI
//!
//! Every failure a command can produce is a [`CliError`]. Errors are handled
//! once, at the command-execution boundary, where they are printed and turned
//! into a process exit code.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Top-level error for every command
#[derive(Debug, Error)]
pub enum CliError {
    /// The operator's input could not be understood
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// A config file could not be read, parsed or written
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The workspace could not be resolved or scaffolded
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// Credentials could not be obtained
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// A management API call failed
    #[error("failed to fetch {resource} from the management API: {source}")]
    RemoteFetch {
        /// Which list was being fetched
        resource: RemoteResource,
        /// Underlying HTTP or decoding failure
        source: anyhow::Error,
    },

    /// A generation stage failed
    #[error("{stage} failed: {source}")]
    Generation {
        /// The stage that failed
        stage: PipelineStage,
        /// Underlying I/O or rendering failure
        source: anyhow::Error,
    },

    /// Packaging a distribution failed
    #[error("error while creating micro gateway distribution for {label}. Reason: {source}")]
    Distribution {
        /// Label being packaged
        label: String,
        /// Underlying failure
        source: anyhow::Error,
    },
}

/// Category of a [`CliError`], mirroring the error taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown command, flag, topic or missing value
    Usage,
    /// Config parse or write failure
    Config,
    /// No workspace root or scaffolding failure
    Workspace,
    /// Empty input or issuance/exchange failure
    Credential,
    /// Network or API failure while fetching definitions
    RemoteFetch,
    /// Pipeline stage failure
    Generation,
    /// Distribution packaging failure
    Distribution,
}

impl CliError {
    /// Taxonomy category of this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Usage(_) => ErrorKind::Usage,
            Self::Config(_) => ErrorKind::Config,
            Self::Workspace(_) => ErrorKind::Workspace,
            Self::Credential(_) => ErrorKind::Credential,
            Self::RemoteFetch { .. } => ErrorKind::RemoteFetch,
            Self::Generation { .. } => ErrorKind::Generation,
            Self::Distribution { .. } => ErrorKind::Distribution,
        }
    }

    /// Process exit code for this error
    pub const fn exit_code(&self) -> u8 {
        1
    }
}

/// Problems with what the operator typed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// First token is not a registered command
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// A flag that no command accepts
    #[error("unknown flag '{0}'")]
    UnknownFlag(String),

    /// A flag that needs a value was given none
    #[error("flag '{0}' needs an argument")]
    MissingFlagValue(String),

    /// `help` was asked about something that is not a command
    #[error("unknown help topic `{0}`")]
    UnknownHelpTopic(String),

    /// `help` was given more than one topic
    #[error("too many arguments given")]
    TooManyArguments,

    /// A label-scoped command was run without a label
    #[error("label can't be empty; you need to specify -l <label name>")]
    LabelRequired,

    /// The label is not a single directory name
    #[error("invalid label '{0}'; a label must be a single directory name")]
    InvalidLabel(String),

    /// Any other parser failure, first letter lower-cased
    #[error("{0}")]
    Invalid(String),
}

/// Config file failures
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file is unreadable or malformed
    #[error("error while parsing the config {}: {source}", path.display())]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Underlying cause
        source: anyhow::Error,
    },

    /// The file could not be written
    #[error("error while writing the config {}: {source}", path.display())]
    Write {
        /// Config file path
        path: PathBuf,
        /// Underlying cause
        source: anyhow::Error,
    },

    /// The configured values fail validation
    #[error("invalid configuration in {}: {message}", path.display())]
    Invalid {
        /// Config file path
        path: PathBuf,
        /// Validation report
        message: String,
    },

    /// The trust store could not be loaded into the HTTP client
    #[error("error while loading the trust store: {source}")]
    TrustStore {
        /// Underlying cause
        source: anyhow::Error,
    },
}

/// Workspace resolution failures
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// No `--path` given and nothing persisted from an earlier run
    #[error(
        "stored workspace path not available; you need to specify --path <path to generate resources>"
    )]
    NoWorkspaceConfigured,

    /// The CLI home directory could not be determined
    #[error("could not determine the home directory; set MICRO_GW_HOME")]
    HomeUnavailable,

    /// Creating or reading workspace files failed
    #[error("error while processing files at {}: {source}", path.display())]
    Io {
        /// Path being processed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Credential acquisition failures
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Two blank answers to the username prompt
    #[error("micro gateway setup failed: empty username")]
    EmptyUsername,

    /// Two blank answers to the password prompt
    #[error("micro gateway setup failed: empty password")]
    EmptyPassword,

    /// Reading from the console failed
    #[error("failed to read {field} from the console: {source}")]
    Prompt {
        /// `username` or `password`
        field: &'static str,
        /// Underlying console error
        source: anyhow::Error,
    },

    /// Client registration failed
    #[error("failed to obtain client credentials: {0}")]
    Issuance(#[source] anyhow::Error),

    /// The password grant failed
    #[error("failed to obtain an access token: {0}")]
    TokenExchange(#[source] anyhow::Error),
}

/// The three lists fetched from the management API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteResource {
    /// APIs deployed to the label
    Apis,
    /// Application-scoped throttle policies
    ApplicationPolicies,
    /// Subscription-scoped throttle policies
    SubscriptionPolicies,
}

impl fmt::Display for RemoteResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Apis => "APIs",
            Self::ApplicationPolicies => "application policies",
            Self::SubscriptionPolicies => "subscription policies",
        })
    }
}

/// Ordered stages of the generation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Throttle policies are rendered
    PolicyGeneration,
    /// API sources are rendered
    SourceGeneration,
    /// The label project is initialized for the target runtime
    ProjectInitialization,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::PolicyGeneration => "policy generation",
            Self::SourceGeneration => "source generation",
            Self::ProjectInitialization => "project initialization",
        })
    }
}
