//! Command Dispatcher
//!
//! Turns the raw argument vector into exactly one [`LauncherCommand`] or a
//! [`UsageError`]. Parser failures are mapped onto the usage taxonomy here so
//! that nothing from clap leaks past this module.

use std::ffi::OsString;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{CommandFactory, Parser};

use mgw_runtime::UsageError;

use crate::cli::{COMMAND_NAMES, Cli, Commands};

/// A fully resolved invocation
#[derive(Debug)]
pub enum LauncherCommand {
    /// No command given
    Default,
    /// `help [topic]`; the topic is a known command
    Help(Option<String>),
    /// Text clap rendered for `--help` or `--version`
    Display(String),
    /// `setup`
    Setup(mgw_commands::setup::SetupArgs),
    /// `build`
    Build(mgw_commands::build::BuildArgs),
    /// `run`
    Run(mgw_commands::run::RunArgs),
}

/// Resolve the argument vector, program name included
pub fn resolve<I, T>(args: I) -> Result<LauncherCommand, UsageError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args = normalize_help_alias(args.into_iter().map(Into::into).collect());

    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => return from_parse_error(&err),
    };

    Ok(match cli.command {
        None => LauncherCommand::Default,
        Some(Commands::Help(help)) => LauncherCommand::Help(help_topic(help.topics)?),
        Some(Commands::Setup(args)) => LauncherCommand::Setup(args.into()),
        Some(Commands::Build(args)) => LauncherCommand::Build(args.into()),
        Some(Commands::Run(args)) => LauncherCommand::Run(args.into()),
    })
}

/// Run a resolved command
pub async fn execute(command: LauncherCommand) -> mgw_runtime::Result<()> {
    match command {
        LauncherCommand::Default => {
            print!("{}", usage(None));
            Ok(())
        }
        LauncherCommand::Help(topic) => {
            print!("{}", usage(topic.as_deref()));
            Ok(())
        }
        LauncherCommand::Display(text) => {
            print!("{text}");
            Ok(())
        }
        LauncherCommand::Setup(args) => mgw_commands::setup::execute(args).await,
        LauncherCommand::Build(args) => mgw_commands::build::execute(&args),
        LauncherCommand::Run(args) => mgw_commands::run::execute(&args),
    }
}

/// Usage text for the whole CLI, or for one command
pub fn usage(topic: Option<&str>) -> String {
    let mut command = Cli::command();
    command.build();

    if let Some(topic) = topic
        && let Some(subcommand) = command.find_subcommand_mut(topic)
    {
        return subcommand.render_help().to_string();
    }
    command.render_help().to_string()
}

// Flags whose next token is their value, never a help alias
const VALUE_FLAGS: [&str; 7] = ["-l", "--label", "--path", "-u", "--user", "-p", "--password"];

// `?` is accepted wherever `--help` is: first, or anywhere after a command
// unless it is a flag's value
fn normalize_help_alias(mut args: Vec<OsString>) -> Vec<OsString> {
    let command_given = args
        .get(1)
        .and_then(|arg| arg.to_str())
        .is_some_and(|name| COMMAND_NAMES.contains(&name));
    let positions = if command_given {
        2..args.len()
    } else {
        1..args.len().min(2)
    };

    for position in positions {
        let is_flag_value = args[position - 1]
            .to_str()
            .is_some_and(|previous| VALUE_FLAGS.contains(&previous));
        if args[position] == "?" && !is_flag_value {
            args[position] = OsString::from("--help");
        }
    }
    args
}

fn help_topic(topics: Vec<String>) -> Result<Option<String>, UsageError> {
    match <[String; 1]>::try_from(topics) {
        Ok([topic]) if COMMAND_NAMES.contains(&topic.as_str()) => Ok(Some(topic)),
        Ok([topic]) => Err(UsageError::UnknownHelpTopic(topic)),
        Err(topics) if topics.is_empty() => Ok(None),
        Err(_) => Err(UsageError::TooManyArguments),
    }
}

fn from_parse_error(err: &clap::Error) -> Result<LauncherCommand, UsageError> {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            Ok(LauncherCommand::Display(err.render().to_string()))
        }
        ErrorKind::InvalidSubcommand => Err(UsageError::UnknownCommand(context(
            err,
            ContextKind::InvalidSubcommand,
        ))),
        ErrorKind::UnknownArgument => {
            let arg = context(err, ContextKind::InvalidArg);
            if arg.starts_with('-') {
                Err(UsageError::UnknownFlag(arg))
            } else {
                Err(UsageError::Invalid(lowercase_first(&parser_message(err))))
            }
        }
        ErrorKind::InvalidValue if context(err, ContextKind::InvalidValue).is_empty() => {
            // The arg renders as `--label <LABEL>`
            let arg = context(err, ContextKind::InvalidArg);
            let flag = arg.split_whitespace().next().unwrap_or_default();
            Err(UsageError::MissingFlagValue(flag.to_string()))
        }
        _ => Err(UsageError::Invalid(lowercase_first(&parser_message(err)))),
    }
}

fn context(err: &clap::Error, kind: ContextKind) -> String {
    match err.get(kind) {
        Some(ContextValue::String(value)) => value.clone(),
        _ => String::new(),
    }
}

fn parser_message(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let first_line = rendered.lines().next().unwrap_or_default();
    first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .trim()
        .to_string()
}

fn lowercase_first(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_lowercase().chain(chars).collect()
    })
}
