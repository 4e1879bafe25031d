//! The command registry and the router in front of it.

use anyhow::{Result, anyhow};

use crate::{
    cli::{HandlerContext, handlers},
    constants::EXIT_SUCCESS,
};

// --- Command Definition and Registry ---

/// A command, its aliases and its handler. Handlers return the process exit status.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &HandlerContext) -> Result<i32>,
}

/// The single source of truth for all commands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[CommandDefinition {
    name: "power",
    aliases: &["pwr"],
    handler: handlers::power::handle,
}];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes a command name and its arguments to the matching handler.
pub fn dispatch(
    command: Option<String>,
    args: Vec<String>,
    context: &HandlerContext,
) -> Result<i32> {
    let Some(name) = command else {
        println!("{}", t!("cli.welcome"));
        return Ok(EXIT_SUCCESS);
    };

    match find_command(&name) {
        Some(definition) => {
            log::debug!("Dispatching '{}' with args {:?}.", definition.name, args);
            (definition.handler)(args, context)
        }
        None => {
            let available = COMMAND_REGISTRY
                .iter()
                .map(|cmd| cmd.name)
                .collect::<Vec<_>>()
                .join(", ");
            Err(anyhow!(
                t!("cli.error.unknown_command"),
                name = name,
                available = available
            ))
        }
    }
}
