//! CLI subcommand definitions

use clap::Subcommand;

use crate::core::Period;

/// Main CLI commands
#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Monthly charging statistics (default)
    Monthly,
    /// Weekly charging statistics
    Weekly,
    /// Yearly charging statistics
    Yearly,
    /// Trip statistics
    Trips {
        #[command(subcommand)]
        command: Option<TripCommands>,
    },
    /// Billing totals per client
    Clients,
    /// Trip counts per destination
    Destinations,
}

/// Trip-specific subcommands
#[derive(Subcommand)]
pub(crate) enum TripCommands {
    /// Monthly trip statistics (default)
    Monthly,
    /// Weekly trip statistics
    Weekly,
    /// Yearly trip statistics
    Yearly,
}

/// Normalized view selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum View {
    Charges(Period),
    Trips(Period),
    Clients,
    Destinations,
}

pub(crate) fn parse_command(cmd: &Option<Commands>) -> View {
    match cmd {
        None | Some(Commands::Monthly) => View::Charges(Period::Monthly),
        Some(Commands::Weekly) => View::Charges(Period::Weekly),
        Some(Commands::Yearly) => View::Charges(Period::Yearly),
        Some(Commands::Trips { command }) => match command {
            None | Some(TripCommands::Monthly) => View::Trips(Period::Monthly),
            Some(TripCommands::Weekly) => View::Trips(Period::Weekly),
            Some(TripCommands::Yearly) => View::Trips(Period::Yearly),
        },
        Some(Commands::Clients) => View::Clients,
        Some(Commands::Destinations) => View::Destinations,
    }
}
