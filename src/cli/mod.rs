pub mod commands;
pub mod output;

use crate::errors::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stk")]
#[command(about = "Linear patch-stack management for git")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize stack management in this repository
    Init {
        /// Branch that acts as the bottom of the stack, probably main
        root: String,
    },

    /// Show the stack with the active patch highlighted
    Show,

    /// Remove all stack management state
    Deinit,

    /// Move up the stack, optionally tracking an existing or new branch
    Push {
        /// Track an existing branch directly above the current patch
        #[arg(long, conflicts_with = "new")]
        branch: Option<String>,

        /// Create and track a new branch at the current patch's tip
        #[arg(long)]
        new: Option<String>,

        /// Skip rebasing the target patch onto the current one
        #[arg(long)]
        no_rebase: bool,
    },

    /// Move down the stack
    Pop {
        /// Go all the way to the bottom of the stack
        #[arg(long)]
        all: bool,
    },

    /// Stop tracking a patch
    Untrack {
        /// Patch to remove from the stack
        name: String,

        /// Also force-delete the underlying branch
        #[arg(long)]
        delete: bool,
    },

    /// Diff the current patch against its predecessor
    Diff,

    /// Log the commits unique to the current patch
    Log,

    /// Submit the current patch for review
    Submit {
        /// Update an existing revision (e.g. D1234)
        #[arg(long)]
        update: Option<String>,

        /// Force creation of a new revision
        #[arg(long)]
        create: bool,

        /// Re-open the editor on the revision metadata
        #[arg(long)]
        edit: bool,
    },

    /// Land the bottom-most patch and relink the rest of the stack
    Land,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        self.setup_logging();

        match self.command {
            Commands::Init { root } => commands::init::init(&root),
            Commands::Show => commands::init::show(),
            Commands::Deinit => commands::init::deinit(),
            Commands::Push {
                branch,
                new,
                no_rebase,
            } => commands::navigate::push(branch, new, no_rebase),
            Commands::Pop { all } => commands::navigate::pop(all),
            Commands::Untrack { name, delete } => commands::navigate::untrack(&name, delete),
            Commands::Diff => commands::review::diff(),
            Commands::Log => commands::review::log(),
            Commands::Submit {
                update,
                create,
                edit,
            } => commands::review::submit(update, create, edit),
            Commands::Land => commands::review::land(),
        }
    }

    fn setup_logging(&self) {
        let level = if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };

        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .without_time();

        if self.no_color {
            subscriber.with_ansi(false).init();
        } else {
            subscriber.init();
        }
    }
}
