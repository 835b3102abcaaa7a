mod bluesky;
mod charges;
mod cronitor;
mod report;
mod serve;
mod telegram;

use clap::{Parser, Subcommand};

pub use self::{report::report, serve::serve};
use crate::cli::{report::ReportArgs, serve::ServeArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Post tomorrow's prices to the Telegram channel and Bluesky.
    #[clap(name = "report")]
    Report(Box<ReportArgs>),

    /// Answer the private chats with the bot.
    #[clap(name = "serve")]
    Serve(Box<ServeArgs>),
}
