#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod core;
mod prelude;
mod quantity;
mod stamp;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command, report, serve},
    prelude::*,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Report(args) => report(&args).await,
        Command::Serve(args) => serve(&args).await,
    }
}
