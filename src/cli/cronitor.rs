use clap::Parser;
use reqwest::Url;

use crate::{api::cronitor::Monitor, prelude::*};

#[derive(Parser)]
pub struct CronitorArgs {
    /// Telemetry URL, without it the job is not monitored.
    #[clap(long = "cronitor-url", env = "CR_URL")]
    pub url: Option<Url>,
}

impl CronitorArgs {
    pub fn monitor(&self) -> Result<Monitor> {
        Monitor::try_new(self.url.clone())
    }
}
