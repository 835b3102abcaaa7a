use clap::{Parser, builder::NonEmptyStringValueParser};

use crate::{api::bluesky::Session, prelude::*};

#[derive(Parser)]
pub struct BlueskyArgs {
    /// Handle or DID of the account.
    #[clap(
        long = "bluesky-identifier",
        env = "BS_IDENTIFIER",
        value_parser = NonEmptyStringValueParser::new(),
    )]
    pub identifier: String,
}

#[derive(Parser)]
pub struct BlueskyCredentialsArgs {
    #[clap(flatten)]
    pub account: BlueskyArgs,

    /// App password.
    #[clap(
        long = "bluesky-password",
        env = "BS_PASSWORD",
        hide_env_values = true,
        value_parser = NonEmptyStringValueParser::new(),
    )]
    password: String,
}

impl BlueskyCredentialsArgs {
    pub async fn login(&self) -> Result<Session> {
        Session::login(&self.account.identifier, &self.password).await
    }
}
