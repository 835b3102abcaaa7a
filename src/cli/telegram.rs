use clap::{Parser, builder::NonEmptyStringValueParser};

use crate::{api::telegram, prelude::*};

#[derive(Parser)]
pub struct TelegramArgs {
    /// Bot token.
    #[clap(
        long = "telegram-token",
        env = "TG_TOKEN",
        hide_env_values = true,
        value_parser = NonEmptyStringValueParser::new(),
    )]
    token: String,

    /// Public channel name, without the `@`.
    #[clap(
        long = "telegram-channel-name",
        env = "TG_CHANNEL_NAME",
        default_value = "energieprijzen",
        value_parser = NonEmptyStringValueParser::new(),
    )]
    pub channel_name: String,
}

impl TelegramArgs {
    pub fn api(&self) -> Result<telegram::Api> {
        telegram::Api::try_new(&self.token)
    }

    /// Public link to the channel post.
    pub fn message_url(&self, message_id: i64) -> String {
        format!("https://t.me/{}/{message_id}", self.channel_name)
    }
}
