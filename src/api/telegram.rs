//! [Telegram Bot API](https://core.telegram.org/bots/api) client.

mod chat_id;
mod keyboard;

use std::time::Duration;

use bon::Builder;
use reqwest::Client;
use serde::{
    Deserialize,
    Serialize,
    de::{DeserializeOwned, IgnoredAny},
};
use serde_with::skip_serializing_none;

pub use self::{
    chat_id::ChatId,
    keyboard::{Callback, InlineKeyboard},
};
use crate::{api::client, prelude::*};

/// Long polling timeout for `getUpdates`.
const POLLING_TIMEOUT: Duration = Duration::from_mins(1);

pub struct Api {
    client: Client,

    /// Separate client because the long polling outlives the default timeout.
    polling_client: Client,

    base_url: String,
}

impl Api {
    pub fn try_new(token: &str) -> Result<Self> {
        Ok(Self {
            client: client::try_new()?,
            polling_client: client::try_with_timeout(POLLING_TIMEOUT + Duration::from_secs(15))?,
            base_url: format!("https://api.telegram.org/bot{token}"),
        })
    }

    #[instrument(skip_all, fields(chat_id = %request.chat_id))]
    pub async fn send_message(&self, request: &SendMessage<'_>) -> Result<Message> {
        info!(text = request.text, "sending…");
        let message: Message = self.call(&self.client, "sendMessage", request).await?;
        info!(message_id = message.id, "sent");
        Ok(message)
    }

    #[instrument(skip_all, fields(chat_id = %chat_id, message_id = message_id))]
    pub async fn set_message_reaction(&self, chat_id: &ChatId, message_id: i64) -> Result {
        #[derive(Serialize)]
        struct Reaction {
            r#type: &'static str,
            emoji: &'static str,
        }

        #[derive(Serialize)]
        struct Request<'a> {
            chat_id: &'a ChatId,
            message_id: i64,
            is_big: bool,
            reaction: [Reaction; 1],
        }

        let request = Request {
            chat_id,
            message_id,
            is_big: true,
            reaction: [Reaction { r#type: "emoji", emoji: "⚡" }],
        };
        let _: IgnoredAny = self.call(&self.client, "setMessageReaction", &request).await?;
        Ok(())
    }

    /// Long-poll for the updates starting at the `offset`.
    #[instrument(skip_all, fields(offset = offset))]
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        #[derive(Serialize)]
        struct Request {
            offset: i64,
            timeout: u64,
            allowed_updates: [&'static str; 2],
        }

        let request = Request {
            offset,
            timeout: POLLING_TIMEOUT.as_secs(),
            allowed_updates: ["message", "callback_query"],
        };
        let updates: Vec<Update> = self.call(&self.polling_client, "getUpdates", &request).await?;
        debug!(n_updates = updates.len(), "received");
        Ok(updates)
    }

    #[instrument(skip_all, fields(chat_id = %chat_id, message_id = message_id))]
    pub async fn delete_message(&self, chat_id: &ChatId, message_id: i64) -> Result {
        #[derive(Serialize)]
        struct Request<'a> {
            chat_id: &'a ChatId,
            message_id: i64,
        }

        let _: IgnoredAny =
            self.call(&self.client, "deleteMessage", &Request { chat_id, message_id }).await?;
        Ok(())
    }

    #[instrument(skip_all)]
    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result {
        #[derive(Serialize)]
        struct Request<'a> {
            callback_query_id: &'a str,
        }

        let _: IgnoredAny = self
            .call(&self.client, "answerCallbackQuery", &Request { callback_query_id })
            .await?;
        Ok(())
    }

    async fn call<R: DeserializeOwned>(
        &self,
        client: &Client,
        method: &str,
        request: &(impl Serialize + Sync),
    ) -> Result<R> {
        client
            .post(format!("{}/{method}", self.base_url))
            .json(request)
            .send()
            .await
            // The URL contains the bot token.
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("failed to call `{method}`"))?
            .json::<Response<R>>()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("failed to deserialize the `{method}` response"))?
            .into_result()
            .with_context(|| format!("`{method}` failed"))
    }
}

#[derive(Copy, Clone, Debug, Serialize)]
pub enum ParseMode {
    #[serde(rename = "HTML")]
    Html,

    #[serde(rename = "Markdown")]
    Markdown,
}

#[must_use]
#[skip_serializing_none]
#[derive(Serialize, Builder)]
pub struct SendMessage<'a> {
    chat_id: &'a ChatId,
    text: &'a str,
    parse_mode: Option<ParseMode>,
    reply_markup: Option<InlineKeyboard>,
}

#[derive(Deserialize)]
struct Response<R> {
    ok: bool,
    description: Option<String>,
    result: Option<R>,
}

impl<R> Response<R> {
    fn into_result(self) -> Result<R> {
        if self.ok {
            self.result.context("the response is missing the result")
        } else {
            bail!(self.description.unwrap_or_else(|| "no description".to_string()))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Update {
    #[serde(rename = "update_id")]
    pub id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    #[serde(rename = "message_id")]
    pub id: i64,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub id: i64,
}
