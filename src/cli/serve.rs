use std::{convert::Infallible, io, time::Duration};

use clap::Parser;
use tokio::{signal, time::sleep};

use crate::{
    api::telegram::{self, Callback, ChatId, InlineKeyboard, ParseMode, SendMessage, Update},
    cli::{bluesky::BlueskyArgs, telegram::TelegramArgs},
    prelude::*,
};

const START_TEXT: &str =
    "Hallo! In privé-chats kan ik niet zo veel. Mijn kanaal @energieprijzen is veel interessanter.";

const NOT_UNDERSTOOD_TEXT: &str = "Sorry, ik begrijp je niet. Probeer /start of /privacy.";

const PRIVACY_POLICY: &str = include_str!("privacy_policy.md");

/// Pause after a failed polling round.
const RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Parser)]
pub struct ServeArgs {
    #[clap(flatten)]
    telegram: TelegramArgs,

    #[clap(flatten)]
    bluesky: BlueskyArgs,
}

pub async fn serve(args: &ServeArgs) -> Result {
    let mut session = Session {
        api: args.telegram.api()?,
        start_keyboard: InlineKeyboard::start(&args.telegram.channel_name, &args.bluesky.identifier),
        last_update_id: 0,
    };
    info!("serving…");
    until_shutdown(signal::ctrl_c(), session.run()).await
}

/// Drive the work until the shutdown signal, dropping whatever the work is waiting on.
async fn until_shutdown(
    shutdown: impl Future<Output = io::Result<()>>,
    work: impl Future<Output = Infallible>,
) -> Result {
    tokio::select! {
        result = shutdown => {
            result.context("failed to listen for Ctrl+C")?;
            info!("stopping…");
            Ok(())
        }
        never = work => match never {},
    }
}

struct Session {
    api: telegram::Api,
    start_keyboard: InlineKeyboard,

    /// Updates up to this one are confirmed on the next poll.
    last_update_id: i64,
}

impl Session {
    async fn run(&mut self) -> Infallible {
        loop {
            if let Err(error) = self.process_updates().await {
                error!("failed to process the updates: {error:#}");
                sleep(RETRY_DELAY).await;
            }
        }
    }

    async fn process_updates(&mut self) -> Result {
        for update in self.api.get_updates(self.last_update_id + 1).await? {
            // Advance first, so that a failing update does not come back forever.
            self.last_update_id = update.id;
            if let Some(route) = Route::from_update(&update) {
                self.handle(route).await?;
            } else {
                debug!(update_id = update.id, "skipped");
            }
        }
        Ok(())
    }

    #[instrument(skip_all, fields(user_id = route.user_id, action = ?route.action))]
    async fn handle(&self, route: Route<'_>) -> Result {
        info!("handling…");
        if let Some(callback_query_id) = route.callback_query_id {
            self.api.answer_callback_query(callback_query_id).await?;
        }
        let chat_id = ChatId::from(route.user_id);
        match route.action {
            Action::Start => {
                let request = SendMessage::builder()
                    .chat_id(&chat_id)
                    .text(START_TEXT)
                    .reply_markup(self.start_keyboard.clone())
                    .build();
                self.api.send_message(&request).await?;
            }
            Action::PrivacyPolicy => {
                let text = privacy_policy(route.user_id);
                let request = SendMessage::builder()
                    .chat_id(&chat_id)
                    .text(&text)
                    .parse_mode(ParseMode::Markdown)
                    .reply_markup(InlineKeyboard::privacy())
                    .build();
                self.api.send_message(&request).await?;
            }
            Action::DeleteMessage(message_id) => {
                self.api.delete_message(&chat_id, message_id).await?;
            }
            Action::NotUnderstood => {
                let request =
                    SendMessage::builder().chat_id(&chat_id).text(NOT_UNDERSTOOD_TEXT).build();
                self.api.send_message(&request).await?;
            }
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Action {
    Start,
    PrivacyPolicy,
    DeleteMessage(i64),
    NotUnderstood,
}

/// What to do in response to an update, and for whom.
#[derive(Debug, Eq, PartialEq)]
struct Route<'a> {
    /// Private chat ID is the same as the user ID.
    user_id: i64,

    callback_query_id: Option<&'a str>,
    action: Action,
}

impl<'a> Route<'a> {
    fn from_update(update: &'a Update) -> Option<Self> {
        if let Some(message) = &update.message {
            let action = match message.text.as_deref() {
                Some("/start") => Action::Start,
                Some("/privacy") => Action::PrivacyPolicy,
                _ => Action::NotUnderstood,
            };
            return Some(Self { user_id: message.from.as_ref()?.id, callback_query_id: None, action });
        }
        if let Some(callback_query) = &update.callback_query {
            let action = match callback_query.data.as_deref().and_then(Callback::parse) {
                Some(Callback::Privacy) => Action::PrivacyPolicy,
                Some(Callback::GotIt) => callback_query
                    .message
                    .as_ref()
                    .map_or(Action::NotUnderstood, |message| {
                        Action::DeleteMessage(message.id)
                    }),
                None => Action::NotUnderstood,
            };
            return Some(Self {
                user_id: callback_query.from.id,
                callback_query_id: Some(&callback_query.id),
                action,
            });
        }
        None
    }
}

fn privacy_policy(user_id: i64) -> String {
    PRIVACY_POLICY.trim_end().replace("%USER_ID%", &user_id.to_string())
}
