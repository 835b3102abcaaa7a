use serde::Serialize;

/// Data attached to the inline buttons and sent back in callback queries.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Callback {
    Privacy,
    GotIt,
}

impl Callback {
    #[must_use]
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "privacy" => Some(Self::Privacy),
            "got_it" => Some(Self::GotIt),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct InlineKeyboard {
    inline_keyboard: Vec<Vec<Button>>,
}

#[derive(Clone, Debug, Serialize)]
struct Button {
    text: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    callback_data: Option<Callback>,

    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl Button {
    const fn callback(text: &'static str, callback: Callback) -> Self {
        Self { text, callback_data: Some(callback), url: None }
    }

    const fn url(text: &'static str, url: String) -> Self {
        Self { text, callback_data: None, url: Some(url) }
    }
}

impl InlineKeyboard {
    /// Attached to the privacy policy so that the user can remove it.
    #[must_use]
    pub fn privacy() -> Self {
        Self {
            inline_keyboard: vec![vec![Button::callback("🚮 Verwijder dit bericht", Callback::GotIt)]],
        }
    }

    #[must_use]
    pub fn start(channel_name: &str, bluesky_identifier: &str) -> Self {
        Self {
            inline_keyboard: vec![
                vec![Button::callback("📜 Lees hoe ik met je privacy omga", Callback::Privacy)],
                vec![Button::url(
                    "❤️ Abonneer je op mijn kanaal",
                    format!("https://t.me/{channel_name}"),
                )],
                vec![Button::url(
                    "🏙️ Volg me op Bluesky",
                    format!("https://bsky.app/profile/{bluesky_identifier}"),
                )],
            ],
        }
    }
}
