//! [Bluesky](https://bsky.app/) client over the AT Protocol XRPC.

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{api::client, prelude::*};

const BASE_URL: &str = "https://bsky.social/xrpc";

/// Text of the link to the full report, appended to the summary.
const ANCHOR_TEXT: &str = "👉 Bekijk het volledige energiebericht op Telegram";

pub struct Session {
    client: Client,
    access_jwt: String,
    did: String,
    handle: String,
}

impl Session {
    #[instrument(skip_all, fields(identifier = identifier))]
    pub async fn login(identifier: &str, password: &str) -> Result<Self> {
        #[derive(Serialize)]
        struct Request<'a> {
            identifier: &'a str,
            password: &'a str,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Response {
            access_jwt: String,
            did: String,
            handle: String,
        }

        let client = client::try_new()?;
        let response: Response = call(
            &client,
            "com.atproto.server.createSession",
            None,
            &Request { identifier, password },
        )
        .await
        .context("failed to log in to Bluesky")?;
        info!(handle = %response.handle, did = %response.did, "logged in");
        Ok(Self {
            client,
            access_jwt: response.access_jwt,
            did: response.did,
            handle: response.handle,
        })
    }

    /// Post the summary with the link to the full report, and disallow replies to it.
    ///
    /// Returns the post's AT URI.
    #[instrument(skip_all, fields(handle = %self.handle))]
    pub async fn post(&self, summary: &str, telegram_url: &str) -> Result<String> {
        let record = CreateRecord {
            rkey: None,
            repo: &self.did,
            collection: "app.bsky.feed.post",
            record: Post::new(summary, telegram_url, Utc::now()),
        };
        let uri = self.create_record(&record).await.context("failed to post the summary")?;
        info!(%uri, "posted");

        let record = CreateRecord {
            rkey: Some(record_key(&uri)?),
            repo: &self.did,
            collection: "app.bsky.feed.threadgate",
            record: Threadgate::nobody(&uri, Utc::now()),
        };
        self.create_record(&record)
            .await
            .with_context(|| format!("failed to restrict replies to `{uri}`"))?;
        info!("restricted replies");

        Ok(uri)
    }

    async fn create_record<R: Serialize + Sync>(
        &self,
        record: &CreateRecord<'_, R>,
    ) -> Result<String> {
        #[derive(Deserialize)]
        struct Response {
            uri: String,
        }

        let response: Response = call(
            &self.client,
            "com.atproto.repo.createRecord",
            Some(&self.access_jwt),
            record,
        )
        .await?;
        Ok(response.uri)
    }
}

async fn call<R: DeserializeOwned>(
    client: &Client,
    method: &str,
    access_jwt: Option<&str>,
    request: &(impl Serialize + Sync),
) -> Result<R> {
    let mut builder = client.post(format!("{BASE_URL}/{method}")).json(request);
    if let Some(access_jwt) = access_jwt {
        builder = builder.bearer_auth(access_jwt);
    }
    let response = builder.send().await.with_context(|| format!("failed to call `{method}`"))?;
    let status = response.status();
    ensure!(status == StatusCode::OK, "`{method}` responded with {status}");
    response.json().await.with_context(|| format!("failed to deserialize the `{method}` response"))
}

/// Record key is the last segment of the AT URI.
fn record_key(uri: &str) -> Result<&str> {
    match uri.rsplit_once('/') {
        Some((_, rkey)) => Ok(rkey),
        None => bail!("malformed post URI `{uri}`"),
    }
}

#[derive(Serialize)]
struct CreateRecord<'a, R> {
    #[serde(skip_serializing_if = "Option::is_none")]
    rkey: Option<&'a str>,

    repo: &'a str,
    collection: &'static str,
    record: R,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Post<'a> {
    #[serde(rename = "$type")]
    r#type: &'static str,

    text: String,
    created_at: DateTime<Utc>,
    langs: [&'static str; 1],
    facets: [Facet<'a>; 1],
}

impl<'a> Post<'a> {
    /// Build the post with the anchor text linking to `url`.
    fn new(summary: &str, url: &'a str, created_at: DateTime<Utc>) -> Self {
        let text = format!("{summary}\n\n{ANCHOR_TEXT}");

        // Facet offsets are in UTF-8 bytes.
        let index = ByteSlice { byte_start: text.len() - ANCHOR_TEXT.len(), byte_end: text.len() };

        Self {
            r#type: "app.bsky.feed.post",
            text,
            created_at,
            langs: ["nl"],
            facets: [Facet {
                index,
                features: [Feature { r#type: "app.bsky.richtext.facet#link", uri: url }],
            }],
        }
    }
}

#[derive(Serialize)]
struct Facet<'a> {
    index: ByteSlice,
    features: [Feature<'a>; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ByteSlice {
    byte_start: usize,
    byte_end: usize,
}

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "$type")]
    r#type: &'static str,

    uri: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Threadgate<'a> {
    #[serde(rename = "$type")]
    r#type: &'static str,

    post: &'a str,

    /// Empty list of the allow rules means that nobody can reply.
    allow: &'static [AllowRule],

    created_at: DateTime<Utc>,
}

/// Threadgate allow rule: none are used, so that nobody can reply.
#[derive(Serialize)]
enum AllowRule {}

impl<'a> Threadgate<'a> {
    const fn nobody(post: &'a str, created_at: DateTime<Utc>) -> Self {
        Self { r#type: "app.bsky.feed.threadgate", post, allow: &[], created_at }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_post_facet_covers_anchor() {
        let summary = "Goedemiddag! ☀️\n\n📊 Gemiddeld: €\u{a0}0,20";
        let post = Post::new(summary, "https://t.me/energieprijzen/42", Utc::now());
        let facet = &post.facets[0];
        assert_eq!(facet.index.byte_end, post.text.len());
        assert_eq!(&post.text[facet.index.byte_start..facet.index.byte_end], ANCHOR_TEXT);
        assert_eq!(facet.index.byte_start, summary.len() + 2);

        // Character offsets would differ because of the multibyte symbols.
        assert!(facet.index.byte_start > post.text[..facet.index.byte_start].chars().count());
    }

    #[test]
    fn test_post_record() -> Result {
        let created_at = Utc.with_ymd_and_hms(2024, 3, 14, 15, 0, 0).unwrap();
        let record = CreateRecord {
            rkey: None,
            repo: "did:plc:abc",
            collection: "app.bsky.feed.post",
            record: Post::new("Hallo", "https://t.me/energieprijzen/42", created_at),
        };
        assert_eq!(
            serde_json::to_value(&record)?,
            json!({
                "repo": "did:plc:abc",
                "collection": "app.bsky.feed.post",
                "record": {
                    "$type": "app.bsky.feed.post",
                    "text": "Hallo\n\n👉 Bekijk het volledige energiebericht op Telegram",
                    "createdAt": "2024-03-14T15:00:00Z",
                    "langs": ["nl"],
                    "facets": [{
                        "index": {"byteStart": 7, "byteEnd": 59},
                        "features": [{
                            "$type": "app.bsky.richtext.facet#link",
                            "uri": "https://t.me/energieprijzen/42",
                        }],
                    }],
                },
            }),
        );
        Ok(())
    }

    #[test]
    fn test_threadgate_record() -> Result {
        let created_at = Utc.with_ymd_and_hms(2024, 3, 14, 15, 0, 0).unwrap();
        let uri = "at://did:plc:abc/app.bsky.feed.post/3kxyz";
        let record = CreateRecord {
            rkey: Some(record_key(uri)?),
            repo: "did:plc:abc",
            collection: "app.bsky.feed.threadgate",
            record: Threadgate::nobody(uri, created_at),
        };
        assert_eq!(
            serde_json::to_value(&record)?,
            json!({
                "rkey": "3kxyz",
                "repo": "did:plc:abc",
                "collection": "app.bsky.feed.threadgate",
                "record": {
                    "$type": "app.bsky.feed.threadgate",
                    "post": uri,
                    "allow": [],
                    "createdAt": "2024-03-14T15:00:00Z",
                },
            }),
        );
        Ok(())
    }

    #[test]
    fn test_calls_are_send() {
        fn assert_send(_: &impl Send) {}

        let client = Client::new();
        let record = CreateRecord {
            rkey: None,
            repo: "did:plc:abc",
            collection: "app.bsky.feed.threadgate",
            record: Threadgate::nobody("at://did:plc:abc/app.bsky.feed.post/3kxyz", Utc::now()),
        };
        assert_send(&call::<serde::de::IgnoredAny>(&client, "x", None, &record));
    }

    #[test]
    fn test_record_key() -> Result {
        assert_eq!(record_key("at://did:plc:abc/app.bsky.feed.post/3kxyz")?, "3kxyz");
        assert_eq!(record_key("a/b")?, "b");
        assert!(record_key("3kxyz").is_err());
        Ok(())
    }
}
