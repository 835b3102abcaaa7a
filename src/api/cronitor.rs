//! [Cronitor](https://cronitor.io/) job telemetry.

use derive_more::Display;
use reqwest::{Client, StatusCode, Url};

use crate::{api::client, prelude::*};

#[derive(Copy, Clone, Debug, Display, Eq, PartialEq)]
pub enum State {
    #[display("run")]
    Run,

    #[display("complete")]
    Complete,

    #[display("fail")]
    Fail,
}

impl State {
    /// A job goes from nothing to `run`, and then to either `complete` or `fail`.
    const fn is_allowed_after(self, previous: Option<Self>) -> bool {
        matches!(
            (previous, self),
            (None, Self::Run) | (Some(Self::Run), Self::Complete | Self::Fail),
        )
    }
}

pub struct Monitor {
    client: Client,

    /// Telemetry URL, no URL means that the monitor only tracks the state.
    url: Option<Url>,

    state: Option<State>,
}

impl Monitor {
    pub fn try_new(url: Option<Url>) -> Result<Self> {
        Ok(Self { client: client::try_new()?, url, state: None })
    }

    /// Run the job and report its state.
    ///
    /// If the job fails, its error is returned, with the failed telemetry attached if any.
    pub async fn monitor<T>(&mut self, job: impl Future<Output = Result<T>>) -> Result<T> {
        self.set_state(State::Run).await.context("failed to report the run")?;
        match job.await {
            Ok(output) => {
                self.set_state(State::Complete).await.context("failed to report the completion")?;
                Ok(output)
            }
            Err(error) => match self.set_state(State::Fail).await {
                Ok(()) => Err(error),
                Err(state_error) => {
                    Err(error.context(format!("failed to report the failure: {state_error:#}")))
                }
            },
        }
    }

    /// Advance the state and report it.
    ///
    /// The state is reverted if the telemetry fails.
    ///
    /// # Panics
    ///
    /// When the transition is not allowed.
    #[instrument(skip_all, fields(state = %state))]
    async fn set_state(&mut self, state: State) -> Result {
        assert!(
            state.is_allowed_after(self.state),
            "cannot set the job from {:?} to {state}",
            self.state,
        );
        let previous = self.state.replace(state);
        let Some(url) = &self.url else {
            debug!("no telemetry URL");
            return Ok(());
        };
        let result = send(&self.client, url, state).await;
        if result.is_err() {
            self.state = previous;
        }
        result
    }
}

async fn send(client: &Client, url: &Url, state: State) -> Result {
    let mut url = url.clone();
    url.query_pairs_mut().append_pair("state", &state.to_string());
    info!(%url, "Sending the telemetry…");
    let status = client.get(url).send().await.context("failed to call Cronitor")?.status();
    ensure!(status == StatusCode::OK, "Cronitor responded with {status}");
    Ok(())
}
