use std::{path::PathBuf, time::Duration};

use chrono::NaiveDate;
use clap::Parser;
use rand::Rng;
use tokio::time::sleep;

use crate::{
    api::{
        energy_zero,
        telegram::{ChatId, ParseMode, SendMessage},
    },
    cli::{
        bluesky::BlueskyCredentialsArgs,
        charges::ChargesArgs,
        cronitor::CronitorArgs,
        telegram::TelegramArgs,
    },
    core::{
        calendar,
        prices::{Charges, PriceSet},
        report::Report,
    },
    prelude::*,
    stamp::Stamp,
};

/// Upper bound (exclusive) of the random delay before posting.
const MAX_DELAY_SECS: u64 = 50;

#[derive(Parser)]
pub struct ReportArgs {
    /// Post right away: no random delay and no Cronitor monitoring.
    #[clap(long)]
    kickstart: bool,

    /// Render the report without posting it anywhere.
    ///
    /// Like `--kickstart`, skips the delay and the monitoring. Ignores and keeps the stamps.
    #[clap(long)]
    dry_run: bool,

    /// Directory for the daily stamps.
    #[clap(long = "stamp-dir", env = "STAMP_DIR")]
    stamp_dir: PathBuf,

    /// Channel to post the report to: numeric ID or `@username`.
    #[clap(long = "telegram-chat-id", env = "TG_CHAT_ID")]
    chat_id: ChatId,

    #[clap(flatten)]
    telegram: TelegramArgs,

    #[clap(flatten)]
    bluesky: BlueskyCredentialsArgs,

    #[clap(flatten)]
    cronitor: CronitorArgs,

    #[clap(flatten)]
    charges: ChargesArgs,
}

impl ReportArgs {
    /// Scheduled run: delayed and monitored.
    const fn is_scheduled(&self) -> bool {
        !self.kickstart && !self.dry_run
    }

    /// Dry run renders the report even if it has been posted already.
    fn is_posted(&self, stamp: &Stamp, today: NaiveDate) -> Result<bool> {
        if self.dry_run {
            return Ok(false);
        }
        stamp.exists(today)
    }
}

pub async fn report(args: &ReportArgs) -> Result {
    if !args.is_scheduled() {
        return post(args).await;
    }

    let delay = Duration::from_secs(rand::thread_rng().gen_range(0..MAX_DELAY_SECS));
    info!(?delay, "waiting before posting…");
    sleep(delay).await;

    let mut monitor = args.cronitor.monitor()?;
    monitor.monitor(post(args)).await
}

#[instrument(skip_all, fields(dry_run = args.dry_run))]
async fn post(args: &ReportArgs) -> Result {
    let now = calendar::now();
    let today = now.date_naive();
    let stamp = Stamp::new(&args.stamp_dir);
    if args.is_posted(&stamp, today)? {
        info!(%today, "already posted today");
        return Ok(());
    }

    let raw_prices = energy_zero::Api::try_new()?
        .get_tomorrow_prices(now)
        .await
        .context("failed to fetch the prices")?;
    let charges = Charges::from(args.charges);
    let prices = PriceSet::try_from_raw(raw_prices, |rate| charges.apply(rate))?;
    info!(
        average = %prices.average(),
        high = %prices.high(),
        low = %prices.low(),
        "calculated the statistics",
    );
    let report = Report::new(&prices, now)?;
    let (summary, full) = (report.render_short(), report.render_long());

    if args.dry_run {
        println!("{full}\n\n{summary}");
        return Ok(());
    }

    let telegram = args.telegram.api()?;
    let message = telegram
        .send_message(
            &SendMessage::builder()
                .chat_id(&args.chat_id)
                .text(&full)
                .parse_mode(ParseMode::Html)
                .build(),
        )
        .await
        .context("failed to post the report to Telegram")?;
    if let Err(error) = telegram.set_message_reaction(&args.chat_id, message.id).await {
        warn!("failed to react to the message: {error:#}");
    }

    let telegram_url = args.telegram.message_url(message.id);
    args.bluesky
        .login()
        .await?
        .post(&summary, &telegram_url)
        .await
        .context("failed to post the summary to Bluesky")?;

    stamp.stamp(today)?;
    stamp.prune(today)?;
    info!("done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    const REQUIRED: [&str; 9] = [
        "test",
        "--stamp-dir",
        "/tmp/stamps",
        "--telegram-chat-id",
        "@energieprijzen",
        "--telegram-token",
        "secret",
        "--bluesky-identifier",
        "energieprijzen.bsky.social",
    ];

    fn parse(flags: &[&'static str]) -> ReportArgs {
        ReportArgs::parse_from(
            REQUIRED
                .into_iter()
                .chain(["--bluesky-password", "hunter2"])
                .chain(flags.iter().copied()),
        )
    }

    #[test]
    fn test_args() {
        let args = parse(&[]);
        assert!(!args.kickstart);
        assert!(!args.dry_run);
        assert_eq!(args.chat_id, ChatId::Username("@energieprijzen".into()));
        assert_eq!(args.telegram.channel_name, "energieprijzen");
    }

    #[test]
    fn test_scheduled() {
        assert!(parse(&[]).is_scheduled());
        assert!(!parse(&["--kickstart"]).is_scheduled());
        assert!(!parse(&["--dry-run"]).is_scheduled());
        assert!(!parse(&["--kickstart", "--dry-run"]).is_scheduled());
    }

    #[test]
    fn test_dry_run_ignores_stamp() -> Result {
        let dir = tempdir()?;
        let stamp = Stamp::new(dir.path());
        let today = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap();
        stamp.stamp(today)?;

        assert!(parse(&[]).is_posted(&stamp, today)?);
        assert!(parse(&["--kickstart"]).is_posted(&stamp, today)?);
        assert!(!parse(&["--dry-run"]).is_posted(&stamp, today)?);
        assert!(!parse(&[]).is_posted(&stamp, today.succ_opt().unwrap())?);

        // The stamp survives the dry run.
        assert!(stamp.exists(today)?);
        Ok(())
    }

    #[test]
    fn test_invalid_chat_id() {
        let args = REQUIRED.map(|arg| if arg == "@energieprijzen" { "@" } else { arg });
        assert!(
            ReportArgs::try_parse_from(args.into_iter().chain(["--bluesky-password", "hunter2"]))
                .is_err()
        );
    }

    #[test]
    fn test_empty_password() {
        assert!(
            ReportArgs::try_parse_from(REQUIRED.into_iter().chain(["--bluesky-password", ""]))
                .is_err()
        );
    }
}
