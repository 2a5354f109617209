use crate::domain::{Contest, SettlementResult};
use async_trait::async_trait;
use log::info;

/// Outbound notifications about contest outcomes, rendered and sent by the
/// surrounding application (e.g. as chat messages).
///
/// Fire-and-forget from the engine's perspective: a failure is logged and the
/// state mutation it reports is never rolled back.
#[async_trait]
pub trait Presenter: Send + Sync {
    async fn notify_settled(
        &self,
        contest: &Contest,
        result: &SettlementResult,
    ) -> Result<(), anyhow::Error>;

    async fn notify_cancelled(&self, contest: &Contest) -> Result<(), anyhow::Error>;
}

/// Presenter that renders outcomes to the log, used by the demo binary and
/// useful as a fallback sink.
#[derive(Debug, Default)]
pub struct LogPresenter;

#[async_trait]
impl Presenter for LogPresenter {
    async fn notify_settled(
        &self,
        contest: &Contest,
        result: &SettlementResult,
    ) -> Result<(), anyhow::Error> {
        if result.has_winners() {
            let winners: Vec<String> = result.winners.iter().map(|w| w.to_string()).collect();
            info!(
                "contest {} ({}) won by {}",
                contest.id,
                contest.prize,
                winners.join(", ")
            );
        } else {
            info!(
                "contest {} ({}) ended with no valid entries",
                contest.id, contest.prize
            );
        }
        Ok(())
    }

    async fn notify_cancelled(&self, contest: &Contest) -> Result<(), anyhow::Error> {
        info!("contest {} ({}) cancelled", contest.id, contest.prize);
        Ok(())
    }
}
