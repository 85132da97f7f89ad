use tracing::instrument;

use super::{logged, ZoneDbBackend};
use crate::builders::StatementBuilder;
use crate::error::Result;
use crate::types::Role;

impl ZoneDbBackend {
    /// Open a transaction on the write session and delete every record of
    /// zone `zone_id`, ready for the replacement set.
    ///
    /// Nothing is rolled back here if the delete fails; the caller decides
    /// between [`abort_transaction`](Self::abort_transaction) and giving up.
    #[instrument(skip(self), level = "debug")]
    pub async fn start_transaction(&mut self, domain: &str, zone_id: u32) -> Result<()> {
        let result = self.begin_and_clear(zone_id).await;
        logged("start_transaction", result)
    }

    async fn begin_and_clear(&mut self, zone_id: u32) -> Result<()> {
        self.ensure_connected(Role::Write).await?;

        let begin = self.render(
            StatementBuilder::new(&self.config.statements.transaction_begin),
            Role::Write,
        )?;
        self.execute(&begin, Role::Write).await?;

        let delete = self.render(
            StatementBuilder::new(&self.config.statements.zone_delete).bind(":id", zone_id),
            Role::Write,
        )?;
        self.execute(&delete, Role::Write).await
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn commit_transaction(&mut self) -> Result<()> {
        let result = self.finish(Finish::Commit).await;
        logged("commit_transaction", result)
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn abort_transaction(&mut self) -> Result<()> {
        let result = self.finish(Finish::Abort).await;
        logged("abort_transaction", result)
    }

    async fn finish(&mut self, how: Finish) -> Result<()> {
        self.ensure_connected(Role::Write).await?;
        let template = match how {
            Finish::Commit => &self.config.statements.transaction_commit,
            Finish::Abort => &self.config.statements.transaction_abort,
        };
        let sql = self.render(StatementBuilder::new(template), Role::Write)?;
        self.execute(&sql, Role::Write).await
    }
}

#[derive(Debug, Clone, Copy)]
enum Finish {
    Commit,
    Abort,
}
