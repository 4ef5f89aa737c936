//! [`Command`] for returning a [`Flow`] to its details stage.

use common::operations::{By, Lock};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::booking::{
        flow::{self, TransitionError},
        Flow,
    },
    infra::{database, database::Locked, Database},
    Service,
};

use super::Command;

/// [`Command`] for returning a [`Flow`] from its payment stage back to the
/// entered booking details, which are kept.
#[derive(Clone, Copy, Debug)]
pub struct ReturnToDetails {
    /// ID of the [`Flow`] to return.
    pub flow_id: flow::Id,
}

impl<Db, Pay> Command<ReturnToDetails> for Service<Db, Pay>
where
    Db: Database<
        Lock<By<Option<Locked<Flow>>, flow::Id>>,
        Ok = Option<Locked<Flow>>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Flow;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: ReturnToDetails,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReturnToDetails { flow_id } = cmd;

        let mut flow = self
            .database()
            .execute(Lock(By::new(flow_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::FlowNotExists(flow_id))
            .map_err(tracerr::wrap!())?;

        flow.go_back().map_err(tracerr::from_and_wrap!(=> E))?;

        Ok(flow.clone())
    }
}

/// Error of [`ReturnToDetails`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Flow`] with the provided ID does not exist.
    #[display("`Flow(id: {_0})` does not exist")]
    FlowNotExists(#[error(not(source))] flow::Id),

    /// [`Flow`] cannot return to its details.
    #[display("{_0}")]
    #[from]
    Transition(TransitionError),
}
