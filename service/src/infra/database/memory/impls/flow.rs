//! [`Flow`]-related [`Database`] implementations.

use std::sync::Arc;

use common::operations::{By, Delete, Insert, Lock, Select};
use tokio::sync::Mutex;
use tracerr::Traced;

use crate::{
    domain::booking::{flow, Flow},
    infra::{
        database::{self, InMemory, Locked},
        Database,
    },
};

use super::super::{read, write};

impl InMemory {
    /// Returns the shared cell of the [`Flow`] with the provided ID, if any.
    fn flow(
        &self,
        id: flow::Id,
    ) -> Result<Option<Arc<Mutex<Flow>>>, Traced<database::Error>> {
        Ok(read(&self.0.flows)?.get(&id).cloned())
    }
}

impl Database<Insert<Flow>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(flow): Insert<Flow>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = write(&self.0.flows)?.insert(flow.id, Arc::new(Mutex::new(flow)));
        Ok(())
    }
}

impl Database<Select<By<Option<Flow>, flow::Id>>> for InMemory {
    type Ok = Option<Flow>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Flow>, flow::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(flow) = self.flow(by.into_inner())? else {
            return Ok(None);
        };
        let snapshot = flow.lock().await.clone();
        Ok(Some(snapshot))
    }
}

impl Database<Lock<By<Option<Locked<Flow>>, flow::Id>>> for InMemory {
    type Ok = Option<Locked<Flow>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Option<Locked<Flow>>, flow::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(flow) = self.flow(by.into_inner())? else {
            return Ok(None);
        };
        Ok(Some(flow.lock_owned().await))
    }
}

impl Database<Delete<By<Flow, flow::Id>>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Flow, flow::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(write(&self.0.flows)?.remove(by.inner()));
        Ok(())
    }
}

impl Database<Delete<By<Vec<flow::Id>, flow::ActivityDateTime>>> for InMemory {
    type Ok = Vec<flow::Id>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<flow::Id>, flow::ActivityDateTime>>,
    ) -> Result<Self::Ok, Self::Err> {
        let deadline = by.into_inner();
        let mut evicted = Vec::new();
        write(&self.0.flows)?.retain(|id, cell| {
            // Locked `Flow`s are in the middle of a transition.
            let stale = cell.try_lock().is_ok_and(|f| f.is_stale(deadline));
            if stale {
                evicted.push(*id);
            }
            !stale
        });
        Ok(evicted)
    }
}
