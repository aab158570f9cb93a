//! Mutation runners for relationship toggles
//!
//! Adapters that turn [`RelationshipClient`] calls into toggle queue runners.

use super::api::{ClientError, RelationshipClient};
use super::types::{RecordUri, RelationshipKind, Subject};
use crate::client::toggle::MutationRunner;
use std::sync::Arc;

/// Runner for record-backed relationships (follow, block, like, repost)
///
/// The confirmed state is the record URI while the relationship exists.
/// A request already satisfied by the previous state skips the network.
pub fn record_toggle_runner(
    client: Arc<RelationshipClient>,
    kind: RelationshipKind,
    subject: Subject,
) -> impl MutationRunner<Option<RecordUri>> {
    move |previous: Option<RecordUri>, desired: bool| {
        let client = Arc::clone(&client);
        let subject = subject.clone();
        async move {
            match (previous, desired) {
                (None, true) => client.create_record(kind, &subject).await.map(Some),
                (Some(uri), false) => {
                    client.delete_record(&uri).await?;
                    Ok::<_, ClientError>(None)
                }
                (previous, _) => Ok(previous),
            }
        }
    }
}

/// Runner for muting an actor; the confirmed state is the mute flag
pub fn mute_toggle_runner(client: Arc<RelationshipClient>, actor: String) -> impl MutationRunner<bool> {
    move |_previous: bool, desired: bool| {
        let client = Arc::clone(&client);
        let actor = actor.clone();
        async move {
            client.set_muted(&actor, desired).await?;
            Ok::<_, ClientError>(desired)
        }
    }
}
