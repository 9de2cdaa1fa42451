use edict_client::ApiError;
use edict_types::{DeleteReceipt, Word};

/// What a row reports upward to the list.
#[derive(Debug, Clone, PartialEq)]
pub enum RowSignal {
    /// Consumed by `WordList::remove_local`; no refetch.
    Removed(String),
    /// Opens an editor session elsewhere; the row holds no form state.
    EditRequested(Word),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteRequest {
    pub id: String,
}

/// Row-scoped controller for the delete-with-confirm step and edit
/// relay.
pub struct RowMediator {
    id: String,
    pending_confirm: bool,
}

impl RowMediator {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pending_confirm: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pending_confirm(&self) -> bool {
        self.pending_confirm
    }

    /// First step: flag only, no network. The UI asks for confirmation.
    pub fn request_delete(&mut self) {
        self.pending_confirm = true;
    }

    pub fn cancel_delete(&mut self) {
        self.pending_confirm = false;
    }

    /// Second step: yields the delete call, only while confirmation is
    /// pending.
    pub fn confirm_delete(&mut self) -> Option<DeleteRequest> {
        self.pending_confirm.then(|| DeleteRequest {
            id: self.id.clone(),
        })
    }

    /// Success signals removal upward. Failure resets the confirmation
    /// flag and signals nothing: no retry, no per-row error.
    pub fn apply_delete(
        &mut self,
        result: Result<DeleteReceipt, ApiError>,
    ) -> Option<RowSignal> {
        self.pending_confirm = false;
        match result {
            Ok(_) => Some(RowSignal::Removed(self.id.clone())),
            Err(err) => {
                tracing::debug!(id = %self.id, "Row delete failed: {err}");
                None
            }
        }
    }

    pub fn request_edit(&self, word: Word) -> RowSignal {
        RowSignal::EditRequested(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt() -> DeleteReceipt {
        DeleteReceipt {
            message: "deleted".into(),
        }
    }

    #[test]
    fn delete_requires_a_confirm_step() {
        let mut row = RowMediator::new("w1");
        assert!(row.confirm_delete().is_none());

        row.request_delete();
        assert!(row.pending_confirm());
        let req = row.confirm_delete().expect("pending");
        assert_eq!(req.id, "w1");
    }

    #[test]
    fn successful_delete_signals_removal_and_resets() {
        let mut row = RowMediator::new("w1");
        row.request_delete();
        row.confirm_delete().unwrap();

        let signal = row.apply_delete(Ok(receipt()));
        assert_eq!(signal, Some(RowSignal::Removed("w1".into())));
        assert!(!row.pending_confirm());
    }

    #[test]
    fn failed_delete_is_swallowed_at_this_layer() {
        let mut row = RowMediator::new("w1");
        row.request_delete();
        row.confirm_delete().unwrap();

        let signal = row.apply_delete(Err(ApiError::Server {
            status: 500,
            message: "nope".into(),
        }));
        assert_eq!(signal, None);
        assert!(!row.pending_confirm());
    }

    #[test]
    fn cancel_clears_the_pending_flag() {
        let mut row = RowMediator::new("w1");
        row.request_delete();
        row.cancel_delete();
        assert!(row.confirm_delete().is_none());
    }

    #[test]
    fn edit_relays_the_full_entry() {
        let row = RowMediator::new("w1");
        let word = Word::new("w1", "hund");
        match row.request_edit(word.clone()) {
            RowSignal::EditRequested(w) => assert_eq!(w, word),
            other => panic!("expected edit signal, got {other:?}"),
        }
    }
}
