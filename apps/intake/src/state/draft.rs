//! # Draft State
//!
//! Holds the purchase being assembled.
//!
//! ## Thread Safety
//! The draft is wrapped in `Arc<Mutex<T>>` so every command sees one
//! consistent pending list. The lock is never held across an `.await`:
//! submit copies the request out, releases the lock, then talks to the
//! backend.

use std::sync::{Arc, Mutex};

use compras_core::PurchaseDraft;

use crate::error::ApiError;

/// Thread-safe wrapper around [`PurchaseDraft`].
#[derive(Debug, Clone)]
pub struct DraftState {
    draft: Arc<Mutex<PurchaseDraft>>,
}

impl DraftState {
    /// Creates an empty draft, preselecting `idproveedor` when configured.
    pub fn new(idproveedor: Option<i64>) -> Self {
        let mut draft = PurchaseDraft::new();
        draft.idproveedor = idproveedor;
        DraftState {
            draft: Arc::new(Mutex::new(draft)),
        }
    }

    /// Executes a function with read access to the draft.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = draft_state.with_draft(|d| d.totals())?;
    /// ```
    pub fn with_draft<F, R>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&PurchaseDraft) -> R,
    {
        let draft = self
            .draft
            .lock()
            .map_err(|_| ApiError::internal("Draft mutex poisoned"))?;
        Ok(f(&draft))
    }

    /// Executes a function with write access to the draft.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// draft_state.with_draft_mut(|d| d.add_current())??;
    /// ```
    pub fn with_draft_mut<F, R>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&mut PurchaseDraft) -> R,
    {
        let mut draft = self
            .draft
            .lock()
            .map_err(|_| ApiError::internal("Draft mutex poisoned"))?;
        Ok(f(&mut draft))
    }
}

impl Default for DraftState {
    fn default() -> Self {
        Self::new(None)
    }
}
