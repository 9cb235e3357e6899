use anyhow::Result;
use chrono::Utc;
use sled::{Db, Tree};

use crate::context::dto::{ConversationContext, FlowState, PendingAction};

const CONTEXTS_TREE: &str = "conversation_contexts";
const PENDING_TREE: &str = "pending_actions";

/// Quick-action slots expire after five minutes; gift contexts never expire.
pub const PENDING_TTL_SECS: i64 = 300;

/// Per-chat conversation state. At most one context per chat: `save` always
/// replaces the whole record (delete-then-insert, never a merge).
#[derive(Clone)]
pub struct ContextStore {
    contexts: Tree,
    pending: Tree,
}

impl ContextStore {
    pub fn new(db: &Db) -> sled::Result<Self> {
        let contexts = db.open_tree(CONTEXTS_TREE)?;
        let pending = db.open_tree(PENDING_TREE)?;
        Ok(Self { contexts, pending })
    }

    pub fn save(&self, chat_id: i64, state: FlowState) -> Result<()> {
        let ctx = ConversationContext {
            chat_id,
            state,
            updated_at: Utc::now().timestamp(),
        };
        let key = chat_id.to_be_bytes();
        self.contexts.remove(key)?;
        self.contexts.insert(key, serde_json::to_vec(&ctx)?)?;
        Ok(())
    }

    pub fn get(&self, chat_id: i64) -> Option<ConversationContext> {
        self.contexts
            .get(chat_id.to_be_bytes())
            .ok()
            .flatten()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
    }

    /// Idempotent: clearing an absent context is a no-op.
    pub fn clear(&self, chat_id: i64) -> Result<()> {
        self.contexts.remove(chat_id.to_be_bytes())?;
        Ok(())
    }

    pub fn save_pending(&self, chat_id: i64, action: &PendingAction) -> Result<()> {
        let key = chat_id.to_be_bytes();
        self.pending.remove(key)?;
        self.pending.insert(key, serde_json::to_vec(action)?)?;
        Ok(())
    }

    /// Returns the pending quick action unless it has aged past the TTL;
    /// expired slots are dropped on read.
    pub fn get_pending(&self, chat_id: i64) -> Option<PendingAction> {
        let key = chat_id.to_be_bytes();
        let action: PendingAction = self
            .pending
            .get(key)
            .ok()
            .flatten()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())?;
        if Utc::now().timestamp() - action.created_at > PENDING_TTL_SECS {
            let _ = self.pending.remove(key);
            return None;
        }
        Some(action)
    }

    pub fn clear_pending(&self, chat_id: i64) -> Result<()> {
        self.pending.remove(chat_id.to_be_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ContextStore {
        let db = sled::Config::new().temporary(true).open().unwrap();
        ContextStore::new(&db).unwrap()
    }

    #[test]
    fn test_save_replaces_previous_context() {
        let store = store();
        store.save(7, FlowState::RegisterWallet).unwrap();
        store
            .save(
                7,
                FlowState::RegisterWalletConfirm {
                    old_address: "0xold".to_string(),
                    new_address: "0xnew".to_string(),
                },
            )
            .unwrap();
        let ctx = store.get(7).unwrap();
        assert!(matches!(ctx.state, FlowState::RegisterWalletConfirm { .. }));
        // Exactly one row per chat
        assert_eq!(store.contexts.len(), 1);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = store();
        store.save(7, FlowState::RegisterWallet).unwrap();
        store.clear(7).unwrap();
        assert!(store.get(7).is_none());
        // Second clear must not error
        store.clear(7).unwrap();
    }

    #[test]
    fn test_no_cross_chat_visibility() {
        let store = store();
        store.save(1, FlowState::RegisterWallet).unwrap();
        assert!(store.get(2).is_none());
    }

    #[test]
    fn test_pending_action_expires() {
        let store = store();
        let fresh = PendingAction {
            action: "balance".to_string(),
            created_at: Utc::now().timestamp(),
        };
        store.save_pending(1, &fresh).unwrap();
        assert_eq!(store.get_pending(1), Some(fresh));

        let stale = PendingAction {
            action: "balance".to_string(),
            created_at: Utc::now().timestamp() - PENDING_TTL_SECS - 1,
        };
        store.save_pending(2, &stale).unwrap();
        assert!(store.get_pending(2).is_none());
        // Expired slot is gone for good
        assert!(store.pending.get(2i64.to_be_bytes()).unwrap().is_none());
    }
}
