use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

use tokio::sync::mpsc;
use uuid::Uuid;

/// In-process registry of live websocket sessions, keyed by user. A user may
/// hold several sessions at once (multiple tabs or devices).
#[derive(Clone, Default)]
pub struct WsConnectionHub {
    sessions: Arc<RwLock<HashMap<Uuid, Vec<mpsc::UnboundedSender<String>>>>>,
}

impl WsConnectionHub {
    fn read_sessions(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<Uuid, Vec<mpsc::UnboundedSender<String>>>> {
        self.sessions
            .read()
            .expect("websocket hub read lock poisoned")
    }

    fn write_sessions(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<Uuid, Vec<mpsc::UnboundedSender<String>>>> {
        self.sessions
            .write()
            .expect("websocket hub write lock poisoned")
    }

    pub fn register(&self, user_id: Uuid) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut sessions = self.write_sessions();
        sessions.entry(user_id).or_default().push(tx);
        rx
    }

    /// Whether the user has at least one open session. Closed senders that
    /// have not been pruned yet do not count.
    pub fn is_connected(&self, user_id: Uuid) -> bool {
        self.read_sessions()
            .get(&user_id)
            .is_some_and(|senders| senders.iter().any(|sender| !sender.is_closed()))
    }

    pub fn prune_user(&self, user_id: Uuid) {
        let mut sessions = self.write_sessions();
        Self::retain_open(&mut sessions, user_id);
    }

    pub fn send_to_user(&self, user_id: Uuid, payload: &str) {
        self.broadcast_to_users(&[user_id], payload);
    }

    pub fn broadcast_to_users(&self, user_ids: &[Uuid], payload: &str) {
        let snapshot: Vec<(Uuid, Vec<mpsc::UnboundedSender<String>>)> = {
            let sessions = self.read_sessions();
            user_ids
                .iter()
                .filter_map(|user_id| {
                    sessions
                        .get(user_id)
                        .cloned()
                        .map(|items| (*user_id, items))
                })
                .collect()
        };

        let mut prune_targets = Vec::new();
        for (user_id, senders) in snapshot {
            let mut had_closed = false;
            for sender in &senders {
                if sender.send(payload.to_string()).is_err() {
                    had_closed = true;
                }
            }
            if had_closed {
                prune_targets.push(user_id);
            }
        }

        if !prune_targets.is_empty() {
            let mut sessions = self.write_sessions();
            for user_id in prune_targets {
                Self::retain_open(&mut sessions, user_id);
            }
        }
    }

    fn retain_open(
        sessions: &mut HashMap<Uuid, Vec<mpsc::UnboundedSender<String>>>,
        user_id: Uuid,
    ) {
        if let Some(user_sessions) = sessions.get_mut(&user_id) {
            user_sessions.retain(|sender| !sender.is_closed());
            if user_sessions.is_empty() {
                sessions.remove(&user_id);
            }
        }
    }
}
