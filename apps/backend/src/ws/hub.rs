//! In-process pub/sub transport for room connections: unicast by connection
//! handle, room-wide broadcast, membership management, and a per-room
//! wakeup used to re-broadcast right after a submission lands.

use std::sync::Arc;

use actix::prelude::*;
use dashmap::DashMap;
use tokio::sync::Notify;
use tracing::debug;
use uuid::Uuid;

use crate::ws::protocol::ServerMsg;

#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct Outbound(pub ServerMsg);

#[derive(Default)]
pub struct WsRegistry {
    rooms: DashMap<i64, DashMap<Uuid, Recipient<Outbound>>>,
    notifiers: DashMap<i64, Arc<Notify>>,
}

impl WsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, game_id: i64, conn_id: Uuid, recipient: Recipient<Outbound>) {
        let room = self.rooms.entry(game_id).or_default();
        room.insert(conn_id, recipient);
    }

    pub fn unregister(&self, game_id: i64, conn_id: Uuid) {
        if let Some(room) = self.rooms.get(&game_id) {
            room.remove(&conn_id);
            if room.is_empty() {
                drop(room);
                self.rooms.remove_if(&game_id, |_, room| room.is_empty());
            }
        }
    }

    pub fn broadcast(&self, game_id: i64, msg: ServerMsg) {
        if let Some(room) = self.rooms.get(&game_id) {
            for recipient in room.iter() {
                recipient.value().do_send(Outbound(msg.clone()));
            }
        }
    }

    /// Unicast to one connection by its registered channel name. A stale
    /// handle is not an error: the delivery is skipped and the rest of the
    /// broadcast proceeds.
    pub fn send_to(&self, game_id: i64, channel_name: &str, msg: ServerMsg) {
        let Ok(conn_id) = channel_name.parse::<Uuid>() else {
            debug!(game_id, channel_name, "malformed channel name, skipping delivery");
            return;
        };
        let Some(room) = self.rooms.get(&game_id) else {
            return;
        };
        match room.get(&conn_id) {
            Some(recipient) => recipient.do_send(Outbound(msg)),
            None => debug!(game_id, %conn_id, "channel no longer connected, skipping delivery"),
        };
    }

    /// Wakeup handle for the room's projector.
    pub fn notifier(&self, game_id: i64) -> Arc<Notify> {
        let entry = self
            .notifiers
            .entry(game_id)
            .or_insert_with(|| Arc::new(Notify::new()));
        Arc::clone(entry.value())
    }

    /// Ping the room's projector to re-broadcast without waiting a tick.
    pub fn notify(&self, game_id: i64) {
        self.notifier(game_id).notify_one();
    }
}
