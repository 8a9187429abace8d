//! Wire protocol for the persistent room connection. Client and server
//! messages are JSON objects tagged by `command`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::games::GameStage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Client is ready; triggers the initial state push and, for hosts,
    /// the room tasks.
    Connected,
    Start,
    Pause,
    Resume,
    Cancel,
    Restart,
}

impl ClientMsg {
    pub fn name(&self) -> &'static str {
        match self {
            ClientMsg::Connected => "connected",
            ClientMsg::Start => "start",
            ClientMsg::Pause => "pause",
            ClientMsg::Resume => "resume",
            ClientMsg::Cancel => "cancel",
            ClientMsg::Restart => "restart",
        }
    }
}

/// The action a projected task view asks of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Drawing,
    Writing,
    Selecting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerStatus {
    pub avatar: Option<String>,
    pub finished: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TaskContent {
    /// Prompt text or painting reference.
    Text(String),
    /// Variant texts, shuffled per recipient.
    Options(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultEntry {
    pub nickname: String,
    pub avatar: Option<String>,
    pub drawing_color: Option<String>,
    pub result: i32,
    pub round_increment: i32,
}

/// Role- and progress-filtered view of the room sent to one recipient.
/// Equality on the whole payload backs the per-connection suppression of
/// repeated updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "active_screen", rename_all = "snake_case")]
pub enum ViewPayload {
    /// Roster with per-player finished flags; what hosts and finished
    /// players watch.
    Status {
        players: BTreeMap<String, PlayerStatus>,
        #[serde(skip_serializing_if = "Option::is_none")]
        task_type: Option<TaskType>,
    },
    /// The action required of a not-yet-finished player.
    Task {
        task_type: TaskType,
        task: TaskContent,
    },
    /// Standings after a round or at the end of the room.
    Results { results: Vec<ResultEntry> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerPlayer {
    pub nickname: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ServerMsg {
    Update {
        #[serde(flatten)]
        view: ViewPayload,
    },
    Timer {
        stage: &'static str,
        time: i64,
    },
    Pause {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    Resume,
    Cancel {
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    /// One reveal entry of the answers stage.
    DisplayAnswer {
        text: String,
        author: AnswerPlayer,
        selected_by: Vec<AnswerPlayer>,
        correct: bool,
    },
    /// Initial state push on `connected`.
    InitStage {
        stage: GameStage,
        #[serde(skip_serializing_if = "Option::is_none")]
        game_code: Option<String>,
        is_paused: bool,
    },
    /// Host UI affordances for the current stage.
    InitButtons { buttons: Vec<&'static str> },
    /// Restart flow: follow to the fresh room.
    Redirect { game_id: i64 },
    Error {
        command: String,
        error: String,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_commands_parse_from_the_command_tag() {
        let msg: ClientMsg = serde_json::from_str(r#"{"command":"start"}"#).unwrap();
        assert_eq!(msg, ClientMsg::Start);
    }

    #[test]
    fn update_flattens_the_view_into_the_envelope() {
        let view = ViewPayload::Task {
            task_type: TaskType::Writing,
            task: TaskContent::Text("/media/p.png".into()),
        };
        let json = serde_json::to_value(ServerMsg::Update { view }).unwrap();
        assert_eq!(json["command"], "update");
        assert_eq!(json["active_screen"], "task");
        assert_eq!(json["task_type"], "writing");
        assert_eq!(json["task"], "/media/p.png");
    }

    #[test]
    fn timer_carries_stage_and_seconds() {
        let json = serde_json::to_value(ServerMsg::Timer {
            stage: "writing",
            time: 40,
        })
        .unwrap();
        assert_eq!(json["command"], "timer");
        assert_eq!(json["stage"], "writing");
        assert_eq!(json["time"], 40);
    }

    #[test]
    fn selecting_options_serialize_as_a_plain_list() {
        let view = ViewPayload::Task {
            task_type: TaskType::Selecting,
            task: TaskContent::Options(vec!["кот".into(), "пёс".into()]),
        };
        let json = serde_json::to_value(ServerMsg::Update { view }).unwrap();
        assert_eq!(json["task"][0], "кот");
    }
}
