//! Websocket session actor: one per connected participant.
//!
//! The session owns all per-connection mutable state - role, pause mirror,
//! last-sent view - and, for the host, the room's coordinator and projector
//! tasks. Host disconnect cancels both tasks and publishes a pause notice
//! instead of terminating the room.

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::txn::with_txn;
use crate::entities::games::GameStage;
use crate::error::AppError;
use crate::services::game_flow::{broadcast as broadcast_task, scheduler, RoomControl};
use crate::services::games::{self as games_service, GameRole};
use crate::services::players as players_service;
use crate::state::app_state::AppState;
use crate::ws::hub::Outbound;
use crate::ws::protocol::{ClientMsg, ServerMsg, ViewPayload};

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    path: web::Path<(i64, i64)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let (game_id, player_id) = path.into_inner();
    let conn_id = Uuid::new_v4();

    let role = games_service::get_role(&app_state.db, game_id, player_id)
        .await
        .map_err(AppError::from)?;
    let Some(role) = role else {
        info!(game_id, player_id, "[WS SESSION] connection declined");
        return Err(AppError::not_found(
            "PLAYER_NOT_FOUND",
            "player is not part of this game".to_string(),
        )
        .into());
    };

    players_service::register_channel(&app_state.db, game_id, player_id, &conn_id.to_string())
        .await
        .map_err(AppError::from)?;
    let paused = games_service::is_game_paused(&app_state.db, game_id)
        .await
        .map_err(AppError::from)?;

    info!(game_id, player_id, ?role, %conn_id, "[WS SESSION] connection accepted");
    let session = WsSession::new(conn_id, game_id, player_id, role, paused, app_state);
    ws::start(session, &req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    game_id: i64,
    player_id: i64,
    role: GameRole,
    app_state: web::Data<AppState>,

    /// Pause mirror plus cancellation token for the room tasks this host
    /// connection owns. Regular players never spawn tasks through it.
    control: RoomControl,
    update_task_running: bool,
    game_task_running: bool,

    /// Last view sent to this connection; identical successive views are
    /// suppressed.
    previous_update: Option<ViewPayload>,
}

impl WsSession {
    fn new(
        conn_id: Uuid,
        game_id: i64,
        player_id: i64,
        role: GameRole,
        paused: bool,
        app_state: web::Data<AppState>,
    ) -> Self {
        Self {
            conn_id,
            game_id,
            player_id,
            role,
            app_state,
            control: RoomControl::new(paused),
            update_task_running: false,
            game_task_running: false,
            previous_update: None,
        }
    }

    fn state(&self) -> AppState {
        self.app_state.get_ref().clone()
    }

    fn is_host(&self) -> bool {
        self.role == GameRole::Host
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_command_error(
        ctx: &mut ws::WebsocketContext<Self>,
        command: &str,
        error: impl Into<String>,
        message: impl Into<String>,
    ) {
        Self::send_json(
            ctx,
            &ServerMsg::Error {
                command: command.to_string(),
                error: error.into(),
                message: message.into(),
            },
        );
    }

    fn start_update_task(&mut self) {
        if self.update_task_running {
            return;
        }
        self.update_task_running = true;
        tokio::spawn(broadcast_task::run_updates(
            self.state(),
            self.game_id,
            self.control.clone(),
        ));
    }

    fn start_game_task(&mut self) {
        if self.game_task_running {
            return;
        }
        self.game_task_running = true;
        tokio::spawn(scheduler::run_room(
            self.state(),
            self.game_id,
            self.control.clone(),
        ));
    }

    fn host_buttons(stage: GameStage) -> Vec<&'static str> {
        match stage {
            GameStage::Pregame => vec!["start"],
            GameStage::Preround | GameStage::Round => {
                vec!["pause", "resume", "cancel", "restart"]
            }
            GameStage::Finished => vec!["restart"],
        }
    }

    /// `connected`: initial state push, then (host only) room task spawn.
    fn handle_connected(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let state = self.state();
        let game_id = self.game_id;
        let is_host = self.is_host();

        ctx.spawn(
            async move {
                let game = crate::repos::games::require_game(&state.db, game_id).await?;
                Ok::<_, crate::errors::domain::DomainError>((game.stage, game.code, game.is_paused))
            }
            .into_actor(self)
            .map(move |res, actor, ctx| match res {
                Ok((stage, code, is_paused)) => {
                    actor.control.set_paused(is_paused);
                    Self::send_json(
                        ctx,
                        &ServerMsg::InitStage {
                            stage,
                            game_code: is_host.then_some(code),
                            is_paused,
                        },
                    );
                    if is_host {
                        Self::send_json(
                            ctx,
                            &ServerMsg::InitButtons {
                                buttons: Self::host_buttons(stage),
                            },
                        );
                        actor.start_update_task();
                        if stage != GameStage::Pregame && stage != GameStage::Finished {
                            actor.start_game_task();
                        }
                        if !is_paused {
                            actor
                                .app_state
                                .registry
                                .broadcast(actor.game_id, ServerMsg::Resume);
                        }
                    }
                }
                Err(err) => {
                    warn!(game_id, error = %err, "[WS SESSION] connected handshake failed");
                    ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                    ctx.stop();
                }
            }),
        );
    }

    fn handle_start(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let state = self.state();
        let tasks = state.tasks.clone();
        let game_id = self.game_id;

        ctx.spawn(
            async move {
                with_txn(&state, |txn| {
                    let tasks = tasks.clone();
                    Box::pin(async move {
                        games_service::start_game(txn, &tasks, game_id)
                            .await
                            .map_err(AppError::from)
                    })
                })
                .await
            }
            .into_actor(self)
            .map(|res, actor, ctx| match res {
                Ok(()) => {
                    info!(game_id = actor.game_id, "game is started");
                    actor.start_game_task();
                }
                Err(err) => {
                    warn!(game_id = actor.game_id, error = %err, "[WS SESSION] start rejected");
                    Self::send_command_error(ctx, "start", err.code(), err.detail());
                }
            }),
        );
    }

    fn handle_pause(&mut self, ctx: &mut ws::WebsocketContext<Self>, pause: bool) {
        let state = self.state();
        let game_id = self.game_id;

        ctx.spawn(
            async move { games_service::switch_pause_state(&state.db, game_id, pause).await }
                .into_actor(self)
                .map(move |res, actor, ctx| match res {
                    Ok(()) => {
                        actor.control.set_paused(pause);
                        let notice = if pause {
                            ServerMsg::Pause { text: None }
                        } else {
                            ServerMsg::Resume
                        };
                        actor.app_state.registry.broadcast(actor.game_id, notice);
                        info!(game_id, pause, "pause state switched");
                    }
                    Err(err) => {
                        warn!(game_id, error = %err, "[WS SESSION] pause switch failed");
                        let command = if pause { "pause" } else { "resume" };
                        let err = AppError::from(err);
                        Self::send_command_error(ctx, command, err.code(), err.detail());
                    }
                }),
        );
    }

    fn handle_cancel(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let state = self.state();
        let game_id = self.game_id;

        ctx.spawn(
            async move { games_service::finish_game(&state.db, game_id).await }
                .into_actor(self)
                .map(|res, actor, ctx| match res {
                    // The room tasks observe the finished stage and wind
                    // down on their own.
                    Ok(()) => {
                        actor.app_state.registry.broadcast(
                            actor.game_id,
                            ServerMsg::Cancel {
                                text: Some("game is cancelled".to_string()),
                            },
                        );
                        info!(game_id = actor.game_id, "game is cancelled");
                    }
                    Err(err) => {
                        warn!(game_id = actor.game_id, error = %err, "[WS SESSION] cancel failed");
                        let err = AppError::from(err);
                        Self::send_command_error(ctx, "cancel", err.code(), err.detail());
                    }
                }),
        );
    }

    fn handle_restart(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let state = self.state();
        let game_id = self.game_id;

        ctx.spawn(
            async move {
                with_txn(&state, |txn| {
                    Box::pin(async move {
                        games_service::restart_game(txn, game_id)
                            .await
                            .map_err(AppError::from)
                    })
                })
                .await
            }
            .into_actor(self)
            .map(|res, actor, ctx| match res {
                Ok(new_game) => {
                    actor.app_state.registry.broadcast(
                        actor.game_id,
                        ServerMsg::Redirect {
                            game_id: new_game.id,
                        },
                    );
                    info!(
                        old_game_id = actor.game_id,
                        new_game_id = new_game.id,
                        "game is restarted"
                    );
                }
                Err(err) => {
                    warn!(game_id = actor.game_id, error = %err, "[WS SESSION] restart failed");
                    Self::send_command_error(ctx, "restart", err.code(), err.detail());
                }
            }),
        );
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            conn_id = %self.conn_id,
            game_id = self.game_id,
            player_id = self.player_id,
            "[WS SESSION] started"
        );
        let recipient = ctx.address().recipient::<Outbound>();
        self.app_state
            .registry
            .register(self.game_id, self.conn_id, recipient);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.app_state.registry.unregister(self.game_id, self.conn_id);

        if self.is_host() {
            self.control.cancel();
            self.app_state.registry.broadcast(
                self.game_id,
                ServerMsg::Pause {
                    text: Some("Host is disconnected".to_string()),
                },
            );
        }

        let state = self.state();
        let player_id = self.player_id;
        tokio::spawn(async move {
            if let Err(err) = players_service::deregister_channel(&state.db, player_id).await {
                warn!(player_id, error = %err, "[WS SESSION] failed to clear channel");
            }
        });

        info!(
            conn_id = %self.conn_id,
            game_id = self.game_id,
            player_id = self.player_id,
            "[WS SESSION] stopped"
        );
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => ctx.pong(&payload),
            Ok(ws::Message::Pong(_)) => {}
            Ok(ws::Message::Text(text)) => {
                let parsed: Result<ClientMsg, _> = serde_json::from_str(&text);
                let Ok(command) = parsed else {
                    Self::send_command_error(ctx, "unknown", "bad_request", "Malformed command");
                    return;
                };
                info!(
                    game_id = self.game_id,
                    player_id = self.player_id,
                    command = command.name(),
                    "command received"
                );

                if command != ClientMsg::Connected && !self.is_host() {
                    Self::send_command_error(
                        ctx,
                        command.name(),
                        "forbidden",
                        "only the host can send this command",
                    );
                    return;
                }

                match command {
                    ClientMsg::Connected => self.handle_connected(ctx),
                    ClientMsg::Start => self.handle_start(ctx),
                    ClientMsg::Pause => self.handle_pause(ctx, true),
                    ClientMsg::Resume => self.handle_pause(ctx, false),
                    ClientMsg::Cancel => self.handle_cancel(ctx),
                    ClientMsg::Restart => self.handle_restart(ctx),
                }
            }
            Ok(ws::Message::Binary(_)) => {
                Self::send_command_error(ctx, "unknown", "bad_request", "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {}
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    game_id = self.game_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<Outbound> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: Outbound, ctx: &mut Self::Context) -> Self::Result {
        if let ServerMsg::Update { view } = &msg.0 {
            if self.previous_update.as_ref() == Some(view) {
                return;
            }
            self.previous_update = Some(view.clone());
        }
        Self::send_json(ctx, &msg.0);
    }
}
