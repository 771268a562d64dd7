// src/core/engine.rs
use crate::analytics::overview::{SessionsOverview, OVERVIEW_SESSIONS, OVERVIEW_TRADES_PER_SESSION};
use crate::analytics::DashboardReport;
use crate::config::AppConfig;
use crate::connectors::traits::DataSource;
use crate::core::eval_view::{EvaluationView, RefreshOutcome, RefreshTicket};
use crate::error::{DashError, DashResult};
use crate::types::{
    EvalFilter, EvaluationResult, Session, SessionSnapshot, SessionStatus, SignalEvaluation,
    UiCommand, UiEvent,
};
use anyhow::Result;
use futures::future::join_all;
use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// Result of one background poll: the monitored session and the
/// cross-session overview.
struct PollDone {
    snapshot: DashResult<SessionSnapshot>,
    overview: DashResult<SessionsOverview>,
}

/// Result of a background evaluation re-fetch, tagged with the view
/// generation it was issued for.
struct RefreshDone {
    generation: u64,
    result: DashResult<Vec<SignalEvaluation>>,
}

pub struct MonitorEngine {
    config: AppConfig,
    source: Arc<dyn DataSource>,
    command_receiver: mpsc::Receiver<UiCommand>,
    ui_sender: mpsc::Sender<UiEvent>,
    view: EvaluationView,
    /// Session whose data is on screen.
    session_id: Option<String>,
    /// Session the next poll asks for, `None` to resolve it again.
    follow: Option<String>,
    poll_in_flight: bool,
    poll_sender: mpsc::Sender<PollDone>,
    poll_receiver: mpsc::Receiver<PollDone>,
    refresh_sender: mpsc::Sender<RefreshDone>,
    refresh_receiver: mpsc::Receiver<RefreshDone>,
}

impl MonitorEngine {
    pub fn new(
        config: AppConfig,
        source: Arc<dyn DataSource>,
        command_receiver: mpsc::Receiver<UiCommand>,
        ui_sender: mpsc::Sender<UiEvent>,
    ) -> Self {
        let (poll_sender, poll_receiver) = mpsc::channel(4);
        let (refresh_sender, refresh_receiver) = mpsc::channel(16);
        Self {
            session_id: config.session_id.clone(),
            follow: config.session_id.clone(),
            config,
            source,
            command_receiver,
            ui_sender,
            view: EvaluationView::new(Vec::new()),
            poll_in_flight: false,
            poll_sender,
            poll_receiver,
            refresh_sender,
            refresh_receiver,
        }
    }

    fn send_ui_event(&self, event: UiEvent) {
        match self.ui_sender.try_send(event) {
            Ok(_) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {}
            Err(mpsc::error::TrySendError::Closed(_)) => {
                error!("UI Channel closed! Interface is likely dead.");
            }
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        info!(
            "Monitor starting (refresh every {}s, session: {})",
            self.config.refresh_secs,
            self.session_id.as_deref().unwrap_or("auto")
        );

        let mut ticker = tokio::time::interval(Duration::from_secs(self.config.refresh_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Network calls never run on this loop, commands are handled at once.
        loop {
            tokio::select! {
                _ = ticker.tick() => self.spawn_poll(),
                command = self.command_receiver.recv() => match command {
                    Some(UiCommand::Quit) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(done) = self.poll_receiver.recv() => self.finish_poll(done),
                Some(done) = self.refresh_receiver.recv() => self.finish_refresh(done),
            }
        }

        info!("Monitor stopped");
        Ok(())
    }

    fn handle_command(&mut self, command: UiCommand) {
        match command {
            UiCommand::SetFilter(filter) => {
                // Local result goes out first, the server answer follows if it arrives in time.
                let ticket = self.view.set_filter(filter);
                self.send_ui_event(UiEvent::Evaluations(self.view.panel()));
                if let Some(ticket) = ticket {
                    self.spawn_refresh(ticket);
                }
            }
            UiCommand::SelectNext => {
                self.view.select_next();
                self.send_ui_event(UiEvent::Evaluations(self.view.panel()));
            }
            UiCommand::SelectPrev => {
                self.view.select_prev();
                self.send_ui_event(UiEvent::Evaluations(self.view.panel()));
            }
            UiCommand::Reload => self.spawn_poll(),
            UiCommand::Quit => {}
        }
    }

    fn spawn_poll(&mut self) {
        if self.poll_in_flight {
            debug!("Previous poll still running, skipping");
            return;
        }
        self.poll_in_flight = true;

        let source = Arc::clone(&self.source);
        let sender = self.poll_sender.clone();
        let follow = self.follow.clone();
        let trade_limit = self.config.trade_limit;
        let evaluation_limit = self.config.evaluation_limit;

        tokio::spawn(async move {
            let source = source.as_ref();
            let (snapshot, overview) = tokio::join!(
                fetch_snapshot(source, follow, trade_limit, evaluation_limit),
                fetch_overview(source),
            );
            let _ = sender.send(PollDone { snapshot, overview }).await;
        });
    }

    fn finish_poll(&mut self, done: PollDone) {
        self.poll_in_flight = false;

        match done.snapshot {
            Ok(snapshot) => self.apply_snapshot(snapshot),
            Err(e) => {
                warn!("Snapshot refresh failed: {}", e);
                self.send_ui_event(UiEvent::Status(format!("Refresh failed: {}", e)));
            }
        }

        match done.overview {
            Ok(overview) => self.send_ui_event(UiEvent::Sessions(Box::new(overview))),
            Err(e) => warn!("Sessions overview failed: {}", e),
        }
    }

    fn apply_snapshot(&mut self, snapshot: SessionSnapshot) {
        self.track_session(&snapshot.session);

        let report = DashboardReport::build(&snapshot);
        info!(
            "Snapshot {}: {} trades, {} evaluations, P&L {}",
            report.session.symbol,
            snapshot.trades.len(),
            snapshot.evaluations.len(),
            report.trades.total_pnl
        );
        self.send_ui_event(UiEvent::Report(Box::new(report)));

        let ticket = self.view.replace_full(snapshot.evaluations);
        self.send_ui_event(UiEvent::Evaluations(self.view.panel()));
        if let Some(ticket) = ticket {
            self.spawn_refresh(ticket);
        }
    }

    /// A configured session is polled forever. An auto-selected one is
    /// followed while it runs and re-resolved once it has stopped.
    fn track_session(&mut self, session: &Session) {
        if self.config.session_id.is_some() {
            return;
        }

        if self.session_id.as_deref() != Some(session.id.as_str()) {
            info!("Monitoring session {} ({})", session.id, session.symbol);
        }
        self.session_id = Some(session.id.clone());
        self.follow = match session.status {
            SessionStatus::Running => Some(session.id.clone()),
            SessionStatus::Stopped => None,
        };
    }

    fn spawn_refresh(&self, ticket: RefreshTicket) {
        let Some(session_id) = self.session_id.clone() else {
            return;
        };
        let source = Arc::clone(&self.source);
        let sender = self.refresh_sender.clone();
        let limit = self.config.evaluation_limit;

        tokio::spawn(async move {
            let result = fetch_filtered(source.as_ref(), &session_id, limit, ticket.filter).await;
            let _ = sender
                .send(RefreshDone {
                    generation: ticket.generation,
                    result,
                })
                .await;
        });
    }

    fn finish_refresh(&mut self, done: RefreshDone) {
        match self.view.apply_refresh(done.generation, done.result) {
            RefreshOutcome::Applied | RefreshOutcome::KeptLocal => {
                self.send_ui_event(UiEvent::Evaluations(self.view.panel()));
            }
            RefreshOutcome::Stale => {}
        }
    }
}

/// Session, trades and evaluations of `follow`, or of the resolved session
/// when nothing is being followed.
async fn fetch_snapshot(
    source: &dyn DataSource,
    follow: Option<String>,
    trade_limit: usize,
    evaluation_limit: usize,
) -> DashResult<SessionSnapshot> {
    let session_id = match follow {
        Some(id) => id,
        None => resolve_session(source).await?,
    };

    let (session, trades, evaluations) = tokio::try_join!(
        source.session(&session_id),
        source.trades(&session_id, trade_limit),
        source.evaluations(&session_id, evaluation_limit, None),
    )?;

    Ok(SessionSnapshot {
        session,
        trades,
        evaluations,
    })
}

/// First running session, else the most recent.
async fn resolve_session(source: &dyn DataSource) -> DashResult<String> {
    let sessions = source.sessions().await?;
    sessions
        .iter()
        .find(|s| s.status == SessionStatus::Running)
        .or_else(|| sessions.first())
        .map(|s| s.id.clone())
        .ok_or(DashError::NoSession)
}

/// Every session plus the trades and positions of the most recent few. A
/// session that fails to load is left out rather than failing the overview.
async fn fetch_overview(source: &dyn DataSource) -> DashResult<SessionsOverview> {
    let sessions = source.sessions().await?;
    let recent = &sessions[..sessions.len().min(OVERVIEW_SESSIONS)];

    let fetched = join_all(recent.iter().map(|s| async move {
        tokio::join!(
            source.session(&s.id),
            source.trades(&s.id, OVERVIEW_TRADES_PER_SESSION)
        )
    }))
    .await;

    let mut details = Vec::with_capacity(fetched.len());
    let mut trade_lists = Vec::with_capacity(fetched.len());
    for (s, (detail, trades)) in recent.iter().zip(fetched) {
        match detail {
            Ok(detail) => details.push(detail),
            Err(e) => warn!("Session {} unavailable for overview: {}", s.id, e),
        }
        match trades {
            Ok(trades) => trade_lists.push(trades),
            Err(e) => warn!("Trades of session {} unavailable for overview: {}", s.id, e),
        }
    }

    Ok(SessionsOverview::build(&sessions, &details, trade_lists))
}

/// Server-side filtered evaluations. The API filters on one result kind, so
/// `Signals` merges both signal kinds newest first and keeps `limit` rows.
async fn fetch_filtered(
    source: &dyn DataSource,
    session_id: &str,
    limit: usize,
    filter: EvalFilter,
) -> DashResult<Vec<SignalEvaluation>> {
    match filter {
        EvalFilter::All => source.evaluations(session_id, limit, None).await,
        EvalFilter::Rejected => {
            source
                .evaluations(session_id, limit, Some(EvaluationResult::Rejected))
                .await
        }
        EvalFilter::Signals => {
            let (longs, shorts) = tokio::try_join!(
                source.evaluations(session_id, limit, Some(EvaluationResult::SignalLong)),
                source.evaluations(session_id, limit, Some(EvaluationResult::SignalShort)),
            )?;
            let mut merged: Vec<SignalEvaluation> = longs.into_iter().chain(shorts).collect();
            merged.sort_by_key(|e| Reverse(e.created_at));
            merged.truncate(limit);
            Ok(merged)
        }
    }
}
