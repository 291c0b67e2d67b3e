//! Terminal UI for the tic-tac-toe client

mod input;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use input::{Action, PromptStep};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};
use winliam_games::{
    Actor, ChannelNotifier, ClientConfig, InputRouter, PollSettings, PollUpdate, RestGameService,
    RetainedView, SessionClient, StaticIdentity,
};

/// Notices kept on screen.
const NOTICE_LINES: usize = 4;

/// How often the keyboard is checked between poll updates.
const INPUT_TICK: Duration = Duration::from_millis(50);

/// Runs the interactive board until the user quits.
#[instrument(skip(config), fields(server_url = %config.server_url(), actor = %actor))]
pub async fn run_play(config: ClientConfig, actor: Actor, join: Option<String>) -> Result<()> {
    info!("Starting tic-tac-toe TUI");

    let service = Arc::new(RestGameService::new(&config)?);
    let (session, updates) = SessionClient::new(service, PollSettings::from_config(&config));
    let (notifier, notices) = ChannelNotifier::new();
    let mut router = InputRouter::new(
        session,
        Box::new(StaticIdentity::new(actor.clone())),
        Box::new(notifier),
        RetainedView::default(),
    );

    if let Some(id) = join {
        // Failures are already on the notice channel.
        let _ = router.join(&id).await;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_loop(&mut terminal, &actor, &mut router, updates, notices).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "TUI loop error");
    }
    res
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    actor: &Actor,
    router: &mut InputRouter<RetainedView>,
    mut updates: mpsc::UnboundedReceiver<PollUpdate>,
    mut notices: mpsc::UnboundedReceiver<String>,
) -> Result<()> {
    let mut shown: VecDeque<String> = VecDeque::with_capacity(NOTICE_LINES);
    let mut prompt: Option<String> = None;
    let mut tick = tokio::time::interval(INPUT_TICK);

    loop {
        while let Ok(notice) = notices.try_recv() {
            if shown.len() == NOTICE_LINES {
                shown.pop_front();
            }
            shown.push_back(notice);
        }

        let view = router.renderer().view().cloned().unwrap_or_else(|| router.view());
        let lines: Vec<String> = shown.iter().cloned().collect();
        terminal.draw(|frame| {
            ui::draw(
                frame,
                &ui::Screen {
                    actor,
                    context: router.session().context(),
                    view: &view,
                    notices: &lines,
                    prompt: prompt.as_deref(),
                },
            )
        })?;

        tokio::select! {
            Some(update) = updates.recv() => {
                // Failures are already on the notice channel.
                let _ = router.on_poll(update);
            }
            _ = tick.tick() => {
                while event::poll(Duration::ZERO)? {
                    let Event::Key(key) = event::read()? else {
                        continue;
                    };
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    if let Some(buffer) = prompt.as_mut() {
                        match input::edit_prompt(buffer, key.code) {
                            PromptStep::Editing => {}
                            PromptStep::Cancel => prompt = None,
                            PromptStep::Submit(id) => {
                                prompt = None;
                                let _ = router.join(&id).await;
                            }
                        }
                        continue;
                    }

                    let Some(action) = input::action_for(key.code) else {
                        continue;
                    };
                    debug!(?action, "Key action");
                    match action {
                        Action::Cell(index) => {
                            let _ = router.select_cell(index).await;
                        }
                        Action::Create => {
                            let _ = router.create().await;
                        }
                        Action::Join => prompt = Some(String::new()),
                        Action::Leave => router.leave(),
                        Action::NewLocal => router.new_local_game(),
                        Action::Quit => {
                            info!("User quit");
                            router.leave();
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
