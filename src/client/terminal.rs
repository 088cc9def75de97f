//! Terminal front end: raw-mode keyboard input and WebSocket I/O

use std::io::{self, Stdout, Write};

use chrono::Utc;
use crossterm::{
    cursor::MoveTo,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::{SinkExt, StreamExt};
use tokio::time::{sleep_until, Instant};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use super::render::render;
use super::session::{Action, ClientSession, Key};
use crate::config::ClientArgs;
use crate::error::RelayResult;
use crate::types::ServerEvent;

/// Connect to the relay and run the chat UI until the user quits
pub async fn run(args: ClientArgs) -> RelayResult<()> {
    let (ws, _) = connect_async(args.url.as_str()).await?;
    info!(url = %args.url, "connected to relay");
    let (mut sink, mut stream) = ws.split();

    let mut screen = TerminalScreen::enter()?;
    let mut keys = EventStream::new();
    let mut session = ClientSession::new();

    loop {
        screen.draw(&session)?;

        let deadline = session.typing_deadline();
        let action = tokio::select! {
            event = keys.next() => match event {
                Some(Ok(event)) => match to_key(event) {
                    Some(key) => session.on_key(key, Instant::now(), Utc::now())?,
                    None => Action::Continue,
                },
                Some(Err(e)) => return Err(e.into()),
                None => Action::Quit,
            },
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    match ServerEvent::decode(text.as_str()) {
                        Ok(event) => session.on_event(&event),
                        Err(e) => debug!(error = %e, "dropping frame"),
                    }
                    Action::Continue
                }
                Some(Ok(Message::Close(_))) | None => {
                    warn!("relay closed the connection");
                    Action::Quit
                }
                Some(Ok(_)) => Action::Continue,
                Some(Err(e)) => return Err(e.into()),
            },
            _ = wait_for(deadline) => session.on_tick(Instant::now())?,
        };

        match action {
            Action::Continue => {}
            Action::Send(event) => {
                debug!(event = event.name(), "sending");
                sink.send(Message::text(event.encode()?)).await?;
            }
            Action::Quit => break,
        }
    }

    screen.leave()?;
    if let Err(e) = sink.close().await {
        debug!(error = %e, "close handshake failed");
    }
    Ok(())
}

/// Sleep until the typing deadline, or forever when none is pending
async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn to_key(event: Event) -> Option<Key> {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind,
        ..
    }) = event
    else {
        return None;
    };
    if kind == KeyEventKind::Release {
        return None;
    }
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Key::Quit),
        KeyCode::Esc => Some(Key::Quit),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Char(c) => Some(Key::Char(c)),
        _ => None,
    }
}

/// Raw-mode alternate screen, restored on leave or drop
struct TerminalScreen {
    stdout: Stdout,
    active: bool,
}

impl TerminalScreen {
    fn enter() -> io::Result<Self> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen)?;
        Ok(Self {
            stdout,
            active: true,
        })
    }

    fn draw(&mut self, session: &ClientSession) -> io::Result<()> {
        let (width, _) = terminal::size()?;
        queue!(self.stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        for line in render(session, width as usize, Utc::now()) {
            // Raw mode needs an explicit carriage return
            queue!(self.stdout, Print(line), Print("\r\n"))?;
        }
        self.stdout.flush()
    }

    fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(self.stdout, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }
}

impl Drop for TerminalScreen {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}
