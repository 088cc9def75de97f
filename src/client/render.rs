//! Plain-text rendering of the client screens

use chrono::{DateTime, Utc};

use super::session::ClientSession;
use super::view::{DisplayedMessage, Screen};
use crate::utils::from_now;

/// Render the current screen as lines, `width` columns wide
pub fn render(session: &ClientSession, width: usize, now: DateTime<Utc>) -> Vec<String> {
    let view = session.view();
    match view.screen() {
        Screen::Landing => vec![
            String::new(),
            "  Welcome to Real-Time Chat 💬".to_string(),
            String::new(),
            "  Experience live messaging with instant feedback.".to_string(),
            String::new(),
            "  Press Enter to join, Esc to quit.".to_string(),
        ],
        Screen::NameEntry => vec![
            String::new(),
            "  Join the Chat".to_string(),
            "  Enter your name to get started".to_string(),
            String::new(),
            format!("  Your Name: {}", session.input()),
        ],
        Screen::Chat => {
            let mut lines = vec![
                "💬 Realtime Chat".to_string(),
                right_align(&format!("Connected Clients: {}", view.clients_total()), width),
                "-".repeat(width),
            ];
            for msg in view.messages() {
                lines.extend(render_message(msg, width, now));
            }
            if !view.feedback().is_empty() {
                lines.push(view.feedback().to_string());
            }
            lines.push("-".repeat(width));
            lines.push(format!("> {}", session.input()));
            lines
        }
    }
}

fn render_message(msg: &DisplayedMessage, width: usize, now: DateTime<Utc>) -> [String; 2] {
    let body = msg.message.message.clone();
    let meta = format!(
        "{} • {}",
        msg.message.name,
        from_now(msg.message.date_time, now)
    );
    if msg.is_own {
        [right_align(&body, width), right_align(&meta, width)]
    } else {
        [body, format!("  {}", meta)]
    }
}

fn right_align(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", " ".repeat(width - len), text)
    }
}
