//! Session CLI commands: list, new, show, rename, delete.
//!
//! Each command drives the shared cache and renders what it ends up holding,
//! with rich tables for humans and JSON for scripts.

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use parley_types::message::{Message, MessageRole};
use parley_types::route::Route;

use crate::state::AppState;

/// List sessions, newest first.
///
/// # Examples
///
/// ```bash
/// parley sessions
/// parley sessions --json
/// ```
pub async fn list_sessions(state: &AppState, json: bool) -> Result<()> {
    state
        .cache
        .try_load_sessions()
        .await
        .context("Failed to load sessions")?;
    let sessions = state.cache.sessions();

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!();
        println!(
            "  {} No sessions yet. Start one with: {}",
            style("i").blue().bold(),
            style("parley new").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Title").fg(Color::White),
        Cell::new("Created").fg(Color::White),
    ]);

    for session in &sessions {
        let created = session
            .created_at
            .as_deref()
            .map(display_timestamp)
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(&session.id).fg(Color::DarkGrey),
            Cell::new(truncate_chars(&session.title, 40)).fg(Color::Cyan),
            Cell::new(created).fg(Color::White),
        ]);
    }

    println!();
    println!(
        "  Sessions on {}",
        style(&state.config.base_url).cyan().bold()
    );
    println!();
    println!("{table}");
    println!();
    println!(
        "  {} session{}",
        style(sessions.len()).bold(),
        if sessions.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Create a session.
///
/// # Examples
///
/// ```bash
/// parley new --title "Trip plans"
/// ```
pub async fn create_session(state: &AppState, title: Option<String>, json: bool) -> Result<()> {
    let session = state.cache.create_session(title.as_deref()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        println!(
            "  {} Session '{}' created ({}).",
            style("+").green().bold(),
            style(&session.title).cyan(),
            style(Route::Chat(session.id.clone())).dim()
        );
    }

    Ok(())
}

/// Open a session (or the blank conversation) and print its messages.
///
/// # Examples
///
/// ```bash
/// parley show 3f2c...
/// parley show /3f2c...
/// parley show /
/// ```
pub async fn show_session(state: &AppState, target: &str, json: bool) -> Result<()> {
    let route: Route = target.parse()?;

    let Some(session_id) = route.session_id() else {
        state.cache.navigate(&route).await;
        if json {
            println!("{}", serde_json::json!({"session_id": null, "messages": []}));
        } else {
            println!("  {} New conversation (no session selected).", style("i").blue().bold());
        }
        return Ok(());
    };

    state.cache.load_sessions().await;
    state
        .cache
        .try_switch_session(session_id)
        .await
        .with_context(|| format!("Failed to load messages for session '{session_id}'"))?;

    let snapshot = state.cache.snapshot();

    if json {
        let export = serde_json::json!({
            "session": snapshot.session(session_id),
            "messages": snapshot.messages,
        });
        println!("{}", serde_json::to_string_pretty(&export)?);
        return Ok(());
    }

    let title = snapshot
        .session(session_id)
        .map(|s| s.title.as_str())
        .unwrap_or("(unknown session)");

    println!("# {title}");
    println!();
    println!("- **Session:** {session_id}");
    println!("- **Messages:** {}", snapshot.messages.len());
    println!();
    println!("---");
    println!();

    for message in &snapshot.messages {
        println!("{}", render_message(message));
    }

    Ok(())
}

/// Rename a session.
///
/// # Examples
///
/// ```bash
/// parley rename <session-id> "Better title"
/// ```
pub async fn rename_session(state: &AppState, session_id: &str, title: &str, json: bool) -> Result<()> {
    state.cache.load_sessions().await;
    let session = state
        .cache
        .try_update_session_title(session_id, title)
        .await
        .with_context(|| format!("Failed to rename session '{session_id}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        println!(
            "  {} Session renamed to '{}'.",
            style("~").yellow().bold(),
            style(&session.title).cyan()
        );
    }

    Ok(())
}

/// Delete a session with confirmation.
///
/// # Examples
///
/// ```bash
/// parley delete <session-id>
/// parley delete <session-id> --force
/// ```
pub async fn delete_session(state: &AppState, session_id: &str, force: bool, json: bool) -> Result<()> {
    state.cache.load_sessions().await;
    let title = state
        .cache
        .snapshot()
        .session(session_id)
        .map(|s| s.title.clone())
        .unwrap_or_else(|| "(untitled)".to_string());

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete session '{}'?", style(&title).red().bold()))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    if !state.cache.delete_session(session_id).await {
        bail!("Failed to delete session '{session_id}'");
    }

    if json {
        println!(
            "{}",
            serde_json::json!({"deleted": true, "session_id": session_id})
        );
    } else {
        println!("  {} Session '{}' deleted.", style("x").red().bold(), title);
    }

    Ok(())
}

// --- Formatting helpers ---

fn render_message(message: &Message) -> String {
    let role_label = match message.role {
        MessageRole::User => "**You**",
        MessageRole::Assistant => "**Assistant**",
    };
    let heading = match message.timestamp.as_deref() {
        Some(ts) => format!("### {role_label} ({})", display_timestamp(ts)),
        None => format!("### {role_label}"),
    };
    format!("{heading}\n\n{}\n", message.content)
}

/// `2024-01-02T10:30:00.123456` -> `2024-01-02 10:30`.
fn display_timestamp(raw: &str) -> String {
    raw.replacen('T', " ", 1).chars().take(16).collect()
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
