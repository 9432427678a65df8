//! services/client/src/bin/portfolio.rs

use portfolio_client::{
    adapters::{FileThreadStore, HttpBackend},
    app::{AppState, ChatSession, ProjectStore, RankEditor, Screen, SendOutcome},
    config::Config,
    error::ClientError,
};
use portfolio_core::domain::{ChatMessage, ContactForm, Credentials, Sender};
use portfolio_core::routing::View;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "commands: open <fragment> | go <fragment> | show | login <email> <password> | \
register <email> <password> | logout | move <from> <to> | save | chat <text> | \
contact <name> | <email> | <message> | delete <id> | quit";

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Starting client...");

    // --- 2. Initialize Adapters ---
    let backend = Arc::new(HttpBackend::new(
        config.api_base_url.clone(),
        config.chat_base_url.clone(),
        config.request_timeout,
    )?);
    let thread_store = Arc::new(FileThreadStore::new(config.thread_store_path.clone()));
    info!("Using backend at {}", config.api_base_url);

    // --- 3. Build the Shared AppState ---
    let initial_fragment = std::env::args().nth(1).unwrap_or_default();
    let state = AppState::from_backend(config.clone(), backend, thread_store, &initial_fragment);

    // --- 4. Resolve the Session & Load Content ---
    if state.refresh_session().await {
        info!("Session restored");
    }
    state.projects.refresh().await;
    let experiences = state.work_experiences().await;
    info!("Loaded {} work experiences", experiences.len());

    // --- 5. Start the Chat Widget ---
    let chat = state.chat_session();
    chat.establish().await;
    print_transcript(&chat);
    let printer = spawn_reply_printer(&chat);

    // --- 6. Command Loop ---
    println!("{HELP}");
    let mut editor: Option<RankEditor> = None;
    render(&state, &mut editor).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "open" => {
                state.navigator.on_fragment_changed(rest);
                render(&state, &mut editor).await;
            }
            "go" => {
                let session = state.current_user().await;
                if !state.navigator.navigate(View::parse(rest), session.as_ref()) {
                    println!("admin session required");
                }
                render(&state, &mut editor).await;
            }
            "show" => render(&state, &mut editor).await,
            "login" | "register" => match parse_credentials(rest) {
                Some(credentials) => {
                    let ok = if command == "login" {
                        state.login(&credentials).await
                    } else {
                        state.register(&credentials).await
                    };
                    println!("{}", if ok { "signed in" } else { "sign-in failed" });
                    render(&state, &mut editor).await;
                }
                None => println!("usage: {command} <email> <password>"),
            },
            "logout" => {
                state.logout().await;
                render(&state, &mut editor).await;
            }
            "move" => match (editor.as_mut(), parse_pair(rest)) {
                (Some(editor), Some((from, to))) => match editor.reorder(from, to) {
                    Ok(_) => print_ranking(editor),
                    Err(e) => println!("{e}"),
                },
                (None, _) => println!("open #rank-projects first"),
                (_, None) => println!("usage: move <from> <to>"),
            },
            "save" => {
                let Some(current) = editor.as_mut() else {
                    println!("open #rank-projects first");
                    continue;
                };
                match state.save_ranking(current).await {
                    Ok(()) => {
                        println!("ranks saved");
                        render(&state, &mut editor).await;
                    }
                    Err(e) => println!("{e}"),
                }
            }
            "chat" => {
                // Replies are printed by the background printer as they arrive.
                println!("{}", chat_command(&chat, rest).await);
            }
            "contact" => match parse_contact(rest) {
                Some(mut form) => {
                    let ok = state.submit_contact(&mut form).await;
                    println!("{}", if ok { "message sent" } else { "message not sent" });
                }
                None => println!("usage: contact <name> | <email> | <message>"),
            },
            "delete" => {
                let Ok(id) = rest.parse::<i64>() else {
                    println!("usage: delete <id>");
                    continue;
                };
                if !state.is_admin().await {
                    println!("admin session required");
                    continue;
                }
                let ok = state.projects.delete(id).await;
                println!("{}", if ok { "deleted" } else { "delete failed" });
                render(&state, &mut editor).await;
            }
            _ => println!("{HELP}"),
        }
    }

    printer.abort();
    chat.shutdown();
    info!("Bye");
    Ok(())
}

/// Prints the current screen. Entering the rank editor opens a fresh working copy.
async fn render(state: &AppState, editor: &mut Option<RankEditor>) {
    let screen = state.current_screen().await;
    match &screen {
        Screen::Home => print_projects(&state.projects).await,
        Screen::Login => println!("[login] use: login <email> <password>"),
        Screen::ProjectDetail(project) => {
            println!("[project {}] {} ({})", project.id, project.name, project.kind);
            if let Some(description) = &project.description {
                println!("  {description}");
            }
            println!("  tags: {}", project.language_tags().join(", "));
        }
        Screen::ProjectForm(None) => println!("[add project]"),
        Screen::ProjectForm(Some(project)) => println!("[edit project {}] {}", project.id, project.name),
        Screen::RankEditor => {
            let current = match editor.take() {
                Some(current) => current,
                None => state.rank_editor().await,
            };
            print_ranking(&current);
            *editor = Some(current);
        }
        Screen::AccessDenied => println!("[access denied]"),
        Screen::ProjectNotFound => println!("[project not found]"),
    }
    if !matches!(screen, Screen::RankEditor) {
        *editor = None;
    }
}

async fn print_projects(store: &ProjectStore) {
    for project in store.ordered().await {
        let rank = project.rank.map_or("-".to_string(), |r| r.to_string());
        println!("  {:>3} #{:<4} {}", rank, project.id, project.name);
    }
}

fn print_ranking(editor: &RankEditor) {
    println!("[rank projects] {:?}", editor.state());
    for (index, project) in editor.projects().iter().enumerate() {
        println!("  {index}: {} (#{})", project.name, project.id);
    }
}

fn sender_label(sender: Sender) -> &'static str {
    match sender {
        Sender::Visitor => "you",
        Sender::Assistant => "assistant",
    }
}

fn print_transcript(chat: &ChatSession) {
    for message in chat.snapshot().messages {
        println!("{}> {}", sender_label(message.sender), message.text);
    }
}

/// Prints assistant messages not shown yet whenever the chat transcript changes.
fn spawn_reply_printer(chat: &ChatSession) -> tokio::task::JoinHandle<()> {
    let mut transcript = chat.subscribe();
    tokio::spawn(async move {
        let mut shown: HashSet<String> = transcript
            .borrow_and_update()
            .messages
            .iter()
            .map(|m| m.id.clone())
            .collect();
        while transcript.changed().await.is_ok() {
            let messages = transcript.borrow_and_update().messages.clone();
            for message in new_replies(&mut shown, &messages) {
                println!("{}> {}", sender_label(message.sender), message.text);
            }
        }
    })
}

/// Assistant messages whose id is not in `shown`, marking them as shown.
fn new_replies<'a>(shown: &mut HashSet<String>, messages: &'a [ChatMessage]) -> Vec<&'a ChatMessage> {
    messages
        .iter()
        .filter(|m| m.sender == Sender::Assistant && shown.insert(m.id.clone()))
        .collect()
}

/// Sends a chat line and returns at once; the reply arrives through the printer.
async fn chat_command(chat: &ChatSession, text: &str) -> &'static str {
    match chat.send(text).await {
        SendOutcome::Dispatched(_) => "(sent, waiting for the assistant)",
        SendOutcome::RunOutstanding => "the assistant is still answering",
        SendOutcome::Empty => "nothing to send",
        SendOutcome::NoThread => "chat is unavailable",
        SendOutcome::Failed => "message not sent",
    }
}

fn parse_credentials(rest: &str) -> Option<Credentials> {
    let mut parts = rest.split_whitespace();
    let email = parts.next()?.to_string();
    let password = parts.next()?.to_string();
    Some(Credentials { email, password })
}

fn parse_contact(rest: &str) -> Option<ContactForm> {
    let mut parts = rest.splitn(3, '|').map(str::trim);
    let form = ContactForm {
        name: parts.next()?.to_string(),
        email: parts.next()?.to_string(),
        message: parts.next()?.to_string(),
    };
    let complete = !form.name.is_empty() && form.email.contains('@') && !form.message.is_empty();
    complete.then_some(form)
}

fn parse_pair(rest: &str) -> Option<(usize, usize)> {
    let (from, to) = rest.split_once(' ')?;
    match (from.trim().parse(), to.trim().parse()) {
        (Ok(from), Ok(to)) => Some((from, to)),
        _ => {
            warn!("Could not parse positions from '{}'", rest);
            None
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use portfolio_core::domain::{ChatListing, RunId, RunStatus, ThreadId};
    use portfolio_core::ports::{ChatService, PortResult, ThreadStore};
    use std::time::Duration;
    use tokio::time::timeout;

    /// A backend whose runs end in a status other than completed.
    struct FailedRuns;

    #[async_trait]
    impl ChatService for FailedRuns {
        async fn create_thread(&self) -> PortResult<ThreadId> {
            Ok(ThreadId("thread_1".to_string()))
        }

        async fn send_message(&self, _thread: &ThreadId, _text: &str) -> PortResult<RunId> {
            Ok(RunId("run_1".to_string()))
        }

        async fn list_messages(
            &self,
            _thread: &ThreadId,
            _run: Option<&RunId>,
        ) -> PortResult<ChatListing> {
            Ok(ChatListing {
                messages: Vec::new(),
                status: RunStatus::from_wire("failed"),
            })
        }
    }

    struct NoStoredThread;

    #[async_trait]
    impl ThreadStore for NoStoredThread {
        async fn load_thread(&self) -> PortResult<Option<ThreadId>> {
            Ok(None)
        }

        async fn save_thread(&self, _thread: &ThreadId) -> PortResult<()> {
            Ok(())
        }
    }

    fn message(id: &str, sender: Sender) -> ChatMessage {
        ChatMessage {
            id: id.to_string(),
            text: id.to_string(),
            sender,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn chat_command_returns_while_a_run_never_finishes() {
        let chat = ChatSession::new(
            Arc::new(FailedRuns),
            Arc::new(NoStoredThread),
            Duration::from_millis(5),
        );
        chat.establish().await;

        let first = timeout(Duration::from_secs(1), chat_command(&chat, "hello"))
            .await
            .expect("chat command returns");
        assert_eq!(first, "(sent, waiting for the assistant)");

        tokio::time::sleep(Duration::from_millis(30)).await;
        let second = timeout(Duration::from_secs(1), chat_command(&chat, "again"))
            .await
            .expect("chat command returns");
        assert_eq!(second, "the assistant is still answering");
        assert_eq!(chat_command(&chat, "   ").await, "nothing to send");
        chat.shutdown();
    }

    #[test]
    fn replies_are_reported_once() {
        let mut shown = HashSet::from(["1".to_string()]);
        let first = vec![
            message("1", Sender::Assistant),
            message("u1", Sender::Visitor),
            message("a1", Sender::Assistant),
        ];
        let ids: Vec<&str> = new_replies(&mut shown, &first)
            .into_iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a1"]);
        assert!(new_replies(&mut shown, &first).is_empty());
    }

    #[test]
    fn contact_lines_need_every_field() {
        let form = parse_contact("Ada | ada@example.com | Hi there | again").expect("complete form");
        assert_eq!(form.name, "Ada");
        assert_eq!(form.email, "ada@example.com");
        assert_eq!(form.message, "Hi there | again");
        assert!(parse_contact("Ada | ada@example.com").is_none());
        assert!(parse_contact("Ada | not-an-email | Hi").is_none());
    }
}
