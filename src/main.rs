//! EventDesk console
//!
//! Minimal interactive entry point: loads configuration, wires the
//! services, and dispatches line commands to them.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use eventdesk::{
    config::Settings,
    models::{EventFilters, RegistrationFilters, Role},
    session::{FileSessionStore, MemorySessionStore, SessionStore},
    utils::{helpers, logging},
    ServiceFactory,
};

const HELP: &str = "\
Commands:
  login <email> <password>   sign in
  logout                     sign out
  whoami                     show the active session
  events [search]            list published events
  event <id>                 show one event
  registrations <event-id>   list registrations for an event
  waitlist <event-id>        list pending waitlist entries
  chat <message>             ask the support chatbot
  quit                       exit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().unwrap_or_else(|_| Settings::default());
    settings.validate()?;

    // Initialize logging; the guard must outlive the run
    let _guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}", eventdesk::info());

    // Session storage: file-backed when configured, memory otherwise
    let sessions: Arc<dyn SessionStore> = match &settings.session.file_path {
        Some(path) => Arc::new(FileSessionStore::open(path)?),
        None => Arc::new(MemorySessionStore::new()),
    };

    // Initialize services
    let services = ServiceFactory::new(&settings, sessions)?;

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("{}\n{}\n", eventdesk::info(), HELP).as_bytes())
        .await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        let output = dispatch(line, &services).await;
        stdout.write_all(format!("{}\n", output).as_bytes()).await?;
    }

    Ok(())
}

async fn dispatch(line: &str, services: &ServiceFactory) -> String {
    let mut parts = line.splitn(3, ' ');
    let command = parts.next().unwrap_or_default();

    match command {
        "help" => HELP.to_string(),
        "login" => {
            let (Some(email), Some(password)) = (parts.next(), parts.next()) else {
                return "usage: login <email> <password>".to_string();
            };
            match services.auth_service.login(email, password).await {
                Ok(user) => format!("Signed in as {} ({:?})", user.full_name, user.role),
                Err(e) => format!("Login failed: {}", e.user_message()),
            }
        }
        "logout" => match services.auth_service.logout().await {
            Ok(()) => "Signed out".to_string(),
            Err(e) => format!("Logout failed: {}", e.user_message()),
        },
        "whoami" => match services.auth_service.current_user() {
            Some(user) => format!("{} <{}> ({:?})", user.full_name, user.email, user.role),
            None => "Not signed in".to_string(),
        },
        "events" => {
            let filters = EventFilters {
                search: parts.next().map(str::to_string),
                ..Default::default()
            };
            match services.event_service.list_events(&filters).await {
                Ok(page) => {
                    let mut out = format!("{} events\n", page.count);
                    for event in page.results {
                        out.push_str(&format!(
                            "  #{} {} — {} ({} registered)\n",
                            event.id,
                            helpers::truncate_text(&event.title, 48),
                            helpers::format_timestamp(event.start_time),
                            event.current_registrations
                        ));
                    }
                    out.trim_end().to_string()
                }
                Err(e) => format!("Fetch failed: {}", e.user_message()),
            }
        }
        "event" => {
            let Some(id) = parts.next().and_then(|s| s.parse::<i64>().ok()) else {
                return "usage: event <id>".to_string();
            };
            match services.event_service.get_event(id).await {
                Ok(event) => {
                    let price = helpers::format_price_cents(event.price_cents, &event.currency);
                    format!(
                        "#{} {}\n  starts {}\n  price {}\n  {} registered, status {:?}",
                        event.id,
                        event.title,
                        helpers::format_timestamp(event.start_time),
                        price,
                        event.current_registrations,
                        event.status
                    )
                }
                Err(e) => format!("Fetch failed: {}", e.user_message()),
            }
        }
        "registrations" => {
            let Some(id) = parts.next().and_then(|s| s.parse::<i64>().ok()) else {
                return "usage: registrations <event-id>".to_string();
            };
            let filters = RegistrationFilters {
                event_id: Some(id),
                ..Default::default()
            };
            match services.registration_service.list(&filters).await {
                Ok(page) => format!("{} registrations for event #{}", page.count, id),
                Err(e) => format!("Fetch failed: {}", e.user_message()),
            }
        }
        "waitlist" => {
            let Some(id) = parts.next().and_then(|s| s.parse::<i64>().ok()) else {
                return "usage: waitlist <event-id>".to_string();
            };
            let filters = RegistrationFilters {
                event_id: Some(id),
                ..Default::default()
            };
            match services.waitlist_service.list_pending(&filters).await {
                Ok(page) => format!("{} pending waitlist entries for event #{}", page.count, id),
                Err(e) => format!("Fetch failed: {}", e.user_message()),
            }
        }
        "chat" => {
            let message = parts.collect::<Vec<_>>().join(" ");
            if message.is_empty() {
                return "usage: chat <message>".to_string();
            }
            let role = services
                .auth_service
                .current_user()
                .map(|u| u.role)
                .unwrap_or(Role::Participant);
            let reply = services.chat_service.respond(&message, role, &[]).await;
            let mut out = reply.text;
            if !reply.suggestions.is_empty() {
                out.push_str("\n  try: ");
                out.push_str(&reply.suggestions.join(" | "));
            }
            out
        }
        other => format!("Unknown command '{}'; type 'help'", other),
    }
}
