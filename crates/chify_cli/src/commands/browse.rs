//! Browse command - Interactive session against the site coordinator.
//!
//! Reads one command per line from stdin while toast timers, chat replies
//! and the hero carousel are applied in the background.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use chify_chat::{Author, MockGenerator};
use chify_core::{
    EventKind, ServiceDialog, SiteCoordinator, SiteSnapshot, StatSection, ToastKind, View,
    Viewport,
};

use super::Cli;

#[derive(Args)]
pub struct BrowseArgs {
    /// Answer chat with canned replies instead of calling the API
    #[arg(long)]
    offline: bool,

    /// Print state as JSON after each change
    #[arg(long)]
    json: bool,
}

/// Terminal has no scroll position; resets are only logged
struct TerminalViewport;

impl Viewport for TerminalViewport {
    fn scroll_to_top(&self) {
        debug!("Scroll reset");
    }
}

const HELP: &str = "\
Commands:
  go <view>          home, about, services, expertise, contact
  open <service>     show a service by slug or title
  close              close the service dialog
  chat <text>        send a chat message
  chat-open          show the chat panel
  chat-close         hide the chat panel
  toast <text>       show a success notification
  toast-error <text> show an error notification
  dismiss <n>        dismiss the n-th notification
  slide <n>          jump to hero slide n
  next               next hero slide
  scroll <y>         report a scroll offset
  menu               toggle the mobile menu
  stats              reveal and print the statistics
  help               show this help
  quit               leave";

#[derive(Debug, Clone, PartialEq)]
enum ReplCommand {
    Go(View),
    Open(String),
    Close,
    Chat(String),
    ChatOpen,
    ChatClose,
    Toast(String, ToastKind),
    Dismiss(usize),
    Slide(usize),
    Next,
    Scroll(f64),
    Menu,
    Stats,
    Help,
    Quit,
}

impl FromStr for ReplCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let required = |what: &str| {
            if rest.is_empty() {
                Err(format!("'{}' needs {}", word, what))
            } else {
                Ok(rest.to_string())
            }
        };
        let number = |what: &str| {
            rest.parse::<usize>()
                .map_err(|_| format!("'{}' needs {}", word, what))
        };

        match word.to_ascii_lowercase().as_str() {
            "go" => rest.parse().map(Self::Go).map_err(|e: chify_core::CoreError| e.to_string()),
            "open" => required("a service").map(Self::Open),
            "close" => Ok(Self::Close),
            // Blank chat text is passed through; the session ignores it
            "chat" => Ok(Self::Chat(rest.to_string())),
            "chat-open" => Ok(Self::ChatOpen),
            "chat-close" => Ok(Self::ChatClose),
            "toast" => required("a message").map(|m| Self::Toast(m, ToastKind::Success)),
            "toast-error" => required("a message").map(|m| Self::Toast(m, ToastKind::Error)),
            "dismiss" => number("a notification number").map(Self::Dismiss),
            "slide" => number("a slide number").map(Self::Slide),
            "next" => Ok(Self::Next),
            "scroll" => rest
                .parse::<f64>()
                .map(Self::Scroll)
                .map_err(|_| format!("'{}' needs an offset", word)),
            "menu" => Ok(Self::Menu),
            "stats" => Ok(Self::Stats),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            "" => Err(String::new()),
            other => Err(format!("Unknown command '{}'. Type 'help' for a list.", other)),
        }
    }
}

pub async fn execute(args: &BrowseArgs, cli: &Cli) -> Result<()> {
    let config = cli.site_config()?;
    let viewport = Arc::new(TerminalViewport);
    let mut site = if args.offline {
        SiteCoordinator::new(&config, viewport, Arc::new(MockGenerator::new()))
    } else {
        SiteCoordinator::from_config(&config, viewport)?
    };

    println!("Chify Rehabilitation. Type 'help' for commands.\n");
    print_state(&site, args.json)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.parse::<ReplCommand>() {
                    Ok(ReplCommand::Quit) => break,
                    Ok(command) => {
                        if run(&mut site, command) {
                            print_state(&site, args.json)?;
                        }
                    }
                    Err(message) if message.is_empty() => {}
                    Err(message) => println!("{}", message),
                }
            }
            event = site.next_event() => {
                let kind = event.kind();
                if site.apply(event) && kind != EventKind::SlideAdvanced {
                    print_state(&site, args.json)?;
                }
            }
        }
    }

    Ok(())
}

/// Apply one command. Returns whether the state should be printed.
fn run(site: &mut SiteCoordinator, command: ReplCommand) -> bool {
    match command {
        ReplCommand::Go(view) => site.navigate(view),
        ReplCommand::Open(key) => {
            if let Err(e) = site.open_service_by_slug(&key) {
                println!("{}", e);
                return false;
            }
        }
        ReplCommand::Close => site.close_service(),
        ReplCommand::Chat(text) => {
            site.open_chat();
            if !site.send_chat(&text) {
                println!("(message not sent)");
            }
        }
        ReplCommand::ChatOpen => site.open_chat(),
        ReplCommand::ChatClose => site.close_chat(),
        ReplCommand::Toast(message, kind) => {
            site.notify(message, kind);
        }
        ReplCommand::Dismiss(n) => {
            let id = n.checked_sub(1).and_then(|i| site.toasts().get(i)).map(|t| t.id);
            match id {
                Some(id) => {
                    site.dismiss_toast(id);
                }
                None => {
                    println!("No notification {}", n);
                    return false;
                }
            }
        }
        ReplCommand::Slide(n) => {
            if !n.checked_sub(1).map(|i| site.select_slide(i)).unwrap_or(false) {
                println!("No slide {}", n);
                return false;
            }
        }
        ReplCommand::Next => {
            site.next_slide();
        }
        ReplCommand::Scroll(y) => site.scroll_to(y),
        ReplCommand::Menu => site.toggle_menu(),
        ReplCommand::Stats => {
            for section in [StatSection::Headline, StatSection::Expertise] {
                site.reveal_stats(section);
                for reading in site.stats(section).readings() {
                    println!("  {:>8}  {}", reading.value, reading.label);
                }
            }
            return false;
        }
        ReplCommand::Help => {
            println!("{}", HELP);
            return false;
        }
        ReplCommand::Quit => return false,
    }
    true
}

fn print_state(site: &SiteCoordinator, json: bool) -> Result<()> {
    let snapshot = site.snapshot();
    if json {
        println!("{}", serde_json::to_string(&snapshot)?);
    } else {
        let slide = site.carousel().current().map(|s| s.title.as_str());
        println!("{}", render(&snapshot, slide));
    }
    Ok(())
}

fn render(snapshot: &SiteSnapshot, slide: Option<&str>) -> String {
    let mut out = Vec::new();

    let mut header = format!("[{}]", snapshot.view.label());
    if snapshot.navbar.is_scrolled() {
        header.push_str(" (scrolled)");
    }
    if snapshot.navbar.is_menu_open() {
        header.push_str(" (menu open)");
    }
    out.push(header);

    if snapshot.view == View::Home {
        if let Some(title) = slide {
            out.push(format!("  Hero {}: {}", snapshot.slide + 1, title));
        }
    }

    if let ServiceDialog::Open(record) = &snapshot.dialog {
        out.push(format!("  Dialog: {} - {}", record.title, record.description));
    }

    for (i, toast) in snapshot.toasts.iter().enumerate() {
        let marker = match toast.kind {
            ToastKind::Success => "ok",
            ToastKind::Error => "!!",
        };
        out.push(format!("  {} {}. {}", marker, i + 1, toast.message));
    }

    if snapshot.chat_open {
        out.push("  Rehab AI Guide".to_string());
        for message in &snapshot.chat_messages {
            let who = match message.author {
                Author::User => "you",
                Author::Assistant => "guide",
            };
            out.push(format!("    {:>5}: {}", who, message.text));
        }
        if snapshot.chat_awaiting {
            out.push("    guide is typing...".to_string());
        }
    }

    out.join("\n")
}
