mod highlighter;
mod prompt;
mod repl;

use core::fmt;
use std::io::{self, IsTerminal, Read, Write};

use tokio::{select, signal};
use tracing::debug;

use self::repl::{Action, Repl};
use crate::assistant::{ResponseEngine, SUGGESTED_PROMPTS};
use crate::chat::{ChatMessage, Origin};
use crate::color::{self, MaybePaint};
use crate::config::{self, Config};
use crate::session::{ConversationSession, Latency};
use crate::{die, version, warn, ChatArgs};
use prompt::{bot_prompt, user_prompt};

/// Anything the chat prints to the terminal
pub(crate) enum Output<'m> {
    Chat(&'m ChatMessage),
    /// Dimmed help text that is not part of the conversation
    Hint(String),
}

impl Output<'_> {
    pub(crate) fn hint(msg: String) -> Self {
        Output::Hint(msg)
    }
}

impl fmt::Display for Output<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Chat(message) => match message.origin() {
                Origin::User => write!(f, "{}{}", user_prompt(), message.text()),
                Origin::Bot => write!(f, "{}{}", bot_prompt(), message.text()),
            },
            Output::Hint(msg) => {
                write!(f, "{}", color::HINT.maybe_paint(msg.as_str()))
            }
        }
    }
}

pub(super) fn print_help() {
    let lines = [
        "/prompts    show the suggested questions",
        "/1 ... /5   ask a suggested question",
        "/restart    start a new conversation",
        "/exit       leave the chat (or Ctrl-D)",
        "Ctrl-C while the assistant is typing cancels the reply.",
    ];

    for line in lines {
        println!("{}", Output::hint(line.to_string()));
    }
}

pub(super) fn print_suggested_prompts() {
    println!("{}", Output::hint("Suggested questions:".to_string()));

    for (i, prompt) in SUGGESTED_PROMPTS.iter().enumerate() {
        println!("{}", Output::hint(format!("  /{}  {}", i + 1, prompt)));
    }
}

fn flush_or_die() {
    if let Err(err) = io::stdout().flush() {
        die!("failed to flush the output stream: {}", err);
    }
}

pub(crate) async fn chat_cmd(config: &Config, args: &ChatArgs) {
    let in_terminal = io::stdin().is_terminal();
    let out_terminal = io::stdout().is_terminal();

    // If standard input is a terminal and interactive mode has not been specified,
    // gather input from standard input with the assumption that we are not running interactively.
    let interactive = if args.prompt.is_some() {
        args.interactive
    } else {
        in_terminal && out_terminal
    };

    if args.prompt.is_some() && !in_terminal {
        die!("it appears that an initial prompt is being provided both through standard input and the prompt argument");
    }

    // Obtain the initial prompt, either from standard input or from a positional argument.
    let initial_prompt = if let Some(prompt) = &args.prompt {
        Some(prompt.clone())
    } else if !in_terminal {
        let mut buf = String::new();

        if let Err(err) = io::stdin().read_to_string(&mut buf) {
            die!("failed to read the initial prompt from standard input: {}", err);
        }

        Some(buf)
    } else {
        None
    };

    let engine = ResponseEngine::default();
    let latency = config.latency();

    debug!(?latency, interactive, "starting a chat");

    if interactive {
        chat(config.keybindings, engine, latency, initial_prompt).await;
    } else if let Some(prompt) = initial_prompt {
        ask_once(engine, latency, &prompt).await;
    }
}

/// Answers a single utterance and prints the reply alone.
async fn ask_once(engine: ResponseEngine, latency: Latency, utterance: &str) {
    let mut session = ConversationSession::start(engine, latency);

    let seen = session.len();

    if session.submit(utterance).is_none() {
        warn!("the prompt is empty, there is nothing to ask");
        return;
    }

    session.settle().await;

    for message in session.messages_since(seen) {
        if message.origin() == Origin::Bot {
            println!("{}", message.text());
        }
    }
}

/// Submits `text` and waits for the reply, printing it as soon as it lands.
/// `seen` counts the transcript entries already on screen.
async fn exchange(session: &mut ConversationSession, text: &str, echo: bool, seen: &mut usize) {
    let position = match session.submit(text) {
        Some(id) => id.value() as usize,
        None => return,
    };

    if echo {
        if let Some(message) = session.messages_since(position).first() {
            println!("{}", Output::Chat(message));
        }
    }

    // The reply may already be in on a multi-threaded runtime, so only the
    // user's own message counts as seen
    *seen = position + 1;

    // The prompt goes out right away, the reply follows after the latency
    print!("{}", bot_prompt());
    flush_or_die();

    let interrupted = select! {
        _ = session.settle() => false,
        _ = signal::ctrl_c() => true,
    };

    if interrupted {
        session.cancel_pending();
        session.settle().await;

        println!();
        println!("{}\n", Output::hint("(reply cancelled)".to_string()));
    }

    for message in session.messages_since(*seen) {
        debug!(id = %message.id(), origin = %message.origin(), "printing a message");
        println!("{}\n", message.text());
    }

    *seen = session.len();
}

fn greet(session: &ConversationSession) -> usize {
    for message in session.transcript() {
        println!("{}\n", Output::Chat(&message));
    }

    print_suggested_prompts();
    println!();

    session.len()
}

async fn chat(
    keybindings: config::Keybindings,
    engine: ResponseEngine,
    latency: Latency,
    initial_prompt: Option<String>,
) {
    println!("{} version {}", version::NAME, version::VERSION);
    println!("{}\n", Output::hint("Type /help for commands.".to_string()));

    let mut session = ConversationSession::start(engine, latency);

    let mut seen = greet(&session);

    if let Some(prompt) = initial_prompt {
        exchange(&mut session, &prompt, true, &mut seen).await;
    }

    let mut repl = Repl::new(keybindings);

    loop {
        match repl.next_action() {
            Action::Submit { text, echo } => {
                exchange(&mut session, &text, echo, &mut seen).await;
            }
            Action::Restart => {
                if session.is_pending() {
                    debug!("discarding replies still in flight");
                }

                // Dropping the old session cancels anything it still owes
                session = ConversationSession::start(engine, latency);
                seen = greet(&session);
            }
            Action::Exit => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ColorMode;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_output_rendering() {
        color::configure_color(ColorMode::Off);

        let mut session =
            ConversationSession::start(ResponseEngine::default(), Latency::fixed(Duration::ZERO));

        session.submit("nego");
        session.settle().await;

        let rendered: Vec<String> = session
            .transcript()
            .iter()
            .map(|m| Output::Chat(m).to_string())
            .collect();

        assert!(rendered[0].starts_with("[assistant] Halo!"));
        assert_eq!(rendered[1], "[you] nego");
        assert!(rendered[2].starts_with("[assistant] Anda bisa melakukan negosiasi"));

        assert_eq!(Output::hint("/help".to_string()).to_string(), "/help");
    }
}
