use reedline::{
    default_emacs_keybindings, default_vi_insert_keybindings, default_vi_normal_keybindings,
    ColumnarMenu, DefaultCompleter, EditCommand, EditMode, Emacs, KeyCode, KeyModifiers,
    MenuBuilder, Reedline, ReedlineEvent, ReedlineMenu, Signal, Vi,
};

use crate::assistant::SUGGESTED_PROMPTS;
use crate::{config, error, warn};
use nu_ansi_term::{Color, Style};

use super::highlighter::Highlighter;
use super::prompt::{completion_marker, Prompt};
use super::{print_help, print_suggested_prompts};

/// A slash command typed at the chat prompt
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Exit,
    Help,
    Prompts,
    Restart,
    /// Submit the suggested prompt at this (zero-based) index
    Suggested(usize),
    Unknown(String),
}

impl Command {
    /// Parses a line of input as a slash command. Returns `None` when the line
    /// is an utterance for the assistant.
    pub(crate) fn parse(line: &str) -> Option<Command> {
        let command = line.trim().strip_prefix('/')?;

        let parsed = match command {
            "exit" | "quit" => Command::Exit,
            "help" => Command::Help,
            "prompts" => Command::Prompts,
            "restart" => Command::Restart,
            number => match number.parse::<usize>() {
                Ok(n) if (1..=SUGGESTED_PROMPTS.len()).contains(&n) => Command::Suggested(n - 1),
                _ => Command::Unknown(line.trim().to_string()),
            },
        };

        Some(parsed)
    }
}

/// What the chat loop should do next
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Action {
    /// Hand the text to the assistant. `echo` is set when the text is not
    /// what the user typed (a suggested prompt) and should be printed.
    Submit { text: String, echo: bool },
    Restart,
    Exit,
}

fn completion_commands() -> Vec<String> {
    let mut commands: Vec<String> = ["/exit", "/help", "/prompts", "/restart"]
        .iter()
        .map(|c| c.to_string())
        .collect();

    commands.extend((1..=SUGGESTED_PROMPTS.len()).map(|n| format!("/{}", n)));

    commands
}

fn edit_mode(keybindings: config::Keybindings) -> Box<dyn EditMode> {
    let complete = ReedlineEvent::UntilFound(vec![
        ReedlineEvent::Menu("completion_menu".to_string()),
        ReedlineEvent::MenuNext,
    ]);

    match keybindings {
        config::Keybindings::Vi => {
            let mut insert_bindings = default_vi_insert_keybindings();

            insert_bindings.add_binding(KeyModifiers::NONE, KeyCode::Tab, complete);

            Box::new(Vi::new(insert_bindings, default_vi_normal_keybindings()))
        }
        config::Keybindings::Emacs => {
            let mut keybindings = default_emacs_keybindings();

            keybindings.add_binding(KeyModifiers::NONE, KeyCode::Tab, complete);

            keybindings.add_binding(
                KeyModifiers::CONTROL,
                KeyCode::Char('j'),
                ReedlineEvent::Edit(vec![EditCommand::InsertNewline]),
            );

            Box::new(Emacs::new(keybindings))
        }
    }
}

pub(crate) struct Repl {
    line_editor: Reedline,
    prompt: Prompt,
}

impl Repl {
    pub(crate) fn new(keybindings: config::Keybindings) -> Repl {
        let prompt = Prompt::default();

        let mut completer = Box::new(DefaultCompleter::with_inclusions(&['/']));

        completer.insert(completion_commands());

        // Use the interactive menu to select options from the completer
        let completion_menu = Box::new(
            ColumnarMenu::default()
                .with_name("completion_menu")
                .with_marker(&completion_marker().to_string())
                .with_text_style(Style::new().fg(Color::Default))
                .with_selected_text_style(Style::new().fg(Color::Blue).on(Color::DarkGray))
                .with_selected_match_text_style(
                    Style::new().fg(Color::Blue).bold().on(Color::DarkGray),
                ),
        );

        let line_editor = Reedline::create()
            .with_completer(completer)
            .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
            .with_edit_mode(edit_mode(keybindings))
            .with_highlighter(Box::new(Highlighter::default()));

        Repl {
            line_editor,
            prompt,
        }
    }

    /// Reads lines until one of them calls for an action. Informational
    /// commands are handled here.
    pub(crate) fn next_action(&mut self) -> Action {
        loop {
            let sig = self.line_editor.read_line(&self.prompt);

            match sig {
                Ok(Signal::Success(line)) => match Command::parse(&line) {
                    None => {
                        return Action::Submit {
                            text: line,
                            echo: false,
                        }
                    }
                    Some(Command::Exit) => return Action::Exit,
                    Some(Command::Restart) => return Action::Restart,
                    Some(Command::Help) => print_help(),
                    Some(Command::Prompts) => print_suggested_prompts(),
                    Some(Command::Suggested(i)) => {
                        return Action::Submit {
                            text: SUGGESTED_PROMPTS[i].to_string(),
                            echo: true,
                        }
                    }
                    Some(Command::Unknown(command)) => {
                        warn!("unknown command \"{}\", try /help", command);
                    }
                },
                Ok(Signal::CtrlD) => return Action::Exit,
                Ok(Signal::CtrlC) => continue,
                Err(err) => {
                    error!("failed to read input: {}", err);
                    return Action::Exit;
                }
                #[allow(unreachable_patterns)]
                _ => return Action::Exit,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_utterances() {
        assert_eq!(Command::parse("Berapa DP minimal untuk kredit?"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("harga 1/2 juta"), None);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/exit"), Some(Command::Exit));
        assert_eq!(Command::parse("  /quit "), Some(Command::Exit));
        assert_eq!(Command::parse("/help"), Some(Command::Help));
        assert_eq!(Command::parse("/prompts"), Some(Command::Prompts));
        assert_eq!(Command::parse("/restart"), Some(Command::Restart));
    }

    #[test]
    fn test_parse_suggested() {
        assert_eq!(Command::parse("/1"), Some(Command::Suggested(0)));
        assert_eq!(Command::parse("/5"), Some(Command::Suggested(4)));
        assert_eq!(
            Command::parse("/0"),
            Some(Command::Unknown("/0".to_string()))
        );
        assert_eq!(
            Command::parse("/6"),
            Some(Command::Unknown("/6".to_string()))
        );
        assert_eq!(
            Command::parse("/edit"),
            Some(Command::Unknown("/edit".to_string()))
        );
    }

    #[test]
    fn test_completion_commands() {
        let commands = completion_commands();

        assert!(commands.contains(&"/exit".to_string()));
        assert!(commands.contains(&"/5".to_string()));
        assert!(!commands.contains(&"/6".to_string()));
    }
}
