use nu_ansi_term::AnsiString;
use reedline::{self, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus, PromptViMode};
use std::borrow::Cow;

use crate::color::{self, MaybePaint};

const YOU: &str = "[you] ";
const YOU_VI_NORMAL: &str = "[you:n] ";
const CONTINUATION: &str = "  ... ";
const COMPLETION_MARKER: &str = "[/] ";
const ASSISTANT: &str = "[assistant] ";

pub(crate) fn bot_prompt() -> AnsiString<'static> {
    color::ASSISTANT_PROMPT.maybe_paint(ASSISTANT)
}

pub(crate) fn user_prompt() -> AnsiString<'static> {
    color::USER_PROMPT.maybe_paint(YOU)
}

pub(crate) fn completion_marker() -> AnsiString<'static> {
    color::USER_PROMPT.maybe_paint(COMPLETION_MARKER)
}

/// The line editor prompt. The labels are painted once, since the color
/// mode is fixed before the chat starts. Vi insert mode shares the plain
/// `[you] ` label.
pub(crate) struct Prompt {
    user: String,
    vi_normal: String,
    continuation: String,
}

impl Default for Prompt {
    fn default() -> Self {
        Prompt {
            user: user_prompt().to_string(),
            vi_normal: color::USER_PROMPT.maybe_paint(YOU_VI_NORMAL).to_string(),
            continuation: color::USER_PROMPT.maybe_paint(CONTINUATION).to_string(),
        }
    }
}

impl reedline::Prompt for Prompt {
    fn render_prompt_left(&self) -> Cow<str> {
        Cow::Borrowed("")
    }

    fn render_prompt_right(&self) -> Cow<str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, prompt_mode: PromptEditMode) -> Cow<str> {
        match prompt_mode {
            PromptEditMode::Vi(PromptViMode::Normal) => Cow::Borrowed(&self.vi_normal),
            _ => Cow::Borrowed(&self.user),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<str> {
        Cow::Borrowed(&self.continuation)
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<str> {
        let label = match history_search.status {
            PromptHistorySearchStatus::Passing => "search",
            PromptHistorySearchStatus::Failing => "no match",
        };

        Cow::Owned(format!("({}: {}) ", label, history_search.term))
    }
}
