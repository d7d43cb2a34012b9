//! Type definitions for chat primitives
//!

use std::fmt;

/// The author of a `ChatMessage`
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Origin {
    /// A message typed (or picked from the suggested prompts) by the user
    User,

    /// A message produced by the scripted assistant
    Bot,
}

/// Identifier of a message within one transcript. Identifiers are handed out
/// in append order, so comparing two of them compares their position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct MessageId(u64);

impl MessageId {
    pub(crate) fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A `ChatMessage` in a conversation. Once created it is never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChatMessage {
    id: MessageId,
    origin: Origin,
    text: String,
}

impl ChatMessage {
    pub(crate) fn id(&self) -> MessageId {
        self.id
    }

    pub(crate) fn origin(&self) -> Origin {
        self.origin
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }
}

/// The append-only log of a conversation, in display order.
#[derive(Debug, Default)]
pub(crate) struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub(crate) fn new() -> Transcript {
        Transcript::default()
    }

    /// Appends a message and returns the identifier assigned to it.
    ///
    /// `text` must not be empty.
    pub(crate) fn append(&mut self, origin: Origin, text: String) -> MessageId {
        debug_assert!(!text.is_empty(), "chat messages cannot be empty");

        let id = MessageId(self.messages.len() as u64);

        self.messages.push(ChatMessage { id, origin, text });

        id
    }

    pub(crate) fn len(&self) -> usize {
        self.messages.len()
    }

    pub(crate) fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_follow_append_order() {
        let mut transcript = Transcript::new();

        let first = transcript.append(Origin::Bot, "Halo!".to_string());
        let second = transcript.append(Origin::User, "dp".to_string());
        let third = transcript.append(Origin::Bot, "DP minimal".to_string());

        assert!(first < second && second < third);
        assert_eq!(transcript.len(), 3);

        let origins: Vec<Origin> = transcript.messages().iter().map(|m| m.origin()).collect();
        assert_eq!(origins, [Origin::Bot, Origin::User, Origin::Bot]);

        assert_eq!(transcript.messages()[1].text(), "dp");
        assert_eq!(transcript.messages()[2].id(), third);
    }

    #[test]
    fn test_multiline_text_is_kept() {
        let mut transcript = Transcript::new();

        transcript.append(Origin::Bot, "satu\ndua".to_string());

        assert_eq!(transcript.messages()[0].text(), "satu\ndua");
    }
}
