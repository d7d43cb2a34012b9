//! The scripted response engine behind the chat assistant.
//!
//! The assistant does not understand language. It holds an ordered table of
//! [`Rule`]s, each pairing a keyword [`Predicate`] with a canned reply. An
//! utterance is lowercased and tested against the rules in declaration order;
//! the first rule whose predicate holds supplies the reply. When nothing
//! matches, the engine answers with a fixed fallback that points the user at
//! the suggested prompts.
//!
//! Matching is plain substring containment. No punctuation or diacritics are
//! stripped, so "test-drive" does not match the "test drive" rule.

mod script;

use std::fmt;

use tracing::trace;

pub(crate) use script::SUGGESTED_PROMPTS;

/// The subject a rule answers. Used to name rules in logs and listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum Topic {
    CreditRequirements,
    DownPayment,
    UsedCarBudget,
    PriceNegotiation,
    TestDrive,
}

/// A boolean combination of substring tests over lowercased text.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Predicate {
    /// Holds when the text contains the (lowercase) needle.
    Contains(&'static str),
    /// Holds when every inner predicate holds.
    All(&'static [Predicate]),
    /// Holds when at least one inner predicate holds.
    Any(&'static [Predicate]),
}

impl Predicate {
    /// `text` must already be lowercased.
    pub(crate) fn matches(&self, text: &str) -> bool {
        match self {
            Predicate::Contains(needle) => text.contains(needle),
            Predicate::All(predicates) => predicates.iter().all(|p| p.matches(text)),
            Predicate::Any(predicates) => predicates.iter().any(|p| p.matches(text)),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (predicates, sep) = match self {
            Predicate::Contains(needle) => return write!(f, "\"{}\"", needle),
            Predicate::All(predicates) => (predicates, " & "),
            Predicate::Any(predicates) => (predicates, " | "),
        };

        for (i, predicate) in predicates.iter().enumerate() {
            if i != 0 {
                f.write_str(sep)?;
            }

            match predicate {
                Predicate::Contains(_) => write!(f, "{}", predicate)?,
                _ => write!(f, "({})", predicate)?,
            }
        }

        Ok(())
    }
}

#[derive(Debug)]
pub(crate) struct Rule {
    pub topic: Topic,
    pub predicate: Predicate,
    pub reply: &'static str,
}

/// Maps utterances to replies. Cheap to copy; all of its data is static.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResponseEngine {
    greeting: &'static str,
    rules: &'static [Rule],
    fallback: &'static str,
}

impl Default for ResponseEngine {
    fn default() -> Self {
        ResponseEngine {
            greeting: script::GREETING,
            rules: script::RULES,
            fallback: script::FALLBACK,
        }
    }
}

impl ResponseEngine {
    /// The message a fresh conversation opens with.
    pub(crate) fn greeting(&self) -> &'static str {
        self.greeting
    }

    pub(crate) fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    fn matching_rule(&self, utterance: &str) -> Option<&'static Rule> {
        let text = utterance.to_lowercase();

        self.rules.iter().find(|rule| rule.predicate.matches(&text))
    }

    /// Returns the topic of the first rule matching `utterance`, or `None`
    /// when the utterance falls through to the fallback reply.
    pub(crate) fn classify(&self, utterance: &str) -> Option<Topic> {
        self.matching_rule(utterance).map(|rule| rule.topic)
    }

    /// Returns the reply for `utterance`. Never fails; unmatched input gets
    /// the fallback.
    pub(crate) fn respond(&self, utterance: &str) -> &'static str {
        match self.matching_rule(utterance) {
            Some(rule) => {
                trace!(topic = %rule.topic, "utterance matched a rule");
                rule.reply
            }
            None => {
                trace!("utterance matched no rule");
                self.fallback
            }
        }
    }
}
