use std::{
    collections::{HashSet, VecDeque},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use chrono::Duration;
use shared::{
    domain::{Message, MessageId, MessageType, CURRENT_USER},
    error::ValidationError,
    validation::{normalize_optional_text, validate_message_content, validate_stored_message},
};
use tracing::{info, warn};

use crate::{next_id_after, Clock};

/// Team feed for one session, newest first. Messages never change once sent.
pub struct MessageStore {
    messages: VecDeque<Message>,
    next_id: i64,
    default_author: String,
    clock: Arc<dyn Clock>,
}

impl MessageStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            messages: VecDeque::new(),
            next_id: 1,
            default_author: CURRENT_USER.to_string(),
            clock,
        }
    }

    /// Each record must carry non-blank content, as `send` requires.
    pub fn from_records(clock: Arc<dyn Clock>, records: Vec<Message>) -> Result<Self> {
        let next_id = next_id_after("message", records.iter().map(|m| m.id.0))?;
        let mut seen = HashSet::with_capacity(records.len());
        for message in &records {
            if !seen.insert(message.id) {
                bail!("duplicate message id {} in restored records", message.id);
            }
            validate_stored_message(message)
                .with_context(|| format!("restored message {} is invalid", message.id))?;
        }
        Ok(Self {
            messages: records.into(),
            next_id,
            default_author: CURRENT_USER.to_string(),
            clock,
        })
    }

    /// Sample feed, timestamped relative to the clock's current instant.
    pub fn seeded(clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        let messages: VecDeque<Message> = SEED_MESSAGES
            .iter()
            .zip(1..)
            .map(|(&(author, content, hours_ago, kind), id)| Message {
                id: MessageId(id),
                author: author.to_string(),
                content: content.to_string(),
                timestamp: now - Duration::hours(hours_ago),
                kind,
            })
            .collect();
        let next_id = messages.len() as i64 + 1;
        Self {
            messages,
            next_id,
            default_author: CURRENT_USER.to_string(),
            clock,
        }
    }

    pub fn with_default_author(mut self, author: impl Into<String>) -> Self {
        self.default_author = author.into();
        self
    }

    pub fn list(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn latest(&self) -> Option<&Message> {
        self.messages.front()
    }

    /// Posts to the feed. Content is stored trimmed; type defaults to `update`.
    pub fn send(
        &mut self,
        content: &str,
        author: Option<&str>,
        kind: Option<MessageType>,
    ) -> Result<Message, ValidationError> {
        let content = validate_message_content(content).inspect_err(|_| {
            warn!("rejected empty message");
        })?;

        let message = Message {
            id: MessageId(self.next_id),
            author: normalize_optional_text(author).unwrap_or_else(|| self.default_author.clone()),
            content,
            timestamp: self.clock.now(),
            kind: kind.unwrap_or_default(),
        };
        self.next_id += 1;
        self.messages.push_front(message.clone());
        info!(message_id = %message.id, kind = %message.kind, "message sent");
        Ok(message)
    }
}

const SEED_MESSAGES: [(&str, &str, i64, MessageType); 5] = [
    (
        "Dr. Mohammed Ismail, P.hD",
        "Excellent progress across all sites! Engr. Sunday technical oversight has been outstanding. Terracing work is ahead of schedule.",
        2,
        MessageType::Milestone,
    ),
    (
        "Supervisor James Okoro",
        "Weather alert: Heavy rains expected next week. Please secure all materials and equipment. Engr. Sunday, can you coordinate?",
        4,
        MessageType::Alert,
    ),
    (
        "Engr. Sunday Adaogoshi Eya",
        "Completed soil stabilization survey on 1.8 hectares at Lafia site. All measurements documented. Report submitted.",
        6,
        MessageType::Update,
    ),
    (
        "Engr. Sunday Adaogoshi Eya",
        "Team coordination meeting scheduled for tomorrow at 10 AM. Please confirm attendance. Will discuss Phase 2 implementation.",
        8,
        MessageType::Update,
    ),
    (
        "Dr. Mohammed Ismail, P.hD",
        "Nasarawa site reached 85% completion! Fantastic technical execution by Engr. Sunday and the entire team.",
        24,
        MessageType::Milestone,
    ),
];

#[cfg(test)]
#[path = "tests/messages_tests.rs"]
mod tests;
