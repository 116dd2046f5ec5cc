//! Synthetic SSE streaming over an already-complete response
//!
//! [`StreamEmulator`] turns final message content into the chunk sequence a
//! live `OpenAI` stream would have produced: a role chunk, fixed-size text
//! fragments, an optional full-content chunk for multimodal messages, a
//! terminal chunk and the `[DONE]` sentinel. Frames are produced one per
//! `next()` call so the transport drives production.

use std::iter::FusedIterator;

use crate::normalize::unix_now;
use crate::types::{CHUNK_OBJECT, ChunkChoice, ContentPart, Delta, MessageContent, StreamChunk, StreamFrame};

/// Characters per text fragment
pub const FRAGMENT_CHARS: usize = 10;

const FINISH_STOP: &str = "stop";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Role,
    Fragments,
    FullContent,
    Terminal,
    Sentinel,
    Finished,
}

/// Lazy, single-pass generator of streaming frames
///
/// Replaying a stream requires building a new emulator from the same
/// content.
#[derive(Debug, Clone)]
pub struct StreamEmulator {
    id: String,
    model: String,
    created: u64,
    stage: Stage,
    text: String,
    cursor: usize,
    full_content: Option<Vec<ContentPart>>,
}

impl StreamEmulator {
    /// Build an emulator for `content`, stamped with the current time
    ///
    /// String content is fragmented as a whole. For a parts array only the
    /// first text part is fragmented, and the whole array is sent once more
    /// in a single chunk when it contains an image.
    pub fn new(content: MessageContent, model: impl Into<String>, id: impl Into<String>) -> Self {
        let text = content.first_text().unwrap_or_default().to_owned();
        let has_image = content.has_image();
        let full_content = match content {
            MessageContent::Parts(parts) if has_image => Some(parts),
            _ => None,
        };

        Self {
            id: id.into(),
            model: model.into(),
            created: unix_now(),
            stage: Stage::Role,
            text,
            cursor: 0,
            full_content,
        }
    }

    /// Override the `created` timestamp shared by every chunk
    #[must_use]
    pub const fn with_created(mut self, created: u64) -> Self {
        self.created = created;
        self
    }

    fn chunk(&self, delta: Delta, finish_reason: Option<&str>) -> StreamFrame {
        StreamFrame::Chunk(StreamChunk {
            id: self.id.clone(),
            object: CHUNK_OBJECT.to_owned(),
            created: self.created,
            model: self.model.clone(),
            choices: vec![ChunkChoice {
                index: 0,
                delta,
                finish_reason: finish_reason.map(str::to_owned),
            }],
        })
    }

    /// Next slice of at most `FRAGMENT_CHARS` characters
    fn next_fragment(&mut self) -> Option<String> {
        let rest = &self.text[self.cursor..];
        if rest.is_empty() {
            return None;
        }

        let end = rest.char_indices().nth(FRAGMENT_CHARS).map_or(rest.len(), |(i, _)| i);
        let fragment = rest[..end].to_owned();
        self.cursor += end;
        Some(fragment)
    }

    fn remaining(&self) -> usize {
        let fragments = self.text[self.cursor..].chars().count().div_ceil(FRAGMENT_CHARS);
        let full_content = usize::from(self.full_content.is_some());

        match self.stage {
            Stage::Role => 1 + fragments + full_content + 2,
            Stage::Fragments => fragments + full_content + 2,
            Stage::FullContent => full_content + 2,
            Stage::Terminal => 2,
            Stage::Sentinel => 1,
            Stage::Finished => 0,
        }
    }
}

impl Iterator for StreamEmulator {
    type Item = StreamFrame;

    fn next(&mut self) -> Option<StreamFrame> {
        loop {
            match self.stage {
                Stage::Role => {
                    self.stage = Stage::Fragments;
                    return Some(self.chunk(Delta::role(), None));
                }
                Stage::Fragments => {
                    if let Some(fragment) = self.next_fragment() {
                        return Some(self.chunk(Delta::fragment(fragment), None));
                    }
                    self.stage = Stage::FullContent;
                }
                Stage::FullContent => {
                    self.stage = Stage::Terminal;
                    if let Some(parts) = self.full_content.take() {
                        return Some(self.chunk(Delta::parts(parts), None));
                    }
                }
                Stage::Terminal => {
                    self.stage = Stage::Sentinel;
                    return Some(self.chunk(Delta::default(), Some(FINISH_STOP)));
                }
                Stage::Sentinel => {
                    self.stage = Stage::Finished;
                    return Some(StreamFrame::Done);
                }
                Stage::Finished => return None,
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for StreamEmulator {}

impl FusedIterator for StreamEmulator {}
