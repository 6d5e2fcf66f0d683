// Wire protocol: `|`-delimited JSON frames, the init handshake message, and
// the start control token.

use crate::event::Event;
use crate::world::WorldSnapshot;
use thiserror::Error;

pub const FRAME_DELIMITER: char = '|';

/// Control token broadcast once the last peer slot fills.
pub const START_TOKEN: &str = "start";

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A frame that is not valid JSON for any known event kind. Unknown
    /// discriminators land here too; they are fatal to the session because
    /// skipping an event desynchronizes the peers for good.
    #[error("malformed event frame: {0}")]
    MalformedEvent(#[from] serde_json::Error),
    #[error("malformed init message")]
    MalformedInit,
}

pub fn encode_event(event: &Event) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(event)?)
}

pub fn decode_event(frame: &str) -> Result<Event, ProtocolError> {
    Ok(serde_json::from_str(frame.trim())?)
}

/// `<world-state-json>|<assigned-roster-index>`, sent once per connection.
pub fn encode_init(snapshot: &WorldSnapshot, index: usize) -> Result<String, ProtocolError> {
    Ok(format!(
        "{}{}{}",
        serde_json::to_string(snapshot)?,
        FRAME_DELIMITER,
        index
    ))
}

pub fn decode_init(message: &str) -> Result<(WorldSnapshot, usize), ProtocolError> {
    // The writer path terminates every message with the frame delimiter, so
    // the index may arrive as `|<index>|`. Strip the terminator before
    // splitting off the index.
    let (json, index) = message
        .trim()
        .trim_end_matches(FRAME_DELIMITER)
        .rsplit_once(FRAME_DELIMITER)
        .ok_or(ProtocolError::MalformedInit)?;
    let snapshot = serde_json::from_str(json)?;
    let index = index
        .trim()
        .parse()
        .map_err(|_| ProtocolError::MalformedInit)?;
    Ok((snapshot, index))
}

/// Reassembles delimiter-separated frames from raw socket reads, carrying a
/// partial trailing frame over to the next read.
#[derive(Debug, Default)]
pub struct FrameReader {
    pending: String,
}

impl FrameReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &str) {
        self.pending.push_str(chunk);
    }

    /// Next complete frame, skipping empty ones. `None` once only a partial
    /// frame (or nothing) remains buffered.
    pub fn next_frame(&mut self) -> Option<String> {
        while let Some(position) = self.pending.find(FRAME_DELIMITER) {
            let mut frame: String = self.pending.drain(..=position).collect();
            frame.pop();
            let frame = frame.trim().to_string();
            if !frame.is_empty() {
                return Some(frame);
            }
        }
        None
    }
}
