//! Newline-delimited JSON tab events.

use crate::error::AppError;
use crate::model::TabEvent;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Split};

/// Parses one input line. Blank lines carry no event.
pub fn parse_event_line(line_number: usize, line: &str) -> Result<Option<TabEvent>, AppError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line)
        .map(Some)
        .map_err(|source| AppError::InvalidEvent {
            line: line_number,
            source,
        })
}

/// Reads [`TabEvent`]s one line at a time.
pub struct EventReader<R> {
    lines: Split<R>,
    line_number: usize,
}

impl<R: AsyncBufRead + Unpin> EventReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.split(b'\n'),
            line_number: 0,
        }
    }

    /// The next event, `Ok(None)` at end of input. A malformed or non-UTF-8
    /// line is returned as an error; reading can continue after it.
    pub async fn next_event(&mut self) -> Result<Option<TabEvent>, AppError> {
        while let Some(bytes) = self.lines.next_segment().await? {
            self.line_number += 1;
            let line = String::from_utf8(bytes).map_err(|_| AppError::UnreadableLine {
                line: self.line_number,
            })?;
            if let Some(event) = parse_event_line(self.line_number, &line)? {
                return Ok(Some(event));
            }
        }
        Ok(None)
    }

    /// Hands every readable event to `on_event` until input ends. Bad lines
    /// are skipped; any other read error stops reading. Returns how many
    /// events were delivered.
    pub async fn forward_events<F: FnMut(TabEvent)>(&mut self, mut on_event: F) -> usize {
        let mut delivered = 0;
        loop {
            match self.next_event().await {
                Ok(Some(event)) => {
                    delivered += 1;
                    on_event(event);
                }
                Ok(None) => break,
                Err(e) if e.is_skippable_input() => log::warn!("Skipping input: {}", e),
                Err(e) => {
                    log::error!("Stopped reading events after line {}: {}", self.line_number, e);
                    break;
                }
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TabStatus;
    use pretty_assertions::assert_eq;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::{AsyncRead, BufReader, ReadBuf};

    /// Yields `data`, then fails every later read.
    struct BrokenInput {
        data: Option<Vec<u8>>,
    }

    impl AsyncRead for BrokenInput {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            match self.data.take() {
                Some(data) => {
                    buf.put_slice(&data);
                    Poll::Ready(Ok(()))
                }
                None => Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))),
            }
        }
    }

    #[tokio::test]
    async fn test_reads_events_and_skips_blank_lines() {
        let input = concat!(
            "{\"tabId\":1,\"status\":\"loading\",\"url\":\"https://example.com/\"}\n",
            "\n",
            "{\"tabId\":1,\"status\":\"complete\",\"url\":\"https://example.com/\"}\n",
        );
        let mut reader = EventReader::new(input.as_bytes());

        let first = reader.next_event().await.unwrap().unwrap();
        assert_eq!(first.status, Some(TabStatus::Loading));

        let second = reader.next_event().await.unwrap().unwrap();
        assert_eq!(second, TabEvent::complete(1, "https://example.com/"));

        assert!(reader.next_event().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_line_reports_its_number() {
        let input = "\n{not json}\n{\"tabId\":2,\"status\":\"complete\"}\n";
        let mut reader = EventReader::new(input.as_bytes());

        match reader.next_event().await {
            Err(AppError::InvalidEvent { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected InvalidEvent, got {:?}", other),
        }

        let event = reader.next_event().await.unwrap().unwrap();
        assert_eq!(event.tab_id, 2);
        assert_eq!(event.trigger_url(), None);
    }

    #[tokio::test]
    async fn test_non_utf8_line_is_skippable() {
        let mut input = Vec::new();
        input.extend_from_slice(b"{\"tabId\":1,\"status\":\"complete\",\"url\":\"https://example.com/\"}\n");
        input.extend_from_slice(b"\xff\xfe garbage\n");
        input.extend_from_slice(b"{\"tabId\":3,\"status\":\"complete\",\"url\":\"https://docs.rs/\"}\r\n");
        let mut reader = EventReader::new(input.as_slice());

        let first = reader.next_event().await.unwrap().unwrap();
        assert_eq!(first.tab_id, 1);

        let err = reader.next_event().await.unwrap_err();
        assert!(err.is_skippable_input());
        match err {
            AppError::UnreadableLine { line } => assert_eq!(line, 2),
            other => panic!("expected UnreadableLine, got {:?}", other),
        }

        let third = reader.next_event().await.unwrap().unwrap();
        assert_eq!(third, TabEvent::complete(3, "https://docs.rs/"));
        assert!(reader.next_event().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_forwarding_skips_bad_lines() {
        let mut input = Vec::new();
        input.extend_from_slice(b"{\"tabId\":1,\"status\":\"complete\",\"url\":\"https://example.com/\"}\n");
        input.extend_from_slice(b"\xc3\x28\n");
        input.extend_from_slice(b"{oops}\n");
        input.extend_from_slice(b"{\"tabId\":2,\"status\":\"complete\",\"url\":\"https://docs.rs/\"}\n");
        let mut reader = EventReader::new(input.as_slice());

        let mut seen = Vec::new();
        let delivered = reader.forward_events(|event| seen.push(event.tab_id)).await;

        assert_eq!(delivered, 2);
        assert_eq!(seen, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_forwarding_stops_at_a_read_error_keeping_earlier_events() {
        let input = BrokenInput {
            data: Some(b"{\"tabId\":5,\"status\":\"complete\",\"url\":\"https://example.com/\"}\n".to_vec()),
        };
        let mut reader = EventReader::new(BufReader::new(input));

        let mut seen = Vec::new();
        let delivered = reader.forward_events(|event| seen.push(event)).await;

        assert_eq!(delivered, 1);
        assert_eq!(seen, vec![TabEvent::complete(5, "https://example.com/")]);
    }
}
