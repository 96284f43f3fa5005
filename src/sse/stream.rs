//! Byte stream to event stream adapter
//!
//! Glues the [`FrameDecoder`] and [`parse_event_line`] onto a response body so
//! callers consume typed events instead of bytes.

use std::collections::VecDeque;

use futures_util::stream::{self, Stream};
use futures_util::StreamExt;

use crate::sse::decoder::FrameDecoder;
use crate::sse::events::StreamEvent;
use crate::sse::parser::parse_event_line;
use crate::traits::{ByteStream, HttpError};

struct DecodeState {
    body: ByteStream,
    decoder: FrameDecoder,
    ready: VecDeque<StreamEvent>,
    finished: bool,
}

/// Turn a response body into a stream of typed events.
///
/// Events come out in exactly the order their lines appear in the body.
/// Unparsable lines are skipped. The stream ends after `Done`, after the
/// body ends, or after the first transport error (yielded as `Err`); lines
/// buffered behind a `Done` are never yielded.
pub fn event_stream(body: ByteStream) -> impl Stream<Item = Result<StreamEvent, HttpError>> + Send {
    let state = DecodeState {
        body,
        decoder: FrameDecoder::new(),
        ready: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.ready.pop_front() {
                if event.is_terminal() {
                    state.finished = true;
                    state.ready.clear();
                    state.decoder.reset();
                }
                return Some((Ok(event), state));
            }

            if state.finished {
                return None;
            }

            match state.body.next().await {
                Some(Ok(chunk)) => {
                    for line in state.decoder.feed(&chunk) {
                        if let Some(event) = parse_event_line(&line) {
                            let terminal = event.is_terminal();
                            state.ready.push_back(event);
                            if terminal {
                                break;
                            }
                        }
                    }
                }
                Some(Err(e)) => {
                    state.finished = true;
                    state.decoder.reset();
                    return Some((Err(e), state));
                }
                None => {
                    state.decoder.finish();
                    state.finished = true;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn body(chunks: Vec<&'static [u8]>) -> ByteStream {
        Box::pin(futures_util::stream::iter(
            chunks.into_iter().map(|c| Ok(Bytes::from_static(c))),
        ))
    }

    async fn collect(body: ByteStream) -> Vec<Result<StreamEvent, HttpError>> {
        event_stream(body).collect().await
    }

    #[tokio::test]
    async fn test_agent_event_split_mid_field() {
        let events = collect(body(vec![
            b"data: {\"type\":\"agent\",\"age",
            b"nt\":\"CFO\",\"agent_key\":\"cfo\"}\n",
        ]))
        .await;

        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].as_ref().unwrap(),
            &StreamEvent::AgentStart {
                agent_display_name: "CFO".to_string(),
                agent_key: "cfo".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_nothing_after_done() {
        let events = collect(body(vec![
            b"data: {\"type\":\"text\",\"content\":\"a\"}\n\ndata: {\"type\":\"done\"}\n\ndata: {\"type\":\"text\",\"content\":\"late\"}\n",
            b"data: {\"type\":\"text\",\"content\":\"later\"}\n",
        ]))
        .await;

        let events: Vec<StreamEvent> = events.into_iter().map(|e| e.unwrap()).collect();
        assert_eq!(
            events,
            vec![
                StreamEvent::TextDelta {
                    content: "a".to_string()
                },
                StreamEvent::Done
            ]
        );
    }

    #[tokio::test]
    async fn test_garbage_lines_do_not_abort() {
        let events = collect(body(vec![
            b"foo bar\n",
            b"data: not-json\n",
            b": keep-alive\n",
            b"data: {\"type\":\"text\",\"content\":\"ok\"}\n",
        ]))
        .await;

        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            Ok(StreamEvent::TextDelta { ref content }) if content == "ok"
        ));
    }

    #[tokio::test]
    async fn test_unterminated_last_line_is_dropped() {
        let events = collect(body(vec![
            b"data: {\"type\":\"text\",\"content\":\"a\"}\n",
            b"data: {\"type\":\"done\"}",
        ]))
        .await;

        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_ends_stream() {
        let chunks: Vec<Result<Bytes, HttpError>> = vec![
            Ok(Bytes::from_static(b"data: {\"type\":\"text\",\"content\":\"a\"}\n")),
            Err(HttpError::Io("connection reset".to_string())),
            Ok(Bytes::from_static(b"data: {\"type\":\"text\",\"content\":\"b\"}\n")),
        ];
        let events = collect(Box::pin(futures_util::stream::iter(chunks))).await;

        assert_eq!(events.len(), 2);
        assert!(events[0].is_ok());
        assert!(matches!(events[1], Err(HttpError::Io(_))));
    }
}
