use super::{parse_note_value, ApiError, ApiResult};
use crate::gateway::{ChangeKind, NoteStream};
use crate::models::Note;
use futures::channel::mpsc;
use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use std::task::{Context, Poll};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventSource, MessageEvent};

/// Server-sent event feed bridged into a stream of notes.
///
/// Dropping the stream closes the underlying `EventSource`, which is how the
/// store unsubscribes. Reconnects are left to the browser.
struct EventSourceStream {
    rx: mpsc::UnboundedReceiver<Note>,
    source: EventSource,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
}

impl Stream for EventSourceStream {
    type Item = Note;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Note>> {
        self.rx.poll_next_unpin(cx)
    }
}

impl Drop for EventSourceStream {
    fn drop(&mut self) {
        self.source.close();
    }
}

/// Feed payloads are note objects; deleted events may carry only the id.
fn decode_message(data: &str) -> serde_json::Result<Note> {
    parse_note_value(serde_json::from_str(data)?)
}

pub(super) fn open(kind: ChangeKind, url: &str) -> ApiResult<NoteStream> {
    let source =
        EventSource::new(url).map_err(|e| ApiError::subscription(kind, format!("{e:?}")))?;
    let (tx, rx) = mpsc::unbounded();

    let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
        let Some(data) = ev.data().as_string() else {
            return;
        };
        match decode_message(&data) {
            Ok(note) => {
                // Receiver gone means the feed was released; nothing to do.
                let _ = tx.unbounded_send(note);
            }
            Err(e) => {
                log::warn!("event=feed_message module=api status=error kind={kind} error={e}");
            }
        }
    });
    source.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

    let on_error = Closure::<dyn FnMut(Event)>::new(move |_ev: Event| {
        log::warn!("event=feed_error module=api status=error kind={kind}");
    });
    source.set_onerror(Some(on_error.as_ref().unchecked_ref()));

    log::debug!("event=feed_open module=api status=ok kind={kind}");

    Ok(Box::pin(EventSourceStream {
        rx,
        source,
        _on_message: on_message,
        _on_error: on_error,
    }))
}
