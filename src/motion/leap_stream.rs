use super::{leap_frame::LeapMessage, motion_error::MotionError, sample::MotionEvent};
use crate::{error, event, warn};
use futures::{SinkExt, StreamExt};
use tokio::{
    net::TcpStream,
    sync::mpsc::{self, Receiver, Sender},
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;

/// Reader for the JSON WebSocket exposed by the Leap Motion service.
///
/// The stream is not restartable: once the socket closes, `Disconnected` is
/// delivered and the receiver ends.
pub struct LeapStream;

impl LeapStream {
    /// Frames buffered before the reader waits on the controller.
    const CHANNEL_CAPACITY: usize = 64;
    /// Asks the service to keep streaming frames while unfocused.
    const BACKGROUND_REQUEST: &'static str = r#"{"background": true}"#;

    /// Connects to `url` in a background task and returns the receiving end of the event stream.
    ///
    /// On connection the task emits [`MotionEvent::Connected`], asks the service
    /// for background frames and forwards every decoded frame. Non-frame and
    /// undecodable messages are skipped. [`MotionEvent::Disconnected`] follows once
    /// the peer closes or `c_tok` is cancelled. If the service is unreachable the
    /// error is logged and the receiver ends without any event.
    ///
    /// # Arguments
    /// * `url` – WebSocket URL of the service (e.g., `"ws://127.0.0.1:6437/v6.json"`).
    /// * `c_tok` – Stops the reader when cancelled.
    pub fn start(url: String, c_tok: CancellationToken) -> Receiver<MotionEvent> {
        let (tx, rx) = mpsc::channel(Self::CHANNEL_CAPACITY);
        tokio::spawn(async move {
            let ws_stream = match connect_async(url.as_str()).await {
                Ok((stream, _)) => stream,
                Err(e) => {
                    error!("Could not reach Leap Motion service at {url}: {:?}", MotionError::from(e));
                    return;
                }
            };
            if tx.send(MotionEvent::Connected).await.is_err() {
                return;
            }
            let res = tokio::select! {
                () = c_tok.cancelled() => Ok(()),
                res = Self::read_frames(ws_stream, &tx) => res,
            };
            if let Err(e) = res {
                warn!("Leap Motion stream ended with {e:?}");
            }
            let _ = tx.send(MotionEvent::Disconnected).await;
        });
        rx
    }

    async fn read_frames(
        ws_stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
        tx: &Sender<MotionEvent>,
    ) -> Result<(), MotionError> {
        let (mut ws_writer, mut ws_reader) = ws_stream.split();
        ws_writer.send(Message::Text(Self::BACKGROUND_REQUEST.to_string())).await?;

        while let Some(msg) = ws_reader.next().await {
            match msg? {
                Message::Text(text) => match LeapMessage::parse(&text) {
                    Ok(Some(sample)) => {
                        if tx.send(MotionEvent::Frame(sample)).await.is_err() {
                            return Ok(());
                        }
                    }
                    Ok(None) => event!("Skipping non-frame message from Leap service"),
                    Err(e) => warn!("Undecodable Leap message: {e:?}"),
                },
                Message::Close(_) => return Ok(()),
                _ => {}
            }
        }
        Err(MotionError::Closed)
    }
}
