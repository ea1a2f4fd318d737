// SPDX-License-Identifier: MPL-2.0
//! Background adjustment worker.
//!
//! One spawned task owns the request channel and answers every request with
//! exactly one response carrying the request's sequence number, in issue
//! order. The pipeline cannot be interrupted once started, so there is no
//! cancel message: the consumer keeps the latest issued [`SequenceId`] and
//! simply ignores responses tagged with an older one. Dropping the
//! [`AdjustmentWorker`] closes the channel and ends the task.

use crate::domain::editing::SequenceId;
use crate::domain::media::RawImage;
use crate::error::{Error, Result, WorkerError};
use crate::media::adjustments::{apply_adjustments, AdjustmentParams};
use std::sync::Arc;
use tokio::sync::mpsc;

/// A sequenced unit of work for the worker.
#[derive(Debug, Clone)]
pub struct AdjustmentRequest {
    /// RGBA pixel buffer to adjust. Shared, never mutated.
    pub pixels: Arc<Vec<u8>>,
    /// Buffer width in pixels.
    pub width: u32,
    /// Buffer height in pixels.
    pub height: u32,
    /// Absolute slider intensities to apply.
    pub params: AdjustmentParams,
    /// Caller-assigned, monotonically increasing tag.
    pub sequence: SequenceId,
}

/// The worker's answer to one request.
#[derive(Debug, Clone)]
pub struct AdjustmentResponse {
    /// Tag of the request this answers.
    pub sequence: SequenceId,
    /// Adjusted image, or what went wrong.
    pub result: std::result::Result<RawImage, WorkerError>,
}

/// Handle to the background adjustment task.
///
/// Must be created inside a tokio runtime. The task ends when this handle
/// is dropped.
#[derive(Debug)]
pub struct AdjustmentWorker {
    requests: mpsc::UnboundedSender<AdjustmentRequest>,
    responses: mpsc::UnboundedReceiver<AdjustmentResponse>,
}

impl AdjustmentWorker {
    /// Spawns the worker task and returns its handle.
    #[must_use]
    pub fn spawn() -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (response_tx, response_rx) = mpsc::unbounded_channel();

        tokio::spawn(run(request_rx, response_tx));

        Self {
            requests: request_tx,
            responses: response_rx,
        }
    }

    /// Queues a request. Requests are processed strictly in submission
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Worker`] with [`WorkerError::Disconnected`] if the
    /// worker task has already shut down.
    pub fn submit(&self, request: AdjustmentRequest) -> Result<()> {
        self.requests
            .send(request)
            .map_err(|_| Error::Worker(WorkerError::Disconnected))
    }

    /// Waits for the next response.
    ///
    /// Returns `None` once the worker task has shut down and all pending
    /// responses were drained.
    pub async fn recv(&mut self) -> Option<AdjustmentResponse> {
        self.responses.recv().await
    }

    /// Returns an already-delivered response without waiting, if any.
    pub fn try_recv(&mut self) -> Option<AdjustmentResponse> {
        self.responses.try_recv().ok()
    }
}

async fn run(
    mut requests: mpsc::UnboundedReceiver<AdjustmentRequest>,
    responses: mpsc::UnboundedSender<AdjustmentResponse>,
) {
    while let Some(request) = requests.recv().await {
        let sequence = request.sequence;

        // The per-pixel pass is CPU-bound; keep it off the async executor.
        let result = match tokio::task::spawn_blocking(move || process(request)).await {
            Ok(result) => result,
            Err(err) => Err(WorkerError::Processing(format!(
                "adjustment task aborted: {err}"
            ))),
        };

        if responses.send(AdjustmentResponse { sequence, result }).is_err() {
            // Consumer is gone; nothing left to answer.
            break;
        }
    }
}

fn process(request: AdjustmentRequest) -> std::result::Result<RawImage, WorkerError> {
    let adjusted = apply_adjustments(
        &request.pixels,
        request.width,
        request.height,
        &request.params,
    )
    .map_err(|err| WorkerError::InvalidRequest(err.to_string()))?;

    RawImage::from_rgba(request.width, request.height, adjusted)
        .map_err(|err| WorkerError::InvalidRequest(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::editing::AdjustmentPercent;

    fn request(pixels: Vec<u8>, width: u32, height: u32, sequence: u64) -> AdjustmentRequest {
        AdjustmentRequest {
            pixels: Arc::new(pixels),
            width,
            height,
            params: AdjustmentParams::default(),
            sequence: sequence_id(sequence),
        }
    }

    fn sequence_id(n: u64) -> SequenceId {
        let mut id = SequenceId::initial();
        for _ in 0..n {
            id = id.next();
        }
        id
    }

    #[tokio::test]
    async fn identity_request_echoes_pixels() {
        let mut worker = AdjustmentWorker::spawn();
        let pixels = vec![10, 20, 30, 255];
        worker.submit(request(pixels.clone(), 1, 1, 1)).unwrap();

        let response = worker.recv().await.unwrap();
        assert_eq!(response.sequence, sequence_id(1));
        assert_eq!(response.result.unwrap().rgba_bytes(), pixels.as_slice());
    }

    #[tokio::test]
    async fn malformed_buffer_yields_invalid_request() {
        let mut worker = AdjustmentWorker::spawn();
        worker.submit(request(vec![0u8; 3], 1, 1, 1)).unwrap();

        let response = worker.recv().await.unwrap();
        assert!(matches!(
            response.result,
            Err(WorkerError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn responses_preserve_submission_order() {
        let mut worker = AdjustmentWorker::spawn();
        let mut bright = AdjustmentParams::default();
        bright.brightness = AdjustmentPercent::new(10);

        for n in 1..=3 {
            let mut req = request(vec![50, 50, 50, 255], 1, 1, n);
            req.params = bright;
            worker.submit(req).unwrap();
        }

        for n in 1..=3 {
            let response = worker.recv().await.unwrap();
            assert_eq!(response.sequence, sequence_id(n));
            assert!(response.result.is_ok());
        }
    }

    #[tokio::test]
    async fn worker_exits_after_consumer_is_gone() {
        let worker = AdjustmentWorker::spawn();
        let sender = worker.requests.clone();
        drop(worker);

        // The task only notices once it fails to deliver a response.
        sender.send(request(vec![0, 0, 0, 255], 1, 1, 1)).unwrap();

        for _ in 0..100 {
            if sender.is_closed() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("worker task did not shut down");
    }
}
