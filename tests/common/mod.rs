//! Shared stubs for integration tests: in-memory CSV sources and a scripted
//! rendering engine whose calls can be inspected after the dashboard takes
//! ownership of it.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use plotdash::chart_spec::ChartDescriptor;
use plotdash::engine::{
    CaptureRequest, ChartHandle, EngineError, LayoutPatch, RenderEngine, RenderOptions,
};
use plotdash::error::Error;
use plotdash::fetch::CsvSource;

/// Serves a fixed CSV payload.
pub struct StaticSource(pub String);

impl CsvSource for StaticSource {
    fn fetch(&self) -> Result<String, Error> {
        Ok(self.0.clone())
    }
}

/// Always fails at the transport layer.
pub struct FailingSource;

impl CsvSource for FailingSource {
    fn fetch(&self) -> Result<String, Error> {
        Err(Error::Network("connection refused".into()))
    }
}

/// Fails the first fetch, then serves the payload (retry flows).
pub struct FlakySource {
    payload: String,
    failed_already: RefCell<bool>,
}

impl FlakySource {
    pub fn failing_once(payload: &str) -> Self {
        Self {
            payload: payload.into(),
            failed_already: RefCell::new(false),
        }
    }
}

impl CsvSource for FlakySource {
    fn fetch(&self) -> Result<String, Error> {
        let failed_already = *self.failed_already.borrow();
        if !failed_already {
            *self.failed_already.borrow_mut() = true;
            return Err(Error::Network("connection reset".into()));
        }
        Ok(self.payload.clone())
    }
}

/// Serves a different payload on each fetch; repeats the last one when the
/// sequence runs out.
pub struct SequenceSource {
    payloads: Vec<String>,
    next: RefCell<usize>,
}

impl SequenceSource {
    pub fn new(payloads: Vec<String>) -> Self {
        Self {
            payloads,
            next: RefCell::new(0),
        }
    }
}

impl CsvSource for SequenceSource {
    fn fetch(&self) -> Result<String, Error> {
        let mut next = self.next.borrow_mut();
        let idx = (*next).min(self.payloads.len() - 1);
        *next += 1;
        Ok(self.payloads[idx].clone())
    }
}

/// Everything the scripted engine was asked to do.
#[derive(Default)]
pub struct EngineLog {
    pub draws: Vec<ChartDescriptor>,
    pub relayouts: Vec<LayoutPatch>,
    pub captures: Vec<CaptureRequest>,
}

/// Rendering engine stub: records calls, hands out sequential handles, and
/// can be scripted to refuse drawing or capturing.
pub struct ScriptedEngine {
    pub log: Rc<RefCell<EngineLog>>,
    pub fail_draw: bool,
    pub fail_capture: bool,
    next_handle: u64,
}

/// Bytes the scripted engine returns from a successful capture.
pub const CAPTURE_BYTES: &[u8] = b"engine-raster-bytes";

impl ScriptedEngine {
    pub fn new() -> (Self, Rc<RefCell<EngineLog>>) {
        let log = Rc::new(RefCell::new(EngineLog::default()));
        (
            Self {
                log: Rc::clone(&log),
                fail_draw: false,
                fail_capture: false,
                next_handle: 0,
            },
            log,
        )
    }
}

impl RenderEngine for ScriptedEngine {
    fn draw(
        &mut self,
        descriptor: &ChartDescriptor,
        _options: &RenderOptions,
    ) -> Result<ChartHandle, EngineError> {
        if self.fail_draw {
            return Err(EngineError("draw refused".into()));
        }
        self.log.borrow_mut().draws.push(descriptor.clone());
        self.next_handle += 1;
        Ok(ChartHandle(self.next_handle))
    }

    fn relayout(&mut self, _handle: ChartHandle, patch: &LayoutPatch) -> Result<(), EngineError> {
        self.log.borrow_mut().relayouts.push(*patch);
        Ok(())
    }

    fn capture_image(
        &mut self,
        _handle: ChartHandle,
        request: &CaptureRequest,
    ) -> Result<Vec<u8>, EngineError> {
        self.log.borrow_mut().captures.push(*request);
        if self.fail_capture {
            return Err(EngineError("capture refused".into()));
        }
        Ok(CAPTURE_BYTES.to_vec())
    }
}
