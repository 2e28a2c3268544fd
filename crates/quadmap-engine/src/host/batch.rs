/// Host sprite-batching subsystem.
///
/// Nodes that issue raw draw calls stop the batch before and restart it after,
/// so pending batched sprites are flushed in order.
pub trait SpriteBatch {
    fn stop(&mut self);
    fn start(&mut self);
}

/// Batch for hosts without sprite batching; only tracks the pause state.
#[derive(Debug, Default)]
pub struct PassthroughBatch {
    stopped: bool,
    warned_unbalanced: bool,
}

impl PassthroughBatch {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SpriteBatch for PassthroughBatch {
    fn stop(&mut self) {
        if self.stopped && !self.warned_unbalanced {
            log::warn!("sprite batch stopped twice without start");
            self.warned_unbalanced = true;
        }
        self.stopped = true;
    }

    fn start(&mut self) {
        self.stopped = false;
    }
}
