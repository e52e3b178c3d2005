//! Bookkeeping for the animation timer, so that only one source is ever live.

/// A timer source that can be cancelled before it runs out.
pub trait TickSource {
    fn cancel(self);
}

impl TickSource for glib::SourceId {
    fn cancel(self) {
        self.remove();
    }
}

pub struct Ticker<S = glib::SourceId> {
    source: Option<S>,
}

impl<S> Default for Ticker<S> {
    fn default() -> Self {
        Self { source: None }
    }
}

impl<S: TickSource> Ticker<S> {
    /// Cancels the live source, if any.
    pub fn stop(&mut self) {
        if let Some(source) = self.source.take() {
            source.cancel();
        }
    }

    /// Makes `source` the live one. Whatever ran before is cancelled first.
    pub fn arm(&mut self, source: S) {
        self.stop();
        self.source = Some(source);
    }

    /// The live source has returned `Break` and is gone already.
    pub fn finish(&mut self) {
        self.source = None;
    }

    pub fn is_armed(&self) -> bool {
        self.source.is_some()
    }
}
