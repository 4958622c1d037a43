//! Rolling fixed-length trace buffers feeding the animated plots.
//!
//! Producers push samples from subscription callbacks at whatever rate the
//! hand publishes; the paint loop drains once per frame. The two halves are
//! split so a burst of samples between frames rolls the window several
//! slots instead of being lost: `push` only enqueues, `drain` rolls the
//! window left one slot per pending sample and writes it at the end.

use std::collections::VecDeque;

/// Default window length in samples.
pub const DEFAULT_WINDOW: usize = 200;

/// A fixed-length rolling window with a pending queue.
#[derive(Clone, Debug)]
pub struct TraceBuffer {
    window: Vec<f64>,
    pending: VecDeque<f64>,
}

impl TraceBuffer {
    /// Creates a window of `len` slots pre-filled with `fill`.
    pub fn new(len: usize, fill: f64) -> Self {
        Self {
            window: vec![fill; len.max(1)],
            pending: VecDeque::new(),
        }
    }

    /// Enqueues a sample. Constant time; no redraw work happens here.
    pub fn push(&mut self, value: f64) {
        self.pending.push_back(value);
    }

    /// Rolls every pending sample into the window.
    pub fn drain(&mut self) {
        while let Some(value) = self.pending.pop_front() {
            self.window.rotate_left(1);
            if let Some(last) = self.window.last_mut() {
                *last = value;
            }
        }
    }

    /// The current window, oldest sample first.
    pub fn window(&self) -> &[f64] {
        &self.window
    }

    /// The newest drained sample.
    pub fn latest(&self) -> f64 {
        *self.window.last().unwrap_or(&0.0)
    }

    /// Number of samples waiting to be drained.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// One named, toggleable trace.
#[derive(Clone, Debug)]
pub struct Trace {
    /// Legend label.
    pub name: String,
    /// Whether the plot panel draws this trace.
    pub visible: bool,
    /// The rolling window.
    pub buffer: TraceBuffer,
}

/// A bundle of traces pushed by index, one bundle per plot.
#[derive(Clone, Debug)]
pub struct TraceGroup {
    traces: Vec<Trace>,
}

impl TraceGroup {
    /// Creates one visible trace per name, each with a `len`-slot window
    /// pre-filled with `fill`.
    pub fn new(names: &[&str], len: usize, fill: f64) -> Self {
        Self {
            traces: names
                .iter()
                .map(|name| Trace {
                    name: (*name).to_owned(),
                    visible: true,
                    buffer: TraceBuffer::new(len, fill),
                })
                .collect(),
        }
    }

    /// Enqueues a sample on the trace at `index`. Out-of-range indices are
    /// ignored; sample layouts can shrink across hand revisions.
    pub fn push(&mut self, index: usize, value: f64) {
        if let Some(trace) = self.traces.get_mut(index) {
            trace.buffer.push(value);
        }
    }

    /// Rolls pending samples into every window.
    pub fn drain(&mut self) {
        for trace in &mut self.traces {
            trace.buffer.drain();
        }
    }

    /// The traces, in construction order.
    pub fn traces(&self) -> &[Trace] {
        &self.traces
    }

    /// Mutable access for visibility toggles.
    pub fn traces_mut(&mut self) -> &mut [Trace] {
        &mut self.traces
    }

    /// Number of traces.
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    /// Whether the group has no traces.
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_starts_at_fill_value() {
        let buffer = TraceBuffer::new(4, 50.0);
        assert_eq!(buffer.window(), &[50.0, 50.0, 50.0, 50.0]);
    }

    #[test]
    fn push_is_invisible_until_drain() {
        let mut buffer = TraceBuffer::new(3, 0.0);
        buffer.push(1.0);
        assert_eq!(buffer.window(), &[0.0, 0.0, 0.0]);
        assert_eq!(buffer.pending_len(), 1);

        buffer.drain();
        assert_eq!(buffer.window(), &[0.0, 0.0, 1.0]);
        assert_eq!(buffer.pending_len(), 0);
    }

    #[test]
    fn burst_rolls_one_slot_per_sample() {
        let mut buffer = TraceBuffer::new(3, 0.0);
        for value in [1.0, 2.0, 3.0, 4.0] {
            buffer.push(value);
        }
        buffer.drain();
        // Window length 3: the oldest sample has already rolled out.
        assert_eq!(buffer.window(), &[2.0, 3.0, 4.0]);
        assert_eq!(buffer.latest(), 4.0);
    }

    #[test]
    fn group_pushes_by_index_and_ignores_out_of_range() {
        let mut group = TraceGroup::new(&["position", "velocity"], 2, 0.0);
        group.push(0, 1.0);
        group.push(1, 2.0);
        group.push(7, 9.0);
        group.drain();
        assert_eq!(group.traces()[0].buffer.latest(), 1.0);
        assert_eq!(group.traces()[1].buffer.latest(), 2.0);
    }
}
