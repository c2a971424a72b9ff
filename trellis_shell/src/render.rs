// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame rendering and the render thread.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use kurbo::{Point, Rect};
use parking_lot::Mutex;
use trellis_box_tree::{NodeId, Tree};
use trellis_canvas::{Canvas, Image, Rgba};

use crate::color_space::encode_pixel;
use crate::error::{Result, ShellError};
use crate::signal::RedrawSignal;

/// Receives finished frames for presentation.
pub trait RenderSink {
    /// Present `frame`, a linear RGBA image.
    fn present(&mut self, frame: &Image) -> Result<()>;
}

impl<S: RenderSink + ?Sized> RenderSink for Box<S> {
    fn present(&mut self, frame: &Image) -> Result<()> {
        (**self).present(frame)
    }
}

impl<S: RenderSink + ?Sized> RenderSink for Arc<Mutex<S>> {
    fn present(&mut self, frame: &Image) -> Result<()> {
        self.lock().present(frame)
    }
}

/// Sink that encodes each frame as tightly packed 8-bit sRGB RGBA.
#[derive(Clone, Debug, Default)]
pub struct Srgb8Sink {
    bytes: Vec<u8>,
    width: usize,
    height: usize,
    frames: u64,
}

impl Srgb8Sink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last frame's bytes, row-major, four per pixel.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Width of the last frame.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the last frame.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of frames presented.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The encoded pixel at `(x, y)` of the last frame.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        let px = self.bytes.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

impl RenderSink for Srgb8Sink {
    fn present(&mut self, frame: &Image) -> Result<()> {
        self.bytes.clear();
        self.bytes
            .extend(frame.pixels().iter().flat_map(|&p| encode_pixel(p)));
        self.width = frame.width();
        self.height = frame.height();
        self.frames += 1;
        Ok(())
    }
}

/// Draw `root` into `canvas`, resizing the canvas to the root's size.
///
/// The whole root is drawn unscaled: clip and target are both `(0, 0)..size`.
/// Stale roots leave the canvas untouched.
pub fn render_frame(tree: &Tree, root: NodeId, canvas: &mut Canvas) {
    let Some(size) = tree.size(root) else {
        return;
    };
    let (width, height) = canvas_extent(size.width, size.height);
    if canvas.image.width() != width || canvas.image.height() != height {
        canvas.image.set_size(width, height);
    }
    canvas.image.fill(Rgba::TRANSPARENT);
    let bounds = Rect::from_origin_size(Point::ZERO, size);
    tree.draw(root, bounds, bounds, canvas);
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Window extents are small non-negative pixel counts."
)]
fn canvas_extent(width: f64, height: f64) -> (usize, usize) {
    let whole = |v: f64| if v > 0.0 { v.ceil() as usize } else { 0 };
    (whole(width), whole(height))
}

/// A named thread that redraws the tree whenever the signal asks.
///
/// Each cycle waits for work, snapshots the counter, locks the tree and draws
/// the root, unlocks, presents to the sink, and marks the snapshot drawn. A
/// frame that went stale while drawing is redrawn straight away. While idle
/// the thread wakes every `poll` interval to recheck the signal.
#[derive(Debug)]
pub struct RenderThread<S> {
    signal: Arc<RedrawSignal>,
    handle: Option<JoinHandle<S>>,
}

impl<S: RenderSink + Send + 'static> RenderThread<S> {
    /// Spawn the thread.
    pub fn spawn(
        tree: Arc<Mutex<Tree>>,
        root: NodeId,
        signal: Arc<RedrawSignal>,
        mut sink: S,
        poll: Duration,
    ) -> Result<Self> {
        let thread_signal = Arc::clone(&signal);
        let handle = thread::Builder::new()
            .name(String::from("Draw Thread"))
            .spawn(move || {
                let mut canvas = Canvas::default();
                loop {
                    let snapshot = match thread_signal.wait_for_work_timeout(poll) {
                        Some(snapshot) => snapshot,
                        None if thread_signal.is_shut_down() => break,
                        None => continue,
                    };
                    {
                        let tree = tree.lock();
                        render_frame(&tree, root, &mut canvas);
                    }
                    if let Err(err) = sink.present(&canvas.image) {
                        tracing::warn!(%err, snapshot, "render sink rejected frame");
                    }
                    thread_signal.mark_drawn(snapshot);
                    if thread_signal.is_stale(snapshot) {
                        tracing::debug!(snapshot, "frame went stale while drawing");
                    }
                }
                sink
            })
            .map_err(ShellError::Spawn)?;
        Ok(Self {
            signal,
            handle: Some(handle),
        })
    }

    /// The signal driving this thread.
    pub fn signal(&self) -> &Arc<RedrawSignal> {
        &self.signal
    }

    /// Shut the signal down, wait for the thread, and hand back the sink.
    pub fn join(mut self) -> Result<S> {
        self.signal.shutdown();
        let handle = self.handle.take().ok_or(ShellError::RenderThreadPanicked)?;
        handle.join().map_err(|_| ShellError::RenderThreadPanicked)
    }
}

impl<S> Drop for RenderThread<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.signal.shutdown();
            if handle.join().is_err() {
                tracing::warn!("render thread panicked");
            }
        }
    }
}
