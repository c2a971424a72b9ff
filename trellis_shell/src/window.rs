// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The window context: one root container plus everything that drives it.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use kurbo::{Point, Rect, Size, Vec2};
use parking_lot::Mutex;
use trellis_box_tree::{
    BoxClass, Button, KeyCode, KeyState, MouseButtons, MouseState, NodeId, RootPointer, Tree,
};

use crate::config::WindowConfig;
use crate::error::{Result, ShellError};
use crate::render::{RenderSink, RenderThread};
use crate::signal::RedrawSignal;

/// Class of a window's root box: a stock container that reports a title.
pub static WINDOW: BoxClass = BoxClass::CONTAINER
    .named("Window")
    .with_get_title(window_title);

/// Instance state of a [`WINDOW`] box.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WindowState {
    /// The window title.
    pub title: String,
}

fn window_title(tree: &Tree, id: NodeId) -> Option<&str> {
    tree.state::<WindowState>(id).map(|s| s.title.as_str())
}

/// An input event, already in root-local coordinates.
///
/// `buttons` is the button state after the event: it includes a pressed
/// button and excludes a released one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// The pointer moved by `change` to `position`.
    PointerMoved {
        /// Movement since the previous position.
        change: Vec2,
        /// New position.
        position: Point,
        /// Held buttons.
        buttons: MouseButtons,
    },
    /// A mouse button was pressed.
    ButtonDown {
        /// The button.
        button: Button,
        /// Pointer position.
        position: Point,
        /// Held buttons, including `button`.
        buttons: MouseButtons,
    },
    /// A mouse button was released.
    ButtonUp {
        /// The button.
        button: Button,
        /// Pointer position.
        position: Point,
        /// Held buttons, excluding `button`.
        buttons: MouseButtons,
    },
    /// The wheel turned.
    Scroll {
        /// Signed amount.
        amount: f64,
        /// Pointer position.
        position: Point,
        /// Held buttons.
        buttons: MouseButtons,
    },
    /// The pointer left the window, or the window was hidden or minimised.
    PointerLeft,
    /// A key was pressed.
    KeyDown {
        /// The key.
        key: KeyCode,
    },
    /// A key was released.
    KeyUp {
        /// The key.
        key: KeyCode,
    },
    /// The window was resized.
    Resized(Size),
    /// The window contents need repainting.
    Exposed,
    /// The user asked to close the window.
    CloseRequested,
}

/// Notified once when a window shuts down, before the pointer is released.
pub trait ExitListener: Send {
    /// The window is exiting. The tree is still complete.
    fn on_exit(&mut self, tree: &mut Tree);
}

impl<F: FnMut(&mut Tree) + Send> ExitListener for F {
    fn on_exit(&mut self, tree: &mut Tree) {
        self(tree);
    }
}

/// A window: a root [`WINDOW`] box and the machinery around it.
///
/// Events go in through [`Window::handle_event`]. The tree is shared with the
/// render thread behind a mutex; whenever an event changes the tree's
/// modification counter the window raises its [`RedrawSignal`].
///
/// ```rust
/// use kurbo::{Point, Rect};
/// use trellis_box_tree::MouseButtons;
/// use trellis_shell::{InputEvent, Window, WindowConfig};
///
/// let monitor = Rect::new(0.0, 0.0, 1920.0, 1080.0);
/// let mut window = Window::new(&WindowConfig::default(), &[monitor]).unwrap();
/// assert_eq!(window.title().as_deref(), Some("Main Window"));
///
/// window
///     .handle_event(InputEvent::PointerMoved {
///         change: Default::default(),
///         position: Point::new(10.0, 10.0),
///         buttons: MouseButtons::empty(),
///     })
///     .unwrap();
/// assert!(window.pointer().is_inside());
///
/// assert!(!window.handle_event(InputEvent::CloseRequested).unwrap());
/// assert!(window.is_exited());
/// ```
pub struct Window {
    tree: Arc<Mutex<Tree>>,
    root: NodeId,
    pointer: RootPointer,
    keys: KeyState,
    signal: Arc<RedrawSignal>,
    poll: Duration,
    render: Option<RenderThread<Box<dyn RenderSink + Send>>>,
    exit_listeners: Vec<Box<dyn ExitListener>>,
    last_count: u64,
    exited: bool,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("root", &self.root)
            .field("pointer", &self.pointer)
            .field("keys", &self.keys)
            .field("signal", &self.signal)
            .field("poll", &self.poll)
            .field("rendering", &self.render.is_some())
            .field("exit_listeners", &self.exit_listeners.len())
            .field("last_count", &self.last_count)
            .field("exited", &self.exited)
            .finish_non_exhaustive()
    }
}

impl Window {
    /// Open a window on one of `monitors`, as chosen by `config`.
    pub fn new(config: &WindowConfig, monitors: &[Rect]) -> Result<Self> {
        let monitor = config.select_monitor(monitors).ok_or(ShellError::NoMonitor)?;
        let bounds = config.window_bounds(monitor);

        let mut tree = Tree::new();
        let root = tree.insert_with_state(
            None,
            &WINDOW,
            WindowState {
                title: config.title.clone(),
            },
        );
        tree.set_frame(root, bounds.origin(), bounds.size());
        tree.set_background(root, config.background());
        tracing::info!(?root, title = %config.title, ?bounds, "window opened");

        Ok(Self {
            last_count: tree.modification_count(),
            tree: Arc::new(Mutex::new(tree)),
            root,
            pointer: RootPointer::new(root),
            keys: KeyState::new(),
            signal: Arc::new(RedrawSignal::new()),
            poll: Duration::from_millis(config.redraw_interval_ms.max(1)),
            render: None,
            exit_listeners: Vec::new(),
            exited: false,
        })
    }

    /// Start the render thread, presenting frames to `sink`.
    ///
    /// The first frame is requested immediately. Calling this while already
    /// rendering, or after exit, does nothing.
    pub fn start_rendering(&mut self, sink: impl RenderSink + Send + 'static) -> Result<()> {
        if self.exited || self.render.is_some() {
            tracing::warn!(root = ?self.root, "render thread already started or window exited");
            return Ok(());
        }
        let sink: Box<dyn RenderSink + Send> = Box::new(sink);
        self.render = Some(RenderThread::spawn(
            Arc::clone(&self.tree),
            self.root,
            Arc::clone(&self.signal),
            sink,
            self.poll,
        )?);
        self.signal.request_redraw();
        Ok(())
    }

    /// Register a listener for [`Window::exit`].
    pub fn add_exit_listener(&mut self, listener: impl ExitListener + 'static) {
        self.exit_listeners.push(Box::new(listener));
    }

    /// Route one event into the root box.
    ///
    /// Returns `false` once the window has exited, either now because of
    /// [`InputEvent::CloseRequested`] or earlier.
    pub fn handle_event(&mut self, event: InputEvent) -> Result<bool> {
        if self.exited {
            return Ok(false);
        }
        if event == InputEvent::CloseRequested {
            self.exit()?;
            return Ok(false);
        }

        let tree = Arc::clone(&self.tree);
        let mut tree = tree.lock();
        let root = self.root;
        match event {
            InputEvent::PointerMoved {
                change,
                position,
                buttons,
            } => {
                let state = MouseState::new(position, buttons);
                self.pointer.mouse_move(&mut tree, change, &state);
            }
            InputEvent::ButtonDown {
                button,
                position,
                buttons,
            } => {
                let state = MouseState::new(position, buttons);
                self.pointer.mouse_down(&mut tree, button, &state);
            }
            InputEvent::ButtonUp {
                button,
                position,
                buttons,
            } => {
                let state = MouseState::new(position, buttons);
                self.pointer.mouse_up(&mut tree, button, &state);
            }
            InputEvent::Scroll {
                amount,
                position,
                buttons,
            } => {
                let state = MouseState::new(position, buttons);
                self.pointer.mouse_scroll(&mut tree, amount, &state);
            }
            InputEvent::PointerLeft => self.pointer.leave(&mut tree),
            InputEvent::KeyDown { key } => {
                self.keys.press(key);
                if let Some(on_key_down) = tree.class(root).and_then(|c| c.on_key_down) {
                    on_key_down(&mut tree, root, key, &self.keys);
                }
            }
            InputEvent::KeyUp { key } => {
                self.keys.release(key);
                if let Some(on_key_up) = tree.class(root).and_then(|c| c.on_key_up) {
                    on_key_up(&mut tree, root, key, &self.keys);
                }
            }
            InputEvent::Resized(size) => {
                if let Some(origin) = tree.origin(root) {
                    tree.set_frame(root, origin, size);
                }
            }
            InputEvent::Exposed => tree.request_redraw(),
            InputEvent::CloseRequested => {}
        }

        let count = tree.modification_count();
        if count != self.last_count {
            self.last_count = count;
            self.signal.request_redraw();
        }
        Ok(true)
    }

    /// Shut the window down.
    ///
    /// Exit listeners run first, then held buttons are released and the root
    /// gets its exit notification, then the render thread is stopped and
    /// joined, and finally the root subtree is destroyed. Later calls do
    /// nothing.
    pub fn exit(&mut self) -> Result<()> {
        if self.exited {
            return Ok(());
        }
        self.exited = true;
        tracing::info!(root = ?self.root, "window exiting");

        {
            let mut tree = self.tree.lock();
            for listener in &mut self.exit_listeners {
                listener.on_exit(&mut tree);
            }
            self.pointer.release(&mut tree);
        }

        self.signal.shutdown();
        let joined = self.render.take().map(RenderThread::join).transpose();
        self.tree.lock().remove(self.root);
        joined.map(drop)
    }

    /// Whether [`Window::exit`] has run.
    pub fn is_exited(&self) -> bool {
        self.exited
    }

    /// The shared tree.
    pub fn tree(&self) -> &Arc<Mutex<Tree>> {
        &self.tree
    }

    /// The root box.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The window title, while the root is alive.
    pub fn title(&self) -> Option<String> {
        self.tree.lock().title(self.root).map(String::from)
    }

    /// Pointer bookkeeping for the root.
    pub fn pointer(&self) -> &RootPointer {
        &self.pointer
    }

    /// Keys currently held.
    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    /// The redraw signal shared with the render thread.
    pub fn signal(&self) -> &Arc<RedrawSignal> {
        &self.signal
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        if let Err(err) = self.exit() {
            tracing::warn!(%err, "window exit failed during drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Instant;

    use trellis_canvas::Rgba;

    use super::*;
    use crate::render::Srgb8Sink;

    const MONITOR: Rect = Rect::new(0.0, 0.0, 1920.0, 1080.0);

    #[derive(Default)]
    struct Spy {
        log: Vec<&'static str>,
        keys: Vec<(KeyCode, usize)>,
    }

    fn spy(tree: &mut Tree, id: NodeId) -> &mut Spy {
        tree.state_mut::<Spy>(id).unwrap()
    }

    const SPY: BoxClass = BoxClass::LEAF
        .named("Spy")
        .with_on_mouse_enter(|tree, id, _| spy(tree, id).log.push("enter"))
        .with_on_mouse_exit(|tree, id, _| spy(tree, id).log.push("exit"))
        .with_on_mouse_down(|tree, id, _, _| spy(tree, id).log.push("down"))
        .with_on_mouse_up(|tree, id, _, _| spy(tree, id).log.push("up"))
        .with_on_key_down(|tree, id, key, keys| spy(tree, id).keys.push((key, keys.len())));

    fn open() -> Window {
        let config = WindowConfig {
            horizontal_resolution: 160,
            ..WindowConfig::default()
        };
        Window::new(&config, &[MONITOR]).unwrap()
    }

    fn add_spy(window: &Window) -> NodeId {
        let mut tree = window.tree().lock();
        let id = tree.insert_with_state(Some(window.root()), &SPY, Spy::default());
        tree.set_frame(id, Point::new(10.0, 10.0), Size::new(20.0, 20.0));
        id
    }

    fn moved(x: f64, y: f64, buttons: MouseButtons) -> InputEvent {
        InputEvent::PointerMoved {
            change: Vec2::ZERO,
            position: Point::new(x, y),
            buttons,
        }
    }

    fn log_of(window: &Window, id: NodeId) -> Vec<&'static str> {
        let mut tree = window.tree().lock();
        spy(&mut tree, id).log.clone()
    }

    #[test]
    fn opens_centred_with_config() {
        let window = open();
        let tree = window.tree().lock();
        assert_eq!(
            tree.frame(window.root()),
            Some(Rect::new(880.0, 495.0, 1040.0, 585.0))
        );
        assert_eq!(tree.background(window.root()), Some(Rgba::new(0.5, 0.5, 0.5, 1.0)));
        assert_eq!(tree.class(window.root()).map(|c| c.type_name), Some("Window"));
    }

    #[test]
    fn no_monitor_is_an_error() {
        assert!(matches!(
            Window::new(&WindowConfig::default(), &[]),
            Err(ShellError::NoMonitor)
        ));
    }

    #[test]
    fn pointer_events_reach_children() {
        let mut window = open();
        let id = add_spy(&window);
        let left = MouseButtons::LEFT;

        window.handle_event(moved(15.0, 15.0, MouseButtons::empty())).unwrap();
        window
            .handle_event(InputEvent::ButtonDown {
                button: 1,
                position: Point::new(15.0, 15.0),
                buttons: left,
            })
            .unwrap();
        window
            .handle_event(InputEvent::ButtonUp {
                button: 1,
                position: Point::new(15.0, 15.0),
                buttons: MouseButtons::empty(),
            })
            .unwrap();
        window.handle_event(moved(50.0, 50.0, MouseButtons::empty())).unwrap();

        assert_eq!(log_of(&window, id), ["enter", "down", "up", "exit"]);
    }

    #[test]
    fn pointer_leaving_exits_children() {
        let mut window = open();
        let id = add_spy(&window);

        window.handle_event(moved(15.0, 15.0, MouseButtons::empty())).unwrap();
        window.handle_event(InputEvent::PointerLeft).unwrap();
        assert!(!window.pointer().is_inside());
        assert_eq!(log_of(&window, id), ["enter", "exit"]);

        window.handle_event(moved(16.0, 15.0, MouseButtons::empty())).unwrap();
        assert_eq!(log_of(&window, id), ["enter", "exit", "enter"]);
    }

    #[test]
    fn keys_are_tracked_and_routed_to_key_focus() {
        let mut window = open();
        let id = add_spy(&window);
        window.tree().lock().set_key_focus(Some(id));

        window.handle_event(InputEvent::KeyDown { key: 7 }).unwrap();
        window.handle_event(InputEvent::KeyDown { key: 9 }).unwrap();
        window.handle_event(InputEvent::KeyUp { key: 7 }).unwrap();
        assert!(window.keys().is_down(9));
        assert!(!window.keys().is_down(7));

        let mut tree = window.tree().lock();
        assert_eq!(spy(&mut tree, id).keys, [(7, 1), (9, 2)]);
    }

    #[test]
    fn changes_raise_the_redraw_signal() {
        let mut window = open();
        let before = window.signal().requested();

        window.handle_event(InputEvent::KeyDown { key: 1 }).unwrap();
        assert_eq!(window.signal().requested(), before, "no box changed");

        window.handle_event(InputEvent::Exposed).unwrap();
        assert_eq!(window.signal().requested(), before + 1);

        window
            .handle_event(InputEvent::Resized(Size::new(100.0, 50.0)))
            .unwrap();
        assert_eq!(window.signal().requested(), before + 2);
        let tree = window.tree().lock();
        assert_eq!(tree.size(window.root()), Some(Size::new(100.0, 50.0)));
    }

    #[test]
    fn exit_releases_then_destroys() {
        static NOTIFIED: AtomicUsize = AtomicUsize::new(0);

        let mut window = open();
        let id = add_spy(&window);
        window.add_exit_listener(move |tree: &mut Tree| {
            assert!(tree.is_alive(id), "tree torn down before listeners ran");
            assert!(spy(tree, id).log.ends_with(&["down"]), "pointer released early");
            NOTIFIED.fetch_add(1, Ordering::SeqCst);
        });

        window.handle_event(moved(12.0, 12.0, MouseButtons::empty())).unwrap();
        window
            .handle_event(InputEvent::ButtonDown {
                button: 3,
                position: Point::new(12.0, 12.0),
                buttons: MouseButtons::RIGHT,
            })
            .unwrap();

        let tree = Arc::clone(window.tree());
        let root = window.root();
        assert!(!window.handle_event(InputEvent::CloseRequested).unwrap());
        assert_eq!(NOTIFIED.load(Ordering::SeqCst), 1);
        assert!(!tree.lock().is_alive(root));
        assert!(!tree.lock().is_alive(id));
        assert!(!window.handle_event(InputEvent::Exposed).unwrap());

        window.exit().unwrap();
        assert_eq!(NOTIFIED.load(Ordering::SeqCst), 1);
    }

    static RELEASED: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

    static RELEASE_SPY: BoxClass = SPY
        .named("ReleaseSpy")
        .with_destruct(|tree, id| RELEASED.lock().extend(spy(tree, id).log.drain(..)));

    #[test]
    fn exit_releases_held_buttons_before_destroying() {
        let mut window = open();
        {
            let mut tree = window.tree().lock();
            let id =
                tree.insert_with_state(Some(window.root()), &RELEASE_SPY, Spy::default());
            tree.set_frame(id, Point::new(10.0, 10.0), Size::new(20.0, 20.0));
        }

        window.handle_event(moved(12.0, 12.0, MouseButtons::empty())).unwrap();
        window
            .handle_event(InputEvent::ButtonDown {
                button: 1,
                position: Point::new(12.0, 12.0),
                buttons: MouseButtons::LEFT,
            })
            .unwrap();
        window
            .handle_event(InputEvent::ButtonDown {
                button: 3,
                position: Point::new(12.0, 12.0),
                buttons: MouseButtons::LEFT | MouseButtons::RIGHT,
            })
            .unwrap();
        window.exit().unwrap();

        assert_eq!(*RELEASED.lock(), ["enter", "down", "down", "up", "up", "exit"]);
        assert!(!window.pointer().is_inside());
    }

    #[test]
    fn renders_frames_through_the_sink() {
        let mut window = open();
        let sink = Arc::new(Mutex::new(Srgb8Sink::new()));
        window.start_rendering(Arc::clone(&sink)).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while sink.lock().frames() == 0 {
            assert!(Instant::now() < deadline, "no frame rendered");
            thread::sleep(Duration::from_millis(1));
        }
        window.exit().unwrap();

        let sink = sink.lock();
        assert_eq!((sink.width(), sink.height()), (160, 90));
        assert_eq!(sink.pixel(80, 45), Some([188, 188, 188, 255]));
    }
}
