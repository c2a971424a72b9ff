// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A row of image buttons in a window, driven by a scripted pointer.
//!
//! This example shows how to combine:
//! - `trellis_shell` for the window, event intake and the render thread,
//! - `trellis_widgets` for `ImageButton`,
//! - `trellis_box_tree` for a nested container holding the buttons.
//!
//! The pointer hovers the first button, clicks the second, drags off the
//! third before releasing, and then the window closes. Frames are encoded to
//! 8-bit sRGB and a few pixels are printed.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p trellis_demos --example button_bar`

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use kurbo::{Point, Rect, Size, Vec2};
use parking_lot::Mutex;
use trellis_box_tree::{BoxClass, MouseButtons, NodeId, Tree};
use trellis_canvas::{Image, Rgba};
use trellis_shell::{InputEvent, Srgb8Sink, Window, WindowConfig};
use tracing_subscriber::EnvFilter;
use trellis_widgets::{ButtonImages, ImageButton};

const CONFIG: &str = r#"(
    title: "Button bar",
    horizontal_resolution: 320,
    background: (0.05, 0.05, 0.08, 1.0),
    redraw_interval_ms: 10,
)"#;

static CLICKS: AtomicUsize = AtomicUsize::new(0);

fn solid(size: usize, colour: Rgba) -> Image {
    Image::from_pixels(size, size, vec![colour; size * size]).unwrap_or_default()
}

fn images(tint: Rgba) -> ButtonImages {
    ButtonImages {
        up: solid(48, tint.with_alpha_scaled(0.6)),
        hover: solid(48, tint),
        down: solid(48, Rgba::WHITE),
        disabled: Image::new(),
    }
}

fn clicked(tree: &mut Tree, id: NodeId) {
    let n = CLICKS.fetch_add(1, Ordering::Relaxed) + 1;
    tracing::info!(?id, class = ?tree.class(id).map(|c| c.type_name), n, "button clicked");
}

fn pointer(window: &mut Window, from: Point, to: Point, buttons: MouseButtons) {
    let event = InputEvent::PointerMoved {
        change: to - from,
        position: to,
        buttons,
    };
    if let Err(err) = window.handle_event(event) {
        tracing::error!(%err, "event failed");
    }
}

fn button(window: &mut Window, button: u8, at: Point, down: bool) {
    let mask = MouseButtons::for_button(button);
    let event = if down {
        InputEvent::ButtonDown {
            button,
            position: at,
            buttons: mask,
        }
    } else {
        InputEvent::ButtonUp {
            button,
            position: at,
            buttons: MouseButtons::empty(),
        }
    };
    if let Err(err) = window.handle_event(event) {
        tracing::error!(%err, "event failed");
    }
}

fn settle(window: &Window) {
    while window.signal().is_pending() {
        std::thread::sleep(Duration::from_millis(1));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match WindowConfig::from_ron(CONFIG) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(%err, "bad config");
            return;
        }
    };
    let monitor = Rect::new(0.0, 0.0, 1920.0, 1080.0);
    let mut window = match Window::new(&config, &[monitor]) {
        Ok(window) => window,
        Err(err) => {
            tracing::error!(%err, "could not open window");
            return;
        }
    };

    // A bar container across the top, with three buttons in it.
    let tints = [
        Rgba::new(0.8, 0.1, 0.1, 1.0),
        Rgba::new(0.1, 0.7, 0.2, 1.0),
        Rgba::new(0.1, 0.3, 0.9, 1.0),
    ];
    let buttons: Vec<NodeId> = {
        let mut tree = window.tree().lock();
        let bar = tree.insert(Some(window.root()), &BoxClass::CONTAINER);
        tree.set_frame(bar, Point::new(16.0, 16.0), Size::new(288.0, 64.0));
        tree.set_background(bar, Rgba::new(0.2, 0.2, 0.25, 1.0));
        tints
            .iter()
            .enumerate()
            .map(|(i, &tint)| {
                let origin = Point::new(8.0 + 96.0 * i as f64, 8.0);
                let button = ImageButton::new(images(tint)).with_action(clicked);
                ImageButton::insert(&mut tree, bar, origin, button)
            })
            .collect()
    };

    window.add_exit_listener(|tree: &mut Tree| {
        tracing::info!(roots = tree.roots().len(), "exit listener ran");
    });

    let sink = Arc::new(Mutex::new(Srgb8Sink::new()));
    if let Err(err) = window.start_rendering(Arc::clone(&sink)) {
        tracing::error!(%err, "could not start rendering");
        return;
    }

    // Button centres in root coordinates.
    let centre = |i: usize| Point::new(16.0 + 8.0 + 96.0 * i as f64 + 24.0, 48.0);
    let outside = Point::new(300.0, 150.0);

    let mut at = Point::new(1.0, 1.0);
    pointer(&mut window, at, at, MouseButtons::empty());
    for (step, target) in [centre(0), centre(1)].into_iter().enumerate() {
        pointer(&mut window, at, target, MouseButtons::empty());
        at = target;
        settle(&window);
        let pixel = sink.lock().pixel(at.x as usize, at.y as usize);
        tracing::info!(step, ?pixel, "hovering");
    }

    button(&mut window, 1, at, true);
    settle(&window);
    let pixel = sink.lock().pixel(at.x as usize, at.y as usize);
    tracing::info!(?pixel, "pressed");
    button(&mut window, 1, at, false);

    let third = centre(2);
    pointer(&mut window, at, third, MouseButtons::empty());
    button(&mut window, 1, third, true);
    pointer(&mut window, third, outside, MouseButtons::LEFT);
    button(&mut window, 1, outside, false);
    at = outside;
    settle(&window);

    {
        let tree = window.tree().lock();
        for (i, &id) in buttons.iter().enumerate() {
            if let Some(state) = tree.state::<ImageButton>(id) {
                tracing::info!(
                    button = i,
                    inside = state.is_mouse_inside(),
                    down = state.is_mouse_down(),
                    "button state"
                );
            }
        }
    }

    pointer(&mut window, at, at + Vec2::new(0.0, 1.0), MouseButtons::empty());
    match window.handle_event(InputEvent::CloseRequested) {
        Ok(running) => debug_assert!(!running, "window still running after close"),
        Err(err) => tracing::error!(%err, "exit failed"),
    }

    let sink = sink.lock();
    println!(
        "{} frames of {}x{}, {} click(s)",
        sink.frames(),
        sink.width(),
        sink.height(),
        CLICKS.load(Ordering::Relaxed)
    );
    let samples = [
        ("bar", Point::new(20.0, 20.0)),
        ("first", centre(0)),
        ("sky", Point::new(5.0, 150.0)),
    ];
    for (name, p) in samples {
        println!("{name:>6} at {p:?}: {:?}", sink.pixel(p.x as usize, p.y as usize));
    }
}
