// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear RGBA colours and the "over" operator.

use core::ops::{Add, Mul, Sub};

/// A linear-light, non-premultiplied RGBA colour.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Opacity, where `0` is fully transparent and `1` fully opaque.
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black; the initial value of every pixel.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Create a colour from its four channels.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// The same colour with its alpha multiplied by `factor`.
    #[must_use]
    pub const fn with_alpha_scaled(self, factor: f32) -> Self {
        Self {
            a: self.a * factor,
            ..self
        }
    }

    /// Returns `true` if the alpha channel is at least 1.
    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }
}

impl From<[f32; 4]> for Rgba {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba> for [f32; 4] {
    fn from(c: Rgba) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

// Channel-wise arithmetic, used by bilinear sampling.

impl Add for Rgba {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b, self.a + rhs.a)
    }
}

impl Sub for Rgba {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b, self.a - rhs.a)
    }
}

impl Mul<f32> for Rgba {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs, self.a * rhs)
    }
}

/// Composite `above` over `below`, in place.
///
/// Both colours are non-premultiplied. A fully transparent `above` leaves
/// `below` untouched, and when nothing of `below` shows through the result is
/// exactly `above`.
pub fn apply_colour(below: &mut Rgba, above: Rgba) {
    if above.a == 0.0 {
        return;
    }
    let below_weight = below.a * (1.0 - above.a);
    if below_weight == 0.0 {
        *below = above;
        return;
    }
    let alpha = above.a + below_weight;
    if alpha == 0.0 {
        return;
    }
    let t = below_weight / alpha;
    *below = Rgba {
        r: above.r + (below.r - above.r) * t,
        g: above.g + (below.g - above.g) * t,
        b: above.b + (below.b - above.b) * t,
        a: alpha,
    };
}
