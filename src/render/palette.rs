// Released under MIT License.
// Copyright (c) 2025 Ladislav Bartos

//! Mapping of values to colors.

use plotters::style::HSLColor;

/// Hue of the color corresponding to the lowest value (violet).
const HUE_LOW: f64 = 0.75;

/// Linear map from the range of values to a rainbow (violet -> blue -> green -> yellow -> red).
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ColorScale {
    min: f64,
    max: f64,
}

impl ColorScale {
    /// Construct a scale spanning all finite values.
    pub(crate) fn from_values(values: impl Iterator<Item = f64>) -> Self {
        let (min, max) = values
            .filter(|x| x.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), x| {
                (min.min(x), max.max(x))
            });

        if min > max {
            ColorScale { min: 0.0, max: 1.0 }
        } else {
            ColorScale { min, max }
        }
    }

    /// Position of the value inside the scale, clamped to [0, 1].
    pub(crate) fn fraction(&self, value: f64) -> f64 {
        if self.max <= self.min || !value.is_finite() {
            return 0.0;
        }

        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    /// Color of the value.
    pub(crate) fn color(&self, value: f64) -> HSLColor {
        HSLColor(HUE_LOW * (1.0 - self.fraction(value)), 1.0, 0.5)
    }
}
