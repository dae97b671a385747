//! Background colors that become transparent.

use super::quantize::colors_similar;
use super::rgb::Rgb;
use crate::error::GridError;

/// Maximum number of reference colors an [`ExclusionSpec`] holds.
pub const MAX_EXCLUDED_COLORS: usize = 2;

/// Default per-channel tolerance for color exclusion.
pub const DEFAULT_TOLERANCE: u8 = 10;

/// Up to two reference colors plus one shared tolerance.
///
/// A sampled (already quantized) color that is [`colors_similar`] to any set
/// slot is treated as background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusionSpec {
    slots: [Option<Rgb>; MAX_EXCLUDED_COLORS],
    tolerance: u8,
}

impl ExclusionSpec {
    /// An empty spec with the given tolerance; matches nothing.
    pub const fn new(tolerance: u8) -> Self {
        Self {
            slots: [None; MAX_EXCLUDED_COLORS],
            tolerance,
        }
    }

    /// Build a spec from a list of colors.
    ///
    /// Fails with [`GridError::TooManyExclusionColors`] when more than
    /// [`MAX_EXCLUDED_COLORS`] are given.
    pub fn from_colors(colors: &[Rgb], tolerance: u8) -> Result<Self, GridError> {
        if colors.len() > MAX_EXCLUDED_COLORS {
            return Err(GridError::TooManyExclusionColors {
                max: MAX_EXCLUDED_COLORS,
            });
        }
        let mut spec = Self::new(tolerance);
        for (slot, &color) in spec.slots.iter_mut().zip(colors) {
            *slot = Some(color);
        }
        Ok(spec)
    }

    /// Set or clear one slot.
    pub fn set_slot(&mut self, index: usize, color: Option<Rgb>) -> Result<(), GridError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(GridError::TooManyExclusionColors {
                max: MAX_EXCLUDED_COLORS,
            })?;
        *slot = color;
        Ok(())
    }

    /// Put `color` into the first free slot. Returns `false` when both are taken.
    pub fn push(&mut self, color: Rgb) -> bool {
        match self.slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(color);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.slots = [None; MAX_EXCLUDED_COLORS];
    }

    #[inline]
    pub fn tolerance(&self) -> u8 {
        self.tolerance
    }

    #[inline]
    pub fn set_tolerance(&mut self, tolerance: u8) {
        self.tolerance = tolerance;
    }

    /// The colors currently set, in slot order.
    pub fn colors(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.slots.iter().flatten().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// True iff `color` matches any reference color within the tolerance.
    #[inline]
    pub fn matches(&self, color: Rgb) -> bool {
        self.colors()
            .any(|excluded| colors_similar(color, excluded, self.tolerance))
    }
}

impl Default for ExclusionSpec {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}
