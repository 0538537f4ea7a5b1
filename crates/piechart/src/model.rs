use crate::color::{self, Color};
use crate::error::ChartError;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

pub const FULL_CIRCLE: i32 = 360;
pub const DEFAULT_PIE_SCALE: f32 = 10.0;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Multiplier applied to each color channel to derive the highlight variant of a slice.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deref, Into, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct HighlightStrength(f32);

impl HighlightStrength {
    pub fn new(strength: f32) -> Result<Self, ChartError> {
        if strength < 0.0 || strength.is_nan() {
            return Err(ChartError::NegativeHighlightStrength(strength));
        }
        Ok(Self(strength))
    }
}

impl Default for HighlightStrength {
    fn default() -> Self {
        Self(1.0)
    }
}

impl TryFrom<f32> for HighlightStrength {
    type Error = ChartError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maps a score on a `0..=scale` scale onto the inset fraction, capping at a full slice.
pub fn fraction_from_score(value: f32, scale: f32) -> f32 {
    if value < scale { value / scale } else { 1.0 }
}

/// One data entry of the wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    label: Label,
    fraction: f32,
    slice_color: Color,
    item_color: Color,

    // computed on relayout
    start_angle: i32,
    end_angle: i32,
    item_highlight: Color,
    slice_highlight: Color,
}

impl Item {
    fn new(label: Label, fraction: f32, slice_color: Color, item_color: Color) -> Self {
        Self {
            label,
            fraction,
            slice_color,
            item_color,
            start_angle: 0,
            end_angle: 0,
            item_highlight: item_color,
            slice_highlight: slice_color,
        }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    pub fn slice_color(&self) -> Color {
        self.slice_color
    }

    pub fn item_color(&self) -> Color {
        self.item_color
    }

    pub fn start_angle(&self) -> i32 {
        self.start_angle
    }

    pub fn end_angle(&self) -> i32 {
        self.end_angle
    }

    pub fn span(&self) -> i32 {
        self.end_angle - self.start_angle
    }

    /// Angle halfway through the span, rounded down.
    pub fn mid_angle(&self) -> i32 {
        self.start_angle + self.span() / 2
    }

    pub fn contains_angle(&self, angle: i32) -> bool {
        self.start_angle <= angle && angle <= self.end_angle
    }

    pub fn item_highlight(&self) -> Color {
        self.item_highlight
    }

    pub fn slice_highlight(&self) -> Color {
        self.slice_highlight
    }
}

/// Result of removing an item by label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Removal {
    /// Position the removed item occupied.
    pub index: usize,
    /// Index of the last remaining item, `None` once the wheel is empty.
    pub last_index: Option<usize>,
}

/// Splits the circle into `count` equal integer spans. The final span absorbs the remainder of
/// `360 / count` so the spans always close the circle.
pub fn partition(count: usize) -> Vec<(i32, i32)> {
    if count == 0 {
        return Vec::new();
    }

    let n = count as i32;
    let base = FULL_CIRCLE / n;
    let extra = FULL_CIRCLE % n;

    let mut current = 0;
    (0..count)
        .map(|i| {
            let span = if i == count - 1 { base + extra } else { base };
            let range = (current, current + span);
            current += span;
            range
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct SliceModel {
    items: Vec<Item>,
    highlight_strength: HighlightStrength,
}

impl SliceModel {
    pub fn new(highlight_strength: HighlightStrength) -> Self {
        Self {
            items: Vec::new(),
            highlight_strength,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn highlight_strength(&self) -> HighlightStrength {
        self.highlight_strength
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.items.iter().position(|it| it.label.as_str() == label)
    }

    /// Appends an item and relayouts the wheel, returning the index of the new item.
    pub fn add_item(
        &mut self,
        label: impl Into<Label>,
        fraction: f32,
        slice_color: Color,
        item_color: Color,
    ) -> Result<usize, ChartError> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(ChartError::InvalidFraction(fraction));
        }

        self.items
            .push(Item::new(label.into(), fraction, slice_color, item_color));
        self.relayout();
        Ok(self.items.len() - 1)
    }

    /// Removes the first item carrying `label`.
    pub fn remove_item(&mut self, label: &str) -> Result<Removal, ChartError> {
        let index = self
            .position(label)
            .ok_or_else(|| ChartError::ItemNotFound(Label::from(label)))?;

        self.items.remove(index);
        self.relayout();

        Ok(Removal {
            index,
            last_index: self.items.len().checked_sub(1),
        })
    }

    pub fn remove_all(&mut self) {
        self.items.clear();
    }

    pub fn set_highlight_strength(&mut self, strength: HighlightStrength) {
        self.highlight_strength = strength;
        self.relayout();
    }

    fn relayout(&mut self) {
        let spans = partition(self.items.len());
        if spans.is_empty() {
            return;
        }

        let strength = *self.highlight_strength;
        for (it, (start, end)) in self.items.iter_mut().zip(spans) {
            it.start_angle = start;
            it.end_angle = end;
            it.item_highlight = color::highlight(it.item_color, strength);
            it.slice_highlight = color::highlight(it.slice_color, strength);
        }

        log::debug!(
            "Relayout: {} items, base span {}°",
            self.items.len(),
            FULL_CIRCLE / self.items.len() as i32
        );
    }
}
