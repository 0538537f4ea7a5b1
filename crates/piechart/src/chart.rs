use crate::angle;
use crate::color::Color;
use crate::error::ChartError;
use crate::geometry::{Point, Vector};
use crate::gesture;
use crate::layout::Layout;
use crate::model::{HighlightStrength, Item, Label, Removal, SliceModel};
use crate::motion::{MotionController, MotionOptions, MotionState, Settle};
use crate::render::RenderState;
use std::fmt;
use std::time::Duration;

/// Auto-center targets below this angle are shifted a full turn when the wheel sits past
/// half a turn, so the ease travels forward instead of unwinding.
const WRAP_TARGET_BELOW: i32 = 90;
const WRAP_ROTATION_ABOVE: i32 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartEvent {
    /// The item under the pointer changed.
    CurrentItemChanged(usize),
    /// Anything drawn changed; the surface should derive a new [`RenderState`].
    Invalidated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

type Handler = Box<dyn FnMut(ChartEvent)>;

#[derive(Default)]
struct Subscribers {
    next_id: usize,
    handlers: Vec<(SubscriptionId, Handler)>,
}

impl Subscribers {
    fn add(&mut self, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(hid, _)| *hid != id);
        self.handlers.len() != before
    }

    fn emit(&mut self, event: ChartEvent) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.handlers.len())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChartOptions {
    pub highlight_strength: HighlightStrength,
    pub auto_center_in_slice: bool,
    pub motion: MotionOptions,
}

/// The interactive wheel: items, rotation, selection and motion behind one API.
///
/// Every mutation that changes what is drawn emits [`ChartEvent::Invalidated`] after the
/// current item has been re-resolved, so subscribers always see a consistent chart.
#[derive(Debug)]
pub struct PieChart {
    model: SliceModel,
    motion: MotionController,
    current_item: Option<usize>,
    auto_center_in_slice: bool,
    layout: Layout,
    subscribers: Subscribers,
}

impl Default for PieChart {
    fn default() -> Self {
        Self {
            model: SliceModel::default(),
            motion: MotionController::default(),
            current_item: None,
            auto_center_in_slice: false,
            layout: Layout::default(),
            subscribers: Subscribers::default(),
        }
    }
}

impl PieChart {
    pub fn new(options: ChartOptions) -> Result<Self, ChartError> {
        options.motion.validate()?;
        Ok(Self {
            model: SliceModel::new(options.highlight_strength),
            motion: MotionController::new(0, options.motion),
            current_item: None,
            auto_center_in_slice: options.auto_center_in_slice,
            layout: Layout::default(),
            subscribers: Subscribers::default(),
        })
    }

    pub fn subscribe(&mut self, handler: impl FnMut(ChartEvent) + 'static) -> SubscriptionId {
        self.subscribers.add(Box::new(handler))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    // ---- queries ----

    pub fn items(&self) -> &[Item] {
        self.model.items()
    }

    pub fn rotation(&self) -> i32 {
        self.motion.rotation()
    }

    pub fn current_item_index(&self) -> Option<usize> {
        self.current_item
    }

    pub fn current_item(&self) -> Option<&Item> {
        self.current_item.and_then(|i| self.model.get(i))
    }

    pub fn current_label(&self) -> Option<&Label> {
        self.current_item().map(Item::label)
    }

    pub fn pointer_angle(&self) -> i32 {
        self.layout.pointer_angle
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn motion_state(&self) -> MotionState {
        self.motion.state()
    }

    /// Whether the host should keep calling [`PieChart::tick`].
    pub fn is_animating(&self) -> bool {
        self.motion.is_animating()
    }

    pub fn auto_center_in_slice(&self) -> bool {
        self.auto_center_in_slice
    }

    pub fn highlight_strength(&self) -> HighlightStrength {
        self.model.highlight_strength()
    }

    pub fn render_state(&self) -> RenderState {
        RenderState::derive(self)
    }

    // ---- data ----

    pub fn add_item(
        &mut self,
        label: impl Into<Label>,
        fraction: f32,
        slice_color: Color,
        item_color: Color,
    ) -> Result<usize, ChartError> {
        let index = self
            .model
            .add_item(label, fraction, slice_color, item_color)?;
        self.on_data_changed();
        Ok(index)
    }

    pub fn remove_item(&mut self, label: &str) -> Result<Removal, ChartError> {
        let removal = self.model.remove_item(label).inspect_err(|e| {
            log::warn!("Remove failed: {}", e);
        })?;
        self.on_data_changed();
        Ok(removal)
    }

    pub fn remove_all(&mut self) {
        self.model.remove_all();
        self.motion.stop();
        self.current_item = None;
        self.subscribers.emit(ChartEvent::Invalidated);
    }

    pub fn set_highlight_strength(&mut self, strength: f32) -> Result<(), ChartError> {
        let strength = HighlightStrength::new(strength)?;
        self.model.set_highlight_strength(strength);
        self.subscribers.emit(ChartEvent::Invalidated);
        Ok(())
    }

    pub fn set_auto_center_in_slice(&mut self, enabled: bool) {
        self.auto_center_in_slice = enabled;
    }

    /// Places the chart in a new view size. The pointer angle follows the layout.
    pub fn apply_layout(&mut self, layout: Layout) {
        log::debug!(
            "Layout: pie {:?}, pointer at {}°",
            layout.pie_bounds,
            layout.pointer_angle
        );
        self.layout = layout;
        self.on_data_changed();
    }

    // ---- rotation and selection ----

    /// Rotates the wheel directly, leaving any gesture or animation state alone.
    pub fn set_rotation(&mut self, degrees: i32) {
        self.motion.set_rotation(degrees);
        self.on_rotated();
    }

    /// Selects `index` and starts rotating it under the pointer.
    pub fn set_current_item(&mut self, index: usize) -> Result<(), ChartError> {
        let len = self.model.len();
        if index >= len {
            return Err(ChartError::IndexOutOfRange { index, len });
        }

        self.current_item = Some(index);
        self.subscribers.emit(ChartEvent::CurrentItemChanged(index));
        self.center_on_current_item();
        self.subscribers.emit(ChartEvent::Invalidated);
        Ok(())
    }

    // ---- gestures ----

    pub fn on_gesture_down(&mut self) {
        self.motion.press();
    }

    /// `delta` is the scroll distance since the previous drag event, previous minus current
    /// position. `touch` is the current pointer position.
    pub fn on_gesture_drag(&mut self, delta: Vector, touch: Point) {
        let scalar = gesture::drag_to_rotation_delta(delta, touch, self.layout.center());
        self.motion.drag(scalar);
        self.on_rotated();
    }

    pub fn on_gesture_fling(&mut self, velocity: Vector, touch: Point) {
        let scalar = gesture::fling_to_angular_velocity(velocity, touch, self.layout.center());
        if !self.motion.fling(scalar) {
            log::debug!("Fling too slow to spin the wheel");
        }
    }

    pub fn on_gesture_up(&mut self) {
        if let Some(settle) = self.motion.release() {
            self.on_settled(settle);
        }
    }

    /// Advances the running animation by `elapsed` and returns the rotation afterwards.
    pub fn tick(&mut self, elapsed: Duration) -> i32 {
        if let Some(step) = self.motion.tick(elapsed) {
            self.on_rotated();
            if let Some(settle) = step.settled {
                self.on_settled(settle);
            }
        }
        self.motion.rotation()
    }

    /// Forces any running fling or auto-center to finish where it is.
    pub fn stop_motion(&mut self) {
        if let Some(settle) = self.motion.stop() {
            self.on_settled(settle);
        }
    }

    // ---- internals ----

    fn resolve_current_item(&mut self) {
        let resolved = angle::resolve_current_item(
            self.motion.rotation(),
            self.layout.pointer_angle,
            self.model.items(),
        );

        match resolved {
            Some(index) if self.current_item != Some(index) => {
                self.current_item = Some(index);
                log::debug!("Current item: {}", index);
                self.subscribers.emit(ChartEvent::CurrentItemChanged(index));
            }
            Some(_) => {}
            None => self.current_item = None,
        }
    }

    fn on_rotated(&mut self) {
        self.resolve_current_item();
        self.subscribers.emit(ChartEvent::Invalidated);
    }

    fn on_data_changed(&mut self) {
        self.resolve_current_item();
        self.subscribers.emit(ChartEvent::Invalidated);
        if self.motion.state() == MotionState::Idle {
            self.on_settled(Settle::Released);
        }
    }

    fn on_settled(&mut self, settle: Settle) {
        if settle == Settle::Released && self.auto_center_in_slice {
            self.center_on_current_item();
        }
    }

    fn center_on_current_item(&mut self) {
        let Some(item) = self.current_item() else {
            return;
        };

        let mut target = item.mid_angle() - self.layout.pointer_angle;
        if target < WRAP_TARGET_BELOW && self.motion.rotation() > WRAP_ROTATION_ABOVE {
            target += 360;
        }
        self.motion.center_to(target);
    }
}
