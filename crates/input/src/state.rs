use glam::Vec2;
use std::collections::{BTreeMap, HashMap};

use crate::button::{Button, KeyBindings, LogicalButton};
use crate::touch::TouchRegion;

/// Logical button state fed by keyboard codes, touch points and the mouse.
///
/// Call [`InputState::update`] once per tick after every reader has run; it
/// clears the edge flags and leaves the levels alone.
#[derive(Debug, Clone)]
pub struct InputState {
    buttons: BTreeMap<LogicalButton, Button>,
    codes: HashMap<u32, LogicalButton>,
    bindings: KeyBindings,
    regions: Vec<TouchRegion>,
    dragging: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

impl InputState {
    /// Register one button per distinct entry of `bindings`.
    pub fn new(bindings: KeyBindings) -> Self {
        let buttons = bindings
            .buttons()
            .into_iter()
            .map(|b| (b, Button::default()))
            .collect();
        let mut codes = HashMap::new();
        for binding in bindings.iter() {
            codes.entry(binding.code).or_insert(binding.button);
        }
        Self {
            buttons,
            codes,
            bindings,
            regions: Vec::new(),
            dragging: false,
        }
    }

    /// Builder-style registration of on-screen controls.
    pub fn with_regions(mut self, regions: Vec<TouchRegion>) -> Self {
        self.regions = regions;
        self
    }

    pub fn regions(&self) -> &[TouchRegion] {
        &self.regions
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Current state of `button`; unregistered buttons read as released.
    pub fn button(&self, button: LogicalButton) -> Button {
        self.buttons.get(&button).copied().unwrap_or_default()
    }

    pub fn is_down(&self, button: LogicalButton) -> bool {
        self.button(button).down
    }

    pub fn just_pressed(&self, button: LogicalButton) -> bool {
        self.button(button).just_pressed
    }

    /// Iterate registered buttons in a stable order.
    pub fn buttons(&self) -> impl Iterator<Item = (LogicalButton, Button)> + '_ {
        self.buttons.iter().map(|(k, v)| (*k, *v))
    }

    pub fn code_for(&self, button: LogicalButton) -> Option<u32> {
        self.bindings.code_for(button)
    }

    /// Key event entry point. Unmapped codes are ignored.
    pub fn set_from_raw_code(&mut self, code: u32, pressed: bool) {
        match self.codes.get(&code) {
            Some(button) => self.set_button(*button, pressed),
            None => tracing::trace!(code, "ignoring unmapped key code"),
        }
    }

    pub fn set_button(&mut self, button: LogicalButton, pressed: bool) {
        if let Some(state) = self.buttons.get_mut(&button) {
            state.set(pressed);
        }
    }

    /// Same as [`InputState::set_button`] for a button given by name.
    pub fn set_by_name(&mut self, name: &str, pressed: bool) {
        match name.parse::<LogicalButton>() {
            Ok(button) => self.set_button(button, pressed),
            Err(e) => tracing::trace!(%e, "ignoring input"),
        }
    }

    /// Re-evaluate every region against the active touch points.
    ///
    /// Regions are independent: overlapping regions can all be down at once,
    /// and a button fed by several regions is down if any of them is hit.
    pub fn touches(&mut self, points: &[Vec2]) {
        let mut hits: BTreeMap<LogicalButton, bool> = BTreeMap::new();
        for region in &self.regions {
            *hits.entry(region.button).or_default() |= region.hit(points);
        }
        for (button, pressed) in hits {
            self.set_button(button, pressed);
        }
    }

    /// Touch end: every region-driven button is released.
    pub fn release_touches(&mut self) {
        let buttons: Vec<LogicalButton> = self.regions.iter().map(|r| r.button).collect();
        for button in buttons {
            self.set_button(button, false);
        }
    }

    /// Mouse press over the control surface starts a drag that behaves as a
    /// single touch point.
    pub fn pointer_down(&mut self, p: Vec2) {
        self.dragging = true;
        self.touches(&[p]);
    }

    /// Ignored unless a drag is active.
    pub fn pointer_move(&mut self, p: Vec2) {
        if self.dragging {
            self.touches(&[p]);
        }
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
        self.release_touches();
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// End of tick: clear every edge flag.
    pub fn update(&mut self) {
        for state in self.buttons.values_mut() {
            state.just_pressed = false;
        }
    }
}
