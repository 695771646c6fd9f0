//! Sticky summary bar visibility.
//!
//! Three surfaces report visibility independently and in no particular
//! order. The show decision is a pure function of the latest snapshot, so
//! any interleaving of updates converges to the same answer.

use serde::Serialize;

/// `show = narrow && !hero && !form && !footer`.
#[must_use]
pub fn compute_sticky_visibility(hero: bool, form: bool, footer: bool, narrow: bool) -> bool {
    narrow && !hero && !form && !footer
}

/// A surface whose visibility hides the sticky bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Hero,
    Form,
    Footer,
}

impl Surface {
    /// Visibility assumed before the first observation: the hero is above the
    /// fold on load, the form and footer are not.
    #[must_use]
    pub fn default_visible(self) -> bool {
        matches!(self, Surface::Hero)
    }
}

/// Element geometry sampled on scroll/resize when no intersection observer is
/// available. All values are viewport-relative CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSample {
    pub viewport_height: f64,
    pub hero_bottom: f64,
    pub form_top: f64,
    pub form_bottom: f64,
    /// `None` when the page has no footer.
    pub footer_top: Option<f64>,
}

impl ViewportSample {
    #[must_use]
    pub fn hero_visible(&self) -> bool {
        self.hero_bottom > 20.0
    }

    #[must_use]
    pub fn form_visible(&self) -> bool {
        self.form_top < self.viewport_height * 0.75 && self.form_bottom > 80.0
    }

    #[must_use]
    pub fn footer_visible(&self) -> bool {
        self.footer_top.is_some_and(|top| top < self.viewport_height)
    }
}

/// Latest visibility snapshot for the sticky bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StickyVisibility {
    hero: bool,
    form: bool,
    footer: bool,
    narrow: bool,
}

impl Default for StickyVisibility {
    fn default() -> Self {
        Self {
            hero: Surface::Hero.default_visible(),
            form: Surface::Form.default_visible(),
            footer: Surface::Footer.default_visible(),
            narrow: false,
        }
    }
}

impl StickyVisibility {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one observer callback and returns the recomputed decision.
    pub fn update(&mut self, surface: Surface, visible: bool) -> bool {
        match surface {
            Surface::Hero => self.hero = visible,
            Surface::Form => self.form = visible,
            Surface::Footer => self.footer = visible,
        }
        self.show()
    }

    /// Observer callbacks may arrive with no entry; the surface's default
    /// visibility stands in.
    pub fn update_entry(&mut self, surface: Surface, visible: Option<bool>) -> bool {
        self.update(surface, visible.unwrap_or_else(|| surface.default_visible()))
    }

    pub fn set_narrow(&mut self, narrow: bool) -> bool {
        self.narrow = narrow;
        self.show()
    }

    /// Narrow iff `width <= breakpoint`.
    pub fn set_viewport_width(&mut self, width: u32, breakpoint: u32) -> bool {
        self.set_narrow(width <= breakpoint)
    }

    /// Applies a scroll-sampling fallback reading to all three surfaces.
    pub fn apply_sample(&mut self, sample: &ViewportSample) -> bool {
        self.hero = sample.hero_visible();
        self.form = sample.form_visible();
        self.footer = sample.footer_visible();
        self.show()
    }

    #[must_use]
    pub fn show(&self) -> bool {
        compute_sticky_visibility(self.hero, self.form, self.footer, self.narrow)
    }

    #[must_use]
    pub fn aria_hidden(&self) -> bool {
        !self.show()
    }
}
