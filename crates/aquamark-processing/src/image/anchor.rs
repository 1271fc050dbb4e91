//! Watermark anchor placement
//!
//! Nine named placements formed by crossing a vertical axis with a horizontal
//! one. Position text is matched leniently: any axis whose keyword is absent
//! falls back to Center, so free-form labels like "Phía Dưới Bên Phải" or
//! "bottom right corner" resolve without error.

/// Vertical placement token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAnchor {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Horizontal placement token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAnchor {
    Left,
    #[default]
    Center,
    Right,
}

/// One of the nine watermark placements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Anchor {
    pub vertical: VerticalAnchor,
    pub horizontal: HorizontalAnchor,
}

const TOP_KEYWORDS: &[&str] = &["top", "trên", "tren"];
const BOTTOM_KEYWORDS: &[&str] = &["bottom", "dưới", "duoi"];
const LEFT_KEYWORDS: &[&str] = &["left", "trái", "trai"];
const RIGHT_KEYWORDS: &[&str] = &["right", "phải", "phai"];

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

impl Anchor {
    pub const TOP_LEFT: Anchor = Anchor::new(VerticalAnchor::Top, HorizontalAnchor::Left);
    pub const CENTER: Anchor = Anchor::new(VerticalAnchor::Center, HorizontalAnchor::Center);
    pub const BOTTOM_RIGHT: Anchor = Anchor::new(VerticalAnchor::Bottom, HorizontalAnchor::Right);

    pub const fn new(vertical: VerticalAnchor, horizontal: HorizontalAnchor) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    /// Resolve free-form position text to an anchor. Never fails: unrecognized
    /// tokens yield Center for that axis. English and Vietnamese keywords are
    /// recognized, matching the position labels the original tool shipped with.
    pub fn parse(text: &str) -> Self {
        let lower = text.to_lowercase();

        let vertical = if contains_any(&lower, TOP_KEYWORDS) {
            VerticalAnchor::Top
        } else if contains_any(&lower, BOTTOM_KEYWORDS) {
            VerticalAnchor::Bottom
        } else {
            VerticalAnchor::Center
        };

        let horizontal = if contains_any(&lower, LEFT_KEYWORDS) {
            HorizontalAnchor::Left
        } else if contains_any(&lower, RIGHT_KEYWORDS) {
            HorizontalAnchor::Right
        } else {
            HorizontalAnchor::Center
        };

        Self {
            vertical,
            horizontal,
        }
    }

    /// Top-left offset of a `wm_width`×`wm_height` overlay on a
    /// `base_width`×`base_height` canvas. Offsets may go negative when the
    /// overlay exceeds the canvas; compositing clips silently. Centering uses
    /// floor division so negative offsets round down.
    pub fn resolve(
        &self,
        base_width: u32,
        base_height: u32,
        wm_width: u32,
        wm_height: u32,
    ) -> (i64, i64) {
        let x = match self.horizontal {
            HorizontalAnchor::Left => 0,
            HorizontalAnchor::Right => base_width as i64 - wm_width as i64,
            HorizontalAnchor::Center => (base_width as i64 - wm_width as i64).div_euclid(2),
        };

        let y = match self.vertical {
            VerticalAnchor::Top => 0,
            VerticalAnchor::Bottom => base_height as i64 - wm_height as i64,
            VerticalAnchor::Center => (base_height as i64 - wm_height as i64).div_euclid(2),
        };

        (x, y)
    }
}
