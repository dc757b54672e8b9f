/// Size and page offset of the element providing pointer input, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { left: 0.0, top: 0.0, width, height }
    }

    pub fn with_offset(mut self, left: f32, top: f32) -> Self {
        self.left = left;
        self.top = top;
        self
    }
}

/// Half-extents used to turn page coordinates into center-relative offsets
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportMetrics {
    pub half_x: f32,
    pub half_y: f32,
    pub offset_left: f32,
    pub offset_top: f32,
}

impl ViewportMetrics {
    pub fn from_viewport(vp: &Viewport) -> Self {
        Self {
            half_x: vp.width / 2.0,
            half_y: vp.height / 2.0,
            offset_left: vp.left,
            offset_top: vp.top,
        }
    }

    /// Pointer offset from the viewport center
    pub fn center_offset(&self, page_x: f32, page_y: f32) -> (f32, f32) {
        (
            page_x - self.offset_left - self.half_x,
            page_y - self.offset_top - self.half_y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_offset_accounts_for_element_offset() {
        let metrics = ViewportMetrics::from_viewport(&Viewport::new(800.0, 600.0).with_offset(10.0, 20.0));
        assert_eq!(metrics.center_offset(410.0, 320.0), (0.0, 0.0));
        assert_eq!(metrics.center_offset(10.0, 20.0), (-400.0, -300.0));
    }
}
