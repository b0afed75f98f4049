use crate::model::{Direction, Placement};

/// Running position of the next image along the append axis.
///
/// Offsets are negative because the stylesheet anchors the sheet at its
/// top-left corner and shifts it to reveal the sub-image.
#[derive(Debug, Clone, Copy)]
pub struct OffsetCursor {
    direction: Direction,
    x: i64,
    y: i64,
}

impl OffsetCursor {
    pub fn new(direction: Direction) -> Self {
        Self::starting_at(direction, (0, 0))
    }

    /// Cursor for a canvas whose first `extent` pixels are already taken.
    /// Only the component along the append axis moves the start.
    pub fn starting_at(direction: Direction, extent: (u32, u32)) -> Self {
        let (x, y) = match direction {
            Direction::Down => (0, -(extent.1 as i64)),
            Direction::Right => (-(extent.0 as i64), 0),
        };
        Self { direction, x, y }
    }

    /// Records an image of `width`x`height` at the current position and moves
    /// the cursor past it.
    pub fn place(&mut self, file_name: impl Into<String>, width: u32, height: u32) -> Placement {
        let placement = Placement {
            file_name: file_name.into(),
            width,
            height,
            offset_x: self.x,
            offset_y: self.y,
        };
        match self.direction {
            Direction::Down => self.y -= height as i64,
            Direction::Right => self.x -= width as i64,
        }
        placement
    }

    /// Offset the next placement would receive.
    pub fn position(&self) -> (i64, i64) {
        (self.x, self.y)
    }
}

/// Size of a sheet that starts at `extent` and receives `sizes` in order, or
/// `None` if it does not fit in `u32`.
pub fn stacked_extent(
    extent: (u32, u32),
    sizes: &[(u32, u32)],
    direction: Direction,
) -> Option<(u32, u32)> {
    sizes.iter().try_fold(extent, |(w, h), &(iw, ih)| match direction {
        Direction::Down => h.checked_add(ih).map(|h| (w.max(iw), h)),
        Direction::Right => w.checked_add(iw).map(|w| (w, h.max(ih))),
    })
}

/// Layout-only: computes placements for `(name, width, height)` items without
/// touching any image.
pub fn layout_placements<K: Into<String>>(
    items: impl IntoIterator<Item = (K, u32, u32)>,
    direction: Direction,
) -> Vec<Placement> {
    let mut cursor = OffsetCursor::new(direction);
    items
        .into_iter()
        .map(|(name, w, h)| cursor.place(name, w, h))
        .collect()
}
