//! Layout and background settings shared by the demonstration peers.

use std::collections::BTreeMap;

use crate::pipeline::UpdateContext;
use crate::renderer::{ElementHandle, ElementOwner};
use crate::types::{Extent, Rgba};

/// Fixed-column grid used to position wrapped children.
///
/// Child `i` sits at column `i % columns`, row `i / columns`. Rows grow
/// downward without limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: usize,
    /// Distance between the origins of neighbouring cells.
    pub pitch: i32,
    pub cell_width: i32,
    pub cell_height: i32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 4,
            pitch: 120,
            cell_width: 100,
            cell_height: 100,
        }
    }
}

impl GridLayout {
    /// Origin of the cell for child `index`.
    ///
    /// Coordinates saturate at `i32::MAX` rather than wrapping.
    pub fn cell(&self, index: usize) -> (Extent, Extent) {
        let columns = self.columns.max(1);
        let column = saturating_i32(index % columns);
        let row = saturating_i32(index / columns);
        (
            Extent::px(column.saturating_mul(self.pitch)),
            Extent::px(row.saturating_mul(self.pitch)),
        )
    }

    pub fn cell_size(&self) -> (Extent, Extent) {
        (Extent::px(self.cell_width), Extent::px(self.cell_height))
    }
}

fn saturating_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// The sized background region a peer allocates next to its synthetic tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundStyle {
    pub height: Extent,
    pub background: Rgba,
    pub border: String,
}

impl Default for BackgroundStyle {
    fn default() -> Self {
        let background = Rgba::rgb(0x3f, 0x3f, 0x6f);
        Self {
            height: Extent::px(450),
            background,
            border: format!("1px {background} outset"),
        }
    }
}

impl BackgroundStyle {
    pub fn attributes(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("position".to_string(), "relative".to_string()),
            ("width".to_string(), "100%".to_string()),
            ("height".to_string(), self.height.to_string()),
            ("background-color".to_string(), self.background.to_string()),
            ("border".to_string(), self.border.clone()),
        ])
    }

    /// Allocate the region as a `div` owned by the bound component's peer
    /// and append it under `parent`.
    pub fn allocate(&self, update: &mut UpdateContext<'_>, parent: ElementHandle) -> ElementHandle {
        let owner = ElementOwner::Peer(update.component());
        let elements = update.elements_mut();
        let div = elements.create_element("div", Some(owner));
        elements.set_attributes(div, self.attributes());
        elements.append_child(parent, div);
        div
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_cells() {
        let grid = GridLayout::default();
        assert_eq!(grid.cell(0), (Extent::px(0), Extent::px(0)));
        assert_eq!(grid.cell(1), (Extent::px(120), Extent::px(0)));
        assert_eq!(grid.cell(3), (Extent::px(360), Extent::px(0)));
        assert_eq!(grid.cell(4), (Extent::px(0), Extent::px(120)));
        assert_eq!(grid.cell(9), (Extent::px(120), Extent::px(240)));
        assert_eq!(grid.cell_size(), (Extent::px(100), Extent::px(100)));
    }

    #[test]
    fn test_grid_overflow_continues_downward() {
        let grid = GridLayout::default();
        assert_eq!(grid.cell(401), (Extent::px(120), Extent::px(100 * 120)));
    }

    #[test]
    fn test_huge_index_saturates() {
        let grid = GridLayout::default();
        assert_eq!(grid.cell(usize::MAX), (Extent::px(360), Extent::px(i32::MAX)));
        // Row count fits in i32 but the offset does not
        let row = 20_000_000;
        assert_eq!(grid.cell(row * 4 + 1), (Extent::px(120), Extent::px(i32::MAX)));
    }

    #[test]
    fn test_zero_columns_degrades_to_one() {
        let grid = GridLayout {
            columns: 0,
            ..GridLayout::default()
        };
        assert_eq!(grid.cell(2), (Extent::px(0), Extent::px(240)));
    }

    #[test]
    fn test_background_attributes() {
        let attrs = BackgroundStyle::default().attributes();
        assert_eq!(attrs["height"], "450px");
        assert_eq!(attrs["background-color"], "#3f3f6f");
        assert_eq!(attrs["border"], "1px #3f3f6f outset");
    }
}
