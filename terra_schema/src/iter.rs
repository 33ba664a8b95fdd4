use crate::area::{DiagTileArea, TileArea};
use crate::grid::{GridDims, GridId, TileRef};
use crate::transform::TileTransform;

/// Row-major iterator over the tiles of a rectangular area.
///
/// Yields exactly `w * h` tiles; a degenerate area yields nothing. The
/// caller is responsible for choosing an area that fits its grid.
#[derive(Debug, Clone)]
pub struct RectIter {
    grid: GridId,
    dims: GridDims,
    index: u32,
    w: u16,
    x: u16,
    y: u16,
    done: bool,
}

impl RectIter {
    pub fn new(area: &TileArea, dims: GridDims) -> Self {
        let done = area.is_degenerate() || !area.tile.is_valid();
        Self {
            grid: area.tile.grid,
            dims,
            index: area.tile.index,
            w: area.w,
            x: area.w,
            y: area.h,
            done,
        }
    }
}

impl Iterator for RectIter {
    type Item = TileRef;

    fn next(&mut self) -> Option<TileRef> {
        if self.done {
            return None;
        }
        let out = TileRef::new(self.grid, self.index);

        self.x -= 1;
        if self.x > 0 {
            self.index += 1;
        } else {
            self.y -= 1;
            if self.y > 0 {
                self.x = self.w;
                // Hop from the end of one row to the start of the next.
                self.index += self.dims.width - self.w as u32 + 1;
            } else {
                self.done = true;
            }
        }
        Some(out)
    }
}

/// Iterator over the tiles of a diagonal area.
///
/// Walks in rotated coordinates, skipping positions that fall outside the
/// grid; the signed extents of the area give the scan direction.
#[derive(Debug, Clone)]
pub struct DiagIter {
    grid: GridId,
    dims: GridDims,
    base_x: i32,
    base_y: i32,
    a_cur: i32,
    b_cur: i32,
    a_max: i32,
    b_max: i32,
    cur: Option<u32>,
}

impl DiagIter {
    pub fn new(area: &DiagTileArea, dims: GridDims) -> Self {
        let cur = if area.is_degenerate() || !area.tile.is_valid() {
            None
        } else {
            Some(area.tile.index)
        };
        let (bx, by) = if area.tile.is_valid() {
            area.tile.xy(&dims)
        } else {
            (0, 0)
        };
        Self {
            grid: area.tile.grid,
            dims,
            base_x: bx as i32,
            base_y: by as i32,
            a_cur: 0,
            b_cur: 0,
            a_max: area.a as i32,
            b_max: area.b as i32,
            cur,
        }
    }

    fn advance(&mut self) {
        loop {
            if self.a_max == 1 || self.a_max == -1 {
                // Every second column has zero length, skip them entirely.
                self.a_cur = 0;
                self.b_cur = if self.b_max > 0 {
                    (self.b_cur + 2).min(self.b_max)
                } else {
                    (self.b_cur - 2).max(self.b_max)
                };
            } else {
                let new_line;
                if self.a_max > 0 {
                    self.a_cur += 2;
                    new_line = self.a_cur >= self.a_max;
                } else {
                    self.a_cur -= 2;
                    new_line = self.a_cur <= self.a_max;
                }
                if new_line {
                    // Every second line starts one tile over.
                    self.a_cur = if self.a_cur.abs() % 2 != 0 {
                        0
                    } else if self.a_max > 0 {
                        1
                    } else {
                        -1
                    };
                    if self.b_max > 0 {
                        self.b_cur += 1;
                    } else {
                        self.b_cur -= 1;
                    }
                }
            }

            let x = self.base_x + (self.a_cur - self.b_cur) / 2;
            let y = self.base_y + (self.b_cur + self.a_cur) / 2;
            if self.dims.contains(x, y) {
                self.cur = Some(self.dims.index_of(x as u32, y as u32));
                break;
            }
            self.cur = None;
            if self.b_max == self.b_cur {
                break;
            }
        }

        if self.b_max == self.b_cur {
            self.cur = None;
        }
    }
}

impl Iterator for DiagIter {
    type Item = TileRef;

    fn next(&mut self) -> Option<TileRef> {
        let out = TileRef::new(self.grid, self.cur?);
        self.advance();
        Some(out)
    }
}

/// Couples a rectangular source scan with a transformation, yielding
/// `(source, destination)` tile pairs.
///
/// Exhausts exactly when the underlying source scan does. The transform's
/// image must fit the destination grid.
#[derive(Debug, Clone)]
pub struct TransformIter {
    src: RectIter,
    src_dims: GridDims,
    transform: TileTransform,
    dst_grid: GridId,
    dst_dims: GridDims,
}

impl TransformIter {
    pub fn new(
        src_area: &TileArea,
        src_dims: GridDims,
        transform: TileTransform,
        dst_grid: GridId,
        dst_dims: GridDims,
    ) -> Self {
        Self {
            src: RectIter::new(src_area, src_dims),
            src_dims,
            transform,
            dst_grid,
            dst_dims,
        }
    }
}

impl Iterator for TransformIter {
    type Item = (TileRef, TileRef);

    fn next(&mut self) -> Option<(TileRef, TileRef)> {
        let src = self.src.next()?;
        let dst = self
            .transform
            .apply_tile(src, &self.src_dims, self.dst_grid, &self.dst_dims);
        Some((src, dst))
    }
}
