use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::area::TileArea;
use crate::direction::{Axis, DiagDirection, Direction};
use crate::grid::{GridDims, GridId, TileOffset, TileRef};

/// One of the eight symmetries of a square grid.
///
/// The discriminant packs the transformation: bits 0-1 hold the number of
/// 90-degree clockwise rotations, bit 2 whether to reflect about the X
/// axis *before* rotating.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirTransform {
    Identity = 0,
    Rotate90Cw = 1,
    Rotate180 = 2,
    Rotate90Ccw = 3,
    ReflectNeSw = 4,
    ReflectWE = 5,
    ReflectNwSe = 6,
    ReflectNS = 7,
}

/// Error for raw transformation codes outside the canonical range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transformation code {0}")]
pub struct InvalidTransform(pub u8);

impl DirTransform {
    /// Every symmetry, in discriminant order.
    pub const ALL: [DirTransform; 8] = [
        DirTransform::Identity,
        DirTransform::Rotate90Cw,
        DirTransform::Rotate180,
        DirTransform::Rotate90Ccw,
        DirTransform::ReflectNeSw,
        DirTransform::ReflectWE,
        DirTransform::ReflectNwSe,
        DirTransform::ReflectNS,
    ];

    pub fn reflects(self) -> bool {
        self as u8 & 4 != 0
    }

    /// Clockwise quarter-turn count applied after the optional reflection.
    pub fn rotation(self) -> u8 {
        self as u8 & 3
    }

    fn from_parts(reflect: bool, rotation: u8) -> DirTransform {
        Self::ALL[(((reflect as u8) << 2) | (rotation & 3)) as usize]
    }

    /// The transformation equivalent to applying `self`, then `then`.
    ///
    /// Composition is associative but not commutative; a reflection in the
    /// second operand reverses the sense of the first operand's rotation.
    pub fn combine(self, then: DirTransform) -> DirTransform {
        let rotation = if then.reflects() {
            then.rotation().wrapping_sub(self.rotation())
        } else {
            then.rotation().wrapping_add(self.rotation())
        };
        Self::from_parts(self.reflects() ^ then.reflects(), rotation & 3)
    }

    /// The transformation undoing `self`. Reflections are involutions;
    /// rotations invert by negating the turn count.
    pub fn invert(self) -> DirTransform {
        if self.reflects() {
            self
        } else {
            Self::from_parts(false, 0u8.wrapping_sub(self.rotation()) & 3)
        }
    }

    /// Whether transformed coordinates swap their axes.
    pub fn swaps_axes(self) -> bool {
        self.rotation() & 1 == 1
    }

    pub fn apply_to_axis(self, axis: Axis) -> Axis {
        if self.swaps_axes() {
            axis.other()
        } else {
            axis
        }
    }

    pub fn apply_to_dir(self, dir: Direction) -> Direction {
        let d = if self.reflects() {
            // Reflect about the X axis: north-east stays put.
            Direction::from_u8((2u8).wrapping_sub(dir as u8))
        } else {
            dir
        };
        d.rotate(2 * self.rotation())
    }

    pub fn apply_to_diag_dir(self, dir: DiagDirection) -> DiagDirection {
        let d = if self.reflects() {
            DiagDirection::from_u8(0u8.wrapping_sub(dir as u8))
        } else {
            dir
        };
        d.rotate(self.rotation())
    }

    /// Transform a coordinate offset: reflect about the X axis if
    /// requested, then rotate clockwise.
    pub fn apply_to_offset(self, v: TileOffset) -> TileOffset {
        let mut x = v.x;
        let mut y = v.y;
        if self.reflects() {
            y = -y;
        }
        for _ in 0..self.rotation() {
            let t = x;
            x = y;
            y = -t;
        }
        TileOffset::new(x, y)
    }

    /// Offset by which the conceptual north corner of a tile moves under
    /// this transformation.
    ///
    /// Rotating or reflecting a tile moves which geometric corner is the
    /// northernmost; e.g. a quarter turn clockwise carries the north
    /// corner to the east one, offset (0, 1).
    pub fn north_corner_offset(self) -> TileOffset {
        const TABLE: [(i32, i32); 8] = [
            (0, 0), // identity: north
            (0, 1), // 90 cw: east
            (1, 1), // 180: south
            (1, 0), // 90 ccw: west
            (0, 1), // reflect NE-SW: east
            (1, 1), // reflect W-E: south
            (1, 0), // reflect NW-SE: west
            (0, 0), // reflect N-S: north
        ];
        let (x, y) = TABLE[self as usize];
        TileOffset::new(x, y)
    }
}

impl TryFrom<u8> for DirTransform {
    type Error = InvalidTransform;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        if v < 8 {
            Ok(Self::ALL[v as usize])
        } else {
            Err(InvalidTransform(v))
        }
    }
}

/// A symmetry plus a translation: the affine map carrying tiles of one
/// grid onto tiles of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileTransform {
    pub dtr: DirTransform,
    pub offset: TileOffset,
}

impl TileTransform {
    pub fn new(dtr: DirTransform, offset: TileOffset) -> Self {
        Self { dtr, offset }
    }

    /// The transform with the given symmetry that carries `from` onto
    /// `to`.
    pub fn between_tiles(from: (i32, i32), to: (i32, i32), dtr: DirTransform) -> Self {
        let moved = dtr.apply_to_offset(TileOffset::new(from.0, from.1));
        Self::new(dtr, TileOffset::new(to.0 - moved.x, to.1 - moved.y))
    }

    pub fn apply(&self, x: i32, y: i32) -> (i32, i32) {
        let v = self.dtr.apply_to_offset(TileOffset::new(x, y));
        (v.x + self.offset.x, v.y + self.offset.y)
    }

    /// Map a tile of the source grid onto the destination grid.
    ///
    /// The caller is responsible for choosing a transform whose image fits
    /// the destination grid.
    pub fn apply_tile(
        &self,
        tile: TileRef,
        src_dims: &GridDims,
        dst_grid: GridId,
        dst_dims: &GridDims,
    ) -> TileRef {
        let (x, y) = tile.xy(src_dims);
        let (tx, ty) = self.apply(x as i32, y as i32);
        debug_assert!(dst_dims.contains(tx, ty));
        TileRef::at_xy(dst_grid, dst_dims, tx as u32, ty as u32)
    }

    pub fn invert(&self) -> TileTransform {
        Self::between_tiles((self.offset.x, self.offset.y), (0, 0), self.dtr.invert())
    }

    /// The transform mapping corresponding tiles of `from` onto `to`.
    pub fn between_areas(
        from: &TileArea,
        from_dims: &GridDims,
        to: &TileArea,
        to_dims: &GridDims,
        dtr: DirTransform,
    ) -> Self {
        debug_assert!(if dtr.swaps_axes() {
            from.w == to.h && from.h == to.w
        } else {
            from.w == to.w && from.h == to.h
        });

        let dir = dtr.north_corner_offset();
        let (fx, fy) = from.tile.xy(from_dims);
        let (tx, ty) = to.tile.xy(to_dims);
        Self::between_tiles(
            (fx as i32, fy as i32),
            (
                tx as i32 + (to.w as i32 - 1) * dir.x,
                ty as i32 + (to.h as i32 - 1) * dir.y,
            ),
            dtr,
        )
    }

    /// The transform mapping corresponding tile *corners* of `from` onto
    /// `to`. Corner space is one unit larger than tile space in each
    /// dimension, so one extra north-corner offset is added.
    pub fn between_area_corners(
        from: &TileArea,
        from_dims: &GridDims,
        to: &TileArea,
        to_dims: &GridDims,
        dtr: DirTransform,
    ) -> Self {
        let mut ret = Self::between_areas(from, from_dims, to, to_dims, dtr);
        let extra = dtr.north_corner_offset();
        ret.offset.x += extra.x;
        ret.offset.y += extra.y;
        ret
    }
}

/// Transform an area onto a destination grid.
///
/// Width and height swap under odd rotations; the origin is corrected by
/// the north-corner offset so the result is anchored on its own north
/// corner again.
pub fn transform_area(
    area: &TileArea,
    src_dims: &GridDims,
    transform: &TileTransform,
    dst_grid: GridId,
    dst_dims: &GridDims,
) -> TileArea {
    let (w, h) = if transform.dtr.swaps_axes() {
        (area.h, area.w)
    } else {
        (area.w, area.h)
    };

    let (x, y) = area.tile.xy(src_dims);
    let (mut px, mut py) = transform.apply(x as i32, y as i32);
    let dir = transform.dtr.north_corner_offset();
    px -= (w as i32 - 1) * dir.x;
    py -= (h as i32 - 1) * dir.y;

    debug_assert!(dst_dims.contains(px, py));
    TileArea::new(TileRef::at_xy(dst_grid, dst_dims, px as u32, py as u32), w, h)
}
