use bitflags::bitflags;

bitflags! {
    /// Raised corners of a tile.
    ///
    /// An empty set means the tile is flat. `STEEP` marks a tile whose
    /// highest corner sits more than one unit above its lowest. The
    /// corner subset (`N | W | S | E`) doubles as the corner-selection
    /// mask of the single-tile terraform verb.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Slope: u8 {
        const W = 1 << 0;
        const S = 1 << 1;
        const E = 1 << 2;
        const N = 1 << 3;
        const STEEP = 1 << 4;
    }
}

impl Slope {
    /// All four corner bits, without the steepness marker.
    pub const CORNERS: Slope = Slope::N.union(Slope::W).union(Slope::S).union(Slope::E);

    pub fn is_flat(self) -> bool {
        self.is_empty()
    }

    pub fn is_steep(self) -> bool {
        self.contains(Slope::STEEP)
    }

    /// Number of selected corners, ignoring the steepness marker.
    pub fn corner_count(self) -> u32 {
        (self & Slope::CORNERS).bits().count_ones()
    }
}
