use terra_schema::TileRef;
use thiserror::Error;

use crate::Money;

/// Why a terraforming step was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TerraformErrorKind {
    #[error("land is already at sea level")]
    AtSeaLevel,
    #[error("land would end up too high")]
    TooHigh,
    #[error("terraforming would have no effect")]
    NoEffect,
    #[error("too close to the edge of the map")]
    TooCloseToEdge,
    #[error("an elevated structure must be demolished first")]
    MustDemolishBridgeFirst,
    #[error("structure would end up too high above the lowered land")]
    TooHighAfterLowering,
    #[error("excavation would damage a buried structure")]
    ExcavationWouldDamage,
    #[error("tile contents cannot settle on the new land shape")]
    ContentRejected,
    #[error("terraforming limit reached")]
    TerraformLimitReached,
    #[error("not enough funds, {shortfall} more required")]
    InsufficientFunds { shortfall: Money },
    #[error("invalid grid transformation")]
    InvalidTransform,
    #[error("tile area is degenerate")]
    DegenerateArea,
    #[error("no such grid")]
    UnknownGrid,
    #[error("land is already level")]
    AlreadyLevel,
}

/// A refused terraforming step, optionally pointing at the tile that
/// caused the refusal so a UI can highlight it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct TerraformError {
    pub kind: TerraformErrorKind,
    pub at: Option<TileRef>,
}

impl TerraformError {
    pub fn new(kind: TerraformErrorKind) -> Self {
        Self { kind, at: None }
    }

    pub fn at(kind: TerraformErrorKind, tile: TileRef) -> Self {
        Self {
            kind,
            at: Some(tile),
        }
    }

    /// Attach a location unless one is already recorded.
    pub fn with_location(mut self, tile: TileRef) -> Self {
        if self.at.is_none() {
            self.at = Some(tile);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra_schema::GridId;

    #[test]
    fn with_location_keeps_the_first_tile() {
        let a = TileRef::new(GridId::WORLD, 3);
        let b = TileRef::new(GridId::WORLD, 9);
        let err = TerraformError::at(TerraformErrorKind::ContentRejected, a).with_location(b);
        assert_eq!(err.at, Some(a));
        let err = TerraformError::new(TerraformErrorKind::NoEffect).with_location(b);
        assert_eq!(err.at, Some(b));
    }
}
