use glam::{ivec2, IVec2};

/// 8 directions, clock face order.
pub const DIR_8: [IVec2; 8] = [
    IVec2::from_array([0, -1]),
    IVec2::from_array([1, -1]),
    IVec2::from_array([1, 0]),
    IVec2::from_array([1, 1]),
    IVec2::from_array([0, 1]),
    IVec2::from_array([-1, 1]),
    IVec2::from_array([-1, 0]),
    IVec2::from_array([-1, -1]),
];

pub trait VecExt: Sized + Default {
    /// Absolute size of vector in the chessboard metric.
    fn chess_len(&self) -> i32;

    /// Vec points to one of the 8 adjacent cells.
    fn is_adjacent(&self) -> bool {
        self.chess_len() == 1
    }

    /// Single 8-direction step that heads in a straight line towards the
    /// other point.
    ///
    /// Moves along the dominant axis when one axis distance is more than
    /// twice the other one, diagonally otherwise. Points that are exactly
    /// aligned along an axis always get an axis-aligned step.
    fn dir8_towards(&self, other: &Self) -> Self;

    /// 8-neighborhood of the point in `DIR_8` order.
    fn ns_8(self) -> impl Iterator<Item = Self>;
}

impl VecExt for IVec2 {
    fn chess_len(&self) -> i32 {
        self.x.abs().max(self.y.abs())
    }

    fn dir8_towards(&self, other: &Self) -> Self {
        let d = *other - *self;
        let (adx, ady) = (d.x.abs(), d.y.abs());

        if ady > 2 * adx {
            ivec2(0, d.y.signum())
        } else if adx > 2 * ady {
            ivec2(d.x.signum(), 0)
        } else {
            d.signum()
        }
    }

    fn ns_8(self) -> impl Iterator<Item = Self> {
        DIR_8.into_iter().map(move |d| self + d)
    }
}
