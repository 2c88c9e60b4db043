/// A falling piece (tetromino) with origin, rotation, and type.
///
/// Pieces are immutable values: movement and rotation return new `Piece`
/// instances, and legality is decided separately by
/// [`Board::is_colliding`](super::board::Board::is_colliding).
///
/// # Coordinate System
///
/// - The origin is the top-left corner of the piece's 4×4 bounding box
/// - X increases rightward (columns), Y increases downward (rows)
/// - Coordinates are signed so that out-of-bounds candidates can be expressed
///   and rejected by collision checks instead of by arithmetic underflow
///
/// # Example
///
/// ```
/// use genetris_engine::{Piece, PieceKind, PieceRotation};
///
/// let piece = Piece::new(PieceKind::T);
/// let moved = piece.right().rotated(1);
/// assert_eq!(moved.position().x(), 5);
/// assert_eq!(moved.rotation(), PieceRotation::new(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    position: PiecePosition,
    rotation: PieceRotation,
    kind: PieceKind,
}

impl Piece {
    /// Creates a piece at the spawn point with rotation 0.
    #[must_use]
    pub const fn new(kind: PieceKind) -> Self {
        Self::at(kind, PiecePosition::SPAWN_POSITION, PieceRotation::SPAWN)
    }

    #[must_use]
    pub const fn at(kind: PieceKind, position: PiecePosition, rotation: PieceRotation) -> Self {
        Self {
            position,
            rotation,
            kind,
        }
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Returns the absolute cells covered by this piece.
    pub fn occupied_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.kind
            .occupied_positions(self.rotation)
            .map(move |(dx, dy)| (self.position.x() + dx, self.position.y() + dy))
    }

    /// Returns this piece shifted horizontally by `dx` columns.
    #[must_use]
    pub fn shifted(&self, dx: i32) -> Self {
        Self {
            position: self.position.offset(dx, 0),
            ..*self
        }
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.shifted(-1)
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.shifted(1)
    }

    #[must_use]
    pub fn down(&self) -> Self {
        Self {
            position: self.position.offset(0, 1),
            ..*self
        }
    }

    /// Returns this piece rotated by `delta` quarter turns (positive is clockwise).
    #[must_use]
    pub fn rotated(&self, delta: i32) -> Self {
        Self {
            rotation: self.rotation.rotated(delta),
            ..*self
        }
    }
}

/// Origin of a piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    /// Every piece enters the well here.
    pub const SPAWN_POSITION: Self = Self::new(4, 2);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Rotation state of a piece.
///
/// Represents one of four rotation states:
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise
///
/// Rotation operations wrap around modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceRotation(u8);

impl PieceRotation {
    pub const SPAWN: Self = Self(0);
    pub const COUNT: usize = 4;

    /// Creates a rotation state, wrapping `value` into `0..4`.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value % 4)
    }

    /// Iterates over all four rotation states in ascending order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..4).map(Self)
    }

    #[must_use]
    pub fn rotated(self, delta: i32) -> Self {
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = (i32::from(self.0) + delta).rem_euclid(4) as u8;
        Self(value)
    }

    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// J-piece.
    J = 3,
    /// L-piece.
    L = 4,
    /// S-piece.
    S = 5,
    /// Z-piece.
    Z = 6,
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All piece kinds in table order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::J,
        PieceKind::L,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Returns the cell offsets of this piece in the given rotation, relative
    /// to the origin of its 4×4 bounding box.
    pub fn occupied_positions(self, rotation: PieceRotation) -> impl Iterator<Item = (i32, i32)> {
        PIECE_SHAPES[self as usize][rotation.as_usize()]
            .into_iter()
            .map(|(dx, dy)| (i32::from(dx), i32::from(dy)))
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use genetris_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
        }
    }
}

/// Four cell offsets `(dx, dy)` making up one rotation state of a piece.
type PieceShape = [(u8, u8); 4];

const PIECE_SHAPES: [[PieceShape; PieceRotation::COUNT]; PieceKind::LEN] = {
    const I_H: PieceShape = [(0, 1), (1, 1), (2, 1), (3, 1)];
    const I_V: PieceShape = [(1, 0), (1, 1), (1, 2), (1, 3)];
    const O: PieceShape = [(0, 0), (0, 1), (1, 0), (1, 1)];
    const S_H: PieceShape = [(1, 0), (2, 0), (0, 1), (1, 1)];
    const S_V: PieceShape = [(0, 0), (0, 1), (1, 1), (1, 2)];
    const Z_H: PieceShape = [(0, 0), (1, 0), (1, 1), (2, 1)];
    const Z_V: PieceShape = [(1, 0), (0, 1), (1, 1), (0, 2)];
    [
        // I-piece
        [I_H, I_V, I_H, I_V],
        // O-piece
        [O, O, O, O],
        // T-piece
        [
            [(1, 0), (0, 1), (1, 1), (2, 1)],
            [(1, 0), (0, 1), (1, 1), (1, 2)],
            [(0, 1), (1, 1), (2, 1), (1, 2)],
            [(1, 0), (1, 1), (2, 1), (1, 2)],
        ],
        // J-piece
        [
            [(0, 1), (1, 1), (2, 1), (2, 0)],
            [(1, 0), (1, 1), (1, 2), (2, 2)],
            [(0, 1), (1, 1), (2, 1), (0, 2)],
            [(1, 0), (1, 1), (1, 2), (0, 0)],
        ],
        // L-piece
        [
            [(0, 1), (1, 1), (2, 1), (2, 2)],
            [(1, 0), (1, 1), (1, 2), (0, 2)],
            [(0, 1), (1, 1), (2, 1), (0, 0)],
            [(1, 0), (1, 1), (1, 2), (2, 0)],
        ],
        // S-piece
        [S_H, S_V, S_H, S_V],
        // Z-piece
        [Z_H, Z_V, Z_H, Z_V],
    ]
};
