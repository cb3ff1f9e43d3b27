//! Directed reference to an arc.

use std::fmt::{Display, Formatter};
use std::ops::Not;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ShpsysError;

/// Reference to an arc of an [`ArcCollection`](crate::arcs::ArcCollection) together with the direction of traversal.
///
/// In the signed representation, used for serialization and interop, a non-negative number `i` is arc `i` traversed
/// forward and its bitwise complement `!i` (that is `-i - 1`) is the same arc traversed backward.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArcId {
    index: u32,
    reversed: bool,
}

impl ArcId {
    /// Largest arc index that has a signed representation.
    pub const MAX_INDEX: u32 = i32::MAX.unsigned_abs();

    /// Forward reference to the arc at `index`. Indices above [`ArcId::MAX_INDEX`] are clamped to it; use
    /// [`ArcId::try_new`] for indices that are not known to fit.
    pub fn new(index: u32) -> Self {
        Self {
            index: index.min(Self::MAX_INDEX),
            reversed: false,
        }
    }

    /// Backward reference to the arc at `index`. Clamped the same way as [`ArcId::new`].
    pub fn reversed(index: u32) -> Self {
        Self::new(index).reverse()
    }

    /// Forward reference to the arc at buffer position `index`.
    ///
    /// Fails with [`ShpsysError::ArcIndexOverflow`] if the index has no signed representation.
    pub fn try_new(index: usize) -> Result<Self, ShpsysError> {
        match u32::try_from(index) {
            Ok(i) if i <= Self::MAX_INDEX => Ok(Self::new(i)),
            _ => Err(ShpsysError::ArcIndexOverflow(index)),
        }
    }

    /// Decodes the signed representation.
    pub fn from_signed(id: i32) -> Self {
        if id >= 0 {
            Self::new(id.unsigned_abs())
        } else {
            Self::reversed((!id).unsigned_abs())
        }
    }

    /// Encodes the id into the signed representation.
    pub fn to_signed(self) -> i32 {
        // Constructors keep the index within `MAX_INDEX`.
        let index = i32::try_from(self.index).unwrap_or(i32::MAX);
        if self.reversed {
            !index
        } else {
            index
        }
    }

    /// Index of the arc in the collection, regardless of direction.
    pub fn abs_index(self) -> usize {
        self.index as usize
    }

    /// Returns true if the arc is traversed from its last vertex to the first one.
    pub fn is_reversed(self) -> bool {
        self.reversed
    }

    /// Same arc in the opposite direction.
    pub fn reverse(self) -> Self {
        Self {
            index: self.index,
            reversed: !self.reversed,
        }
    }

    /// Same direction, different arc.
    pub fn with_index(self, index: u32) -> Self {
        Self {
            index: index.min(Self::MAX_INDEX),
            reversed: self.reversed,
        }
    }
}

impl Not for ArcId {
    type Output = ArcId;

    fn not(self) -> Self::Output {
        self.reverse()
    }
}

impl From<i32> for ArcId {
    fn from(value: i32) -> Self {
        Self::from_signed(value)
    }
}

impl From<ArcId> for i32 {
    fn from(value: ArcId) -> Self {
        value.to_signed()
    }
}

impl Display for ArcId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_signed())
    }
}

impl Serialize for ArcId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(self.to_signed())
    }
}

impl<'de> Deserialize<'de> for ArcId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        i32::deserialize(deserializer).map(Self::from_signed)
    }
}
