//! Element types for stored tensors

/// Scalar element type of every tensor in a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ElementType {
    U8 = 0x01,
    I8 = 0x02,
    U16 = 0x03,
    I16 = 0x04,
    U32 = 0x05,
    I32 = 0x06,
    U64 = 0x07,
    I64 = 0x08,
    F32 = 0x09,
    F64 = 0x0A,
    /// Complex of two f32 (re, im)
    C64 = 0x0B,
    /// Complex of two f64 (re, im)
    C128 = 0x0C,
}

impl ElementType {
    /// Size in bytes of a single element
    pub fn element_size(self) -> usize {
        match self {
            ElementType::U8 | ElementType::I8 => 1,
            ElementType::U16 | ElementType::I16 => 2,
            ElementType::U32 | ElementType::I32 | ElementType::F32 => 4,
            ElementType::U64 | ElementType::I64 | ElementType::F64 | ElementType::C64 => 8,
            ElementType::C128 => 16,
        }
    }

    /// Try to convert from u8 tag
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0x01 => Some(ElementType::U8),
            0x02 => Some(ElementType::I8),
            0x03 => Some(ElementType::U16),
            0x04 => Some(ElementType::I16),
            0x05 => Some(ElementType::U32),
            0x06 => Some(ElementType::I32),
            0x07 => Some(ElementType::U64),
            0x08 => Some(ElementType::I64),
            0x09 => Some(ElementType::F32),
            0x0A => Some(ElementType::F64),
            0x0B => Some(ElementType::C64),
            0x0C => Some(ElementType::C128),
            _ => None,
        }
    }
}
