use core::fmt;

/// One 24-bit pixel, channels in BMP on-disk order (blue, green, red).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub b: u8,
    pub g: u8,
    pub r: u8,
}

impl Pixel {
    /// Build from channels in on-disk order.
    pub const fn from_bgr(b: u8, g: u8, r: u8) -> Self {
        Self { b, g, r }
    }

    /// Build from channels in the usual red-green-blue reading order.
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { b, g, r }
    }

    /// A pixel with all three channels set to `v`.
    pub const fn gray(v: u8) -> Self {
        Self { b: v, g: v, r: v }
    }

    /// Truncated channel mean. The sum of three `u8` never exceeds 765.
    pub fn luma_mean(self) -> u8 {
        ((u16::from(self.r) + u16::from(self.g) + u16::from(self.b)) / 3) as u8
    }

    pub fn is_gray(self) -> bool {
        self.r == self.g && self.g == self.b
    }

    pub(crate) fn to_bytes(self) -> [u8; 3] {
        [self.b, self.g, self.r]
    }

    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            b: bytes[0],
            g: bytes[1],
            r: bytes[2],
        }
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R:{} G:{} B:{}", self.r, self.g, self.b)
    }
}

#[cfg(feature = "rgb")]
impl From<rgb::RGB8> for Pixel {
    fn from(p: rgb::RGB8) -> Self {
        Self::from_rgb(p.r, p.g, p.b)
    }
}

#[cfg(feature = "rgb")]
impl From<Pixel> for rgb::RGB8 {
    fn from(p: Pixel) -> Self {
        rgb::RGB8::new(p.r, p.g, p.b)
    }
}

#[cfg(feature = "rgb")]
impl From<rgb::alt::BGR8> for Pixel {
    fn from(p: rgb::alt::BGR8) -> Self {
        Self::from_bgr(p.b, p.g, p.r)
    }
}

#[cfg(feature = "rgb")]
impl From<Pixel> for rgb::alt::BGR8 {
    fn from(p: Pixel) -> Self {
        rgb::alt::BGR8 {
            b: p.b,
            g: p.g,
            r: p.r,
        }
    }
}
