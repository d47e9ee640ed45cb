/// A single palette color candidate: a representative color and the number of
/// sampled pixels that contributed to it.
///
/// Channel values come from quantization and may slightly exceed 255 near the
/// top of the range (255 quantizes to 264); [`Swatch::to_hex`] clamps them
/// back into the 8-bit range when encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Swatch {
    red: u16,
    green: u16,
    blue: u16,
    population: u32,
}

impl Swatch {
    pub fn new((red, green, blue): (u16, u16, u16), population: u32) -> Swatch {
        Self {
            red,
            green,
            blue,
            population,
        }
    }

    pub fn rgb(self) -> (u16, u16, u16) {
        (self.red, self.green, self.blue)
    }

    pub fn population(self) -> u32 {
        self.population
    }

    /// Manhattan distance to another swatch in RGB space.
    pub fn distance(self, other: Swatch) -> u16 {
        self.red.abs_diff(other.red) + self.green.abs_diff(other.green) + self.blue.abs_diff(other.blue)
    }

    /// Channels combined into a single integer where the red channel is the
    /// most significant and the blue the least. Used as a stable ordering key
    /// among equally-populated swatches; 10 bits per channel since quantized
    /// values can exceed 255.
    pub(crate) fn packed_key(self) -> u32 {
        ((self.red as u32) << 20) | ((self.green as u32) << 10) | self.blue as u32
    }

    /// Encode as a lowercase `#rrggbb` string, clamping each channel to 255.
    pub fn to_hex(self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            self.red.min(255),
            self.green.min(255),
            self.blue.min(255)
        )
    }
}
