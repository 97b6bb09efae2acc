/// An element type the extractor can slide a window over.
///
/// Besides ordering (for the counting tree) a symbol knows how to spell a
/// whole window of itself for reports. Rendering happens once per distinct
/// key, after counting is done.
pub trait Symbol: Copy + Ord + Default {
    /// Appends the display form of `window` to `out`.
    fn render(window: &[Self], out: &mut String);
}

impl Symbol for char {
    /// Characters are written as they are.
    fn render(window: &[Self], out: &mut String) {
        out.extend(window);
    }
}

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

impl Symbol for u8 {
    /// Each byte becomes two uppercase hexadecimal digits.
    fn render(window: &[Self], out: &mut String) {
        out.reserve(window.len() * 2);
        for &byte in window {
            out.push(char::from(HEX_DIGITS[usize::from(byte >> 4)]));
            out.push(char::from(HEX_DIGITS[usize::from(byte & 0x0f)]));
        }
    }
}
