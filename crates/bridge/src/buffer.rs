/// Capacity of the diagnostic record, in bytes.
pub const ERROR_CAPACITY: usize = 1024;

/// Capacity of the canonical result, in bytes.
pub const RESULT_CAPACITY: usize = 64 * 1024;

/// Fixed-capacity text that truncates instead of growing.
///
/// Writes stop at the last UTF-8 character boundary that fits, so the content
/// is always valid UTF-8 and never exceeds `N` bytes.
#[derive(Debug, Default)]
pub struct BoundedText<const N: usize> {
    inner: heapless::String<N>,
}

impl<const N: usize> BoundedText<N> {
    pub const fn new() -> Self {
        Self {
            inner: heapless::String::new(),
        }
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Replace the content with as much of `text` as fits.
    pub fn set(&mut self, text: &str) {
        self.inner.clear();
        let fit = floor_char_boundary(text, N);
        // `fit` never exceeds the capacity.
        let _ = self.inner.push_str(&text[..fit]);
    }

    pub fn as_str(&self) -> &str {
        self.inner.as_str()
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.inner.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

fn floor_char_boundary(text: &str, max: usize) -> usize {
    if max >= text.len() {
        return text.len();
    }
    (0..=max)
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0)
}
