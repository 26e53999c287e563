//! Dense, growable 2D bitset used for both image masks and page occupancy.

const WORD_BITS: u32 = u64::BITS;

/// Row-major bit grid. Each row starts on a word boundary, bits past `width` are always zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitGrid {
    width: u32,
    height: u32,
    stride: usize,
    words: Vec<u64>,
}

impl BitGrid {
    pub fn new(width: u32, height: u32) -> Self {
        let stride = words_for(width);
        Self {
            width,
            height,
            stride,
            words: vec![0; stride * height as usize],
        }
    }

    /// A grid with every cell set.
    pub fn filled(width: u32, height: u32) -> Self {
        let mut g = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                g.set(x, y);
            }
        }
        g
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> (usize, u32) {
        debug_assert!(x < self.width && y < self.height);
        (
            y as usize * self.stride + (x / WORD_BITS) as usize,
            x % WORD_BITS,
        )
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        let (w, b) = self.index(x, y);
        (self.words[w] >> b) & 1 != 0
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32) {
        let (w, b) = self.index(x, y);
        self.words[w] |= 1 << b;
    }

    pub fn count_ones(&self) -> u64 {
        self.words.iter().map(|w| w.count_ones() as u64).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn is_full(&self) -> bool {
        self.count_ones() == self.width as u64 * self.height as u64
    }

    /// Number of consecutive set cells in row `y` starting at column `x`.
    pub fn run_from(&self, x: u32, y: u32) -> u32 {
        let row = y as usize * self.stride;
        let mut cx = x;
        let mut run = 0;
        while cx < self.width {
            let bit = cx % WORD_BITS;
            let word = self.words[row + (cx / WORD_BITS) as usize] >> bit;
            let ones = word.trailing_ones().min(self.width - cx);
            run += ones;
            cx += ones;
            if ones == 0 || cx % WORD_BITS != 0 {
                break;
            }
        }
        run
    }

    /// Grows the grid to `width x height`, keeping every set cell at its coordinates.
    ///
    /// This is the only operation that changes a grid's shape. Shrinking is not supported, the new
    /// size is clamped to at least the current one.
    pub fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(self.width);
        let height = height.max(self.height);
        if width == self.width && height == self.height {
            return;
        }
        let stride = words_for(width);
        let mut words = vec![0u64; stride * height as usize];
        for y in 0..self.height as usize {
            let src = &self.words[y * self.stride..(y + 1) * self.stride];
            words[y * stride..y * stride + self.stride].copy_from_slice(src);
        }
        self.width = width;
        self.height = height;
        self.stride = stride;
        self.words = words;
    }

    /// Iterates set cells in row-major order.
    pub fn iter_ones(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).filter_map(move |x| self.get(x, y).then_some((x, y)))
        })
    }
}

fn words_for(width: u32) -> usize {
    width.div_ceil(WORD_BITS) as usize
}
