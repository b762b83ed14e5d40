/// Row-major grid of representative cell colors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorGrid {
    pub width: u32,
    pub height: u32,
    pub cells: Vec<[u8; 3]>,
}

impl ColorGrid {
    pub fn new(width: u32, height: u32, cells: Vec<[u8; 3]>) -> Self {
        assert_eq!(width as usize * height as usize, cells.len());
        Self { width, height, cells }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Cells with their grid coordinates, `y` outer and `x` inner.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, [u8; 3])> + '_ {
        let width = self.width.max(1) as usize;
        self.cells.iter().enumerate().map(move |(index, &rgb)| {
            ((index % width) as u32, (index / width) as u32, rgb)
        })
    }
}
