/// An ordered stack of equal-sized RGBA layers representing a volume.
///
/// Pixel layout per layer is row-major RGBA8; alpha carries occupancy.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelStack {
    width: u32,
    length: u32,
    layers: Vec<Vec<u8>>,
}

impl VoxelStack {
    pub fn new(width: u32, length: u32) -> Self {
        Self {
            width,
            length,
            layers: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn level_count(&self) -> u32 {
        self.layers.len() as u32
    }

    /// Append a layer. Panics if the pixel count does not match the
    /// stack's horizontal dimensions.
    pub fn push_layer(&mut self, layer: Vec<u8>) {
        assert_eq!(layer.len(), (self.width * self.length * 4) as usize);
        self.layers.push(layer);
    }

    pub fn layer(&self, z: u32) -> &[u8] {
        &self.layers[z as usize]
    }

    /// Occupancy at a voxel; out-of-range coordinates read as empty.
    pub fn alpha_at(&self, x: u32, y: u32, z: u32) -> u8 {
        if x >= self.width || y >= self.length || z as usize >= self.layers.len() {
            return 0;
        }
        self.layers[z as usize][((y * self.width + x) * 4 + 3) as usize]
    }

    pub fn rgba_at(&self, x: u32, y: u32, z: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        let layer = &self.layers[z as usize];
        [layer[i], layer[i + 1], layer[i + 2], layer[i + 3]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two_stack() -> VoxelStack {
        let mut stack = VoxelStack::new(2, 2);
        let mut layer = vec![0u8; 16];
        layer[3] = 200; // (0, 0)
        layer[15] = 90; // (1, 1)
        stack.push_layer(layer);
        stack
    }

    #[test]
    fn alpha_lookup_is_row_major() {
        let stack = two_by_two_stack();
        assert_eq!(stack.alpha_at(0, 0, 0), 200);
        assert_eq!(stack.alpha_at(1, 1, 0), 90);
        assert_eq!(stack.alpha_at(1, 0, 0), 0);
    }

    #[test]
    fn out_of_range_reads_empty() {
        let stack = two_by_two_stack();
        assert_eq!(stack.alpha_at(5, 0, 0), 0);
        assert_eq!(stack.alpha_at(0, 0, 3), 0);
    }

    #[test]
    #[should_panic]
    fn mismatched_layer_size_panics() {
        let mut stack = VoxelStack::new(2, 2);
        stack.push_layer(vec![0u8; 4]);
    }
}
