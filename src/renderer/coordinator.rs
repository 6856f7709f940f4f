use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::RenderConfig;

/// Rectangle of pixels, (left, top) is the upper left corner
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    pub index: usize,
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Hands out image blocks to workers, each block exactly once
pub struct RenderCoordinator {
    pub width: u32,
    pub height: u32,
    current_block: AtomicUsize,
    block_size: u32,
    x_blocks: usize,
    y_blocks: usize,
}

impl RenderCoordinator {
    pub fn new(width: u32, height: u32, config: &RenderConfig) -> RenderCoordinator {
        let block_size = config.block_size.max(1);
        let x_blocks = blocks_along(width, block_size);
        let y_blocks = blocks_along(height, block_size);
        RenderCoordinator {
            width,
            height,
            current_block: AtomicUsize::new(0),
            block_size,
            x_blocks,
            y_blocks,
        }
    }

    pub fn n_blocks(&self) -> usize {
        self.x_blocks * self.y_blocks
    }

    pub fn next_block(&self) -> Option<Block> {
        let block_i = self.current_block.fetch_add(1, Ordering::Relaxed);
        if block_i >= self.n_blocks() {
            return None;
        }
        let x_i = (block_i % self.x_blocks) as u32;
        let y_i = (block_i / self.x_blocks) as u32;
        let start_x = self.block_size * x_i;
        let end_x = start_x.saturating_add(self.block_size).min(self.width);
        let start_y = self.block_size * y_i;
        let end_y = start_y.saturating_add(self.block_size).min(self.height);
        Some(Block {
            index: block_i,
            left: start_x,
            top: start_y,
            width: end_x - start_x,
            height: end_y - start_y,
        })
    }
}

fn blocks_along(extent: u32, block_size: u32) -> usize {
    (extent as usize + block_size as usize - 1) / block_size as usize
}
